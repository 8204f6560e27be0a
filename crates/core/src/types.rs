use thiserror::Error;

/// The main error type for sitekit operations
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to execute command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with exit code {}", display_code(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Task error: {0}")]
    Task(String),
}

impl SiteError {
    /// Exit code the process should terminate with for this error.
    ///
    /// A failed external command hands its own code through; everything else is `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            SiteError::CommandFailed {
                code: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

/// Result type alias for sitekit operations
pub type SiteResult<T> = Result<T, SiteError>;
