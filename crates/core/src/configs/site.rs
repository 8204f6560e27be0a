use std::path::{Component, Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{SiteError, SiteResult};

/// File name looked up in the site root when no explicit config path is given
pub const CONFIG_FILE_NAME: &str = "sitekit.yml";

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_SETTINGS_FILE: &str = "pelicanconf.py";
pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_REPOSITORY: &str = "https://github.com/sloria/sloria.github.io.git";

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SiteConfig {
    /// Output directory, relative to the site root. Recreated on every clean.
    pub output_dir: PathBuf,
    /// Settings file handed to the generator with `-s`.
    pub settings_file: PathBuf,
    pub generator: GeneratorConfig,
    pub serve: ServeConfig,
    pub publish: PublishConfig,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct GeneratorConfig {
    pub program: String,
    /// Environment variable carrying `development` or `production`
    pub mode_env_var: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ServeConfig {
    pub program: String,
    /// Arguments placed before the port number
    pub args: Vec<String>,
    pub default_port: u16,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PublishConfig {
    /// Tool that commits the output directory onto `branch`
    pub import_program: String,
    pub repository: String,
    pub branch: String,
    pub remote_branch: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
            generator: GeneratorConfig::default(),
            serve: ServeConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "pelican".to_string(),
            mode_env_var: "NODE_ENV".to_string(),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec!["-m".to_string(), "pelican.server".to_string()],
            default_port: DEFAULT_PORT,
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            import_program: "ghp-import".to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            branch: "gh-pages".to_string(),
            remote_branch: "master".to_string(),
        }
    }
}

impl SiteConfig {
    /// Refspec pushed by the publish task, e.g. `gh-pages:master`
    pub fn publish_refspec(&self) -> String {
        format!("{}:{}", self.publish.branch, self.publish.remote_branch)
    }

    /// Whether `outputDir` is left at `output`
    pub fn has_default_output_dir(&self) -> bool {
        self.output_dir.as_path() == Path::new(DEFAULT_OUTPUT_DIR)
    }

    /// Whether `outputDir` names a directory strictly below the site root.
    ///
    /// `.`, `./` and anything with `..` or a root resolve to the root or beyond it.
    pub fn output_dir_below_root(&self) -> bool {
        let mut components = self.output_dir.components();
        !self.output_dir.is_absolute()
            && components
                .clone()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            && components.any(|c| matches!(c, Component::Normal(_)))
    }

    fn validate(&self) -> SiteResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(SiteError::Config("outputDir must not be empty".to_string()));
        }
        if !self.output_dir_below_root() {
            // clean deletes this directory recursively, keep it inside the site root
            return Err(SiteError::Config(format!(
                "outputDir '{}' must be a relative path inside the site root",
                self.output_dir.display()
            )));
        }
        if self.generator.program.trim().is_empty() {
            return Err(SiteError::Config(
                "generator.program must not be empty".to_string(),
            ));
        }
        if self.generator.mode_env_var.trim().is_empty() {
            return Err(SiteError::Config(
                "generator.modeEnvVar must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn parse_site_config(yaml_str: &str) -> SiteResult<SiteConfig> {
    // An empty file deserializes to unit, not to the defaulted struct
    if yaml_str.trim().is_empty() {
        return Ok(SiteConfig::default());
    }
    let config: SiteConfig = serde_yaml::from_str(yaml_str)?;
    config.validate()?;
    Ok(config)
}

/// JSON Schema of `sitekit.yml`, pretty printed
pub fn site_config_schema() -> SiteResult<String> {
    let schema = schemars::schema_for!(SiteConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| SiteError::Config(format!("Failed to render config schema: {}", e)))
}

/// Load the site configuration.
///
/// With an explicit path the file must exist. Otherwise `sitekit.yml` in the site
/// root is read when present and the built-in defaults are used when it is not.
pub fn load_site_config(site_root: &Path, explicit_path: Option<&Path>) -> SiteResult<SiteConfig> {
    let (config_path, required) = match explicit_path {
        Some(path) if path.is_relative() => (site_root.join(path), true),
        Some(path) => (path.to_path_buf(), true),
        None => (site_root.join(CONFIG_FILE_NAME), false),
    };

    if !config_path.exists() {
        if required {
            return Err(SiteError::Config(format!(
                "Config file {} not found",
                config_path.display()
            )));
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(SiteConfig::default());
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        SiteError::Config(format!(
            "Failed to read site config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    parse_site_config(&content).map_err(|e| {
        SiteError::Config(format!(
            "Failed to parse site config {}: {}",
            config_path.display(),
            e
        ))
    })
}
