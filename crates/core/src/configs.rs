//! Configuration parsing for the site task runner

pub mod site;
