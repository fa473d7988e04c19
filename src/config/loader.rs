//! Configuration loading and discovery for `site.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{
    CopyConfig, ModeConfig, ProjectConfig, ScriptsConfig, SiteConfig, StylesConfig,
    TemplatesConfig,
};
use crate::build::{AssetRule, BuildMode};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the project configuration file.
pub const CONFIG_FILENAME: &str = "site.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse site.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", bullet_list(.0))]
    Validation(Vec<String>),
}

fn bullet_list(errors: &[String]) -> String {
    errors.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n")
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override source directory
    pub src: Option<PathBuf>,
    /// Override the mode environment variable name
    pub mode_env: Option<String>,
}

/// Find site.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a site.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find site.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a site.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns a default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("my-site/site.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("no site.toml found, using defaults");
            Ok(default_config())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Create a default configuration when no site.toml is found.
///
/// The project name is the current directory name.
pub fn default_config() -> SiteConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    SiteConfig {
        project: ProjectConfig {
            name: project_name,
            src: PathBuf::from("src"),
            out: PathBuf::from("dist"),
            public_path: String::new(),
            clean: true,
        },
        mode: ModeConfig::default(),
        templates: TemplatesConfig::default(),
        styles: StylesConfig::default(),
        scripts: ScriptsConfig::default(),
        copy: vec![CopyConfig { from: PathBuf::from("images"), to: PathBuf::from("images") }],
        assets: vec![AssetRule::images(), AssetRule::fonts()],
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut SiteConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if let Some(ref src) = overrides.src {
        config.project.src = src.clone();
    }

    if let Some(ref mode_env) = overrides.mode_env {
        config.mode.env = mode_env.clone();
    }
}

/// Read the build mode from the environment variable named in the config.
pub fn mode_from_env(config: &SiteConfig) -> BuildMode {
    BuildMode::from_env(&config.mode.env)
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to a base directory.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Starter configuration written by `sitegraph init`.
///
/// The project name is emitted as a TOML string literal, so quotes and
/// backslashes survive a round trip.
pub fn starter_config(name: &str) -> String {
    let name = toml::Value::String(name.to_string());
    format!(
        r#"[project]
name = {name}
src = "src"
out = "dist"

[mode]
env = "NODE_ENV"

[templates]
root = "pug"
include = ["**/*.pug"]
exclude = ["**/_*.pug"]

[styles]
root = "scss"
include = ["**/*.scss"]
exclude = ["**/_*.scss"]

[scripts]
root = "js"
include = ["*.ts"]

[[copy]]
from = "images"
to = "images"
"#
    )
}
