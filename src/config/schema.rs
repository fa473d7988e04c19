//! Configuration schema types for `site.toml`
//!
//! Defines the structure and validation rules for sitegraph project configuration.

use crate::build::{AssetRule, Directive, Directives, GlobRule, DEFAULT_MODE_ENV};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required)
    pub name: String,
    /// Source directory containing the family roots
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Build output directory
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Public URL prefix of emitted files
    #[serde(default)]
    pub public_path: String,
    /// Clean the output directory before emitting
    #[serde(default = "default_true")]
    pub clean: bool,
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}

fn default_out() -> PathBuf {
    PathBuf::from("dist")
}

fn default_true() -> bool {
    true
}

/// Build mode signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Environment variable holding the mode (`production` or anything else)
    #[serde(default = "default_mode_env")]
    pub env: String,
}

fn default_mode_env() -> String {
    DEFAULT_MODE_ENV.to_string()
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self { env: default_mode_env() }
    }
}

/// Page template family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Root directory, relative to `project.src`
    #[serde(default = "default_template_root")]
    pub root: PathBuf,
    /// Glob patterns selecting pages
    #[serde(default = "default_template_include")]
    pub include: Vec<String>,
    /// Glob patterns excluding partials
    #[serde(default = "default_template_exclude")]
    pub exclude: BTreeSet<String>,
    /// Template backend name
    #[serde(default = "default_template_backend")]
    pub backend: String,
    /// Emit indented markup
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// Let the backend inject script and style tags
    #[serde(default)]
    pub inject: bool,
}

fn default_template_root() -> PathBuf {
    PathBuf::from("pug")
}

fn default_template_include() -> Vec<String> {
    vec!["**/*.pug".to_string()]
}

fn default_template_exclude() -> BTreeSet<String> {
    BTreeSet::from(["**/_*.pug".to_string()])
}

fn default_template_backend() -> String {
    "pug".to_string()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            root: default_template_root(),
            include: default_template_include(),
            exclude: default_template_exclude(),
            backend: default_template_backend(),
            pretty: true,
            inject: false,
        }
    }
}

/// Stylesheet family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylesConfig {
    /// Root directory, relative to `project.src`
    #[serde(default = "default_style_root")]
    pub root: PathBuf,
    /// Glob patterns selecting stylesheets
    #[serde(default = "default_style_include")]
    pub include: Vec<String>,
    /// Glob patterns excluding partials
    #[serde(default = "default_style_exclude")]
    pub exclude: BTreeSet<String>,
    /// Style backend name
    #[serde(default = "default_style_backend")]
    pub backend: String,
    /// Resolve `url()` references
    #[serde(default)]
    pub url_resolve: bool,
    /// Add vendor prefixes
    #[serde(default = "default_true")]
    pub autoprefix: bool,
}

fn default_style_root() -> PathBuf {
    PathBuf::from("scss")
}

fn default_style_include() -> Vec<String> {
    vec!["**/*.scss".to_string()]
}

fn default_style_exclude() -> BTreeSet<String> {
    BTreeSet::from(["**/_*.scss".to_string()])
}

fn default_style_backend() -> String {
    "sass".to_string()
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            root: default_style_root(),
            include: default_style_include(),
            exclude: default_style_exclude(),
            backend: default_style_backend(),
            url_resolve: false,
            autoprefix: true,
        }
    }
}

/// Script family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// Root directory, relative to `project.src`
    #[serde(default = "default_script_root")]
    pub root: PathBuf,
    /// Glob patterns selecting entry points
    #[serde(default = "default_script_include")]
    pub include: Vec<String>,
    /// Glob patterns excluding modules that are only imported
    #[serde(default)]
    pub exclude: BTreeSet<String>,
    /// Script backend name
    #[serde(default = "default_script_backend")]
    pub backend: String,
    /// Extensions tried when resolving imports
    #[serde(default = "default_script_extensions")]
    pub extensions: Vec<String>,
}

fn default_script_root() -> PathBuf {
    PathBuf::from("js")
}

fn default_script_include() -> Vec<String> {
    vec!["*.ts".to_string()]
}

fn default_script_backend() -> String {
    "ts".to_string()
}

fn default_script_extensions() -> Vec<String> {
    vec![".ts".to_string(), ".js".to_string()]
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            root: default_script_root(),
            include: default_script_include(),
            exclude: BTreeSet::new(),
            backend: default_script_backend(),
            extensions: default_script_extensions(),
        }
    }
}

/// Directory copied into the output tree as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Source directory, relative to `project.src`
    pub from: PathBuf,
    /// Destination directory, relative to `project.out`
    pub to: PathBuf,
}

fn default_copy() -> Vec<CopyConfig> {
    vec![CopyConfig { from: PathBuf::from("images"), to: PathBuf::from("images") }]
}

fn default_assets() -> Vec<AssetRule> {
    vec![AssetRule::images(), AssetRule::fonts()]
}

/// Complete site.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Project metadata (required)
    pub project: ProjectConfig,
    /// Build mode signal
    #[serde(default)]
    pub mode: ModeConfig,
    /// Page templates
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Stylesheets
    #[serde(default)]
    pub styles: StylesConfig,
    /// Script entry points
    #[serde(default)]
    pub scripts: ScriptsConfig,
    /// Passthrough copies
    #[serde(default = "default_copy")]
    pub copy: Vec<CopyConfig>,
    /// Resource rules for referenced binary files
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetRule>,
}

/// Validation error for config
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl SiteConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut error = |field: &str, message: &str| {
            errors.push(ConfigValidationError {
                field: field.to_string(),
                message: message.to_string(),
            });
        };

        if self.project.name.is_empty() {
            error("project.name", "must be a non-empty string");
        }

        if self.mode.env.is_empty() {
            error("mode.env", "must name an environment variable");
        }

        let families = [
            ("templates", &self.templates.include, &self.templates.backend),
            ("styles", &self.styles.include, &self.styles.backend),
            ("scripts", &self.scripts.include, &self.scripts.backend),
        ];
        for (section, include, backend) in families {
            if include.is_empty() {
                error(&format!("{}.include", section), "must contain at least one glob pattern");
            }
            if include.iter().any(|p| p.trim().is_empty()) {
                error(&format!("{}.include", section), "patterns must be non-empty");
            }
            if backend.is_empty() {
                error(&format!("{}.backend", section), "must name a backend");
            }
        }

        for (i, copy) in self.copy.iter().enumerate() {
            if copy.from.as_os_str().is_empty() {
                error(&format!("copy[{}].from", i), "must be a non-empty path");
            }
            if copy.to.as_os_str().is_empty() {
                error(&format!("copy[{}].to", i), "must be a non-empty path");
            }
        }

        for (i, asset) in self.assets.iter().enumerate() {
            if asset.extensions.is_empty() {
                error(&format!("assets[{}].extensions", i), "must list at least one extension");
            }
            if asset.output.is_empty() {
                error(&format!("assets[{}].output", i), "must be a non-empty pattern");
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Glob rule for page templates.
    pub fn template_rule(&self) -> GlobRule {
        GlobRule {
            include: self.templates.include.clone(),
            exclude: self.templates.exclude.clone(),
        }
    }

    /// Glob rule for stylesheets.
    pub fn style_rule(&self) -> GlobRule {
        GlobRule { include: self.styles.include.clone(), exclude: self.styles.exclude.clone() }
    }

    /// Glob rule for script entry points.
    pub fn script_rule(&self) -> GlobRule {
        GlobRule { include: self.scripts.include.clone(), exclude: self.scripts.exclude.clone() }
    }

    /// Transformation directives for the three families.
    pub fn directives(&self) -> Directives {
        Directives {
            template: Directive::Render {
                backend: self.templates.backend.clone(),
                pretty: self.templates.pretty,
                inject: self.templates.inject,
            },
            stylesheet: Directive::Extract {
                backend: self.styles.backend.clone(),
                url_resolve: self.styles.url_resolve,
                autoprefix: self.styles.autoprefix,
            },
            script: Directive::Bundle {
                backend: self.scripts.backend.clone(),
                extensions: self.scripts.extensions.clone(),
            },
        }
    }
}
