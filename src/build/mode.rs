//! Build mode switch.

use serde::{Deserialize, Serialize};

/// Environment variable read when no other name is configured.
pub const DEFAULT_MODE_ENV: &str = "NODE_ENV";

/// Development/production switch controlling source maps and minification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Source maps on, minification off
    #[default]
    Development,
    /// Source maps off, minification on
    Production,
}

impl BuildMode {
    /// Interpret an external mode signal.
    ///
    /// Only the exact value `production` selects [`BuildMode::Production`];
    /// anything else, including an unset signal, is development.
    pub fn from_signal(value: Option<&str>) -> Self {
        match value {
            Some("production") => BuildMode::Production,
            _ => BuildMode::Development,
        }
    }

    /// Read the mode from an environment variable.
    pub fn from_env(var: &str) -> Self {
        Self::from_signal(std::env::var(var).ok().as_deref())
    }

    /// Whether source maps are emitted for styles and scripts.
    pub fn source_maps(self) -> bool {
        self == BuildMode::Development
    }

    /// Whether minification and extraction passes run.
    pub fn minify(self) -> bool {
        self == BuildMode::Production
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildMode::Development => write!(f, "development"),
            BuildMode::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(BuildMode::Development),
            "production" | "prod" => Ok(BuildMode::Production),
            other => {
                Err(format!("unknown build mode '{}' (expected development or production)", other))
            }
        }
    }
}
