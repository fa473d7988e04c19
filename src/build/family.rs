//! Asset family definitions.
//!
//! Every discovered source belongs to exactly one family. The family decides
//! which root and glob rule are used for discovery and how the entry is bound
//! to an output artifact.

use serde::{Deserialize, Serialize};

/// Kind of source asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFamily {
    /// Page template rendered to HTML
    Template,
    /// Stylesheet extracted to CSS
    Stylesheet,
    /// Script module used as a bundler entry point
    Script,
}

impl AssetFamily {
    /// All families in binding order.
    pub const ALL: [AssetFamily; 3] =
        [AssetFamily::Template, AssetFamily::Stylesheet, AssetFamily::Script];

    /// Output path pattern for an entry of this family.
    pub fn output_for(self, key: &str) -> String {
        match self {
            AssetFamily::Template => format!("{}.html", key),
            AssetFamily::Stylesheet => format!("css/{}.css", key),
            AssetFamily::Script => format!("js/{}.js", key),
        }
    }
}

impl std::fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetFamily::Template => write!(f, "template"),
            AssetFamily::Stylesheet => write!(f, "stylesheet"),
            AssetFamily::Script => write!(f, "script"),
        }
    }
}

impl std::str::FromStr for AssetFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "template" | "templates" | "page" => Ok(AssetFamily::Template),
            "stylesheet" | "stylesheets" | "style" | "styles" => Ok(AssetFamily::Stylesheet),
            "script" | "scripts" => Ok(AssetFamily::Script),
            other => Err(format!(
                "unknown asset family '{}' (expected template, stylesheet, or script)",
                other
            )),
        }
    }
}
