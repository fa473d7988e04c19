//! Artifact binding.
//!
//! Turns every entry of a registry into an [`ArtifactDescriptor`]: where the
//! output goes, whether it is hashed, minified, or gets a source map, and
//! which backend realizes it.

use crate::build::{AssetFamily, BuildMode, EntryRegistry, LogicalKey};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend-specific transformation directive carried by a descriptor.
///
/// The core never interprets these beyond naming the backend; they are
/// passed through to the collaborator that realizes the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Directive {
    /// Render a template into an HTML page
    Render {
        /// Template backend name (e.g. "pug")
        backend: String,
        /// Emit indented markup
        pretty: bool,
        /// Inject script and style tags automatically
        inject: bool,
    },
    /// Transform a stylesheet and extract it into a CSS file
    Extract {
        /// Style backend name (e.g. "sass")
        backend: String,
        /// Resolve `url()` references
        url_resolve: bool,
        /// Add vendor prefixes
        autoprefix: bool,
    },
    /// Bundle a script entry point
    Bundle {
        /// Script backend name (e.g. "ts")
        backend: String,
        /// Extensions tried when resolving imports, in order
        extensions: Vec<String>,
    },
}

impl Directive {
    /// Name of the backend that realizes this directive.
    pub fn backend(&self) -> &str {
        match self {
            Directive::Render { backend, .. }
            | Directive::Extract { backend, .. }
            | Directive::Bundle { backend, .. } => backend,
        }
    }

    /// Family this directive applies to.
    pub fn family(&self) -> AssetFamily {
        match self {
            Directive::Render { .. } => AssetFamily::Template,
            Directive::Extract { .. } => AssetFamily::Stylesheet,
            Directive::Bundle { .. } => AssetFamily::Script,
        }
    }
}

/// Directive applied to each family's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directives {
    pub template: Directive,
    pub stylesheet: Directive,
    pub script: Directive,
}

impl Directives {
    /// Directive for a family.
    pub fn for_family(&self, family: AssetFamily) -> &Directive {
        match family {
            AssetFamily::Template => &self.template,
            AssetFamily::Stylesheet => &self.stylesheet,
            AssetFamily::Script => &self.script,
        }
    }
}

impl Default for Directives {
    fn default() -> Self {
        Self {
            template: Directive::Render { backend: "pug".to_string(), pretty: true, inject: false },
            stylesheet: Directive::Extract {
                backend: "sass".to_string(),
                url_resolve: false,
                autoprefix: true,
            },
            script: Directive::Bundle {
                backend: "ts".to_string(),
                extensions: vec![".ts".to_string(), ".js".to_string()],
            },
        }
    }
}

/// Output description of one build entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Logical key of the entry
    pub key: LogicalKey,
    /// Family the entry belongs to
    pub family: AssetFamily,
    /// Source file the artifact is produced from
    pub source: PathBuf,
    /// Output path pattern relative to the output directory
    pub output: String,
    /// Whether the output file name carries a content hash
    pub content_hash: bool,
    /// Whether a source map is emitted alongside the output
    pub source_map: bool,
    /// Whether the output is minified
    pub minify: bool,
    /// How the backend realizes the artifact
    pub directive: Directive,
}

impl ArtifactDescriptor {
    /// Create the descriptor for one registry entry.
    ///
    /// Output file names are never hashed: page URLs must stay stable, and
    /// stable stylesheet and script names keep template references simple.
    pub fn new(
        family: AssetFamily,
        key: LogicalKey,
        source: PathBuf,
        mode: BuildMode,
        directive: Directive,
    ) -> Self {
        let output = family.output_for(key.as_str());
        let (source_map, minify) = match family {
            AssetFamily::Template => (false, false),
            AssetFamily::Stylesheet | AssetFamily::Script => (mode.source_maps(), mode.minify()),
        };

        Self { key, family, source, output, content_hash: false, source_map, minify, directive }
    }

    /// Stable identifier, e.g. `stylesheet:blog/post`.
    pub fn id(&self) -> String {
        format!("{}:{}", self.family, self.key)
    }

    /// Output path of the source map, when one is emitted.
    pub fn source_map_output(&self) -> Option<String> {
        self.source_map.then(|| format!("{}.map", self.output))
    }

    /// Check if this artifact matches a filter string.
    ///
    /// Supports patterns like:
    /// - Exact match: "template:index"
    /// - Family match: "stylesheet"
    /// - Wildcards: "*:index" or "script:*"
    pub fn matches_filter(&self, filter: &str) -> bool {
        if self.id() == filter || self.family.to_string() == filter {
            return true;
        }

        if let Some((family_pat, key_pat)) = filter.split_once(':') {
            let family_matches = family_pat == "*" || family_pat == self.family.to_string();
            let key_matches = key_pat == "*" || key_pat == self.key.as_str();
            return family_matches && key_matches;
        }

        false
    }
}

/// Bind every entry of a registry to an artifact descriptor.
///
/// The result is ordered by logical key so that generated configuration is
/// byte-for-byte reproducible for identical inputs.
pub fn bind(
    registry: &EntryRegistry,
    mode: BuildMode,
    directive: &Directive,
) -> Vec<ArtifactDescriptor> {
    let family = registry.family();
    let mut artifacts: Vec<_> = registry
        .iter()
        .map(|(key, source)| {
            ArtifactDescriptor::new(family, key.clone(), source.clone(), mode, directive.clone())
        })
        .collect();

    artifacts.sort_by(|a, b| a.key.cmp(&b.key));
    artifacts
}
