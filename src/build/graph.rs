//! Build graph assembly.
//!
//! The [`BuildGraph`] is the only output of the core: the per-family artifact
//! bindings merged with static copy rules and global output settings. It is
//! handed to an external bundling backend as a Rust value or as JSON.
//!
//! # Graph Format
//!
//! ```json
//! {
//!   "mode": "production",
//!   "output": { "dir": "/site/dist", "public_path": "", "clean": true },
//!   "entries": { "index": "/site/src/js/index.ts" },
//!   "template_artifacts": [ { "key": "index", "output": "index.html", ... } ],
//!   "style_artifacts": [ { "key": "index", "output": "css/index.css", ... } ],
//!   "script_artifacts": [ { "key": "index", "output": "js/index.js", ... } ],
//!   "copy_rules": [ { "from": "/site/src/images", "to": "/site/dist/images" } ],
//!   "asset_rules": [ { "extensions": ["png"], "output": "images/[name].[contenthash:7][ext]" } ]
//! }
//! ```

use crate::build::{
    bind, ArtifactDescriptor, AssetFamily, BuildMode, Directives, EntryRegistry, GraphError,
    LogicalKey,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// Passthrough copy of a directory into the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRule {
    /// Source directory
    pub from: PathBuf,
    /// Destination directory
    pub to: PathBuf,
}

impl CopyRule {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self { from: from.into(), to: to.into() }
    }
}

/// Resource rule for binary files referenced from stylesheets and scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRule {
    /// File extensions handled by this rule, without the leading dot
    pub extensions: Vec<String>,
    /// Output file name pattern
    pub output: String,
}

impl AssetRule {
    /// Images emitted under `images/` with a short content hash.
    pub fn images() -> Self {
        Self {
            extensions: ["png", "jpg", "jpeg", "gif", "svg", "ico"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            output: "images/[name].[contenthash:7][ext]".to_string(),
        }
    }

    /// Fonts emitted under `fonts/` with a short content hash.
    pub fn fonts() -> Self {
        Self {
            extensions: ["woff", "woff2", "eot", "ttf", "otf"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            output: "fonts/[name].[contenthash:7][ext]".to_string(),
        }
    }

    /// Check if a file extension is handled by this rule.
    pub fn handles(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(extension))
    }
}

/// Global output settings of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Output directory
    pub dir: PathBuf,
    /// Public URL prefix of emitted files
    pub public_path: String,
    /// Remove stale files from the output directory before emitting
    pub clean: bool,
}

impl OutputSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), public_path: String::new(), clean: true }
    }
}

/// Static collaborators attached to the graph unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSettings {
    pub output: OutputSettings,
    pub directives: Directives,
    pub copy_rules: Vec<CopyRule>,
    pub asset_rules: Vec<AssetRule>,
}

impl GraphSettings {
    /// Settings with default directives and asset rules and no copy rules.
    pub fn new(output: OutputSettings) -> Self {
        Self {
            output,
            directives: Directives::default(),
            copy_rules: Vec::new(),
            asset_rules: vec![AssetRule::images(), AssetRule::fonts()],
        }
    }

    /// Add a copy rule.
    pub fn with_copy_rule(mut self, rule: CopyRule) -> Self {
        self.copy_rules.push(rule);
        self
    }
}

/// Everything [`assemble`] needs.
#[derive(Debug, Clone)]
pub struct AssembleInput {
    pub templates: EntryRegistry,
    pub styles: EntryRegistry,
    pub scripts: EntryRegistry,
    pub mode: BuildMode,
    pub settings: GraphSettings,
}

/// Composed build configuration consumed by the bundling backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildGraph {
    /// Mode the graph was assembled for
    pub mode: BuildMode,
    /// Global output settings
    pub output: OutputSettings,
    /// Bundler entry points: script key to source path
    pub entries: BTreeMap<LogicalKey, PathBuf>,
    /// Pages to render
    pub template_artifacts: Vec<ArtifactDescriptor>,
    /// Stylesheets to extract
    pub style_artifacts: Vec<ArtifactDescriptor>,
    /// Script bundles, one per entry point
    pub script_artifacts: Vec<ArtifactDescriptor>,
    /// Passthrough directory copies
    pub copy_rules: Vec<CopyRule>,
    /// Resource rules for referenced binary files
    pub asset_rules: Vec<AssetRule>,
}

impl BuildGraph {
    /// All artifacts in family order (templates, styles, scripts).
    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactDescriptor> {
        self.template_artifacts.iter().chain(&self.style_artifacts).chain(&self.script_artifacts)
    }

    /// Total number of artifacts.
    pub fn artifact_count(&self) -> usize {
        self.template_artifacts.len() + self.style_artifacts.len() + self.script_artifacts.len()
    }

    /// Find an artifact by id (e.g. `template:index`).
    pub fn artifact(&self, id: &str) -> Option<&ArtifactDescriptor> {
        self.artifacts().find(|a| a.id() == id)
    }

    /// Keep only artifacts matching at least one filter.
    ///
    /// Entry points follow the retained script artifacts.
    pub fn filter(mut self, patterns: &[String]) -> Self {
        if patterns.is_empty() {
            return self;
        }

        let keep = |a: &ArtifactDescriptor| patterns.iter().any(|p| a.matches_filter(p));
        self.template_artifacts.retain(keep);
        self.style_artifacts.retain(keep);
        self.script_artifacts.retain(keep);

        let scripts: Vec<_> = self.script_artifacts.iter().map(|a| a.key.clone()).collect();
        self.entries.retain(|key, _| scripts.contains(key));
        self
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Assemble the build graph from the three family registries.
///
/// Pure: all filesystem access already happened during discovery.
///
/// # Errors
/// - [`GraphError::FamilyMismatch`] if a registry sits in another family's slot
/// - [`GraphError::EmptyScriptRegistry`] if there are no script entry points
///
/// Empty template and stylesheet registries are valid.
pub fn assemble(input: AssembleInput) -> Result<BuildGraph, GraphError> {
    let AssembleInput { templates, styles, scripts, mode, settings } = input;

    for (expected, registry) in [
        (AssetFamily::Template, &templates),
        (AssetFamily::Stylesheet, &styles),
        (AssetFamily::Script, &scripts),
    ] {
        if registry.family() != expected {
            return Err(GraphError::FamilyMismatch { expected, found: registry.family() });
        }
    }

    if scripts.is_empty() {
        return Err(GraphError::EmptyScriptRegistry { root: scripts.root().to_path_buf() });
    }

    let directives = &settings.directives;
    let template_artifacts = bind(&templates, mode, &directives.template);
    let style_artifacts = bind(&styles, mode, &directives.stylesheet);
    let script_artifacts = bind(&scripts, mode, &directives.script);

    info!(
        %mode,
        templates = template_artifacts.len(),
        styles = style_artifacts.len(),
        scripts = script_artifacts.len(),
        "assembled build graph"
    );

    Ok(BuildGraph {
        mode,
        output: settings.output,
        entries: scripts.into_entries(),
        template_artifacts,
        style_artifacts,
        script_artifacts,
        copy_rules: settings.copy_rules,
        asset_rules: settings.asset_rules,
    })
}
