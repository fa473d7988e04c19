//! Build context containing configuration and state for a build.

use crate::build::{AssetFamily, BuildMode, CopyRule, GlobRule, GraphSettings, OutputSettings};
use crate::config::{mode_from_env, resolve_path, SiteConfig};
use std::path::{Path, PathBuf};

/// Build context containing configuration and paths for a build operation.
///
/// The context resolves every configured directory against the project root
/// and fixes the build mode for the whole invocation.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The loaded configuration
    config: SiteConfig,
    /// Project root directory (where site.toml is located)
    project_root: PathBuf,
    /// Build mode, read once at build start
    mode: BuildMode,
    /// Optional filter to keep specific artifacts only
    target_filter: Option<Vec<String>>,
}

impl BuildContext {
    /// Create a new build context.
    ///
    /// The build mode is read from the environment variable named in the
    /// config's `[mode]` section; use [`BuildContext::with_mode`] to pin it.
    pub fn new(config: SiteConfig, project_root: PathBuf) -> Self {
        let mode = mode_from_env(&config);
        Self { config, project_root, mode, target_filter: None }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the source directory (resolved to absolute path).
    pub fn src_dir(&self) -> PathBuf {
        resolve_path(&self.project_root, &self.config.project.src)
    }

    /// Get the output directory (resolved to absolute path).
    pub fn out_dir(&self) -> PathBuf {
        resolve_path(&self.project_root, &self.config.project.out)
    }

    /// Root directory of an asset family, resolved against the source directory.
    pub fn family_root(&self, family: AssetFamily) -> PathBuf {
        let root = match family {
            AssetFamily::Template => &self.config.templates.root,
            AssetFamily::Stylesheet => &self.config.styles.root,
            AssetFamily::Script => &self.config.scripts.root,
        };
        resolve_path(&self.src_dir(), root)
    }

    /// Glob rule of an asset family.
    pub fn rule(&self, family: AssetFamily) -> GlobRule {
        match family {
            AssetFamily::Template => self.config.template_rule(),
            AssetFamily::Stylesheet => self.config.style_rule(),
            AssetFamily::Script => self.config.script_rule(),
        }
    }

    /// Copy rules with both ends resolved.
    pub fn copy_rules(&self) -> Vec<CopyRule> {
        let src = self.src_dir();
        let out = self.out_dir();
        self.config
            .copy
            .iter()
            .map(|c| CopyRule::new(resolve_path(&src, &c.from), resolve_path(&out, &c.to)))
            .collect()
    }

    /// Static settings handed to the assembler.
    pub fn graph_settings(&self) -> GraphSettings {
        let project = &self.config.project;
        GraphSettings {
            output: OutputSettings {
                dir: self.out_dir(),
                public_path: project.public_path.clone(),
                clean: project.clean,
            },
            directives: self.config.directives(),
            copy_rules: self.copy_rules(),
            asset_rules: self.config.assets.clone(),
        }
    }

    /// Build mode of this invocation.
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Pin the build mode.
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set target filter to keep only specific artifacts.
    pub fn with_filter(mut self, targets: Vec<String>) -> Self {
        self.target_filter = Some(targets);
        self
    }

    /// Get the target filter.
    pub fn target_filter(&self) -> Option<&[String]> {
        self.target_filter.as_deref()
    }
}
