//! Build pipeline execution.
//!
//! Walks a [`BuildGraph`] and drives a [`Backend`] to realize every artifact
//! and copy rule, writing results under the graph's output directory.

use crate::build::{
    ArtifactDescriptor, AssetFamily, Backend, BuildGraph, BuildResult, CopyRule, TargetResult,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Error during build execution.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// Output directory could not be prepared
    #[error("Failed to prepare output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Executes a build graph against a backend.
pub struct BuildPipeline {
    graph: BuildGraph,
    /// Stop at the first failing target
    fail_fast: bool,
    /// Record planned outputs without touching the filesystem
    dry_run: bool,
}

impl BuildPipeline {
    /// Create a new build pipeline.
    pub fn new(graph: BuildGraph) -> Self {
        Self { graph, fail_fast: false, dry_run: false }
    }

    /// Set fail-fast mode (stop on first error).
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set dry-run mode (don't actually build).
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The graph being executed.
    pub fn graph(&self) -> &BuildGraph {
        &self.graph
    }

    /// Run every artifact, then every copy rule.
    pub fn run(&self, backend: &dyn Backend) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let mut result = BuildResult::new();
        let out_dir = &self.graph.output.dir;

        info!(
            backend = backend.name(),
            mode = %self.graph.mode,
            artifacts = self.graph.artifact_count(),
            dry_run = self.dry_run,
            "running build graph"
        );

        if !self.dry_run {
            self.prepare_output_dir(out_dir)?;
        }

        for artifact in self.graph.artifacts() {
            let target = self.execute_artifact(backend, artifact, out_dir);
            let stop = self.fail_fast && target.status.is_failure();
            result.add_result(target);
            if stop {
                return Ok(result.with_duration(start.elapsed()));
            }
        }

        for rule in &self.graph.copy_rules {
            let target = self.execute_copy(backend, rule);
            let stop = self.fail_fast && target.status.is_failure();
            result.add_result(target);
            if stop {
                break;
            }
        }

        Ok(result.with_duration(start.elapsed()))
    }

    fn prepare_output_dir(&self, out_dir: &Path) -> Result<(), BuildError> {
        let wrap = |source| BuildError::OutputDir { path: out_dir.to_path_buf(), source };

        if self.graph.output.clean && out_dir.exists() {
            debug!(dir = %out_dir.display(), "cleaning output directory");
            fs::remove_dir_all(out_dir).map_err(wrap)?;
        }
        fs::create_dir_all(out_dir).map_err(wrap)
    }

    /// Realize a single artifact.
    fn execute_artifact(
        &self,
        backend: &dyn Backend,
        artifact: &ArtifactDescriptor,
        out_dir: &Path,
    ) -> TargetResult {
        let id = artifact.id();
        let output = out_dir.join(&artifact.output);
        let map_output = artifact.source_map_output().map(|m| out_dir.join(m));

        if self.dry_run {
            let outputs = std::iter::once(output).chain(map_output).collect();
            return TargetResult::planned(id, outputs);
        }

        let start = Instant::now();
        debug!(artifact = %id, source = %artifact.source.display(), "building artifact");

        let produced = match artifact.family {
            AssetFamily::Template => backend
                .templates()
                .render(&artifact.source, &artifact.output, &artifact.directive)
                .map(|html| (html, None)),
            AssetFamily::Stylesheet => backend
                .styles()
                .transform(
                    &artifact.source,
                    &artifact.directive,
                    artifact.source_map,
                    artifact.minify,
                )
                .map(|out| (out.css, out.source_map)),
            AssetFamily::Script => backend
                .scripts()
                .bundle(
                    &artifact.source,
                    &artifact.key,
                    &artifact.directive,
                    artifact.source_map,
                    artifact.minify,
                )
                .map(|out| (out.code, out.source_map)),
        };

        let written = produced.and_then(|(bytes, map)| {
            let mut outputs = vec![output.clone()];
            let mut size = write_output(&output, &bytes)?;

            // A map the descriptor did not ask for is dropped.
            if let (Some(path), Some(map)) = (&map_output, map) {
                size += write_output(path, &map)?;
                outputs.push(path.clone());
            }
            Ok((outputs, size))
        });

        match written {
            Ok((outputs, size)) => TargetResult::written(id, outputs, size, start.elapsed()),
            Err(e) => {
                warn!(artifact = %id, error = %e, "artifact failed");
                TargetResult::failed(id, e.to_string(), start.elapsed())
            }
        }
    }

    /// Run one passthrough copy rule.
    fn execute_copy(&self, backend: &dyn Backend, rule: &CopyRule) -> TargetResult {
        let id = format!("copy:{}", rule.to.display());
        if self.dry_run {
            return TargetResult::planned(id, vec![rule.to.clone()]);
        }

        let start = Instant::now();
        match backend.copier().copy_dir(&rule.from, &rule.to) {
            Ok(bytes) => TargetResult::written(id, vec![rule.to.clone()], bytes, start.elapsed()),
            Err(e) => {
                warn!(
                    from = %rule.from.display(),
                    to = %rule.to.display(),
                    error = %e,
                    "copy failed"
                );
                TargetResult::failed(id, e.to_string(), start.elapsed())
            }
        }
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> io::Result<u64> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(bytes.len() as u64)
}
