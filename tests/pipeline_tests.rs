//! Build pipeline integration tests
//!
//! Runs planned graphs through a recording backend and checks what lands in
//! the output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use sitegraph::build::{
    plan, AssetCopier, Backend, BuildContext, BuildError, BuildGraph, BuildMode, BuildPipeline,
    BuildStatus, BundleOutput, Directive, FsCopier, LogicalKey, ScriptBundler, StyleOutput,
    StyleTransformer, TemplateRenderer,
};
use sitegraph::config::default_config;

// ============================================================================
// Recording Backend
// ============================================================================

/// Backend that echoes file names and records every call.
#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<String>>,
    /// Source file names that fail to build
    failing: Vec<String>,
}

impl RecordingBackend {
    fn failing(names: &[&str]) -> Self {
        Self { failing: names.iter().map(|s| s.to_string()).collect(), ..Default::default() }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, source: &Path) -> io::Result<()> {
        self.calls.lock().unwrap().push(call);
        let name = source.file_name().unwrap().to_string_lossy().into_owned();
        if self.failing.contains(&name) {
            return Err(io::Error::new(io::ErrorKind::Other, format!("cannot compile {}", name)));
        }
        Ok(())
    }
}

impl TemplateRenderer for RecordingBackend {
    fn render(&self, template: &Path, output: &str, _: &Directive) -> io::Result<Vec<u8>> {
        self.record(format!("render {}", output), template)?;
        Ok(format!("<html>{}</html>", output).into_bytes())
    }
}

impl StyleTransformer for RecordingBackend {
    fn transform(
        &self,
        stylesheet: &Path,
        _: &Directive,
        source_map: bool,
        minify: bool,
    ) -> io::Result<StyleOutput> {
        self.record(format!("transform map={} minify={}", source_map, minify), stylesheet)?;
        // Always hand back a map so the pipeline decides whether to keep it.
        Ok(StyleOutput { css: b"body{}".to_vec(), source_map: Some(b"{}".to_vec()) })
    }
}

impl ScriptBundler for RecordingBackend {
    fn bundle(
        &self,
        entry: &Path,
        key: &LogicalKey,
        _: &Directive,
        source_map: bool,
        minify: bool,
    ) -> io::Result<BundleOutput> {
        self.record(format!("bundle {} map={} minify={}", key, source_map, minify), entry)?;
        Ok(BundleOutput { code: b"console.log(1)".to_vec(), source_map: Some(b"{}".to_vec()) })
    }
}

impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn templates(&self) -> &dyn TemplateRenderer {
        self
    }

    fn styles(&self) -> &dyn StyleTransformer {
        self
    }

    fn scripts(&self) -> &dyn ScriptBundler {
        self
    }

    fn copier(&self) -> &dyn AssetCopier {
        &FsCopier
    }
}

// ============================================================================
// Test Utilities
// ============================================================================

fn touch(root: &Path, name: &str, contents: &str) -> PathBuf {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn create_site() -> TempDir {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "src/pug/index.pug", "");
    touch(temp.path(), "src/pug/blog/post.pug", "");
    touch(temp.path(), "src/scss/index.scss", "");
    touch(temp.path(), "src/js/index.ts", "");
    touch(temp.path(), "src/images/logo.png", "png");
    temp
}

fn graph(temp: &TempDir, mode: BuildMode) -> BuildGraph {
    plan(&BuildContext::new(default_config(), temp.path().to_path_buf()).with_mode(mode)).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_development_build_writes_outputs_and_maps() {
    let temp = create_site();
    let backend = RecordingBackend::default();

    let result = BuildPipeline::new(graph(&temp, BuildMode::Development)).run(&backend).unwrap();

    assert!(result.is_success(), "{}", result.summary());
    assert_eq!(result.written_count(), 5);

    let dist = temp.path().join("dist");
    assert_eq!(fs::read_to_string(dist.join("index.html")).unwrap(), "<html>index.html</html>");
    assert!(dist.join("blog/post.html").exists());
    assert!(dist.join("css/index.css").exists());
    assert!(dist.join("css/index.css.map").exists());
    assert!(dist.join("js/index.js").exists());
    assert!(dist.join("js/index.js.map").exists());
    assert_eq!(fs::read(dist.join("images/logo.png")).unwrap(), b"png");

    let calls = backend.calls();
    assert!(calls.contains(&"transform map=true minify=false".to_string()));
    assert!(calls.contains(&"bundle index map=true minify=false".to_string()));
}

#[test]
fn test_production_build_drops_maps() {
    let temp = create_site();
    let backend = RecordingBackend::default();

    let result = BuildPipeline::new(graph(&temp, BuildMode::Production)).run(&backend).unwrap();
    assert!(result.is_success());

    let dist = temp.path().join("dist");
    assert!(dist.join("css/index.css").exists());
    assert!(!dist.join("css/index.css.map").exists());
    assert!(!dist.join("js/index.js.map").exists());
    assert!(backend.calls().contains(&"bundle index map=false minify=true".to_string()));
}

#[test]
fn test_artifacts_run_in_family_order() {
    let temp = create_site();
    let backend = RecordingBackend::default();

    BuildPipeline::new(graph(&temp, BuildMode::Production)).run(&backend).unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "render blog/post.html",
            "render index.html",
            "transform map=false minify=true",
            "bundle index map=false minify=true",
        ]
    );
}

#[test]
fn test_dry_run_touches_nothing() {
    let temp = create_site();
    let backend = RecordingBackend::default();

    let result = BuildPipeline::new(graph(&temp, BuildMode::Development))
        .with_dry_run(true)
        .run(&backend)
        .unwrap();

    assert_eq!(result.planned_count(), 5);
    assert_eq!(result.written_count(), 0);
    assert!(backend.calls().is_empty());
    assert!(!temp.path().join("dist").exists());

    let outputs = result.all_outputs();
    assert!(outputs.contains(&&temp.path().join("dist/js/index.js.map")));
}

#[test]
fn test_failures_are_collected() {
    let temp = create_site();
    let backend = RecordingBackend::failing(&["index.scss"]);

    let result = BuildPipeline::new(graph(&temp, BuildMode::Development)).run(&backend).unwrap();

    assert!(!result.is_success());
    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.written_count(), 4);

    let failure = result.failures().next().unwrap();
    assert_eq!(failure.target_id, "stylesheet:index");
    assert!(matches!(&failure.status, BuildStatus::Failed(msg) if msg.contains("index.scss")));
    assert!(result.summary().contains("stylesheet:index"));
}

#[test]
fn test_fail_fast_stops_at_first_failure() {
    let temp = create_site();
    let backend = RecordingBackend::failing(&["post.pug"]);

    let result = BuildPipeline::new(graph(&temp, BuildMode::Development))
        .with_fail_fast(true)
        .run(&backend)
        .unwrap();

    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.failed_count(), 1);
    assert_eq!(backend.calls(), vec!["render blog/post.html"]);
}

#[test]
fn test_clean_removes_stale_output() {
    let temp = create_site();
    let stale = touch(temp.path(), "dist/old.html", "stale");

    BuildPipeline::new(graph(&temp, BuildMode::Development))
        .run(&RecordingBackend::default())
        .unwrap();

    assert!(!stale.exists());
    assert!(temp.path().join("dist/index.html").exists());
}

#[test]
fn test_no_clean_keeps_existing_output() {
    let temp = create_site();
    let kept = touch(temp.path(), "dist/keep.txt", "keep");

    let mut graph = graph(&temp, BuildMode::Development);
    graph.output.clean = false;
    BuildPipeline::new(graph).run(&RecordingBackend::default()).unwrap();

    assert!(kept.exists());
}

#[test]
fn test_unwritable_output_dir() {
    let temp = create_site();
    // A file where the output directory should be.
    touch(temp.path(), "blocked", "");

    let mut graph = graph(&temp, BuildMode::Development);
    graph.output.dir = temp.path().join("blocked/dist");
    graph.output.clean = false;

    let err = BuildPipeline::new(graph).run(&RecordingBackend::default()).unwrap_err();
    assert!(matches!(err, BuildError::OutputDir { .. }));
}
