//! Build result types.
//!
//! Records what the pipeline did with each artifact and copy rule.

use std::path::PathBuf;
use std::time::Duration;

/// Status of a single build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// Output written
    Written,
    /// Planned only (dry run)
    Planned,
    /// Backend or filesystem failure
    Failed(String),
}

impl BuildStatus {
    /// Check if the status indicates success.
    pub fn is_success(&self) -> bool {
        !self.is_failure()
    }

    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, BuildStatus::Failed(_))
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Written => write!(f, "written"),
            BuildStatus::Planned => write!(f, "planned"),
            BuildStatus::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of realizing one artifact or copy rule.
#[derive(Debug, Clone)]
pub struct TargetResult {
    /// Artifact id (e.g. `template:index`) or `copy:<dest>`
    pub target_id: String,
    pub status: BuildStatus,
    /// Files written, including source maps
    pub outputs: Vec<PathBuf>,
    /// Bytes written or copied
    pub bytes: u64,
    pub duration: Duration,
}

impl TargetResult {
    /// Create a successful result.
    pub fn written(
        target_id: String,
        outputs: Vec<PathBuf>,
        bytes: u64,
        duration: Duration,
    ) -> Self {
        Self { target_id, status: BuildStatus::Written, outputs, bytes, duration }
    }

    /// Create a dry-run result listing the outputs that would be written.
    pub fn planned(target_id: String, outputs: Vec<PathBuf>) -> Self {
        Self {
            target_id,
            status: BuildStatus::Planned,
            outputs,
            bytes: 0,
            duration: Duration::ZERO,
        }
    }

    /// Create a failed result.
    pub fn failed(target_id: String, error: String, duration: Duration) -> Self {
        Self { target_id, status: BuildStatus::Failed(error), outputs: vec![], bytes: 0, duration }
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of a complete pipeline run.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Results in execution order
    pub targets: Vec<TargetResult>,
    pub total_duration: Duration,
}

impl BuildResult {
    /// Create a new empty build result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target result.
    pub fn add_result(&mut self, result: TargetResult) {
        self.targets.push(result);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    /// Number of targets whose outputs were written.
    pub fn written_count(&self) -> usize {
        self.targets.iter().filter(|r| r.status == BuildStatus::Written).count()
    }

    /// Number of targets only planned.
    pub fn planned_count(&self) -> usize {
        self.targets.iter().filter(|r| r.status == BuildStatus::Planned).count()
    }

    /// Number of failed targets.
    pub fn failed_count(&self) -> usize {
        self.targets.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if the overall build succeeded (no failures).
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// All output files across targets.
    pub fn all_outputs(&self) -> Vec<&PathBuf> {
        self.targets.iter().flat_map(|r| r.outputs.iter()).collect()
    }

    /// Total bytes written or copied.
    pub fn total_bytes(&self) -> u64 {
        self.targets.iter().map(|r| r.bytes).sum()
    }

    /// Failed target results.
    pub fn failures(&self) -> impl Iterator<Item = &TargetResult> {
        self.targets.iter().filter(|r| r.status.is_failure())
    }

    /// Format a summary of the build result.
    pub fn summary(&self) -> String {
        let failed = self.failed_count();
        let total = self.targets.len();

        if failed == 0 {
            return format!(
                "Build succeeded: {} written, {} planned ({} total, {} bytes) in {:?}",
                self.written_count(),
                self.planned_count(),
                total,
                self.total_bytes(),
                self.total_duration
            );
        }

        let mut lines = vec![format!("Build failed: {} of {} targets failed", failed, total)];
        lines.extend(self.failures().map(|t| format!("  - {}: {}", t.target_id, t.status)));
        lines.join("\n")
    }
}
