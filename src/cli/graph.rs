//! Graph command: emit the build graph as JSON

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::{load_context, ProjectArgs, EXIT_ERROR, EXIT_SUCCESS};
use crate::build::plan;

/// Run the graph command
pub fn run_graph(
    project: &ProjectArgs,
    output: Option<&Path>,
    compact: bool,
    filter: Vec<String>,
) -> ExitCode {
    let mut context = match load_context(project) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if !filter.is_empty() {
        context = context.with_filter(filter);
    }

    let graph = match plan(&context) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let json = if compact { graph.to_json() } else { graph.to_json_pretty() };
    let json = match json {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: failed to serialize build graph: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, format!("{}\n", json)) {
                eprintln!("Error: cannot write {}: {}", path.display(), e);
                return ExitCode::from(EXIT_ERROR);
            }
            eprintln!(
                "Wrote build graph ({} artifacts, {} mode) to {}",
                graph.artifact_count(),
                graph.mode,
                path.display()
            );
        }
        None => println!("{}", json),
    }

    ExitCode::from(EXIT_SUCCESS)
}
