//! Targets command: list discovered entries

use std::process::ExitCode;

use super::{load_context, ProjectArgs, EXIT_ERROR, EXIT_SUCCESS};
use crate::build::{discover, AssetFamily, BuildContext, Discovered};

/// Run the targets command
pub fn run_targets(project: &ProjectArgs, family: Option<AssetFamily>) -> ExitCode {
    let context = match load_context(project) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let discovered = match discover(&context) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    print!("{}", format_targets(&context, &discovered, family));

    if discovered.scripts.is_empty() && family.map_or(true, |f| f == AssetFamily::Script) {
        eprintln!("Warning: no script entry points found; `sitegraph graph` will fail");
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Render the discovered entries, one section per family.
fn format_targets(
    context: &BuildContext,
    discovered: &Discovered,
    only: Option<AssetFamily>,
) -> String {
    let mut out = String::new();
    let families = AssetFamily::ALL.into_iter().filter(|f| only.map_or(true, |o| o == *f));

    for family in families {
        let registry = discovered.registry(family);
        out.push_str(&format!("{} ({}):\n", family, registry.len()));

        for (key, source) in registry {
            let shown = source.strip_prefix(context.project_root()).unwrap_or(source.as_path());
            out.push_str(&format!(
                "  {:<24} {} -> {}\n",
                key.as_str(),
                shown.display(),
                family.output_for(key.as_str())
            ));
        }
    }

    out
}
