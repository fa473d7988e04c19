//! Sitegraph - command-line tool that emits the build graph for a static site

use std::process::ExitCode;

use sitegraph::cli;

fn main() -> ExitCode {
    cli::run()
}
