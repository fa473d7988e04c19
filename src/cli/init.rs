//! Init command: write a starter site.toml

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::{starter_config, CONFIG_FILENAME};

/// Run the init command
pub fn run_init(path: Option<&Path>, name: Option<&str>) -> ExitCode {
    let dir = match path {
        Some(p) => p.to_path_buf(),
        None => match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(e) => {
                eprintln!("Error: cannot determine current directory: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };

    let name = match name {
        Some(n) if n.trim().is_empty() => {
            eprintln!("Error: --name must not be empty");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Some(n) => n.to_string(),
        None => dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "site".to_string()),
    };

    match write_starter(&dir, &name) {
        Ok(()) => {
            println!("Created {}", dir.join(CONFIG_FILENAME).display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Write `site.toml` into `dir`, refusing to overwrite an existing file.
fn write_starter(dir: &Path, name: &str) -> Result<(), String> {
    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        return Err(format!("{} already exists", config_path.display()));
    }

    fs::create_dir_all(dir).map_err(|e| format!("cannot create {}: {}", dir.display(), e))?;
    fs::write(&config_path, starter_config(name))
        .map_err(|e| format!("cannot write {}: {}", config_path.display(), e))
}
