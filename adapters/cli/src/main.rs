#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host for the Marble Lab level editor.

mod config;
mod editor;
mod preview;
mod script;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use marble_lab_persistence::default_file_name;

use crate::{config::EditorConfig, editor::Editor, script::Operation};

/// Creates, inspects and edits Marble Lab level files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file; defaults to ./marble-lab.toml when present.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Writes a blank level.
    New {
        /// Destination file; defaults to mbl_<unix-millis>.json.
        path: Option<PathBuf>,
    },
    /// Prints a text preview of a level.
    Show {
        /// Level file to display.
        path: PathBuf,
    },
    /// Applies scripted edit operations to a level and saves it.
    Edit {
        /// Level file to edit; a missing file starts from a blank level.
        path: PathBuf,
        /// File with one operation per line.
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,
        /// Single operation, applied after the script. May be repeated.
        #[arg(long = "op", value_name = "OPERATION")]
        ops: Vec<String>,
        /// Where to save the result; defaults to the edited file.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Entry point for the Marble Lab command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = Logger::try_with_env_or_str("info")
        .context("invalid log specification")?
        .log_to_stderr()
        .start()
        .context("failed to start logger")?;

    let config = EditorConfig::load(args.config.as_deref())?;
    let mut editor = Editor::new(config.dimensions()?, config.json_style());

    match args.action {
        Action::New { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(default_file_name()));
            let report = editor.save(path)?;
            println!("{}", report.message());
        }
        Action::Show { path } => {
            let report = editor
                .load(path.clone())
                .with_context(|| format!("could not open {}", path.display()))?;
            log::info!("{}", report.message());
            let snapshot = editor.snapshot();
            println!("{} ({})", path.display(), snapshot.grid.dimensions());
            print!("{}", preview::render(&snapshot.grid));
        }
        Action::Edit {
            path,
            script,
            ops,
            output,
        } => {
            let operations = collect_operations(script, &ops)?;

            if path.exists() {
                let report = editor
                    .load(path.clone())
                    .with_context(|| format!("could not open {}", path.display()))?;
                log::info!("{}", report.message());
            } else {
                log::info!("{} does not exist; starting a blank level", path.display());
            }

            for operation in &operations {
                editor.run(operation)?;
            }
            log::info!(
                "applied {} operations, {} cells painted",
                operations.len(),
                editor.painted_cells()
            );

            let report = editor.save(output.unwrap_or(path))?;
            println!("{}", report.message());
        }
    }

    Ok(())
}

fn collect_operations(script_path: Option<PathBuf>, ops: &[String]) -> Result<Vec<Operation>> {
    let mut operations = match script_path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read script at {}", path.display()))?;
            script::parse_script(&text)
                .with_context(|| format!("invalid script {}", path.display()))?
        }
        None => Vec::new(),
    };

    for (index, op) in ops.iter().enumerate() {
        if let Some(operation) = script::parse_line(op, index + 1)
            .with_context(|| format!("invalid --op '{op}'"))?
        {
            operations.push(operation);
        }
    }
    Ok(operations)
}
