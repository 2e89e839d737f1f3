use anyhow::Context;
use clap::Subcommand;
use colored::*;
use std::io::Read;
use std::path::{Path, PathBuf};

use simlok_cli::{render, resolve_row, DraftWorkspace};
use simlok_client::ClientConfig;
use simlok_core::WorkerField;

use super::{open_workspace, persist};

#[derive(Subcommand)]
pub enum WorkersCommands {
    /// Append a worker row
    Add {
        /// Preset worker name
        name: Option<String>,
    },
    /// Remove a worker row (the last row cannot be removed)
    Remove {
        /// Row number or ID
        row: String,
    },
    /// Append one worker per line of a file (`-` reads stdin)
    Bulk { file: PathBuf },
    /// Set the declared worker count without resizing the roster
    Count { text: String },
    /// Resize the roster to the declared count
    Reconcile,
    /// Set a field of a worker row
    Set {
        /// Row number or ID
        row: String,
        /// name, photo, hsse_number, hsse_valid_thru or hsse_document
        field: WorkerField,
        value: String,
    },
}

pub fn handle_workers_command(
    config: &ClientConfig,
    command: WorkersCommands,
) -> anyhow::Result<()> {
    let mut workspace = open_workspace(config);

    match command {
        WorkersCommands::Add { name } => {
            let name = name.as_deref().map(str::trim).filter(|n| !n.is_empty());
            let id = workspace.state.add_worker(name);
            println!(
                "{} {}",
                "✓ Pekerja ditambahkan".green(),
                format!("({})", id).dimmed()
            );
        }
        WorkersCommands::Remove { row } => {
            let id = worker_id(&workspace, &row)?;
            if !workspace.state.remove_worker(&id) {
                anyhow::bail!("Minimal harus ada satu pekerja");
            }
            println!("{}", "✓ Pekerja dihapus".green());
        }
        WorkersCommands::Bulk { file } => {
            let text = read_names(&file)?;
            let added = workspace.state.add_bulk_workers(&text);
            if added == 0 {
                println!("{}", "Tidak ada nama yang ditambahkan".yellow());
                return Ok(());
            }
            println!("{} {}", "✓ Pekerja ditambahkan:".green(), added);
        }
        WorkersCommands::Count { text } => {
            workspace.state.set_worker_count_input(text.trim());
            if let Some(warning) = render::count_mismatch_line(&workspace.state) {
                println!("{}", warning.yellow());
            }
        }
        WorkersCommands::Reconcile => {
            let rows = workspace.state.apply_desired_count();
            println!("{} {}", "✓ Jumlah baris pekerja:".green(), rows);
        }
        WorkersCommands::Set { row, field, value } => {
            let id = worker_id(&workspace, &row)?;
            workspace.state.update_worker(&id, field, value.trim());
            println!("{} {}", format!("{}:", field.label()).bold(), value.trim());
        }
    }

    persist(&workspace)
}

fn worker_id(workspace: &DraftWorkspace, row: &str) -> anyhow::Result<String> {
    let ids = workspace.state.workers().iter().map(|w| w.id.as_str());
    resolve_row(ids, row).with_context(|| format!("No worker row '{}'", row))
}

fn read_names(file: &Path) -> anyhow::Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}
