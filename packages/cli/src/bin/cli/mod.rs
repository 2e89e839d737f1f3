pub mod docs;
pub mod draft;
pub mod form;
pub mod qr;
pub mod submit;
pub mod workers;

use colored::*;
use simlok_client::ClientConfig;
use simlok_cli::{ConsoleNotifier, DraftWorkspace};

pub fn open_workspace(config: &ClientConfig) -> DraftWorkspace {
    DraftWorkspace::open(&config.draft_dir, &ConsoleNotifier)
}

/// Persist the draft after a mutation
pub fn persist(workspace: &DraftWorkspace) -> anyhow::Result<()> {
    if !workspace.save() {
        anyhow::bail!("Draft could not be saved");
    }
    println!("{}", "Draft tersimpan".dimmed());
    Ok(())
}
