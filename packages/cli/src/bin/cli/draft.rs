use clap::Subcommand;
use colored::*;
use inquire::Confirm;
use simlok_cli::render;
use simlok_client::ClientConfig;

use super::open_workspace;

#[derive(Subcommand)]
pub enum DraftCommands {
    /// Show the current draft
    Show,
    /// Delete the draft and start over
    Delete {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn handle_draft_command(config: &ClientConfig, command: DraftCommands) -> anyhow::Result<()> {
    match command {
        DraftCommands::Show => {
            let workspace = open_workspace(config);
            render::print_state(&workspace.state);
            Ok(())
        }
        DraftCommands::Delete { yes } => delete_draft(config, yes),
    }
}

fn delete_draft(config: &ClientConfig, yes: bool) -> anyhow::Result<()> {
    let mut workspace = open_workspace(config);
    if workspace.manager().load().is_none() {
        println!("{}", "Tidak ada draft tersimpan".yellow());
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new("Hapus draft? Semua data yang belum dikirim akan hilang.")
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("{}", "Dibatalkan".dimmed());
            return Ok(());
        }
    }

    if !workspace.clear() {
        anyhow::bail!("Draft could not be deleted");
    }
    println!("{}", "✓ Draft dihapus".green());
    Ok(())
}
