use clap::Subcommand;
use colored::*;
use simlok_client::ClientConfig;
use simlok_core::FormField;

use super::{open_workspace, persist};

#[derive(Subcommand)]
pub enum FormCommands {
    /// Set a form field, e.g. `vendor_name` or `implementation_start_date`
    Set {
        field: FormField,
        /// New value; dates use YYYY-MM-DD
        value: String,
    },
}

pub fn handle_form_command(config: &ClientConfig, command: FormCommands) -> anyhow::Result<()> {
    match command {
        FormCommands::Set { field, value } => {
            let mut workspace = open_workspace(config);
            workspace.state.set_field(field, value.trim());
            println!("{} {}", format!("{}:", field.label()).bold(), value.trim());
            persist(&workspace)
        }
    }
}
