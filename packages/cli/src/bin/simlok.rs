use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::docs::DocsCommands;
use cli::draft::DraftCommands;
use cli::form::FormCommands;
use cli::qr::QrCommands;
use cli::workers::WorkersCommands;
use simlok_client::ClientConfig;

#[derive(Parser)]
#[command(name = "simlok")]
#[command(about = "SIMLOK CLI - site entry permit submissions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or delete the local draft
    #[command(subcommand)]
    Draft(DraftCommands),
    /// Edit the permit fields
    #[command(subcommand)]
    Form(FormCommands),
    /// Edit the worker roster
    #[command(subcommand)]
    Workers(WorkersCommands),
    /// Edit support documents
    #[command(subcommand)]
    Docs(DocsCommands),
    /// Run the pre-submit checks without sending anything
    Validate,
    /// Validate and send the draft
    Submit {
        /// Update an existing submission instead of creating one
        #[arg(long)]
        update: Option<String>,
        /// Fully parse every attached PDF
        #[arg(long)]
        deep_pdf_check: bool,
    },
    /// Send a revised submission back for review
    Resubmit {
        /// Submission ID
        id: String,
    },
    /// Load a stored submission into the draft for editing
    Edit {
        /// Submission ID
        id: String,
        /// Overwrite the current draft without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Encode or verify SIMLOK QR tokens
    #[command(subcommand)]
    Qr(QrCommands),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;

    match command {
        Commands::Draft(cmd) => cli::draft::handle_draft_command(&config, cmd),
        Commands::Form(cmd) => cli::form::handle_form_command(&config, cmd),
        Commands::Workers(cmd) => cli::workers::handle_workers_command(&config, cmd),
        Commands::Docs(cmd) => cli::docs::handle_docs_command(&config, cmd),
        Commands::Validate => cli::submit::validate(&config),
        Commands::Submit {
            update,
            deep_pdf_check,
        } => cli::submit::submit(&config, update, deep_pdf_check).await,
        Commands::Resubmit { id } => cli::submit::resubmit(&config, &id).await,
        Commands::Edit { id, yes } => cli::submit::edit(&config, &id, yes).await,
        Commands::Qr(cmd) => cli::qr::handle_qr_command(&config, cmd),
    }
}
