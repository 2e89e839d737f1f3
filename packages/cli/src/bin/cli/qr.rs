use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use colored::*;

use simlok_client::ClientConfig;
use simlok_core::{generate_qr_string, parse_qr_string};

#[derive(Subcommand)]
pub enum QrCommands {
    /// Print the signed QR token for a submission
    Encode {
        /// Submission ID
        id: String,
    },
    /// Verify a scanned QR token
    Decode { text: String },
}

pub fn handle_qr_command(config: &ClientConfig, command: QrCommands) -> anyhow::Result<()> {
    let secret = config
        .qr_secret
        .as_deref()
        .context("SIMLOK_QR_SECRET is not set")?;

    match command {
        QrCommands::Encode { id } => {
            let token = generate_qr_string(&id, Utc::now(), secret.as_bytes())?;
            println!("{}", token);
        }
        QrCommands::Decode { text } => {
            let payload = parse_qr_string(text.trim(), secret.as_bytes())?;
            println!("{}", "✓ QR valid".green().bold());
            println!("  {} {}", "ID Pengajuan:".bold(), payload.submission_id);
            println!(
                "  {} {}",
                "Diterbitkan:".bold(),
                payload.issued_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
    }
    Ok(())
}
