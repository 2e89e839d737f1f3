use anyhow::Context;
use clap::Subcommand;
use colored::*;

use simlok_cli::{render, resolve_row, DraftWorkspace};
use simlok_client::ClientConfig;
use simlok_core::{DocField, DocumentKind};

use super::{open_workspace, persist};

#[derive(Subcommand)]
pub enum DocsCommands {
    /// List the rows of one document kind
    List { kind: DocumentKind },
    /// Append a blank row
    Add { kind: DocumentKind },
    /// Remove a row (each list keeps at least one)
    Remove {
        kind: DocumentKind,
        /// Row number or ID
        row: String,
    },
    /// Set a field of a document row
    Set {
        kind: DocumentKind,
        /// Row number or ID
        row: String,
        /// subtype, number, date or upload
        field: DocField,
        value: String,
    },
    /// Attach an optional document kind (work_order, kontrak_kerja, jsa, hsse)
    Show { kind: DocumentKind },
    /// Detach an optional document kind and discard its rows
    Hide { kind: DocumentKind },
}

pub fn handle_docs_command(config: &ClientConfig, command: DocsCommands) -> anyhow::Result<()> {
    let mut workspace = open_workspace(config);

    match command {
        DocsCommands::List { kind } => {
            let list = workspace.state.documents().list(kind);
            println!("{}", render::documents_table(kind, list.rows()));
            if !workspace.state.documents().is_visible(kind) {
                println!(
                    "{}",
                    format!("{} belum ditampilkan di formulir", kind.label()).dimmed()
                );
            }
            return Ok(());
        }
        DocsCommands::Add { kind } => {
            ensure_visible(&workspace, kind)?;
            let id = workspace.state.add_document(kind);
            println!(
                "{} {}",
                format!("✓ Baris {} ditambahkan", kind.label()).green(),
                format!("({})", id).dimmed()
            );
        }
        DocsCommands::Remove { kind, row } => {
            let id = document_id(&workspace, kind, &row)?;
            if !workspace.state.remove_document(kind, &id) {
                anyhow::bail!("Minimal harus ada satu baris {}", kind.label());
            }
            println!("{}", "✓ Baris dokumen dihapus".green());
        }
        DocsCommands::Set {
            kind,
            row,
            field,
            value,
        } => {
            ensure_visible(&workspace, kind)?;
            let id = document_id(&workspace, kind, &row)?;
            if field == DocField::Subtype {
                if let Some(vocabulary) = kind.subtype_vocabulary() {
                    if !vocabulary.iter().any(|allowed| *allowed == value.trim()) {
                        println!(
                            "{} {}",
                            "Pilihan jenis:".yellow(),
                            vocabulary.join(", ")
                        );
                    }
                }
            }
            workspace.state.update_document(kind, &id, field, value.trim());
            println!("{} {}", format!("{}:", field.label()).bold(), value.trim());
        }
        DocsCommands::Show { kind } => {
            if kind.is_required() {
                println!("{}", format!("{} selalu ditampilkan", kind.label()).dimmed());
                return Ok(());
            }
            if !workspace.state.show_optional_document(kind) {
                println!("{}", format!("{} sudah ditampilkan", kind.label()).dimmed());
                return Ok(());
            }
            println!("{}", format!("✓ {} ditambahkan ke formulir", kind.label()).green());
        }
        DocsCommands::Hide { kind } => {
            if !workspace.state.hide_optional_document(kind) {
                println!("{}", format!("{} tidak ditampilkan", kind.label()).dimmed());
                return Ok(());
            }
            println!("{}", format!("✓ {} dihapus dari formulir", kind.label()).green());
        }
    }

    persist(&workspace)
}

fn ensure_visible(workspace: &DraftWorkspace, kind: DocumentKind) -> anyhow::Result<()> {
    if !workspace.state.documents().is_visible(kind) {
        anyhow::bail!(
            "{} belum ditampilkan; jalankan 'simlok docs show {}' dulu",
            kind.label(),
            kind_arg(kind)
        );
    }
    Ok(())
}

fn kind_arg(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Simja => "simja",
        DocumentKind::Sika => "sika",
        DocumentKind::WorkOrder => "work_order",
        DocumentKind::KontrakKerja => "kontrak_kerja",
        DocumentKind::Jsa => "jsa",
        DocumentKind::Hsse => "hsse",
    }
}

fn document_id(workspace: &DraftWorkspace, kind: DocumentKind, row: &str) -> anyhow::Result<String> {
    let ids = workspace
        .state
        .documents()
        .list(kind)
        .rows()
        .iter()
        .map(|doc| doc.id.as_str());
    resolve_row(ids, row).with_context(|| format!("No {} row '{}'", kind.label(), row))
}
