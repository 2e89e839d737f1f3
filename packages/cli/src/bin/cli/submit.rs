use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use inquire::Confirm;
use std::sync::Arc;

use simlok_cli::{render, ConsoleNotifier, DraftWorkspace};
use simlok_client::{
    load_for_edit, ClientConfig, PdfCheckReport, PdfValidator, StructuralPdfValidator,
    SubmissionClient, SubmitController, SubmitError, SubmitMode, SubmitOutcome,
};
use simlok_form::Validator;

use super::{open_workspace, persist};

pub fn validate(config: &ClientConfig) -> anyhow::Result<()> {
    let workspace = open_workspace(config);
    match Validator::submission().run(&workspace.state) {
        Ok(()) => {
            println!("{}", "✓ Formulir siap dikirim".green().bold());
            Ok(())
        }
        Err(failure) => {
            render::print_failure(&failure);
            anyhow::bail!("Validasi gagal ({})", failure.check)
        }
    }
}

fn controller(
    config: &ClientConfig,
    workspace: &DraftWorkspace,
    deep_pdf_check: bool,
) -> anyhow::Result<SubmitController> {
    let client = SubmissionClient::new(config)?;
    let pdf_validator: Arc<dyn PdfValidator> = if deep_pdf_check {
        Arc::new(StructuralPdfValidator::deep())
    } else {
        Arc::new(StructuralPdfValidator::shallow())
    };
    Ok(SubmitController::new(
        client,
        pdf_validator,
        workspace.manager().clone(),
        Arc::new(ConsoleNotifier),
    ))
}

fn print_invalid_documents(report: &PdfCheckReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["ID Dokumen", "Masalah"]);
    for (id, message) in &report.invalid {
        table.add_row(vec![id.clone(), message.clone()]);
    }
    eprintln!("{}", table);
}

pub async fn submit(
    config: &ClientConfig,
    update: Option<String>,
    deep_pdf_check: bool,
) -> anyhow::Result<()> {
    let mut workspace = open_workspace(config);
    let controller = controller(config, &workspace, deep_pdf_check)?;
    let mode = match update {
        Some(id) => SubmitMode::Update { id },
        None => SubmitMode::Create,
    };

    match controller.submit_and_reset(&mut workspace.state, mode).await {
        Ok(SubmitOutcome::Submitted(receipt)) => {
            if let Some(id) = receipt.submission_id {
                println!("{} {}", "ID Pengajuan:".bold(), id.cyan());
            }
            println!("{} {}", "Lanjut ke:".dimmed(), receipt.redirect_to);
            Ok(())
        }
        Ok(SubmitOutcome::Ignored) => Ok(()),
        Err(err) => {
            match &err {
                SubmitError::Validation(failure) => render::print_failure(failure),
                SubmitError::PdfCheck(report) => print_invalid_documents(report),
                SubmitError::Client(_) => {}
            }
            anyhow::bail!(err.user_message())
        }
    }
}

pub async fn resubmit(config: &ClientConfig, id: &str) -> anyhow::Result<()> {
    let workspace = open_workspace(config);
    let controller = controller(config, &workspace, false)?;
    controller
        .resubmit(id)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))
}

pub async fn edit(config: &ClientConfig, id: &str, yes: bool) -> anyhow::Result<()> {
    let mut workspace = open_workspace(config);

    if !yes && workspace.manager().load().is_some() {
        let confirmed = Confirm::new("Draft saat ini akan ditimpa. Lanjutkan?")
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("{}", "Dibatalkan".dimmed());
            return Ok(());
        }
    }

    let client = SubmissionClient::new(config)?;
    let edit = load_for_edit(&client, id)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;

    println!(
        "{} {} ({:?})",
        "Memuat pengajuan".blue().bold(),
        edit.submission_id.cyan(),
        edit.approval_status
    );
    if let Some(number) = &edit.simlok_number {
        println!("{} {}", "Nomor SIMLOK:".bold(), number);
    }

    workspace.state = edit.state;
    render::print_state(&workspace.state);
    persist(&workspace)?;
    println!(
        "{}",
        format!("Kirim perubahan dengan 'simlok submit --update {}'", id).dimmed()
    );
    Ok(())
}
