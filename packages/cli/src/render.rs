// ABOUTME: Terminal rendering of the form state: tables, toasts and validation failures

use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use simlok_core::{DocField, DocumentKind, SupportDoc, Worker, WorkerField};
use simlok_form::{FormState, Notifier, Toast, ToastLevel, ValidationFailure};

const EMPTY: &str = "—";

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn cell(value: &str, max_len: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        return EMPTY.to_string();
    }
    if value.chars().count() > max_len {
        let kept: String = value.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    } else {
        value.to_string()
    }
}

fn worker_status(worker: &Worker) -> String {
    let missing = worker.missing_fields();
    if missing.is_empty() {
        "Lengkap".to_string()
    } else {
        format!("{} kosong", missing.len())
    }
}

pub fn workers_table(workers: &[Worker]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["#", "ID", "Nama", "Foto", "HSSE Pass", "Berlaku", "Status"]);
    for (index, worker) in workers.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            worker.id.clone(),
            cell(worker.get(WorkerField::Name), 25),
            cell(worker.get(WorkerField::Photo), 30),
            cell(worker.get(WorkerField::HsseNumber), 20),
            cell(worker.get(WorkerField::HsseValidThru), 12),
            worker_status(worker),
        ]);
    }
    table
}

fn document_status(kind: DocumentKind, doc: &SupportDoc) -> &'static str {
    if doc.is_filled(kind) {
        "Lengkap"
    } else if doc.is_blank(kind) {
        "Kosong"
    } else {
        "Belum lengkap"
    }
}

pub fn documents_table(kind: DocumentKind, rows: &[SupportDoc]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "#",
        "ID",
        DocField::Subtype.label(),
        DocField::Number.label(),
        DocField::Date.label(),
        DocField::Upload.label(),
        "Status",
    ]);
    for (index, doc) in rows.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            doc.id.clone(),
            cell(doc.get(DocField::Subtype), 28),
            cell(doc.get(DocField::Number), 20),
            cell(doc.get(DocField::Date), 12),
            cell(doc.get(DocField::Upload), 30),
            document_status(kind, doc).to_string(),
        ]);
    }
    table
}

/// Warning shown while the declared count and the roster disagree
pub fn count_mismatch_line(state: &FormState) -> Option<String> {
    if !state.count_mismatch() {
        return None;
    }
    Some(format!(
        "Jumlah pekerja diisi {} tetapi daftar berisi {} baris. Jalankan 'simlok workers reconcile' untuk menyesuaikan.",
        state.worker_count_input(),
        state.workers().len()
    ))
}

pub fn print_state(state: &FormState) {
    println!("{}", "📋 Draft Pengajuan SIMLOK".blue().bold());
    println!();

    let data = state.form_data();
    for (label, value) in [
        ("Vendor", data.vendor_name.as_str()),
        ("Pekerjaan", data.job_description.as_str()),
        ("Lokasi", data.work_location.as_str()),
        ("Mulai", data.implementation_start_date.as_str()),
        ("Selesai", data.implementation_end_date.as_str()),
    ] {
        println!("  {:<10} {}", format!("{}:", label).bold(), cell(value, 60));
    }
    println!();

    println!("{}", "👷 Pekerja".bold());
    println!("{}", workers_table(state.workers()));
    if let Some(warning) = count_mismatch_line(state) {
        println!("{}", warning.yellow());
    }

    for kind in state.documents().visible_kinds() {
        println!();
        let marker = if kind.is_required() { " (wajib)" } else { "" };
        println!("{}{}", format!("📄 {}", kind.label()).bold(), marker.dimmed());
        println!(
            "{}",
            documents_table(kind, state.documents().list(kind).rows())
        );
    }
}

pub fn print_failure(failure: &ValidationFailure) {
    eprintln!("{} {}", "✗".red().bold(), failure.message.red());
    if !failure.missing.is_empty() {
        eprintln!("  {} {}", "Belum diisi:".dimmed(), failure.missing.join(", "));
    }
}

/// Prints toasts to the terminal
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        let title = match toast.level {
            ToastLevel::Success => format!("✓ {}", toast.title).green().bold(),
            ToastLevel::Info => format!("ℹ {}", toast.title).blue().bold(),
            ToastLevel::Warning => format!("! {}", toast.title).yellow().bold(),
            ToastLevel::Error => format!("✗ {}", toast.title).red().bold(),
        };
        match toast.level {
            ToastLevel::Error | ToastLevel::Warning => eprintln!("{} {}", title, toast.message),
            _ => println!("{} {}", title, toast.message),
        }
    }
}
