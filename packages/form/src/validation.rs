// ABOUTME: Ordered pre-submit completeness checks for the submission form
// ABOUTME: Each check is independent; the runner stops at the first failure

use crate::state::FormState;
use chrono::NaiveDate;
use simlok_core::{parse_form_date, range_includes_weekend, DocField, DocumentKind, FormField};
use thiserror::Error;

/// First check that rejected the form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    /// Name of the check that failed
    pub check: &'static str,
    pub message: String,
    /// Labels of the fields the user still has to fill
    pub missing: Vec<&'static str>,
}

impl ValidationFailure {
    pub fn new(check: &'static str, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
            missing: Vec::new(),
        }
    }

    pub fn with_missing(mut self, missing: Vec<&'static str>) -> Self {
        self.missing = missing;
        self
    }
}

pub type CheckResult = Result<(), ValidationFailure>;

type Predicate = Box<dyn Fn(&FormState) -> CheckResult + Send + Sync>;

/// A named predicate over the form state
pub struct Check {
    name: &'static str,
    predicate: Predicate,
}

impl Check {
    pub fn new<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&FormState) -> CheckResult + Send + Sync + 'static,
    {
        Self {
            name,
            predicate: Box::new(predicate),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn evaluate(&self, state: &FormState) -> CheckResult {
        (self.predicate)(state)
    }
}

/// Runs checks in insertion order
#[derive(Default)]
pub struct Validator {
    checks: Vec<Check>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The checks every submission goes through, in order
    pub fn submission() -> Self {
        Self::new()
            .with(Check::new(CHECK_DATE_RANGE, check_date_range))
            .with(Check::new(CHECK_HOLIDAY_HOURS, check_holiday_hours))
            .with(Check::new(CHECK_SIMJA, check_simja_documents))
            .with(Check::new(CHECK_SIKA, check_sika_documents))
            .with(Check::new(CHECK_OPTIONAL_DOCUMENTS, check_optional_documents))
            .with(Check::new(CHECK_WORKER_COUNT, check_worker_count))
            .with(Check::new(CHECK_WORKER_ROWS, check_worker_rows))
    }

    pub fn with(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(Check::name).collect()
    }

    pub fn run(&self, state: &FormState) -> CheckResult {
        self.checks.iter().try_for_each(|check| check.evaluate(state))
    }
}

pub const CHECK_DATE_RANGE: &str = "date_range";
pub const CHECK_HOLIDAY_HOURS: &str = "holiday_hours";
pub const CHECK_SIMJA: &str = "simja_documents";
pub const CHECK_SIKA: &str = "sika_documents";
pub const CHECK_OPTIONAL_DOCUMENTS: &str = "optional_documents";
pub const CHECK_WORKER_COUNT: &str = "worker_count";
pub const CHECK_WORKER_ROWS: &str = "worker_rows";

fn date_field(
    state: &FormState,
    field: FormField,
) -> Result<NaiveDate, ValidationFailure> {
    let raw = state.field(field);
    if raw.trim().is_empty() {
        return Err(ValidationFailure::new(
            CHECK_DATE_RANGE,
            format!("{} wajib diisi", field.label()),
        )
        .with_missing(vec![field.label()]));
    }
    parse_form_date(raw).ok_or_else(|| {
        ValidationFailure::new(
            CHECK_DATE_RANGE,
            format!("Format {} tidak valid (YYYY-MM-DD)", field.label()),
        )
    })
}

pub fn check_date_range(state: &FormState) -> CheckResult {
    let start = date_field(state, FormField::ImplementationStartDate)?;
    let end = date_field(state, FormField::ImplementationEndDate)?;
    if end < start {
        return Err(ValidationFailure::new(
            CHECK_DATE_RANGE,
            "Tanggal selesai pelaksanaan tidak boleh sebelum tanggal mulai",
        ));
    }
    Ok(())
}

/// Holiday hours become mandatory when the range touches a weekend
pub fn check_holiday_hours(state: &FormState) -> CheckResult {
    let start = parse_form_date(state.field(FormField::ImplementationStartDate));
    let end = parse_form_date(state.field(FormField::ImplementationEndDate));
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(());
    };

    if range_includes_weekend(start, end)
        && state.field(FormField::HolidayWorkingHours).trim().is_empty()
    {
        return Err(ValidationFailure::new(
            CHECK_HOLIDAY_HOURS,
            "Jam kerja hari libur wajib diisi karena periode pelaksanaan mencakup hari Sabtu atau Minggu",
        )
        .with_missing(vec![FormField::HolidayWorkingHours.label()]));
    }
    Ok(())
}

fn labels(fields: &[DocField]) -> Vec<&'static str> {
    fields.iter().map(DocField::label).collect()
}

/// Reject partial rows, and SIKA subtypes outside the vocabulary
fn check_rows(check: &'static str, state: &FormState, kind: DocumentKind) -> CheckResult {
    let list = state.documents().list(kind);
    for (index, row) in list.rows().iter().enumerate() {
        if row.is_partial(kind) {
            let missing = labels(&row.missing_fields(kind));
            return Err(ValidationFailure::new(
                check,
                format!(
                    "Dokumen {} #{} belum lengkap. Yang belum diisi: {}",
                    kind.label(),
                    index + 1,
                    missing.join(", ")
                ),
            )
            .with_missing(missing));
        }

        if let (Some(vocabulary), false) = (kind.subtype_vocabulary(), row.is_blank(kind)) {
            let subtype = row.get(DocField::Subtype);
            if !vocabulary.iter().any(|allowed| *allowed == subtype) {
                return Err(ValidationFailure::new(
                    check,
                    format!(
                        "Jenis dokumen {} #{} tidak valid: {}. Pilihan: {}",
                        kind.label(),
                        index + 1,
                        subtype,
                        vocabulary.join(", ")
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn check_required_kind(check: &'static str, state: &FormState, kind: DocumentKind) -> CheckResult {
    check_rows(check, state, kind)?;
    if !state.documents().list(kind).has_filled_row() {
        return Err(ValidationFailure::new(
            check,
            format!("Minimal satu dokumen {} harus diisi lengkap", kind.label()),
        )
        .with_missing(labels(kind.required_fields())));
    }
    Ok(())
}

pub fn check_simja_documents(state: &FormState) -> CheckResult {
    check_required_kind(CHECK_SIMJA, state, DocumentKind::Simja)
}

pub fn check_sika_documents(state: &FormState) -> CheckResult {
    check_required_kind(CHECK_SIKA, state, DocumentKind::Sika)
}

/// Optional kinds have no minimum but may not hold partial rows
pub fn check_optional_documents(state: &FormState) -> CheckResult {
    DocumentKind::OPTIONAL
        .into_iter()
        .filter(|kind| state.documents().is_visible(*kind))
        .try_for_each(|kind| check_rows(CHECK_OPTIONAL_DOCUMENTS, state, kind))
}

pub fn check_worker_count(state: &FormState) -> CheckResult {
    let input = state.worker_count_input().trim();
    if input.is_empty() {
        return Err(ValidationFailure::new(
            CHECK_WORKER_COUNT,
            "Jumlah pekerja wajib diisi",
        ));
    }
    let Ok(declared) = input.parse::<i64>() else {
        return Err(ValidationFailure::new(
            CHECK_WORKER_COUNT,
            format!("Jumlah pekerja tidak valid: {}", input),
        ));
    };

    let rows = state.workers().len();
    if declared != rows as i64 || state.desired_count() != rows {
        return Err(ValidationFailure::new(
            CHECK_WORKER_COUNT,
            format!(
                "Jumlah pekerja ({}) tidak sesuai dengan jumlah baris data pekerja ({}). Klik \"Sesuaikan\" atau perbaiki jumlahnya.",
                declared, rows
            ),
        ));
    }
    Ok(())
}

pub fn check_worker_rows(state: &FormState) -> CheckResult {
    for (index, worker) in state.workers().iter().enumerate() {
        let missing: Vec<&'static str> = worker.missing_fields().iter().map(|f| f.label()).collect();
        if !missing.is_empty() {
            return Err(ValidationFailure::new(
                CHECK_WORKER_ROWS,
                format!(
                    "Data pekerja #{} belum lengkap. Yang belum diisi: {}",
                    index + 1,
                    missing.join(", ")
                ),
            )
            .with_missing(missing));
        }
    }
    Ok(())
}
