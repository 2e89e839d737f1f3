// ABOUTME: Data model for SIMLOK permit submissions
// ABOUTME: Workers, support documents, form fields and their typed field selectors

use crate::constants::{SIKA_SUBTYPES, SIMJA_DEFAULT_SUBTYPE};
use crate::utils::generate_row_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the worker roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Client-side row token, only unique within the in-memory list
    pub id: String,
    #[serde(default)]
    pub worker_name: String,
    #[serde(default)]
    pub worker_photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsse_pass_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsse_pass_valid_thru: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsse_pass_document_upload: Option<String>,
}

/// Addressable fields of a [`Worker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerField {
    Name,
    Photo,
    HsseNumber,
    HsseValidThru,
    HsseDocument,
}

impl WorkerField {
    pub const ALL: [WorkerField; 5] = [
        WorkerField::Name,
        WorkerField::Photo,
        WorkerField::HsseNumber,
        WorkerField::HsseValidThru,
        WorkerField::HsseDocument,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkerField::Name => "Nama Pekerja",
            WorkerField::Photo => "Foto Pekerja",
            WorkerField::HsseNumber => "Nomor HSSE Pass",
            WorkerField::HsseValidThru => "Masa Berlaku HSSE Pass",
            WorkerField::HsseDocument => "Dokumen HSSE Pass",
        }
    }
}

impl FromStr for WorkerField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "worker_name" => Ok(WorkerField::Name),
            "photo" | "worker_photo" => Ok(WorkerField::Photo),
            "hsse_number" | "hsse_pass_number" => Ok(WorkerField::HsseNumber),
            "hsse_valid_thru" | "hsse_pass_valid_thru" => Ok(WorkerField::HsseValidThru),
            "hsse_document" | "hsse_pass_document_upload" => Ok(WorkerField::HsseDocument),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

impl Worker {
    /// Blank row with a fresh id and an optional preset name
    pub fn new(name: Option<&str>) -> Self {
        Self {
            id: generate_row_id(),
            worker_name: name.map(str::to_string).unwrap_or_default(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: WorkerField) -> &str {
        match field {
            WorkerField::Name => &self.worker_name,
            WorkerField::Photo => &self.worker_photo,
            WorkerField::HsseNumber => self.hsse_pass_number.as_deref().unwrap_or(""),
            WorkerField::HsseValidThru => self.hsse_pass_valid_thru.as_deref().unwrap_or(""),
            WorkerField::HsseDocument => {
                self.hsse_pass_document_upload.as_deref().unwrap_or("")
            }
        }
    }

    /// Store a value; an empty value clears the optional HSSE fields
    pub fn set(&mut self, field: WorkerField, value: impl Into<String>) {
        let value = value.into();
        match field {
            WorkerField::Name => self.worker_name = value,
            WorkerField::Photo => self.worker_photo = value,
            WorkerField::HsseNumber => self.hsse_pass_number = non_empty(value),
            WorkerField::HsseValidThru => self.hsse_pass_valid_thru = non_empty(value),
            WorkerField::HsseDocument => self.hsse_pass_document_upload = non_empty(value),
        }
    }

    /// Fields still blank on this row, in display order
    pub fn missing_fields(&self) -> Vec<WorkerField> {
        WorkerField::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Supporting document categories attached to a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    Simja,
    Sika,
    WorkOrder,
    KontrakKerja,
    Jsa,
    Hsse,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 6] = [
        DocumentKind::Simja,
        DocumentKind::Sika,
        DocumentKind::WorkOrder,
        DocumentKind::KontrakKerja,
        DocumentKind::Jsa,
        DocumentKind::Hsse,
    ];

    /// Kinds that only exist once the user adds them
    pub const OPTIONAL: [DocumentKind; 4] = [
        DocumentKind::WorkOrder,
        DocumentKind::KontrakKerja,
        DocumentKind::Jsa,
        DocumentKind::Hsse,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Simja => "SIMJA",
            DocumentKind::Sika => "SIKA",
            DocumentKind::WorkOrder => "Work Order",
            DocumentKind::KontrakKerja => "Kontrak Kerja",
            DocumentKind::Jsa => "JSA",
            DocumentKind::Hsse => "HSSE Pass",
        }
    }

    /// SIMJA and SIKA need at least one fully filled row
    pub fn is_required(&self) -> bool {
        matches!(self, DocumentKind::Simja | DocumentKind::Sika)
    }

    pub fn requires_subtype(&self) -> bool {
        matches!(self, DocumentKind::Sika)
    }

    /// Fields that must all be present for a row of this kind to count as filled
    pub fn required_fields(&self) -> &'static [DocField] {
        if self.requires_subtype() {
            &[DocField::Subtype, DocField::Number, DocField::Date, DocField::Upload]
        } else {
            &[DocField::Number, DocField::Date, DocField::Upload]
        }
    }

    /// Subtype a freshly created row starts with
    pub fn default_subtype(&self) -> Option<&'static str> {
        match self {
            DocumentKind::Simja => Some(SIMJA_DEFAULT_SUBTYPE),
            _ => None,
        }
    }

    /// Allowed subtype vocabulary, if the kind constrains it
    pub fn subtype_vocabulary(&self) -> Option<&'static [&'static str]> {
        match self {
            DocumentKind::Sika => Some(SIKA_SUBTYPES),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentKind {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "simja" => Ok(DocumentKind::Simja),
            "sika" => Ok(DocumentKind::Sika),
            "work_order" => Ok(DocumentKind::WorkOrder),
            "kontrak_kerja" => Ok(DocumentKind::KontrakKerja),
            "jsa" => Ok(DocumentKind::Jsa),
            "hsse" | "hsse_pass" => Ok(DocumentKind::Hsse),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

/// One row in a support document list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportDoc {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_subtype: Option<String>,
    #[serde(default)]
    pub document_number: String,
    #[serde(default)]
    pub document_date: String,
    #[serde(default)]
    pub document_upload: String,
}

/// Addressable fields of a [`SupportDoc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocField {
    Subtype,
    Number,
    Date,
    Upload,
}

impl DocField {
    pub fn label(&self) -> &'static str {
        match self {
            DocField::Subtype => "Jenis Dokumen",
            DocField::Number => "Nomor Dokumen",
            DocField::Date => "Tanggal Dokumen",
            DocField::Upload => "Upload Dokumen",
        }
    }
}

impl FromStr for DocField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subtype" | "document_subtype" => Ok(DocField::Subtype),
            "number" | "document_number" => Ok(DocField::Number),
            "date" | "document_date" => Ok(DocField::Date),
            "upload" | "document_upload" => Ok(DocField::Upload),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

impl SupportDoc {
    /// Placeholder row for the given kind
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            id: generate_row_id(),
            document_subtype: kind.default_subtype().map(str::to_string),
            ..Default::default()
        }
    }

    pub fn get(&self, field: DocField) -> &str {
        match field {
            DocField::Subtype => self.document_subtype.as_deref().unwrap_or(""),
            DocField::Number => &self.document_number,
            DocField::Date => &self.document_date,
            DocField::Upload => &self.document_upload,
        }
    }

    pub fn set(&mut self, field: DocField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DocField::Subtype => {
                self.document_subtype = non_empty(value);
            }
            DocField::Number => self.document_number = value,
            DocField::Date => self.document_date = value,
            DocField::Upload => self.document_upload = value,
        }
    }

    /// Required fields of `kind` that are still blank
    pub fn missing_fields(&self, kind: DocumentKind) -> Vec<DocField> {
        kind.required_fields()
            .iter()
            .copied()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    /// No required field carries data
    pub fn is_blank(&self, kind: DocumentKind) -> bool {
        self.missing_fields(kind).len() == kind.required_fields().len()
    }

    pub fn is_filled(&self, kind: DocumentKind) -> bool {
        self.missing_fields(kind).is_empty()
    }

    /// Some but not all required fields carry data
    pub fn is_partial(&self, kind: DocumentKind) -> bool {
        !self.is_blank(kind) && !self.is_filled(kind)
    }
}

/// Scalar fields of the submission form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub vendor_name: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub vendor_phone: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub based_on: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub officer_name: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub officer_email: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub job_description: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub work_location: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub working_hours: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub holiday_working_hours: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub implementation_start_date: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub implementation_end_date: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub work_facilities: String,
    #[serde(default, deserialize_with = "crate::utils::null_as_default")]
    pub other_notes: String,
}

/// Addressable fields of [`FormData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    VendorName,
    VendorPhone,
    BasedOn,
    OfficerName,
    OfficerEmail,
    JobDescription,
    WorkLocation,
    WorkingHours,
    HolidayWorkingHours,
    ImplementationStartDate,
    ImplementationEndDate,
    WorkFacilities,
    OtherNotes,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::VendorName => "Nama Vendor",
            FormField::VendorPhone => "No. Telepon Vendor",
            FormField::BasedOn => "Berdasarkan",
            FormField::OfficerName => "Nama Petugas",
            FormField::OfficerEmail => "Email Petugas",
            FormField::JobDescription => "Uraian Pekerjaan",
            FormField::WorkLocation => "Lokasi Kerja",
            FormField::WorkingHours => "Jam Kerja",
            FormField::HolidayWorkingHours => "Jam Kerja Hari Libur",
            FormField::ImplementationStartDate => "Tanggal Mulai Pelaksanaan",
            FormField::ImplementationEndDate => "Tanggal Selesai Pelaksanaan",
            FormField::WorkFacilities => "Sarana Kerja",
            FormField::OtherNotes => "Catatan Lain",
        }
    }
}

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "vendor_name" => FormField::VendorName,
            "vendor_phone" => FormField::VendorPhone,
            "based_on" => FormField::BasedOn,
            "officer_name" => FormField::OfficerName,
            "officer_email" => FormField::OfficerEmail,
            "job_description" => FormField::JobDescription,
            "work_location" => FormField::WorkLocation,
            "working_hours" => FormField::WorkingHours,
            "holiday_working_hours" => FormField::HolidayWorkingHours,
            "implementation_start_date" => FormField::ImplementationStartDate,
            "implementation_end_date" => FormField::ImplementationEndDate,
            "work_facilities" => FormField::WorkFacilities,
            "other_notes" => FormField::OtherNotes,
            _ => return Err(UnknownField(s.to_string())),
        };
        Ok(field)
    }
}

impl FormData {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::VendorName => &self.vendor_name,
            FormField::VendorPhone => &self.vendor_phone,
            FormField::BasedOn => &self.based_on,
            FormField::OfficerName => &self.officer_name,
            FormField::OfficerEmail => &self.officer_email,
            FormField::JobDescription => &self.job_description,
            FormField::WorkLocation => &self.work_location,
            FormField::WorkingHours => &self.working_hours,
            FormField::HolidayWorkingHours => &self.holiday_working_hours,
            FormField::ImplementationStartDate => &self.implementation_start_date,
            FormField::ImplementationEndDate => &self.implementation_end_date,
            FormField::WorkFacilities => &self.work_facilities,
            FormField::OtherNotes => &self.other_notes,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::VendorName => &mut self.vendor_name,
            FormField::VendorPhone => &mut self.vendor_phone,
            FormField::BasedOn => &mut self.based_on,
            FormField::OfficerName => &mut self.officer_name,
            FormField::OfficerEmail => &mut self.officer_email,
            FormField::JobDescription => &mut self.job_description,
            FormField::WorkLocation => &mut self.work_location,
            FormField::WorkingHours => &mut self.working_hours,
            FormField::HolidayWorkingHours => &mut self.holiday_working_hours,
            FormField::ImplementationStartDate => &mut self.implementation_start_date,
            FormField::ImplementationEndDate => &mut self.implementation_end_date,
            FormField::WorkFacilities => &mut self.work_facilities,
            FormField::OtherNotes => &mut self.other_notes,
        };
        *slot = value.into();
    }
}

/// Review/approval state of a stored submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    PendingApproval,
    NeedsRevision,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// A field name that does not map onto any typed field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);
