//! CSV import and export for permission lists and intern enrolment.

use crate::error::CommandError;
use crate::models::{InternTraineeForm, PermissionGrant, TraineeKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A CSV row type with a fixed header line
pub trait CsvRow: Serialize {
    const HEADER: &'static [&'static str];
}

/// Template for uploading permissions to a group or identity
pub const PERMISSION_UPLOAD_TEMPLATE: &str = "Application Name,Permission Name,Role Name\n\
HR Management System,User Management,Administrator\n\
Finance Portal,Report Generate,\n\
Project Management Tool,Task Management,Manager\n";

/// Template for the permissions of a new application
pub const APPLICATION_TEMPLATE: &str = "Permission,Roles\n\
User Management,Administrator\n\
Report Generate,\n\
Task Management,Manager\n";

pub const INTERN_TEMPLATE: &str = "NIP,Name,Email,Direct Leader NIP,Type\n\
INT001,John Doe,john.doe@banksinarmas.com,001,intern\n\
TRN001,Jane Smith,jane.smith@banksinarmas.com,002,trainee\n";

/// One exported application permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionExportRow {
    pub application_name: String,
    pub permission_name: String,
    pub role_name: String,
}

impl CsvRow for PermissionExportRow {
    const HEADER: &'static [&'static str] = &["application_name", "permission_name", "role_name"];
}

/// One permission to assign to a group or identity; an empty role matches any role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionUploadRow {
    #[serde(rename = "Application Name")]
    pub application_name: String,
    #[serde(rename = "Permission Name")]
    pub permission_name: String,
    #[serde(rename = "Role Name", default)]
    pub role_name: String,
}

impl CsvRow for PermissionUploadRow {
    const HEADER: &'static [&'static str] = &["Application Name", "Permission Name", "Role Name"];
}

impl PermissionUploadRow {
    /// Permission names in the catalog carry a sequence suffix ("User Management 2"),
    /// so a row also matches on the bare name
    pub fn matches(&self, grant: &PermissionGrant) -> bool {
        let name_matches = grant.name == self.permission_name
            || grant
                .name
                .strip_prefix(&self.permission_name)
                .is_some_and(|rest| rest.starts_with(' '));
        grant.application == self.application_name
            && name_matches
            && (self.role_name.is_empty() || grant.role == self.role_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPermissionRow {
    #[serde(rename = "Permission")]
    pub permission: String,
    #[serde(rename = "Roles", default)]
    pub roles: String,
}

impl CsvRow for ApplicationPermissionRow {
    const HEADER: &'static [&'static str] = &["Permission", "Roles"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternUploadRow {
    #[serde(rename = "NIP")]
    pub nip: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Direct Leader NIP")]
    pub direct_leader_nip: String,
    #[serde(rename = "Type")]
    pub kind: TraineeKind,
}

impl CsvRow for InternUploadRow {
    const HEADER: &'static [&'static str] = &["NIP", "Name", "Email", "Direct Leader NIP", "Type"];
}

impl From<InternUploadRow> for InternTraineeForm {
    fn from(row: InternUploadRow) -> Self {
        InternTraineeForm {
            nip: row.nip,
            name: row.name,
            email: row.email,
            direct_leader_nip: row.direct_leader_nip,
            kind: row.kind,
        }
    }
}

/// `"HR Management System"` -> `"hr_management_system_permissions.csv"`
pub fn export_file_name(application_name: &str) -> String {
    let words: Vec<String> = application_name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    format!("{}_permissions.csv", words.join("_"))
}

pub fn export_rows<'a>(
    application_name: &str,
    grants: impl IntoIterator<Item = &'a PermissionGrant>,
) -> Vec<PermissionExportRow> {
    grants
        .into_iter()
        .map(|grant| PermissionExportRow {
            application_name: application_name.to_string(),
            permission_name: grant.name.clone(),
            role_name: grant.role.clone(),
        })
        .collect()
}

/// Parses CSV text with a header row; surrounding whitespace is trimmed from every field
pub fn parse_rows<R: DeserializeOwned>(text: &str) -> Result<Vec<R>, CommandError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.deserialize::<R>() {
        rows.push(result?);
    }
    debug!("Parsed {} CSV rows", rows.len());
    Ok(rows)
}

/// Writes the header line even when there are no rows
pub fn serialize_rows<R: CsvRow>(rows: &[R]) -> Result<String, CommandError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(R::HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CommandError::Interchange(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CommandError::Interchange(e.to_string()))
}

pub fn read_rows<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>, CommandError> {
    let text = std::fs::read_to_string(path)?;
    parse_rows(&text)
}

/// Writes rows with a header line; returns how many rows were written
pub fn write_rows<R: CsvRow>(path: &Path, rows: &[R]) -> Result<usize, CommandError> {
    let text = serialize_rows(rows)?;
    std::fs::write(path, text)?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}
