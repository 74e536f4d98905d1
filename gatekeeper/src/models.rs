use chrono::{DateTime, NaiveDate, Utc};
use gatekeeper_query::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IdentityStatus {
    Active,
    Inactive,
    Suspended,
}

impl IdentityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityStatus::Active => "active",
            IdentityStatus::Inactive => "inactive",
            IdentityStatus::Suspended => "suspended",
        }
    }
}

/// On/off state shared by groups and application components
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Active,
    Inactive,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Active => "active",
            Activity::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Active,
    Inactive,
    Maintenance,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Active => "active",
            ApplicationStatus::Inactive => "inactive",
            ApplicationStatus::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Module,
    Feature,
    Service,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RoleLevel {
    Admin,
    Manager,
    User,
    Viewer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
    Execute,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failed,
    Warning,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "success",
            AuditStatus::Failed => "failed",
            AuditStatus::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Failed,
    Partial,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "success",
            SyncStatus::Failed => "failed",
            SyncStatus::Partial => "partial",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SyncSource {
    Scheduled,
    Manual,
}

impl SyncSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncSource::Scheduled => "scheduled",
            SyncSource::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Approved,
    Rejected,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Approved => "approved",
            TaskStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TraineeKind {
    Intern,
    Trainee,
}

impl fmt::Display for TraineeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraineeKind::Intern => write!(f, "Intern"),
            TraineeKind::Trainee => write!(f, "Trainee"),
        }
    }
}

/// A person or account known to the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub nip: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub status: IdentityStatus,
    pub application_ids: Vec<String>,
    pub role_ids: Vec<String>,
    pub permission_ids: Vec<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: NaiveDate,
}

impl Identity {
    pub fn is_active(&self) -> bool {
        self.status == IdentityStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub status: Activity,
    pub created_at: NaiveDate,
    pub description: String,
    pub member_ids: Vec<String>,
}

impl Group {
    pub fn total_users(&self) -> usize {
        self.member_ids.len()
    }

    pub fn has_member(&self, identity_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == identity_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub status: ApplicationStatus,
    pub component_ids: Vec<String>,
    pub assigned_users: u32,
    pub created_at: NaiveDate,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
    pub description: String,
    pub permission_ids: Vec<String>,
    pub status: Activity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub level: RoleLevel,
    pub permission_ids: Vec<String>,
}

/// An atomic grantable capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub action: PermissionAction,
    pub resource: String,
    pub description: String,
}

/// A permission as offered by one application, optionally scoped to a role.
/// These are the rows assigned to groups and identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: String,
    pub application: String,
    pub group: String,
}

/// Who a permission grant is assigned to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum GrantTarget {
    Group(String),
    Identity(String),
}

impl fmt::Display for GrantTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantTarget::Group(id) => write!(f, "group {}", id),
            GrantTarget::Identity(id) => write!(f, "identity {}", id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: String,
    pub resource: String,
    pub details: String,
    pub ip_address: String,
    pub user_agent: String,
    pub status: AuditStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRun {
    pub id: String,
    pub date: DateTime<Utc>,
    pub status: SyncStatus,
    pub total_identities: u32,
    pub synced_identities: u32,
    pub failed_identities: u32,
    pub duration_secs: u64,
    pub source: SyncSource,
    pub details: String,
}

impl SyncRun {
    /// Formats the duration the way the history table shows it, e.g. "3m 05s"
    pub fn duration_label(&self) -> String {
        format!("{}m {:02}s", self.duration_secs / 60, self.duration_secs % 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedPermission {
    pub permission: String,
    pub role: String,
    pub description: String,
}

/// A pending permission-grant request awaiting administrator review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub request_id: String,
    pub requester_name: String,
    pub requester_email: String,
    pub identity_name: String,
    pub identity_nip: String,
    pub requested_permissions: Vec<RequestedPermission>,
    pub application: String,
    pub status: TaskStatus,
    pub request_date: DateTime<Utc>,
    pub review_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySettings {
    pub password_min_length: u32,
    pub password_require_uppercase: bool,
    pub password_require_lowercase: bool,
    pub password_require_numbers: bool,
    pub password_require_special_chars: bool,
    pub password_expiry_days: u32,
    pub session_timeout_minutes: u32,
    pub max_login_attempts: u32,
    pub lockout_duration_minutes: u32,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            password_require_uppercase: true,
            password_require_lowercase: true,
            password_require_numbers: true,
            password_require_special_chars: false,
            password_expiry_days: 90,
            session_timeout_minutes: 30,
            max_login_attempts: 5,
            lockout_duration_minutes: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectLeader {
    pub nip: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub organization_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternTrainee {
    pub id: String,
    pub nip: String,
    pub name: String,
    pub email: String,
    pub direct_leader: DirectLeader,
    pub kind: TraineeKind,
    pub created_at: DateTime<Utc>,
}

/// Raw input for enrolling an intern or trainee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternTraineeForm {
    pub nip: String,
    pub name: String,
    pub email: String,
    pub direct_leader_nip: String,
    pub kind: TraineeKind,
}

/// Raw input for registering an application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub name: String,
    pub url: String,
    pub description: String,
}

impl Record for Identity {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Group {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Application {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Permission {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for PermissionGrant {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for AuditLog {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for SyncRun {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}
