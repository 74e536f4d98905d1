//! Identity and access management over an in-memory directory.
//!
//! [`fixtures::mock_directory`] seeds a [`Directory`]; [`listings`] turns its
//! collections into filtered, paginated, selectable views; the command methods
//! on [`Directory`] apply changes and record them in the audit trail.

pub mod directory;
pub mod error;
pub mod fixtures;
pub mod forms;
pub mod interchange;
pub mod listings;
pub mod models;

pub use directory::{ApplicationStats, BulkEnrollment, DashboardStats, Directory, PermissionImport, SyncSummary};
pub use error::{CommandError, FieldError, FormErrors};
