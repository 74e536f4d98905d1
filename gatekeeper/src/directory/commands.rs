use super::Directory;
use crate::error::{CommandError, FormErrors};
use crate::forms;
use crate::interchange::{ApplicationPermissionRow, InternUploadRow, PermissionUploadRow};
use crate::models::{
    Application, ApplicationForm, ApplicationStatus, AuditStatus, GrantTarget, InternTrainee,
    InternTraineeForm, PermissionGrant, PolicySettings, SyncRun, SyncSource, SyncStatus, Task,
    TaskStatus,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of assigning permissions from an uploaded CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionImport {
    pub assigned: usize,
    pub unmatched: Vec<PermissionUploadRow>,
}

/// Result of a bulk intern upload; rejected rows carry their 1-based data row number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEnrollment {
    pub enrolled: usize,
    pub rejected: Vec<(usize, FormErrors)>,
}

impl Directory {
    fn pending_task_index(&self, task_id: &str) -> Result<usize, CommandError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| CommandError::not_found("task", task_id))?;
        if self.tasks[idx].status != TaskStatus::Pending {
            return Err(CommandError::AlreadyReviewed(self.tasks[idx].request_id.clone()));
        }
        Ok(idx)
    }

    pub fn approve_task(&mut self, task_id: &str, actor: &str, now: DateTime<Utc>) -> Result<&Task, CommandError> {
        let idx = self.pending_task_index(task_id)?;
        let task = &mut self.tasks[idx];
        task.status = TaskStatus::Approved;
        task.review_date = Some(now);

        let details = format!(
            "Approved {} for {} ({} permissions)",
            task.request_id,
            task.identity_name,
            task.requested_permissions.len()
        );
        let resource = task.application.clone();
        info!("Task {} approved by {}", task.request_id, actor);
        self.record_audit(now, actor, "Task Approve", &resource, details, AuditStatus::Success);
        Ok(&self.tasks[idx])
    }

    pub fn reject_task(
        &mut self,
        task_id: &str,
        reason: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<&Task, CommandError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CommandError::MissingReason);
        }
        let idx = self.pending_task_index(task_id)?;
        let task = &mut self.tasks[idx];
        task.status = TaskStatus::Rejected;
        task.review_date = Some(now);
        task.rejection_reason = Some(reason.to_string());

        let details = format!("Rejected {}: {}", task.request_id, reason);
        let resource = task.application.clone();
        info!("Task {} rejected by {}", task.request_id, actor);
        self.record_audit(now, actor, "Task Reject", &resource, details, AuditStatus::Warning);
        Ok(&self.tasks[idx])
    }

    /// Adds identities to a group; returns how many were not members already
    pub fn add_members(
        &mut self,
        group_id: &str,
        identity_ids: &[String],
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, CommandError> {
        if identity_ids.is_empty() {
            return Err(CommandError::EmptySelection("member"));
        }
        if let Some(missing) = identity_ids.iter().find(|id| self.identity(id).is_none()) {
            return Err(CommandError::not_found("identity", missing.as_str()));
        }
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| CommandError::not_found("group", group_id))?;

        let mut added = 0;
        for id in identity_ids {
            if !group.has_member(id) {
                group.member_ids.push(id.clone());
                added += 1;
            }
        }
        let name = group.name.clone();
        info!("{} member(s) added to group {}", added, name);
        self.record_audit(
            now,
            actor,
            "Member Add",
            &name,
            format!("{} member(s) have been added to the group", added),
            AuditStatus::Success,
        );
        Ok(added)
    }

    pub fn remove_member(
        &mut self,
        group_id: &str,
        identity_id: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<(), CommandError> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| CommandError::not_found("group", group_id))?;
        let before = group.member_ids.len();
        group.member_ids.retain(|id| id != identity_id);
        if group.member_ids.len() == before {
            return Err(CommandError::NotAMember {
                group: group.name.clone(),
                identity: identity_id.to_string(),
            });
        }

        let group_name = group.name.clone();
        let identity_name = self
            .identity(identity_id)
            .map_or_else(|| identity_id.to_string(), |i| i.name.clone());
        info!("{} removed from group {}", identity_name, group_name);
        self.record_audit(
            now,
            actor,
            "Member Remove",
            &group_name,
            format!("{} has been removed from the group", identity_name),
            AuditStatus::Warning,
        );
        Ok(())
    }

    /// Assigns catalog rows to a group or identity; returns how many were new
    pub fn assign_permissions(
        &mut self,
        target: GrantTarget,
        grant_ids: &[String],
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, CommandError> {
        if grant_ids.is_empty() {
            return Err(CommandError::EmptySelection("permission"));
        }
        self.ensure_target(&target)?;
        if let Some(missing) = grant_ids.iter().find(|id| self.grant_row(id).is_none()) {
            return Err(CommandError::not_found("permission", missing.as_str()));
        }

        let resource = target.to_string();
        let added = self.grant(target, grant_ids.iter().cloned());
        info!("Added {} permissions to {}", added, resource);
        self.record_audit(
            now,
            actor,
            "Permission Grant",
            &resource,
            format!("Added {} permissions", added),
            AuditStatus::Success,
        );
        Ok(added)
    }

    /// Resolves uploaded rows against the catalog and assigns every match
    pub fn import_permissions(
        &mut self,
        target: GrantTarget,
        rows: Vec<PermissionUploadRow>,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<PermissionImport, CommandError> {
        self.ensure_target(&target)?;

        let mut matched = Vec::new();
        let mut unmatched = Vec::new();
        for row in rows {
            let hits: Vec<String> = self
                .grant_catalog
                .iter()
                .filter(|grant| row.matches(grant))
                .map(|grant| grant.id.clone())
                .collect();
            if hits.is_empty() {
                warn!(
                    "No catalog permission matches {} / {}",
                    row.application_name, row.permission_name
                );
                unmatched.push(row);
            } else {
                matched.extend(hits);
            }
        }

        let assigned = if matched.is_empty() {
            0
        } else {
            self.assign_permissions(target, &matched, actor, now)?
        };
        Ok(PermissionImport { assigned, unmatched })
    }

    /// Runs an on-demand identity sync and records it at the top of the history.
    ///
    /// Identities whose e-mail has no `@` or whose NIP repeats an earlier one fail.
    pub fn run_manual_sync(&mut self, actor: &str, now: DateTime<Utc>) -> &SyncRun {
        let started = Instant::now();
        let mut seen = HashSet::new();
        let mut invalid_email = 0u32;
        let mut duplicate_nip = 0u32;
        for identity in &self.identities {
            if !seen.insert(identity.nip.as_str()) {
                duplicate_nip += 1;
            } else if !identity.email.contains('@') {
                invalid_email += 1;
            }
        }

        let total = self.identities.len() as u32;
        let failed = invalid_email + duplicate_nip;
        let synced = total - failed;
        let (status, details) = if failed == 0 {
            (SyncStatus::Success, "Manual sync completed successfully".to_string())
        } else if synced == 0 {
            (SyncStatus::Failed, "No identities could be synchronized".to_string())
        } else {
            let mut causes = Vec::new();
            if invalid_email > 0 {
                causes.push(format!("{} invalid email format", invalid_email));
            }
            if duplicate_nip > 0 {
                causes.push(format!("{} duplicate NIP", duplicate_nip));
            }
            (
                SyncStatus::Partial,
                format!("{} identities failed ({})", failed, causes.join(", ")),
            )
        };

        let run = SyncRun {
            id: Uuid::new_v4().to_string(),
            date: now,
            status,
            total_identities: total,
            synced_identities: synced,
            failed_identities: failed,
            duration_secs: started.elapsed().as_secs(),
            source: SyncSource::Manual,
            details: details.clone(),
        };
        info!("Manual sync finished: {}/{} synced", synced, total);

        let audit_status = match status {
            SyncStatus::Success => AuditStatus::Success,
            SyncStatus::Partial => AuditStatus::Warning,
            SyncStatus::Failed => AuditStatus::Failed,
        };
        self.record_audit(now, actor, "Identity Sync", "Active Directory", details, audit_status);
        self.sync_history.insert(0, run);
        &self.sync_history[0]
    }

    pub fn save_policy(&mut self, settings: PolicySettings, actor: &str, now: DateTime<Utc>) -> Result<(), CommandError> {
        forms::validate_policy(&settings)?;
        if settings == self.policy {
            return Ok(());
        }
        self.policy = settings;
        info!("Policy settings updated by {}", actor);
        self.record_audit(
            now,
            actor,
            "System Configuration",
            "Security Settings",
            "Updated password policy requirements".to_string(),
            AuditStatus::Success,
        );
        Ok(())
    }

    pub fn enroll_intern(
        &mut self,
        form: InternTraineeForm,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<&InternTrainee, CommandError> {
        let leader = forms::validate_intern(&form, &self.direct_leaders, &self.org_domain)?;
        let nip = form.nip.trim().to_string();
        if self.interns.iter().any(|i| i.nip == nip) {
            let mut errors = FormErrors::default();
            errors.push("nip", "NIP is already registered");
            return Err(errors.into());
        }

        let intern = InternTrainee {
            id: Uuid::new_v4().to_string(),
            nip,
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            direct_leader: leader,
            kind: form.kind,
            created_at: now,
        };
        let details = format!(
            "{} {} added under {}",
            intern.kind, intern.name, intern.direct_leader.name
        );
        info!("{} {} enrolled", intern.kind, intern.nip);
        self.interns.push(intern);
        self.record_audit(now, actor, "Intern Enroll", "Intern & Trainee", details, AuditStatus::Success);

        let last = self.interns.len() - 1;
        Ok(&self.interns[last])
    }

    /// Enrolls every valid row and reports the rest
    pub fn enroll_interns(&mut self, rows: Vec<InternUploadRow>, actor: &str, now: DateTime<Utc>) -> BulkEnrollment {
        let mut outcome = BulkEnrollment {
            enrolled: 0,
            rejected: Vec::new(),
        };
        for (i, row) in rows.into_iter().enumerate() {
            match self.enroll_intern(row.into(), actor, now) {
                Ok(_) => outcome.enrolled += 1,
                Err(CommandError::InvalidForm(errors)) => outcome.rejected.push((i + 1, errors)),
                Err(other) => {
                    let mut errors = FormErrors::default();
                    errors.push("row", other.to_string());
                    outcome.rejected.push((i + 1, errors));
                }
            }
        }
        if !outcome.rejected.is_empty() {
            warn!("{} intern row(s) rejected", outcome.rejected.len());
        }
        outcome
    }

    /// Registers an application together with the permissions listed in its template
    pub fn add_application(
        &mut self,
        form: ApplicationForm,
        permissions: Vec<ApplicationPermissionRow>,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<&Application, CommandError> {
        forms::validate_application(&form)?;
        let name = form.name.trim().to_string();
        if self.applications.iter().any(|a| a.name == name) {
            let mut errors = FormErrors::default();
            errors.push("name", "An application with this name already exists");
            return Err(errors.into());
        }

        let next_grant = self.grant_catalog.len();
        for (i, row) in permissions.into_iter().enumerate() {
            self.grant_catalog.push(PermissionGrant {
                id: format!("perm-{}", next_grant + i + 1),
                name: row.permission,
                role: row.roles,
                description: String::new(),
                application: name.clone(),
                group: String::new(),
            });
        }
        let added_permissions = self.grant_catalog.len() - next_grant;

        let today = now.date_naive();
        let application = Application {
            id: Uuid::new_v4().to_string(),
            name: name.clone(),
            url: form.url.trim().to_string(),
            description: form.description.trim().to_string(),
            status: ApplicationStatus::Active,
            component_ids: Vec::new(),
            assigned_users: 0,
            created_at: today,
            last_updated: today,
        };
        self.applications.push(application);
        info!("Application {} added with {} permissions", name, added_permissions);
        self.record_audit(
            now,
            actor,
            "Application Add",
            &name,
            format!("Registered with {} permissions", added_permissions),
            AuditStatus::Success,
        );

        let last = self.applications.len() - 1;
        Ok(&self.applications[last])
    }
}
