//! The in-memory IAM directory every listing reads from and every command mutates.

mod commands;
mod stats;

pub use commands::{BulkEnrollment, PermissionImport};
pub use stats::{ApplicationStats, DashboardStats, SyncSummary};

use crate::error::CommandError;
use crate::models::{
    Application, AuditLog, AuditStatus, Component, DirectLeader, GrantTarget, Group, Identity,
    InternTrainee, Permission, PermissionGrant, PolicySettings, Role, SyncRun, Task,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Domain that intern and trainee e-mail addresses must belong to
pub const DEFAULT_ORG_DOMAIN: &str = "banksinarmas.com";

/// Recorded as the source of audit entries written by commands
const AUDIT_ADDRESS: &str = "local";
const AUDIT_AGENT: &str = "gatekeeper";

#[derive(Debug, Clone)]
pub struct Directory {
    pub identities: Vec<Identity>,
    pub groups: Vec<Group>,
    pub applications: Vec<Application>,
    pub components: Vec<Component>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub grant_catalog: Vec<PermissionGrant>,
    pub tasks: Vec<Task>,
    /// Newest first
    pub audit_logs: Vec<AuditLog>,
    /// Newest first
    pub sync_history: Vec<SyncRun>,
    pub direct_leaders: Vec<DirectLeader>,
    pub interns: Vec<InternTrainee>,
    pub policy: PolicySettings,
    pub org_domain: String,
    assignments: BTreeMap<GrantTarget, BTreeSet<String>>,
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            identities: Vec::new(),
            groups: Vec::new(),
            applications: Vec::new(),
            components: Vec::new(),
            roles: Vec::new(),
            permissions: Vec::new(),
            grant_catalog: Vec::new(),
            tasks: Vec::new(),
            audit_logs: Vec::new(),
            sync_history: Vec::new(),
            direct_leaders: Vec::new(),
            interns: Vec::new(),
            policy: PolicySettings::default(),
            org_domain: DEFAULT_ORG_DOMAIN.to_string(),
            assignments: BTreeMap::new(),
        }
    }
}

impl Directory {
    pub fn identity(&self, id: &str) -> Option<&Identity> {
        self.identities.iter().find(|i| i.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn application(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn leader(&self, nip: &str) -> Option<&DirectLeader> {
        self.direct_leaders.iter().find(|l| l.nip == nip)
    }

    pub fn grant_row(&self, id: &str) -> Option<&PermissionGrant> {
        self.grant_catalog.iter().find(|g| g.id == id)
    }

    /// Members of a group in directory order
    pub fn members(&self, group_id: &str) -> Result<Vec<&Identity>, CommandError> {
        let group = self
            .group(group_id)
            .ok_or_else(|| CommandError::not_found("group", group_id))?;
        Ok(self
            .identities
            .iter()
            .filter(|i| group.has_member(&i.id))
            .collect())
    }

    /// Identities that could still be added to a group
    pub fn candidates(&self, group_id: &str) -> Result<Vec<&Identity>, CommandError> {
        let group = self
            .group(group_id)
            .ok_or_else(|| CommandError::not_found("group", group_id))?;
        Ok(self
            .identities
            .iter()
            .filter(|i| !group.has_member(&i.id))
            .collect())
    }

    /// Catalog rows offered by one application
    pub fn application_grants(&self, application_id: &str) -> Result<Vec<&PermissionGrant>, CommandError> {
        let application = self
            .application(application_id)
            .ok_or_else(|| CommandError::not_found("application", application_id))?;
        Ok(self
            .grant_catalog
            .iter()
            .filter(|g| g.application == application.name)
            .collect())
    }

    pub fn is_assigned(&self, target: &GrantTarget, grant_id: &str) -> bool {
        self.assignments
            .get(target)
            .is_some_and(|ids| ids.contains(grant_id))
    }

    pub fn holds_grants(&self, identity_id: &str) -> bool {
        self.assignments
            .get(&GrantTarget::Identity(identity_id.to_string()))
            .is_some_and(|ids| !ids.is_empty())
    }

    /// Catalog rows assigned to `target`, in catalog order
    pub fn assigned_grants(&self, target: &GrantTarget) -> Vec<&PermissionGrant> {
        self.grant_catalog
            .iter()
            .filter(|g| self.is_assigned(target, &g.id))
            .collect()
    }

    /// Catalog rows not yet assigned to `target`, in catalog order
    pub fn unassigned_grants(&self, target: &GrantTarget) -> Vec<&PermissionGrant> {
        self.grant_catalog
            .iter()
            .filter(|g| !self.is_assigned(target, &g.id))
            .collect()
    }

    pub(crate) fn ensure_target(&self, target: &GrantTarget) -> Result<(), CommandError> {
        match target {
            GrantTarget::Group(id) if self.group(id).is_none() => {
                Err(CommandError::not_found("group", id.as_str()))
            }
            GrantTarget::Identity(id) if self.identity(id).is_none() => {
                Err(CommandError::not_found("identity", id.as_str()))
            }
            _ => Ok(()),
        }
    }

    /// Records grant ids against a target; returns how many were new
    pub(crate) fn grant(&mut self, target: GrantTarget, ids: impl IntoIterator<Item = String>) -> usize {
        let assigned = self.assignments.entry(target).or_default();
        ids.into_iter().filter(|id| assigned.insert(id.clone())).count()
    }

    pub(crate) fn record_audit(
        &mut self,
        now: DateTime<Utc>,
        actor: &str,
        action: &str,
        resource: &str,
        details: String,
        status: AuditStatus,
    ) {
        self.audit_logs.insert(
            0,
            AuditLog {
                id: Uuid::new_v4().to_string(),
                timestamp: now,
                user: actor.to_string(),
                action: action.to_string(),
                resource: resource.to_string(),
                details,
                ip_address: AUDIT_ADDRESS.to_string(),
                user_agent: AUDIT_AGENT.to_string(),
                status,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::mock_directory;

    #[test]
    fn test_members_and_candidates_partition_identities() {
        let directory = mock_directory();
        let members = directory.members("4").unwrap();
        let candidates = directory.candidates("4").unwrap();

        let member_names: Vec<&str> = members.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            member_names,
            vec!["John Anderson", "Michael Chen", "David Wilson", "Robert Taylor"]
        );
        assert_eq!(members.len() + candidates.len(), directory.identities.len());
    }

    #[test]
    fn test_unknown_group_is_not_found() {
        let directory = mock_directory();
        let result = directory.members("99");
        assert!(matches!(result, Err(CommandError::NotFound { kind: "group", .. })));
    }

    #[test]
    fn test_application_grants_match_by_name() {
        let directory = mock_directory();
        let grants = directory.application_grants("2").unwrap();

        assert_eq!(grants.len(), 20);
        assert!(grants.iter().all(|g| g.application == "Finance Portal"));
    }

    #[test]
    fn test_assigned_and_unassigned_are_disjoint() {
        let directory = mock_directory();
        let target = GrantTarget::Identity("3".to_string());

        let assigned = directory.assigned_grants(&target);
        let unassigned = directory.unassigned_grants(&target);
        assert_eq!(assigned.len() + unassigned.len(), directory.grant_catalog.len());
        assert!(unassigned.iter().all(|g| !directory.is_assigned(&target, &g.id)));
    }

    #[test]
    fn test_grant_counts_new_ids_only() {
        let mut directory = Directory::default();
        let target = GrantTarget::Group("1".to_string());

        assert_eq!(directory.grant(target.clone(), vec!["a".to_string(), "b".to_string()]), 2);
        assert_eq!(directory.grant(target, vec!["b".to_string(), "c".to_string()]), 1);
    }

    #[test]
    fn test_audit_entries_are_prepended() {
        let mut directory = mock_directory();
        let before = directory.audit_logs.len();

        directory.record_audit(Utc::now(), "admin", "Login", "Console", "ok".to_string(), AuditStatus::Success);
        assert_eq!(directory.audit_logs.len(), before + 1);
        assert_eq!(directory.audit_logs[0].user, "admin");
        assert_eq!(directory.audit_logs[0].user_agent, "gatekeeper");
    }
}
