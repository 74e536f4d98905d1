use super::Directory;
use crate::models::{Activity, ApplicationStatus, IdentityStatus, SyncRun, SyncStatus};
use serde::Serialize;

/// Headline numbers on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub inactive_users: usize,
    pub active_users_without_permissions: usize,
    pub total_groups: usize,
    pub active_groups: usize,
    pub inactive_groups: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub maintenance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub total: usize,
    pub successful: usize,
    pub partial: usize,
    pub failed: usize,
    pub last: Option<SyncRun>,
}

impl Directory {
    pub fn dashboard_stats(&self) -> DashboardStats {
        let count_users = |status: IdentityStatus| self.identities.iter().filter(|i| i.status == status).count();
        let count_groups = |status: Activity| self.groups.iter().filter(|g| g.status == status).count();

        DashboardStats {
            total_users: self.identities.len(),
            active_users: count_users(IdentityStatus::Active),
            inactive_users: count_users(IdentityStatus::Inactive),
            active_users_without_permissions: self
                .identities
                .iter()
                .filter(|i| i.is_active() && !self.holds_grants(&i.id))
                .count(),
            total_groups: self.groups.len(),
            active_groups: count_groups(Activity::Active),
            inactive_groups: count_groups(Activity::Inactive),
        }
    }

    pub fn application_stats(&self) -> ApplicationStats {
        let count = |status: ApplicationStatus| self.applications.iter().filter(|a| a.status == status).count();

        ApplicationStats {
            total: self.applications.len(),
            active: count(ApplicationStatus::Active),
            inactive: count(ApplicationStatus::Inactive),
            maintenance: count(ApplicationStatus::Maintenance),
        }
    }

    pub fn sync_summary(&self) -> SyncSummary {
        let count = |status: SyncStatus| self.sync_history.iter().filter(|r| r.status == status).count();

        SyncSummary {
            total: self.sync_history.len(),
            successful: count(SyncStatus::Success),
            partial: count(SyncStatus::Partial),
            failed: count(SyncStatus::Failed),
            last: self.sync_history.first().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::mock_directory;

    #[test]
    fn test_dashboard_stats_over_fixtures() {
        let stats = mock_directory().dashboard_stats();

        assert_eq!(stats.total_users, 23);
        assert_eq!(stats.active_users, 20);
        assert_eq!(stats.inactive_users, 3);
        // The 13 active group candidates hold no permissions yet
        assert_eq!(stats.active_users_without_permissions, 13);
        assert_eq!(stats.total_groups, 6);
        assert_eq!(stats.active_groups, 5);
        assert_eq!(stats.inactive_groups, 1);
    }

    #[test]
    fn test_application_stats() {
        let stats = mock_directory().application_stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.active, 4);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.maintenance, 0);
    }

    #[test]
    fn test_sync_summary_counts_by_status() {
        let summary = mock_directory().sync_summary();
        assert_eq!(summary.total, 7);
        assert_eq!(summary.successful, 4);
        assert_eq!(summary.partial, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.last.map(|r| r.id), Some("1".to_string()));
    }
}
