//! Ready-made listings for every dashboard page.
//!
//! Each function snapshots the relevant records out of a [`Directory`] and
//! wires up the search fields and filters that page offers. After a command
//! changes the directory, hand the fresh snapshot back with
//! [`FilteredPageModel::replace_records`].

use crate::directory::Directory;
use crate::models::{
    Application, AuditLog, GrantTarget, Group, Identity, PermissionGrant, SyncRun, Task,
};
use gatekeeper_query::{CategoryFilter, FilterSpec, FilterState, FilteredPageModel};
use shared::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const AUDIT_PAGE_SIZE: usize = 10;
pub const MEMBER_PAGE_SIZE: usize = 10;

// filter names
pub const STATUS: &str = "status";
pub const ACTION: &str = "action";
pub const SOURCE: &str = "source";
pub const SCOPE: &str = "scope";
pub const GROUP: &str = "group";
pub const APPLICATION: &str = "application";
pub const ROLE: &str = "role";

// values of the SCOPE selector
pub const SCOPE_GROUP: &str = "group";
pub const SCOPE_APPLICATION: &str = "application";
pub const SCOPE_APPLICATION_ROLES: &str = "application-roles";

fn identity_spec() -> FilterSpec<Identity> {
    FilterSpec::new()
        .search(|i: &Identity| i.name.as_str())
        .category(CategoryFilter::equals(STATUS, |i: &Identity| i.status.as_str()))
}

pub fn identities(directory: &Directory, page_size: usize) -> Result<FilteredPageModel<Identity>> {
    FilteredPageModel::new(directory.identities.clone(), identity_spec(), page_size)
}

pub fn groups(directory: &Directory, page_size: usize) -> Result<FilteredPageModel<Group>> {
    let spec = FilterSpec::new()
        .search(|g: &Group| g.name.as_str())
        .category(CategoryFilter::equals(STATUS, |g: &Group| g.status.as_str()));
    FilteredPageModel::new(directory.groups.clone(), spec, page_size)
}

pub fn applications(directory: &Directory, page_size: usize) -> Result<FilteredPageModel<Application>> {
    let spec = FilterSpec::new()
        .search(|a: &Application| a.name.as_str())
        .category(CategoryFilter::equals(STATUS, |a: &Application| a.status.as_str()));
    FilteredPageModel::new(directory.applications.clone(), spec, page_size)
}

pub fn tasks(directory: &Directory, page_size: usize) -> Result<FilteredPageModel<Task>> {
    let spec = FilterSpec::new()
        .search(|t: &Task| t.request_id.as_str())
        .search(|t: &Task| t.requester_name.as_str())
        .search(|t: &Task| t.identity_name.as_str())
        .search(|t: &Task| t.application.as_str())
        .category(CategoryFilter::equals(STATUS, |t: &Task| t.status.as_str()));
    FilteredPageModel::new(directory.tasks.clone(), spec, page_size)
}

/// The action filter matches by substring, so "login" also finds "Failed Login"
pub fn audit_trail(directory: &Directory, page_size: usize) -> Result<FilteredPageModel<AuditLog>> {
    let spec = FilterSpec::new()
        .search(|l: &AuditLog| l.user.as_str())
        .search(|l: &AuditLog| l.action.as_str())
        .search(|l: &AuditLog| l.resource.as_str())
        .search(|l: &AuditLog| l.details.as_str())
        .category(CategoryFilter::equals(STATUS, |l: &AuditLog| l.status.as_str()))
        .category(CategoryFilter::contains(ACTION, |l: &AuditLog| l.action.as_str()));
    FilteredPageModel::new(directory.audit_logs.clone(), spec, page_size)
}

pub fn sync_history(directory: &Directory, page_size: usize) -> Result<FilteredPageModel<SyncRun>> {
    let spec = FilterSpec::new()
        .category(CategoryFilter::equals(STATUS, |r: &SyncRun| r.status.as_str()))
        .category(CategoryFilter::equals(SOURCE, |r: &SyncRun| r.source.as_str()));
    FilteredPageModel::new(directory.sync_history.clone(), spec, page_size)
}

/// Permissions offered by one application, filterable by role
pub fn application_permissions(
    directory: &Directory,
    application_id: &str,
    page_size: usize,
) -> Result<FilteredPageModel<PermissionGrant>> {
    let application = directory
        .application(application_id)
        .ok_or_else(|| Error::NotFound(format!("application {}", application_id)))?;
    let rows: Vec<PermissionGrant> = directory
        .grant_catalog
        .iter()
        .filter(|g| g.application == application.name)
        .cloned()
        .collect();

    let spec = FilterSpec::new()
        .search(|g: &PermissionGrant| g.name.as_str())
        .category(CategoryFilter::equals(ROLE, |g: &PermissionGrant| g.role.as_str()));
    FilteredPageModel::new(rows, spec, page_size)
}

/// Every catalog row across applications
pub fn permission_catalog(directory: &Directory, page_size: usize) -> Result<FilteredPageModel<PermissionGrant>> {
    let spec = FilterSpec::new()
        .search(|g: &PermissionGrant| g.name.as_str())
        .category(CategoryFilter::equals(APPLICATION, |g: &PermissionGrant| g.application.as_str()))
        .category(CategoryFilter::equals(ROLE, |g: &PermissionGrant| g.role.as_str()).depends_on(APPLICATION));
    FilteredPageModel::new(directory.grant_catalog.clone(), spec, page_size)
}

/// Scope picks which of group, application and role narrow the rows;
/// changing it clears all three
fn scoped_grant_spec() -> FilterSpec<PermissionGrant> {
    FilterSpec::new()
        .search(|g: &PermissionGrant| g.name.as_str())
        .category(CategoryFilter::selector(SCOPE))
        .category(CategoryFilter::equals(GROUP, |g: &PermissionGrant| g.group.as_str()).depends_on(SCOPE))
        .category(CategoryFilter::equals(APPLICATION, |g: &PermissionGrant| g.application.as_str()).depends_on(SCOPE))
        .category(CategoryFilter::equals(ROLE, |g: &PermissionGrant| g.role.as_str()).depends_on(APPLICATION))
}

/// Nothing is offered until the chosen scope's filters are all picked
fn scope_complete(state: &FilterState) -> bool {
    match state.value(SCOPE) {
        Some(SCOPE_GROUP) => state.is_set(GROUP),
        Some(SCOPE_APPLICATION) => state.is_set(APPLICATION),
        Some(SCOPE_APPLICATION_ROLES) => state.is_set(APPLICATION) && state.is_set(ROLE),
        _ => false,
    }
}

fn ensure_target(directory: &Directory, target: &GrantTarget) -> Result<()> {
    directory
        .ensure_target(target)
        .map_err(|_| Error::NotFound(target.to_string()))
}

pub fn assigned_permissions(
    directory: &Directory,
    target: &GrantTarget,
    page_size: usize,
) -> Result<FilteredPageModel<PermissionGrant>> {
    ensure_target(directory, target)?;
    let rows = directory.assigned_grants(target).into_iter().cloned().collect();
    FilteredPageModel::new(rows, scoped_grant_spec(), page_size)
}

/// Catalog rows the target does not hold yet; empty until a scope is fully chosen
pub fn unassigned_permissions(
    directory: &Directory,
    target: &GrantTarget,
    page_size: usize,
) -> Result<FilteredPageModel<PermissionGrant>> {
    ensure_target(directory, target)?;
    let rows = directory.unassigned_grants(target).into_iter().cloned().collect();
    FilteredPageModel::new(rows, scoped_grant_spec().gate(scope_complete), page_size)
}

fn group_partition(directory: &Directory, group_id: &str, members: bool) -> Result<Vec<Identity>> {
    let rows = if members {
        directory.members(group_id)
    } else {
        directory.candidates(group_id)
    };
    rows.map(|rows| rows.into_iter().cloned().collect())
        .map_err(|_| Error::NotFound(format!("group {}", group_id)))
}

pub fn group_members(
    directory: &Directory,
    group_id: &str,
    page_size: usize,
) -> Result<FilteredPageModel<Identity>> {
    let rows = group_partition(directory, group_id, true)?;
    FilteredPageModel::new(rows, identity_spec(), page_size)
}

/// Identities that can still be added to the group
pub fn candidate_members(
    directory: &Directory,
    group_id: &str,
    page_size: usize,
) -> Result<FilteredPageModel<Identity>> {
    let rows = group_partition(directory, group_id, false)?;
    FilteredPageModel::new(rows, identity_spec(), page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::mock_directory;
    use chrono::Utc;

    #[test]
    fn test_identity_search_finds_both_chens() {
        let directory = mock_directory();
        let mut listing = identities(&directory, DEFAULT_PAGE_SIZE).unwrap();
        listing.set_search_term("chen");

        let names: Vec<&str> = listing.filtered().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Michael Chen", "Iris Chen"]);
    }

    #[test]
    fn test_identity_status_filter() {
        let directory = mock_directory();
        let mut listing = identities(&directory, DEFAULT_PAGE_SIZE).unwrap();
        listing.set_category_filter(STATUS, "inactive").unwrap();
        assert_eq!(listing.filtered_count(), 3);

        listing.set_category_filter(STATUS, "all").unwrap();
        assert_eq!(listing.filtered_count(), 23);
    }

    #[test]
    fn test_unknown_filter_name() {
        let directory = mock_directory();
        let mut listing = groups(&directory, DEFAULT_PAGE_SIZE).unwrap();
        let result = listing.set_category_filter("department", "SDE");
        assert!(matches!(result, Err(Error::UnknownFilter(ref name)) if name == "department"));
    }

    #[test]
    fn test_task_search_spans_fields() {
        let directory = mock_directory();
        let mut listing = tasks(&directory, DEFAULT_PAGE_SIZE).unwrap();

        listing.set_search_term("REQ-2024-004");
        assert_eq!(listing.filtered_count(), 1);
        listing.set_search_term("emily");
        assert_eq!(listing.filtered()[0].request_id, "REQ-2024-002");
        listing.set_search_term("document");
        assert_eq!(listing.filtered()[0].id, "3");
    }

    #[test]
    fn test_audit_action_filter_is_substring() {
        let directory = mock_directory();
        let mut listing = audit_trail(&directory, AUDIT_PAGE_SIZE).unwrap();
        listing.set_category_filter(ACTION, "login").unwrap();

        let actions: Vec<&str> = listing.filtered().iter().map(|l| l.action.as_str()).collect();
        assert_eq!(actions, vec!["Login", "Failed Login"]);

        listing.set_category_filter(STATUS, "failed").unwrap();
        assert_eq!(listing.filtered_count(), 1);
    }

    #[test]
    fn test_sync_history_filters() {
        let directory = mock_directory();
        let mut listing = sync_history(&directory, DEFAULT_PAGE_SIZE).unwrap();
        listing.set_category_filter(SOURCE, "manual").unwrap();
        assert_eq!(listing.filtered_count(), 1);

        listing.set_category_filter(SOURCE, "scheduled").unwrap();
        listing.set_category_filter(STATUS, "partial").unwrap();
        assert_eq!(listing.filtered_count(), 2);
    }

    #[test]
    fn test_application_permissions_role_options_skip_blank() {
        let directory = mock_directory();
        let listing = application_permissions(&directory, "1", DEFAULT_PAGE_SIZE).unwrap();

        assert_eq!(listing.filtered_count(), 20);
        let roles = listing.options(ROLE).unwrap();
        assert!(!roles.is_empty());
        assert!(roles.iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn test_unknown_application() {
        let directory = mock_directory();
        let result = application_permissions(&directory, "404", DEFAULT_PAGE_SIZE);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_catalog_role_options_follow_application() {
        let directory = mock_directory();
        let mut listing = permission_catalog(&directory, DEFAULT_PAGE_SIZE).unwrap();
        let all_roles = listing.options(ROLE).unwrap();

        listing.set_category_filter(APPLICATION, "Finance Portal").unwrap();
        let finance_roles = listing.options(ROLE).unwrap();
        assert!(finance_roles.len() <= all_roles.len());
        assert!(
            finance_roles
                .iter()
                .all(|role| directory
                    .grant_catalog
                    .iter()
                    .any(|g| g.application == "Finance Portal" && &g.role == role))
        );
    }

    #[test]
    fn test_unassigned_permissions_gated_until_scope_chosen() {
        let directory = mock_directory();
        let target = GrantTarget::Group("4".to_string());
        let mut listing = unassigned_permissions(&directory, &target, MEMBER_PAGE_SIZE).unwrap();

        assert!(!listing.is_open());
        assert_eq!(listing.filtered_count(), 0);
        assert_eq!(listing.visible_page().total_pages, 0);

        listing.set_category_filter(SCOPE, SCOPE_APPLICATION).unwrap();
        assert_eq!(listing.filtered_count(), 0);
        listing.set_category_filter(APPLICATION, "Finance Portal").unwrap();
        assert!(listing.is_open());
        assert!(listing.filtered().iter().all(|g| g.application == "Finance Portal"));

        listing.set_category_filter(SCOPE, SCOPE_APPLICATION_ROLES).unwrap();
        assert!(!listing.filter_state().is_set(APPLICATION));
        assert!(!listing.is_open());

        listing.set_category_filter(APPLICATION, "Finance Portal").unwrap();
        listing.set_category_filter(ROLE, "Manager").unwrap();
        assert!(listing.is_open());
        assert!(listing.filtered().iter().all(|g| g.role == "Manager"));
    }

    #[test]
    fn test_scope_change_resets_application_and_role() {
        let directory = mock_directory();
        let target = GrantTarget::Identity("1".to_string());
        let mut listing = assigned_permissions(&directory, &target, MEMBER_PAGE_SIZE).unwrap();

        listing.set_category_filter(SCOPE, SCOPE_APPLICATION_ROLES).unwrap();
        listing.set_category_filter(APPLICATION, "HR Management System").unwrap();
        listing.set_category_filter(ROLE, "Administrator").unwrap();
        listing.set_category_filter(SCOPE, SCOPE_GROUP).unwrap();

        let state = listing.filter_state();
        assert_eq!(state.value(SCOPE), Some(SCOPE_GROUP));
        assert!(!state.is_set(APPLICATION));
        assert!(!state.is_set(ROLE));
        assert_eq!(listing.filtered_count(), 30);
    }

    #[test]
    fn test_assigned_listing_refreshes_after_command() {
        let mut directory = mock_directory();
        let target = GrantTarget::Group("5".to_string());
        let mut listing = unassigned_permissions(&directory, &target, MEMBER_PAGE_SIZE).unwrap();
        listing.set_category_filter(SCOPE, SCOPE_APPLICATION).unwrap();
        listing.set_category_filter(APPLICATION, "Analytics Dashboard").unwrap();
        listing.select_all_filtered();
        let picked: Vec<String> = listing.selection().iter().map(str::to_string).collect();
        assert!(!picked.is_empty());

        directory
            .assign_permissions(target.clone(), &picked, "admin", Utc::now())
            .unwrap();
        let fresh = directory.unassigned_grants(&target).into_iter().cloned().collect();
        listing.replace_records(fresh);

        assert!(listing.selection().is_empty());
        assert_eq!(listing.filtered_count(), 0);
    }

    #[test]
    fn test_members_and_candidates() {
        let directory = mock_directory();
        let members = group_members(&directory, "3", MEMBER_PAGE_SIZE).unwrap();
        assert_eq!(members.filtered_count(), 4);

        let mut candidates = candidate_members(&directory, "3", MEMBER_PAGE_SIZE).unwrap();
        assert_eq!(candidates.filtered_count(), 19);
        assert_eq!(candidates.visible_page().total_pages, 2);

        candidates.set_category_filter(STATUS, "inactive").unwrap();
        let names: Vec<&str> = candidates.filtered().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Frank Miller", "Leo Rodriguez"]);

        assert!(matches!(
            group_members(&directory, "9", MEMBER_PAGE_SIZE),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let directory = mock_directory();
        assert!(matches!(
            identities(&directory, 0),
            Err(Error::InvalidPageSize(0))
        ));
    }
}
