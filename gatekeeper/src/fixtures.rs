use crate::directory::Directory;
use crate::models::{
    Activity, Application, ApplicationStatus, AuditLog, AuditStatus, Component, ComponentKind,
    DirectLeader, GrantTarget, Group, Identity, IdentityStatus, Permission, PermissionAction,
    PermissionGrant, RequestedPermission, Role, RoleLevel, SyncRun, SyncSource, SyncStatus, Task,
    TaskStatus,
};
use chrono::{DateTime, NaiveDate, Utc};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Size of the application permission catalog
pub const GRANT_CATALOG_SIZE: usize = 100;

/// Catalog rows initially assigned to every group and every seeded identity
pub const INITIAL_ASSIGNMENTS: usize = 30;

const PERMISSION_TYPES: [&str; 20] = [
    "User Management",
    "Report Generate",
    "Project Management",
    "Task Management",
    "File Management",
    "File Upload",
    "System Config",
    "Security Config",
    "Analytics View",
    "Data Export",
    "Backup Create",
    "Log Management",
    "Notification Send",
    "API Access",
    "Database View",
    "Integration Management",
    "Workflow Management",
    "Template Management",
    "Audit View",
    "Settings Management",
];

const GRANT_ROLES: [&str; 6] = ["Administrator", "Manager", "User", "Viewer", "Analyst", "Operator"];

const GRANT_DESCRIPTIONS: [&str; 10] = [
    "Create and manage user accounts",
    "Generate various system reports",
    "Manage project workflows and tasks",
    "Access and modify system files",
    "Configure system settings",
    "View analytics and dashboards",
    "Export data in various formats",
    "Manage system backups",
    "Access system logs",
    "Send notifications to users",
];

/// Groups a permission grant can be inherited through
const GRANT_GROUPS: [&str; 5] = [
    "HR Department",
    "Finance Team",
    "Project Managers",
    "Developers",
    "Operations",
];

const PERMISSIONS: [(&str, PermissionAction, &str, &str); 50] = [
    ("User Management", PermissionAction::Create, "users", "Create new users"),
    ("User View", PermissionAction::Read, "users", "View user information"),
    ("User Edit", PermissionAction::Update, "users", "Edit user information"),
    ("User Delete", PermissionAction::Delete, "users", "Delete users"),
    ("Report Generate", PermissionAction::Execute, "reports", "Generate reports"),
    ("System Config", PermissionAction::Update, "system", "Modify system configuration"),
    ("Audit View", PermissionAction::Read, "audit", "View audit logs"),
    ("Application Management", PermissionAction::Create, "applications", "Manage applications"),
    ("Role Management", PermissionAction::Create, "roles", "Create and manage user roles"),
    ("Role View", PermissionAction::Read, "roles", "View role information"),
    ("Role Edit", PermissionAction::Update, "roles", "Edit role permissions"),
    ("Role Delete", PermissionAction::Delete, "roles", "Delete user roles"),
    ("Department Management", PermissionAction::Create, "departments", "Manage departments"),
    ("Department View", PermissionAction::Read, "departments", "View department information"),
    ("Department Edit", PermissionAction::Update, "departments", "Edit department details"),
    ("Department Delete", PermissionAction::Delete, "departments", "Delete departments"),
    ("Project Management", PermissionAction::Create, "projects", "Create and manage projects"),
    ("Project View", PermissionAction::Read, "projects", "View project information"),
    ("Project Edit", PermissionAction::Update, "projects", "Edit project details"),
    ("Project Delete", PermissionAction::Delete, "projects", "Delete projects"),
    ("Task Management", PermissionAction::Create, "tasks", "Create and assign tasks"),
    ("Task View", PermissionAction::Read, "tasks", "View task information"),
    ("Task Edit", PermissionAction::Update, "tasks", "Edit task details"),
    ("Task Delete", PermissionAction::Delete, "tasks", "Delete tasks"),
    ("File Upload", PermissionAction::Create, "files", "Upload files to system"),
    ("File View", PermissionAction::Read, "files", "View and download files"),
    ("File Edit", PermissionAction::Update, "files", "Edit file metadata"),
    ("File Delete", PermissionAction::Delete, "files", "Delete files from system"),
    ("Settings Management", PermissionAction::Update, "settings", "Modify system settings"),
    ("Settings View", PermissionAction::Read, "settings", "View system settings"),
    ("Backup Create", PermissionAction::Execute, "backup", "Create system backups"),
    ("Backup Restore", PermissionAction::Execute, "backup", "Restore from backups"),
    ("Log Management", PermissionAction::Read, "logs", "View system logs"),
    ("Log Export", PermissionAction::Execute, "logs", "Export log files"),
    ("Notification Send", PermissionAction::Create, "notifications", "Send notifications to users"),
    ("Notification View", PermissionAction::Read, "notifications", "View notification history"),
    ("Analytics View", PermissionAction::Read, "analytics", "View analytics dashboard"),
    ("Analytics Export", PermissionAction::Execute, "analytics", "Export analytics data"),
    ("Security Audit", PermissionAction::Read, "security", "View security audit logs"),
    ("Security Config", PermissionAction::Update, "security", "Configure security settings"),
    ("API Access", PermissionAction::Execute, "api", "Access system APIs"),
    ("API Management", PermissionAction::Create, "api", "Manage API endpoints"),
    ("Database View", PermissionAction::Read, "database", "View database information"),
    ("Database Backup", PermissionAction::Execute, "database", "Create database backups"),
    ("Integration Management", PermissionAction::Create, "integrations", "Manage third-party integrations"),
    ("Integration View", PermissionAction::Read, "integrations", "View integration status"),
    ("Workflow Management", PermissionAction::Create, "workflows", "Create and manage workflows"),
    ("Workflow Execute", PermissionAction::Execute, "workflows", "Execute workflow processes"),
    ("Template Management", PermissionAction::Create, "templates", "Manage document templates"),
    ("Template View", PermissionAction::Read, "templates", "View available templates"),
];

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

fn ids(range: impl IntoIterator<Item = usize>) -> Vec<String> {
    range.into_iter().map(|i| i.to_string()).collect()
}

/// The 50 atomic permissions
pub fn permissions() -> Vec<Permission> {
    PERMISSIONS
        .iter()
        .enumerate()
        .map(|(i, (name, action, resource, description))| Permission {
            id: (i + 1).to_string(),
            name: name.to_string(),
            action: *action,
            resource: resource.to_string(),
            description: description.to_string(),
        })
        .collect()
}

pub fn roles() -> Vec<Role> {
    let role = |id: &str, name: &str, description: &str, level, permission_ids| Role {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        level,
        permission_ids,
    };
    vec![
        role("1", "System Administrator", "Full system access and control", RoleLevel::Admin, ids(1..=50)),
        role("2", "HR Manager", "Human resources management access", RoleLevel::Manager, ids(1..=5)),
        role("3", "Department Manager", "Department-level management access", RoleLevel::Manager, ids(2..=6)),
        role("4", "Regular User", "Standard user access", RoleLevel::User, ids(2..=3)),
        role("5", "Viewer", "Read-only access", RoleLevel::Viewer, ids([2, 7])),
    ]
}

pub fn components() -> Vec<Component> {
    let component = |id: &str, name: &str, kind, description: &str, permission_ids, status| Component {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        description: description.to_string(),
        permission_ids,
        status,
    };
    vec![
        component("1", "User Profile Management", ComponentKind::Module, "Manage user profiles and personal information", ids(1..=4), Activity::Active),
        component("2", "Reporting Dashboard", ComponentKind::Feature, "Generate and view various reports", ids([5, 7]), Activity::Active),
        component("3", "Authentication Service", ComponentKind::Service, "Handle user authentication and authorization", ids(1..=2), Activity::Active),
        component("4", "Notification System", ComponentKind::Service, "Send notifications to users", ids([2]), Activity::Inactive),
        component("5", "File Management", ComponentKind::Module, "Upload and manage files", ids(1..=4), Activity::Active),
    ]
}

pub fn applications() -> Vec<Application> {
    let application = |id: &str, name: &str, host: &str, description: &str, status, component_ids, assigned_users, created_at, last_updated| Application {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("https://{}.company.com", host),
        description: description.to_string(),
        status,
        component_ids,
        assigned_users,
        created_at,
        last_updated,
    };
    vec![
        application("1", "HR Management System", "hr", "Human resources management application", ApplicationStatus::Active, ids(1..=3), 45, date(2023, 1, 15), date(2024, 12, 15)),
        application("2", "Finance Portal", "finance", "Financial management and reporting system", ApplicationStatus::Active, ids(2..=4), 28, date(2023, 3, 20), date(2024, 11, 30)),
        application("3", "Project Management Tool", "projects", "Collaborative project management platform", ApplicationStatus::Active, ids([1, 3, 5]), 67, date(2023, 6, 10), date(2024, 12, 10)),
        application("4", "Document Management", "docs", "Document storage and collaboration system", ApplicationStatus::Active, ids([1, 5]), 89, date(2023, 8, 5), date(2024, 12, 12)),
        application("5", "Analytics Dashboard", "analytics", "Business intelligence and analytics platform", ApplicationStatus::Inactive, ids([2, 3]), 15, date(2023, 11, 12), date(2024, 10, 20)),
    ]
}

/// Employees with application access plus the candidates not yet in any group
pub fn identities() -> Vec<Identity> {
    let employee = |id: &str, nip: &str, name: &str, department: &str, position: &str, status, application_ids, role: usize, permission_ids, last_login: &str, created_at| Identity {
        id: id.to_string(),
        nip: nip.to_string(),
        name: name.to_string(),
        email: email_for(name, "company.com"),
        department: department.to_string(),
        position: position.to_string(),
        status,
        application_ids,
        role_ids: ids([role]),
        permission_ids,
        last_login: Some(at(last_login)),
        created_at,
    };
    let mut all = vec![
        employee("1", "02001", "John Anderson", "SDE", "department head", IdentityStatus::Active, ids(1..=4), 1, ids(1..=50), "2024-12-15T10:30:00Z", date(2023, 1, 15)),
        employee("2", "02045", "Sarah Johnson", "PM", "division head", IdentityStatus::Active, ids(1..=2), 2, ids(1..=5), "2024-12-15T09:15:00Z", date(2023, 2, 1)),
        employee("3", "02156", "Michael Chen", "SDE", "section head", IdentityStatus::Active, ids([2, 5]), 3, ids(2..=6), "2024-12-14T16:45:00Z", date(2023, 3, 10)),
        employee("4", "02234", "Emily Davis", "PM", "staff", IdentityStatus::Active, ids([3, 4]), 4, ids(2..=3), "2024-12-15T11:20:00Z", date(2023, 4, 5)),
        employee("5", "02567", "David Wilson", "SDE", "section head", IdentityStatus::Active, ids(3..=5), 3, ids(2..=6), "2024-12-13T14:30:00Z", date(2023, 5, 20)),
        employee("6", "02789", "Lisa Rodriguez", "PM", "staff", IdentityStatus::Inactive, ids([4]), 5, ids([2, 7]), "2024-12-01T08:15:00Z", date(2023, 7, 15)),
        employee("7", "02890", "Robert Taylor", "SDE", "staff", IdentityStatus::Active, ids([1, 3, 4]), 3, ids(2..=6), "2024-12-15T13:10:00Z", date(2023, 8, 30)),
        employee("8", "02945", "Jennifer Brown", "PM", "section head", IdentityStatus::Active, ids(1..=3), 4, ids(2..=4), "2024-12-15T12:00:00Z", date(2023, 9, 12)),
    ];
    all.extend(candidates());
    all
}

fn candidates() -> Vec<Identity> {
    const PEOPLE: [(&str, &str, &str, IdentityStatus); 15] = [
        ("Alice Thompson", "Marketing", "Marketing Specialist", IdentityStatus::Active),
        ("Bob Martinez", "Sales", "Sales Representative", IdentityStatus::Active),
        ("Carol White", "IT", "System Administrator", IdentityStatus::Active),
        ("Daniel Kim", "Engineering", "Software Engineer", IdentityStatus::Active),
        ("Emma Garcia", "Design", "UI/UX Designer", IdentityStatus::Active),
        ("Frank Miller", "Operations", "Operations Manager", IdentityStatus::Inactive),
        ("Grace Lee", "Legal", "Legal Counsel", IdentityStatus::Active),
        ("Henry Davis", "Finance", "Financial Analyst", IdentityStatus::Active),
        ("Iris Chen", "Research", "Research Scientist", IdentityStatus::Active),
        ("Jack Wilson", "Support", "Customer Support", IdentityStatus::Active),
        ("Kate Brown", "Training", "Training Coordinator", IdentityStatus::Active),
        ("Leo Rodriguez", "Quality", "Quality Assurance", IdentityStatus::Inactive),
        ("Maya Patel", "Product", "Product Manager", IdentityStatus::Active),
        ("Nathan Clark", "Security", "Security Analyst", IdentityStatus::Active),
        ("Olivia Johnson", "Communications", "Communications Manager", IdentityStatus::Active),
    ];

    PEOPLE
        .iter()
        .enumerate()
        .map(|(i, (name, department, position, status))| Identity {
            id: format!("user-{}", 101 + i),
            nip: format!("{:05}", 3001 + i),
            name: name.to_string(),
            email: email_for(name, "company.com"),
            department: department.to_string(),
            position: position.to_string(),
            status: *status,
            application_ids: Vec::new(),
            role_ids: Vec::new(),
            permission_ids: Vec::new(),
            last_login: None,
            created_at: date(2024, 1, 1 + i as u32),
        })
        .collect()
}

/// "Mary Ann Lee" -> "mary.ann.lee@domain"
fn email_for(name: &str, domain: &str) -> String {
    let local: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
    format!("{}@{}", local.join("."), domain)
}

pub fn groups() -> Vec<Group> {
    let group = |id: &str, name: &str, created_by: &str, status, created_at, description: &str, members: &[usize]| Group {
        id: id.to_string(),
        name: name.to_string(),
        created_by: created_by.to_string(),
        status,
        created_at,
        description: description.to_string(),
        member_ids: ids(members.iter().copied()),
    };
    vec![
        group("1", "HR Department", "John Anderson", Activity::Active, date(2023, 1, 15), "Human Resources team members", &[1, 2]),
        group("2", "Finance Team", "Sarah Johnson", Activity::Active, date(2023, 2, 20), "Financial management and accounting team", &[2, 3]),
        group("3", "Project Managers", "Michael Chen", Activity::Active, date(2023, 3, 10), "Project management team leads", &[2, 4, 6, 8]),
        group("4", "Developers", "Emily Davis", Activity::Active, date(2023, 4, 5), "Software development team", &[1, 3, 5, 7]),
        group("5", "Analysts", "David Wilson", Activity::Inactive, date(2023, 5, 12), "Data and business analysts", &[5]),
        group("6", "Operations", "Lisa Rodriguez", Activity::Active, date(2023, 6, 18), "Operations and maintenance team", &[6, 7]),
    ]
}

/// Application permission rows; every seventh one carries no role
pub fn grant_catalog(applications: &[Application], count: usize) -> Vec<PermissionGrant> {
    if applications.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|i| PermissionGrant {
            id: format!("perm-{}", i + 1),
            name: format!(
                "{} {}",
                PERMISSION_TYPES[i % PERMISSION_TYPES.len()],
                i / PERMISSION_TYPES.len() + 1
            ),
            role: if i % 7 == 6 {
                String::new()
            } else {
                GRANT_ROLES[i % GRANT_ROLES.len()].to_string()
            },
            description: GRANT_DESCRIPTIONS[i % GRANT_DESCRIPTIONS.len()].to_string(),
            application: applications[i % applications.len()].name.clone(),
            group: GRANT_GROUPS[i % GRANT_GROUPS.len()].to_string(),
        })
        .collect()
}

/// The permissions a task asks for
pub fn requested_permissions(count: usize) -> Vec<RequestedPermission> {
    (0..count)
        .map(|i| RequestedPermission {
            permission: format!(
                "{} {}",
                PERMISSION_TYPES[i % PERMISSION_TYPES.len()],
                i / PERMISSION_TYPES.len() + 1
            ),
            role: GRANT_ROLES[i % GRANT_ROLES.len()].to_string(),
            description: GRANT_DESCRIPTIONS[i % GRANT_DESCRIPTIONS.len()].to_string(),
        })
        .collect()
}

pub fn tasks() -> Vec<Task> {
    let task = |n: usize, requester: &str, identity: &str, nip: &str, application: &str, status, requested: &str, reviewed: Option<&str>| Task {
        id: n.to_string(),
        request_id: format!("REQ-2024-{:03}", n),
        requester_name: requester.to_string(),
        requester_email: email_for(requester, "company.com"),
        identity_name: identity.to_string(),
        identity_nip: nip.to_string(),
        requested_permissions: requested_permissions(50),
        application: application.to_string(),
        status,
        request_date: at(requested),
        review_date: reviewed.map(at),
        rejection_reason: None,
    };
    vec![
        task(1, "Sarah Johnson", "Michael Chen", "02156", "HR Management System", TaskStatus::Pending, "2024-12-15T09:30:00Z", None),
        task(2, "David Wilson", "Emily Davis", "02234", "Project Management Tool", TaskStatus::Pending, "2024-12-14T14:15:00Z", None),
        task(3, "Jennifer Brown", "Robert Taylor", "02890", "Document Management", TaskStatus::Approved, "2024-12-13T11:20:00Z", Some("2024-12-14T08:45:00Z")),
        task(4, "Lisa Rodriguez", "John Anderson", "02001", "Analytics Dashboard", TaskStatus::Rejected, "2024-12-12T16:30:00Z", Some("2024-12-13T10:15:00Z")),
    ]
}

/// Newest first, as the audit trail shows them
pub fn audit_logs() -> Vec<AuditLog> {
    const WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
    const MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

    let log = |n: usize, timestamp: &str, user: &str, action: &str, resource: &str, details: &str, user_agent: &str, status| AuditLog {
        id: n.to_string(),
        timestamp: at(timestamp),
        user: user.to_string(),
        action: action.to_string(),
        resource: resource.to_string(),
        details: details.to_string(),
        ip_address: format!("192.168.1.{}", 99 + n),
        user_agent: user_agent.to_string(),
        status,
    };
    vec![
        log(1, "2024-12-15T10:30:00Z", "John Anderson", "Login", "Authentication System", "User successfully logged in", WINDOWS, AuditStatus::Success),
        log(2, "2024-12-15T10:25:00Z", "Sarah Johnson", "Permission Grant", "HR Management System", "Granted User Management permission to Michael Chen", MAC, AuditStatus::Success),
        log(3, "2024-12-15T10:20:00Z", "David Wilson", "Failed Login", "Authentication System", "Invalid password attempt", WINDOWS, AuditStatus::Failed),
        log(4, "2024-12-15T10:15:00Z", "Emily Davis", "Role Assignment", "Project Management Tool", "Assigned Project Manager role to Robert Taylor", WINDOWS, AuditStatus::Success),
        log(5, "2024-12-15T10:10:00Z", "Lisa Rodriguez", "Application Access", "Finance Portal", "Accessed financial reports dashboard", MAC, AuditStatus::Success),
        log(6, "2024-12-15T10:05:00Z", "Robert Taylor", "Password Change", "User Profile", "User changed password successfully", WINDOWS, AuditStatus::Success),
        log(7, "2024-12-15T10:00:00Z", "Jennifer Brown", "Permission Revoke", "Document Management", "Revoked File Delete permission from user", MAC, AuditStatus::Warning),
        log(8, "2024-12-15T09:55:00Z", "Michael Chen", "System Configuration", "Security Settings", "Updated password policy requirements", WINDOWS, AuditStatus::Success),
    ]
}

/// Newest first
pub fn sync_history() -> Vec<SyncRun> {
    let run = |n: usize, date: &str, status, total, synced, failed, duration_secs, source, details: &str| SyncRun {
        id: n.to_string(),
        date: at(date),
        status,
        total_identities: total,
        synced_identities: synced,
        failed_identities: failed,
        duration_secs,
        source,
        details: details.to_string(),
    };
    vec![
        run(1, "2024-12-15T02:00:00Z", SyncStatus::Success, 1250, 1250, 0, 165, SyncSource::Scheduled, "All identities synchronized successfully"),
        run(2, "2024-12-14T02:00:00Z", SyncStatus::Partial, 1248, 1245, 3, 192, SyncSource::Scheduled, "3 identities failed due to invalid email format"),
        run(3, "2024-12-13T14:30:00Z", SyncStatus::Success, 1248, 1248, 0, 158, SyncSource::Manual, "Manual sync completed successfully"),
        run(4, "2024-12-13T02:00:00Z", SyncStatus::Failed, 1248, 0, 1248, 15, SyncSource::Scheduled, "Connection to Active Directory failed"),
        run(5, "2024-12-12T02:00:00Z", SyncStatus::Success, 1246, 1246, 0, 172, SyncSource::Scheduled, "All identities synchronized successfully"),
        run(6, "2024-12-11T02:00:00Z", SyncStatus::Success, 1244, 1244, 0, 161, SyncSource::Scheduled, "All identities synchronized successfully"),
        run(7, "2024-12-10T02:00:00Z", SyncStatus::Partial, 1242, 1240, 2, 185, SyncSource::Scheduled, "2 identities failed due to duplicate NIP"),
    ]
}

/// Employees that interns and trainees can report to; their NIPs have no letters
pub fn direct_leaders() -> Vec<DirectLeader> {
    let leader = |nip: &str, name: &str, position: &str, unit: &str| DirectLeader {
        nip: nip.to_string(),
        name: name.to_string(),
        email: email_for(name, "banksinarmas.com"),
        position: position.to_string(),
        organization_unit: unit.to_string(),
    };
    vec![
        leader("001", "John Anderson", "Department Head", "Software Development"),
        leader("002", "Sarah Johnson", "Division Head", "Project Management"),
        leader("003", "Michael Chen", "Section Head", "Quality Assurance"),
        leader("004", "Emily Davis", "Team Lead", "Human Resources"),
        leader("005", "David Wilson", "Manager", "Finance"),
    ]
}

/// Generates `count` reproducible fake identities for large-directory scenarios
pub fn synthetic_identities(count: usize, seed: u64) -> Vec<Identity> {
    const DEPARTMENTS: [&str; 2] = ["SDE", "PM"];
    const POSITIONS: [&str; 4] = ["staff", "section head", "division head", "department head"];

    let mut rng = StdRng::seed_from_u64(seed);
    let identities: Vec<Identity> = (0..count)
        .map(|i| {
            let first: String = FirstName().fake_with_rng(&mut rng);
            let last: String = LastName().fake_with_rng(&mut rng);
            let name = format!("{} {}", first, last);
            let status = match rng.random_range(0..10) {
                0 => IdentityStatus::Inactive,
                1 => IdentityStatus::Suspended,
                _ => IdentityStatus::Active,
            };
            Identity {
                id: format!("syn-{}", i + 1),
                nip: format!("9{:04}", i + 1),
                email: email_for(&name, "company.com"),
                name,
                department: DEPARTMENTS[rng.random_range(0..DEPARTMENTS.len())].to_string(),
                position: POSITIONS[rng.random_range(0..POSITIONS.len())].to_string(),
                status,
                application_ids: Vec::new(),
                role_ids: Vec::new(),
                permission_ids: Vec::new(),
                last_login: None,
                created_at: date(2024, 1 + rng.random_range(0..12), 1 + rng.random_range(0..28)),
            }
        })
        .collect();

    debug!("Generated {} synthetic identities (seed {})", count, seed);
    identities
}

/// The seeded directory the dashboard starts from
pub fn mock_directory() -> Directory {
    let applications = applications();
    let catalog = grant_catalog(&applications, GRANT_CATALOG_SIZE);
    let groups = groups();
    let identities = identities();

    let initial: Vec<String> = catalog
        .iter()
        .take(INITIAL_ASSIGNMENTS)
        .map(|grant| grant.id.clone())
        .collect();
    let mut targets: Vec<GrantTarget> = groups
        .iter()
        .map(|g| GrantTarget::Group(g.id.clone()))
        .collect();
    targets.extend(
        identities
            .iter()
            .filter(|i| !i.role_ids.is_empty())
            .map(|i| GrantTarget::Identity(i.id.clone())),
    );

    let mut directory = Directory::default();
    directory.identities = identities;
    directory.groups = groups;
    directory.applications = applications;
    directory.components = components();
    directory.roles = roles();
    directory.permissions = permissions();
    directory.grant_catalog = catalog;
    directory.tasks = tasks();
    directory.audit_logs = audit_logs();
    directory.sync_history = sync_history();
    directory.direct_leaders = direct_leaders();
    for target in targets {
        directory.grant(target, initial.iter().cloned());
    }
    directory
}
