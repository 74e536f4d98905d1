use gatekeeper::fixtures::{mock_directory, synthetic_identities};
use gatekeeper::interchange::{self, CsvRow, PermissionExportRow};
use gatekeeper::listings;
use gatekeeper::models::{Identity, PermissionGrant};
use gatekeeper::Directory;
use gatekeeper_query::{FilteredPageModel, Record};
use serde::Serialize;
use shared::config::{Config, View};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Page buttons shown around the current page
const PAGE_BUTTONS: usize = 5;

#[derive(Debug, Serialize)]
struct IdentityExportRow {
    nip: String,
    name: String,
    email: String,
    department: String,
    position: String,
    status: String,
}

impl CsvRow for IdentityExportRow {
    const HEADER: &'static [&'static str] = &["nip", "name", "email", "department", "position", "status"];
}

impl From<&Identity> for IdentityExportRow {
    fn from(identity: &Identity) -> Self {
        Self {
            nip: identity.nip.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            department: identity.department.clone(),
            position: identity.position.clone(),
            status: identity.status.as_str().to_string(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Gatekeeper console");

    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();
    let directory = build_directory(&config);

    let stats = directory.dashboard_stats();
    info!(
        "Directory ready: {} users ({} active), {} groups, {} applications",
        stats.total_users,
        stats.active_users,
        stats.total_groups,
        directory.applications.len()
    );

    match config.view {
        View::Identities => {
            let listing = render(listings::identities(&directory, config.page_size)?, &config)?;
            export(&listing, &config, |i: &Identity| IdentityExportRow::from(i))?;
        }
        View::Permissions => {
            let listing = render(listings::permission_catalog(&directory, config.page_size)?, &config)?;
            export(&listing, &config, |g: &PermissionGrant| PermissionExportRow {
                application_name: g.application.clone(),
                permission_name: g.name.clone(),
                role_name: g.role.clone(),
            })?;
        }
        View::Groups => no_export(render(listings::groups(&directory, config.page_size)?, &config)?, &config),
        View::Applications => no_export(render(listings::applications(&directory, config.page_size)?, &config)?, &config),
        View::Tasks => no_export(render(listings::tasks(&directory, config.page_size)?, &config)?, &config),
        View::Audit => no_export(render(listings::audit_trail(&directory, config.page_size)?, &config)?, &config),
        View::Sync => no_export(render(listings::sync_history(&directory, config.page_size)?, &config)?, &config),
    }

    Ok(())
}

fn build_directory(config: &Config) -> Directory {
    let mut directory = mock_directory();
    if config.synthetic_identities > 0 {
        directory
            .identities
            .extend(synthetic_identities(config.synthetic_identities, config.seed));
        info!(
            "Added {} synthetic identities (seed {})",
            config.synthetic_identities, config.seed
        );
    }
    directory
}

/// Views without an export format
fn no_export<T: Record>(_: FilteredPageModel<T>, config: &Config) {
    if config.export_path.is_some() {
        warn!("Nothing to export for this view");
    }
}

/// Applies the configured search, filters and page and prints the visible page as JSON
fn render<T>(mut listing: FilteredPageModel<T>, config: &Config) -> Result<FilteredPageModel<T>, Box<dyn std::error::Error>>
where
    T: Record + Serialize,
{
    listing.set_search_term(config.search.as_str());
    for (name, value) in &config.filters {
        listing.set_category_filter(name, value.as_str())?;
    }
    let shown = listing.go_to_page(config.page);
    if !listing.is_open() {
        warn!("Listing is empty until its required filters are chosen");
    }

    let page = listing.visible_page();
    let output = serde_json::json!({
        "view": format!("{:?}", config.view).to_lowercase(),
        "filters": listing.filter_state(),
        "showing": page.range(),
        "buttons": page.window(PAGE_BUTTONS),
        "has_previous": page.has_previous(),
        "has_next": page.has_next(),
        "page": page,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    info!(
        "Page {} of {} ({} matching records)",
        shown,
        listing.total_pages(),
        listing.filtered_count()
    );
    Ok(listing)
}

/// Writes the export rows when an export path is configured
fn export<T, R, F>(listing: &FilteredPageModel<T>, config: &Config, to_row: F) -> Result<(), Box<dyn std::error::Error>>
where
    T: Record,
    R: CsvRow,
    F: Fn(&T) -> R,
{
    let Some(path) = &config.export_path else {
        return Ok(());
    };
    let rows: Vec<R> = listing.export_rows().into_iter().map(to_row).collect();
    let written = interchange::write_rows(path, &rows)?;
    info!("Exported {} rows", written);
    Ok(())
}
