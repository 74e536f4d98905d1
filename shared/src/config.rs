use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Which listing the console renders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Identities,
    Groups,
    Applications,
    Tasks,
    Audit,
    Sync,
    Permissions,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identities" | "identity" | "users" => Ok(View::Identities),
            "groups" | "group" => Ok(View::Groups),
            "applications" | "apps" | "setup" => Ok(View::Applications),
            "tasks" | "task" => Ok(View::Tasks),
            "audit" | "audit-trails" => Ok(View::Audit),
            "sync" | "identity-sync" => Ok(View::Sync),
            "permissions" | "permission" => Ok(View::Permissions),
            other => Err(format!("unknown view '{}'", other)),
        }
    }
}

pub struct Config {
    pub view: View,
    pub search: String,
    pub filters: Vec<(String, String)>,
    pub page: usize,
    pub page_size: usize,
    pub synthetic_identities: usize,
    pub seed: u64,
    pub export_path: Option<PathBuf>,
}

impl Config {
    const DEFAULT_PAGE_SIZE: usize = 20;
    const DEFAULT_SEED: u64 = 42;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let view = match lookup("GATEKEEPER_VIEW") {
            Some(raw) => raw.parse::<View>().unwrap_or_else(|e| {
                warn!("{}, falling back to identities", e);
                View::Identities
            }),
            None => View::Identities,
        };

        Self {
            view,
            search: lookup("GATEKEEPER_SEARCH").unwrap_or_default(),
            filters: lookup("GATEKEEPER_FILTERS")
                .map(|raw| parse_filters(&raw))
                .unwrap_or_default(),
            page: parse_or("GATEKEEPER_PAGE", lookup("GATEKEEPER_PAGE"), 1),
            page_size: parse_or(
                "GATEKEEPER_PAGE_SIZE",
                lookup("GATEKEEPER_PAGE_SIZE"),
                Self::DEFAULT_PAGE_SIZE,
            ),
            synthetic_identities: parse_or(
                "GATEKEEPER_SYNTHETIC_IDENTITIES",
                lookup("GATEKEEPER_SYNTHETIC_IDENTITIES"),
                0,
            ),
            seed: parse_or("GATEKEEPER_SEED", lookup("GATEKEEPER_SEED"), Self::DEFAULT_SEED),
            export_path: lookup("GATEKEEPER_EXPORT_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("{} has malformed value '{}', using default", key, value);
            default
        }),
        None => default,
    }
}

/// Parses `status=active,role=Manager` into ordered pairs, skipping malformed entries
pub fn parse_filters(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let pair = pair.trim();
            if pair.is_empty() {
                return None;
            }
            match pair.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Some((name.trim().to_string(), value.trim().to_string()))
                }
                _ => {
                    warn!("ignoring malformed filter '{}'", pair);
                    None
                }
            }
        })
        .collect()
}
