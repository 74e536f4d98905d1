// shared/src/lib.rs

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    #[error("invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(usize),
    #[error("not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
