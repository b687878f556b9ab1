//! Error types for setting up a search session.
//!
//! The search pipeline itself never fails: missing title, description, source,
//! timestamp or details elements degrade to empty values. Errors only surface
//! while loading configuration, attaching to a page, or doing file I/O in the
//! command-line tool.

use thiserror::Error;

/// Errors raised while configuring or attaching a [`crate::NewsSearch`].
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Required element #{0} not found in page")]
    MissingElement(String),

    #[error("Page size must be at least 1")]
    InvalidPageSize,
}

pub type Result<T> = std::result::Result<T, SearchError>;
