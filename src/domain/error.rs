//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Errors raised for caller misuse of the tree builder.
///
/// Malformed GEDCOM content never surfaces here: the parser records such
/// problems as warnings in its outcome envelope instead of failing.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("individual not found: {0}")]
    RootNotFound(String),

    #[error("unknown tree type: {0} (expected ancestors, descendants or both)")]
    UnknownTreeType(String),
}
