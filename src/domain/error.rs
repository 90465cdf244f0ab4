// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No response was received: connection failure, DNS, timeout.
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Client-side field validation failed; never reaches the network.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The server refused a create payload.
    #[error("Note rejected: {0}")]
    Rejected(String),
    #[error("Note not found: {0}")]
    NotFound(u64),
}
