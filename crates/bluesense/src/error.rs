//! Error types for the link-layer driver boundary
//!
//! This module defines the error type drivers report back through the
//! [`LinkLayer`](crate::link::LinkLayer) trait.

use thiserror::Error;

/// Errors a link-layer driver can report for a requested operation.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("driver I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("no such connection handle: {0}")]
    UnknownConnection(u16),

    #[error("no such attribute handle: {0}")]
    UnknownHandle(u16),

    #[error("radio is busy with another operation")]
    Busy,

    #[error("request rejected by the controller: {0}")]
    Rejected(String),

    #[error("unsupported operation")]
    Unsupported,
}
