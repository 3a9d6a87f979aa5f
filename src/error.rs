//! # Error Types
//!
//! This module defines error types used throughout the laurel library.
//!
//! All failures propagate to the caller; the library never retries. The one
//! deliberate silent case is substituting into a document with no name-role
//! field, which is a no-op by contract (see [`crate::document::substitute`]).

use thiserror::Error;

/// Main error type for laurel operations
#[derive(Debug, Error)]
pub enum LaurelError {
    /// Invalid input: empty participant list, empty template name,
    /// ambiguous name-role tagging, zero quality multiplier
    #[error("validation error: {0}")]
    Validation(String),

    /// A template name absent from the store, surfaced by callers that
    /// require the template to exist
    #[error("template '{0}' not found")]
    TemplateNotFound(String),

    /// Image decode, rasterization, or output encoding failure
    #[error("render error: {0}")]
    Render(String),

    /// Underlying template or blob store unavailable
    #[error("persistence error: {0}")]
    Persistence(String),

    /// An in-flight batch was abandoned via its cancellation token
    #[error("export cancelled")]
    Cancelled,

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
