//! Error types for the postcode lookup client.
//!
//! # Design
//! A failed lookup is either a dispatch failure (no usable body came back:
//! the connection failed or the service answered with a non-2xx status) or a
//! decode failure (a body arrived but is not a postcode record). Locator
//! construction errors are kept apart as `MalformedRequest` because they point
//! at the caller's input, not at the service. `FetchError` wraps whichever of
//! these stopped a batch together with the zip that caused it.

use thiserror::Error;

use crate::types::Country;

/// Boxed transport error. ureq, reqwest and tokio each bring their own.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned while building, dispatching or decoding a single lookup.
#[derive(Error, Debug)]
pub enum TransformError {
    /// The locator for a zip could not be built.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The request never produced a usable body.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be decoded into the expected shape.
    #[error("decode failure: {0}")]
    Decode(#[source] serde_json::Error),
}

impl TransformError {
    pub(crate) fn transport<E: Into<BoxError>>(error: E) -> Self {
        TransformError::Transport(error.into())
    }

    /// True when no body was received (connection, I/O or status failure).
    pub fn is_dispatch(&self) -> bool {
        matches!(self, TransformError::Transport(_) | TransformError::Status { .. })
    }

    /// True when a body was received but did not decode.
    pub fn is_decode(&self) -> bool {
        matches!(self, TransformError::Decode(_))
    }

    /// The service answers 404 for zips it does not know.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransformError::Status { status: 404, .. })
    }
}

/// A batch fetch stopped at the zip at `index`.
#[derive(Error, Debug)]
#[error("lookup of {zip:?} ({country}, position {index}) failed: {source}")]
pub struct FetchError {
    pub country: Country,
    pub zip: String,
    pub index: usize,
    #[source]
    pub source: TransformError,
}

/// Invalid configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown transform strategy {0:?} (expected buffered, future or streaming)")]
    UnknownStrategy(String),

    #[error("unknown country code {0:?}")]
    UnknownCountry(String),
}
