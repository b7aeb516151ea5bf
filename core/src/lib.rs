//! Postcode lookups against the zippopotam.us service.
//!
//! # Overview
//! `ZippoClient` turns `(Country, zip)` pairs into lookup URLs, dispatches
//! them one by one and decodes each JSON answer into a `PostcodeRecord`.
//!
//! # Design
//! - How a response becomes a record is a `ResponseTransform` strategy picked
//!   when the client is built: `BufferedTransform` (blocking, then parse),
//!   `FutureTransform` (async request, parse as continuation, caller waits)
//!   or `StreamingTransform` (parse straight from the body reader).
//! - All strategies share one decoder (`codec`) and one error type
//!   (`TransformError`), so they are observably interchangeable.
//! - Batches are fail-fast and preserve input order.
//! - The library logs through `tracing` and never installs a subscriber.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod transform;
pub mod types;

pub use client::ZippoClient;
pub use config::{Strategy, ZippoConfig};
pub use error::{ConfigError, FetchError, TransformError};
pub use http::{RequestBuilder, DEFAULT_BASE_URL};
pub use transform::{BufferedTransform, FutureTransform, ResponseTransform, StreamingTransform};
pub use types::{Country, Place, PostcodeRecord};
