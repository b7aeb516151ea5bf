//! Interchangeable strategies for turning a lookup response into a record.
//!
//! # Design
//! Every strategy implements the one-method `ResponseTransform` trait, so a
//! `ZippoClient` is generic over the strategy it was constructed with. The
//! strategies differ only in when and where the body is decoded:
//!
//! - `BufferedTransform` blocks on the request, reads the whole body into
//!   memory, then decodes it.
//! - `FutureTransform` dispatches a non-blocking request on its own tokio
//!   runtime; decoding is the continuation of the body future and may run on
//!   a runtime worker. The caller still waits for the combined result.
//! - `StreamingTransform` hands the body reader straight to the decoder, so
//!   the record is produced while the body is read.
//!
//! All three decode through `codec` and report failures the same way.

use tracing::debug;
use url::Url;

use crate::codec::{decode_reader, decode_slice};
use crate::error::TransformError;
use crate::http::{blocking_agent, check_status, is_success};
use crate::types::PostcodeRecord;

/// Turns a dispatched lookup into a `PostcodeRecord`.
pub trait ResponseTransform: Send + Sync {
    fn transform(&self, locator: &Url) -> Result<PostcodeRecord, TransformError>;
}

impl<T: ResponseTransform + ?Sized> ResponseTransform for Box<T> {
    fn transform(&self, locator: &Url) -> Result<PostcodeRecord, TransformError> {
        (**self).transform(locator)
    }
}

/// Blocking request, whole body buffered, decoded afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedTransform;

impl ResponseTransform for BufferedTransform {
    fn transform(&self, locator: &Url) -> Result<PostcodeRecord, TransformError> {
        debug!("buffered lookup: GET {locator}");
        let mut response = blocking_agent()
            .get(locator.as_str())
            .call()
            .map_err(TransformError::transport)?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(TransformError::transport)?;
        check_status(status, &body)?;

        decode_slice(&body)
    }
}

/// Non-blocking request on a private runtime; decoding runs as the
/// continuation of the body future.
///
/// `transform` blocks the calling thread on the runtime, and dropping the
/// transform shuts the runtime down, so neither may happen within an async
/// context; both panic there. This includes dropping a `ZippoClient` that
/// owns a `FutureTransform`.
#[derive(Debug)]
pub struct FutureTransform {
    runtime: tokio::runtime::Runtime,
}

impl FutureTransform {
    pub fn new() -> Result<Self, TransformError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("zippo-future")
            .enable_all()
            .build()
            .map_err(TransformError::transport)?;
        Ok(Self { runtime })
    }
}

impl ResponseTransform for FutureTransform {
    fn transform(&self, locator: &Url) -> Result<PostcodeRecord, TransformError> {
        debug!("future lookup: GET {locator}");
        let pending = self.runtime.spawn(fetch_then_decode(locator.clone()));
        // A JoinError means the task panicked or was cancelled before a body
        // could be handed back.
        self.runtime
            .block_on(pending)
            .map_err(TransformError::transport)?
    }
}

async fn fetch_then_decode(locator: Url) -> Result<PostcodeRecord, TransformError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(TransformError::transport)?;
    let response = client
        .get(locator)
        .send()
        .await
        .map_err(TransformError::transport)?;

    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(TransformError::transport)?;
    check_status(status, &body)?;

    decode_slice(&body)
}

/// Blocking request whose body reader feeds the decoder directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingTransform;

impl ResponseTransform for StreamingTransform {
    fn transform(&self, locator: &Url) -> Result<PostcodeRecord, TransformError> {
        debug!("streaming lookup: GET {locator}");
        let mut response = blocking_agent()
            .get(locator.as_str())
            .call()
            .map_err(TransformError::transport)?;

        let status = response.status().as_u16();
        if !is_success(status) {
            let body = response
                .body_mut()
                .read_to_vec()
                .map_err(TransformError::transport)?;
            check_status(status, &body)?;
        }

        decode_reader(response.into_body().into_reader())
    }
}
