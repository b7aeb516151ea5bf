//! Locator construction and status handling shared by the transports.
//!
//! # Design
//! `RequestBuilder` parses the service base once and derives one `Url` per
//! `(country, zip)` pair. The zip is pushed as a single path segment, which
//! percent-encodes everything that could otherwise split or terminate the
//! path (`/`, `%`, `?`, `#`, spaces). Tab, LF and CR are stripped by URL
//! parsing rather than encoded, so zips containing them are rejected.

use url::Url;

use crate::error::TransformError;
use crate::types::Country;

/// Base URL of the public zippopotam.us service.
pub const DEFAULT_BASE_URL: &str = "http://api.zippopotam.us";

/// Builds lookup locators of the form `{base}/{country-code}/{zip}`.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base: Url,
}

impl RequestBuilder {
    pub fn new(base_url: &str) -> Result<Self, TransformError> {
        let base = Url::parse(base_url)
            .map_err(|e| TransformError::MalformedRequest(format!("invalid base URL {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(TransformError::MalformedRequest(format!(
                "base URL {base_url:?} cannot carry a path"
            )));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn build(&self, country: Country, zip: &str) -> Result<Url, TransformError> {
        // The url crate silently drops dot-segments and strips tab/LF/CR,
        // either of which would address a different resource.
        if zip.is_empty() || zip == "." || zip == ".." {
            return Err(TransformError::MalformedRequest(format!(
                "zip {zip:?} is not a usable path segment"
            )));
        }
        if zip.contains(['\t', '\n', '\r']) {
            return Err(TransformError::MalformedRequest(format!(
                "zip {zip:?} contains a tab or line break"
            )));
        }

        let mut locator = self.base.clone();
        locator
            .path_segments_mut()
            .map_err(|()| TransformError::MalformedRequest(format!("{} cannot carry a path", self.base)))?
            .pop_if_empty()
            .push(country.code())
            .push(zip);
        Ok(locator)
    }
}

pub(crate) fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Map non-success status codes to `TransformError::Status`. The body is
/// kept as lossy UTF-8 text.
pub(crate) fn check_status(status: u16, body: &[u8]) -> Result<(), TransformError> {
    if is_success(status) {
        return Ok(());
    }
    Err(TransformError::Status {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Agent for a single blocking lookup.
///
/// Status codes are returned as data so the transforms can report them as
/// `TransformError::Status` with the body attached.
pub(crate) fn blocking_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}
