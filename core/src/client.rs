//! Batch lookups of postcodes for one country.
//!
//! # Design
//! `ZippoClient` holds a `RequestBuilder` and the `ResponseTransform` chosen
//! at construction time, and nothing else. A batch is processed zip by zip in
//! input order: each lookup completes before the next is dispatched, so the
//! result needs no reassembly. The first failure ends the batch and is
//! returned with the zip that caused it; records fetched before it are
//! dropped.

use tracing::{debug, info, warn};

use crate::config::ZippoConfig;
use crate::error::{FetchError, TransformError};
use crate::http::RequestBuilder;
use crate::transform::ResponseTransform;
use crate::types::{Country, PostcodeRecord};

#[derive(Debug)]
pub struct ZippoClient<T> {
    builder: RequestBuilder,
    transform: T,
}

impl<T: ResponseTransform> ZippoClient<T> {
    pub fn new(builder: RequestBuilder, transform: T) -> Self {
        Self { builder, transform }
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Look up every zip in `zips` for `country`, in order.
    pub fn fetch_country_data<S: AsRef<str>>(
        &self,
        country: Country,
        zips: &[S],
    ) -> Result<Vec<PostcodeRecord>, FetchError> {
        info!("fetching {} zip(s) for {country}", zips.len());
        let mut records = Vec::with_capacity(zips.len());

        for (index, zip) in zips.iter().enumerate() {
            let zip = zip.as_ref();
            let record = self
                .builder
                .build(country, zip)
                .and_then(|locator| self.transform.transform(&locator))
                .map_err(|source| {
                    warn!("lookup of {zip:?} for {country} failed, abandoning batch: {source}");
                    FetchError {
                        country,
                        zip: zip.to_string(),
                        index,
                        source,
                    }
                })?;
            debug!("decoded {zip:?}: {} place(s)", record.places.len());
            records.push(record);
        }

        info!("fetched {} record(s) for {country}", records.len());
        Ok(records)
    }

    /// Run `fetch_country_data` for each country in turn, stopping at the
    /// first failure.
    pub fn fetch_all<S: AsRef<str>>(
        &self,
        requests: &[(Country, Vec<S>)],
    ) -> Result<Vec<(Country, Vec<PostcodeRecord>)>, FetchError> {
        requests
            .iter()
            .map(|(country, zips)| -> Result<_, FetchError> {
                Ok((*country, self.fetch_country_data(*country, zips)?))
            })
            .collect()
    }
}

impl ZippoClient<Box<dyn ResponseTransform>> {
    /// Build a client for the configured base URL and strategy.
    pub fn from_config(config: &ZippoConfig) -> Result<Self, TransformError> {
        let builder = RequestBuilder::new(&config.base_url)?;
        let transform = config.strategy.build()?;
        debug!("client for {} using {} transform", builder.base(), config.strategy);
        Ok(Self::new(builder, transform))
    }
}
