//! JSON decoding shared by every transform.
//!
//! `decode_slice` works on a fully buffered body; `decode_reader` pulls the
//! body from a reader as it arrives. Both classify a serde_json failure the
//! same way: an I/O error while reading means the body never arrived intact
//! (transport), anything else means the body has the wrong shape (decode).

use std::io::{BufReader, Read};

use serde::de::DeserializeOwned;

use crate::error::TransformError;

pub fn decode_slice<T: DeserializeOwned>(body: &[u8]) -> Result<T, TransformError> {
    serde_json::from_slice(body).map_err(classify)
}

pub fn decode_reader<T: DeserializeOwned, R: Read>(body: R) -> Result<T, TransformError> {
    serde_json::from_reader(BufReader::new(body)).map_err(classify)
}

fn classify(error: serde_json::Error) -> TransformError {
    if error.is_io() {
        TransformError::transport(error)
    } else {
        TransformError::Decode(error)
    }
}
