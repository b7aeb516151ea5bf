//! Domain DTOs for the postcode lookup service.
//!
//! # Design
//! The wire format uses keys with embedded spaces (`"post code"`,
//! `"place name"`, ...); serde renames map them onto plain field names.
//! Latitude and longitude stay as the raw text the service sends. Optional
//! text fields never surface as `None`: an absent or `null` value decodes to
//! an empty string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Countries the client knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Country {
    Germany,
    Denmark,
    Netherlands,
}

impl Country {
    pub const ALL: [Country; 3] = [Country::Germany, Country::Denmark, Country::Netherlands];

    /// Two-letter lowercase code used in the locator path.
    pub fn code(self) -> &'static str {
        match self {
            Country::Germany => "de",
            Country::Denmark => "dk",
            Country::Netherlands => "nl",
        }
    }

    /// Name as reported by the service in the `"country"` field.
    pub fn name(self) -> &'static str {
        match self {
            Country::Germany => "Germany",
            Country::Denmark => "Denmark",
            Country::Netherlands => "Netherlands",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::ALL
            .into_iter()
            .find(|country| country.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownCountry(s.to_string()))
    }
}

/// A single place sharing a postcode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Place {
    #[serde(rename = "place name", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub latitude: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub longitude: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(rename = "state abbreviation", default, deserialize_with = "null_as_empty")]
    pub state_abbreviation: String,
}

/// Everything the service knows about one postcode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostcodeRecord {
    #[serde(rename = "post code", deserialize_with = "non_empty")]
    pub postcode: String,
    #[serde(deserialize_with = "non_empty")]
    pub country: String,
    #[serde(rename = "country abbreviation", default, deserialize_with = "null_as_empty")]
    pub country_abbreviation: String,
    #[serde(default, deserialize_with = "null_as_empty_list")]
    pub places: Vec<Place>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Place>, D::Error> {
    Ok(Option::<Vec<Place>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&value),
            &"a non-empty string",
        ));
    }
    Ok(value)
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.latitude, self.longitude)?;
        if !self.state.is_empty() {
            write!(f, " {}", self.state)?;
        }
        if !self.state_abbreviation.is_empty() {
            write!(f, " [{}]", self.state_abbreviation)?;
        }
        Ok(())
    }
}

impl fmt::Display for PostcodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Country  : {}", self.country)?;
        writeln!(f, "Postcode : {}", self.postcode)?;
        write!(f, "Places   : [")?;
        for (i, place) in self.places.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{place}")?;
        }
        writeln!(f, "]")
    }
}
