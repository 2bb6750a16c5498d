//! Supported provider accounts.
//!
//! The provider runs one account per country. Each account has its own API
//! credentials and its own webhook endpoint, so the country is known from the
//! route or from the credential in use, never from the payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// A provider account country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    /// Denmark (`DK`).
    Dk,
    /// Sweden (`SE`).
    Se,
    /// Norway (`NO`).
    No,
}

impl Country {
    /// All supported countries, in backfill order.
    pub const ALL: [Country; 3] = [Country::Dk, Country::Se, Country::No];

    /// ISO 3166-1 alpha-2 code as stored in the database.
    pub fn code(&self) -> &'static str {
        match self {
            Country::Dk => "DK",
            Country::Se => "SE",
            Country::No => "NO",
        }
    }

    /// Path segment of the country's webhook endpoint.
    pub fn webhook_slug(&self) -> &'static str {
        match self {
            Country::Dk => "denmark",
            Country::Se => "sweden",
            Country::No => "norway",
        }
    }
}

impl FromStr for Country {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DK" => Ok(Country::Dk),
            "SE" => Ok(Country::Se),
            "NO" => Ok(Country::No),
            _ => Err(ValidationError::UnsupportedCountry(s.to_string())),
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
