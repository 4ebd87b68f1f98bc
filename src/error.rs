//! Error types for phpIPAM client operations.
//!
//! Every failure the client can hit is a variant of [`IpamError`], built with
//! `thiserror` so callers can match on the class of failure and still get a
//! readable `Display` message.

use std::num::ParseIntError;

use thiserror::Error;

use crate::subnets::Subnet;

/// Custom error type for phpIPAM operations.
///
/// # Rust Concepts
/// - `#[derive(Error)]` from `thiserror` auto-implements `std::error::Error`
/// - `#[error("...")]` defines the Display message for each variant
/// - `#[from]` implements `From<T>` so `?` converts transport and JSON errors
/// - `#[source]` exposes a wrapped error without generating a `From` impl
#[derive(Debug, Error)]
pub enum IpamError {
    /// Transport failure: connection refused, TLS, timeout, body read.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// A header value (token) could not be encoded.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The response body is not a valid API envelope.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Missing or malformed client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The outer API envelope reported `success: false`.
    #[error("Error from API ({code}): {message}")]
    Api { code: i64, message: String },

    /// The search section returned a non-200 code with a message.
    #[error("search API returned code {code}: {message}")]
    SearchStatus { code: i64, message: String },

    /// The search section returned a non-200 code and no readable message.
    #[error("search API returned non-200 code: {0}")]
    SearchCode(i64),

    /// The search section said 200 but `data` is not a subnet array.
    #[error("failed to parse subnet data: {0}")]
    SubnetData(#[source] serde_json::Error),

    /// A subnet address was not a base-10 32-bit integer.
    ///
    /// Conversion is not atomic: `converted` holds the records rewritten
    /// before the failure and `remaining` holds the failing record and
    /// everything after it, with their addresses untouched.
    #[error("invalid subnet address '{address}': {source}")]
    SubnetAddress {
        address: String,
        converted: Vec<Subnet>,
        remaining: Vec<Subnet>,
        #[source]
        source: ParseIntError,
    },
}

impl IpamError {
    /// Records that were fully converted before a [`IpamError::SubnetAddress`]
    /// failure. Empty for every other variant.
    pub fn partial_subnets(&self) -> &[Subnet] {
        match self {
            IpamError::SubnetAddress { converted, .. } => converted,
            _ => &[],
        }
    }

    /// Consumes a [`IpamError::SubnetAddress`] error and returns the whole
    /// list in response order: converted head followed by the raw tail.
    pub fn into_subnets(self) -> Option<Vec<Subnet>> {
        match self {
            IpamError::SubnetAddress {
                mut converted,
                remaining,
                ..
            } => {
                converted.extend(remaining);
                Some(converted)
            }
            _ => None,
        }
    }
}
