//! Search controller: `GET /search/{term}/`.
//!
//! Requires phpIPAM 1.6 or newer. Only the subnet section of the search is
//! requested; addresses, VLANs and VRFs are switched off in the query string.

use std::net::Ipv4Addr;
use std::num::ParseIntError;

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::IpamError;
use crate::session::Session;
use crate::subnets::Subnet;

/// Status the search API uses for a successful section.
const SEARCH_OK: i64 = 200;

/// Query string selecting the subnet section only.
const SUBNETS_ONLY_QUERY: &str = "addresses=0&subnets=1&vlans=0&vrfs=0";

/// Envelope returned inside `data` by the search endpoint.
#[derive(Debug, Deserialize)]
struct SubnetSearchResult {
    subnets: SubnetSection,
}

/// `data` is an array of subnets when `code` is 200 and usually an error
/// string otherwise, so it is captured raw and decoded after the branch.
///
/// A literal `null` is kept as raw `null`; only a missing field is `None`.
#[derive(Debug, Deserialize)]
struct SubnetSection {
    code: i64,
    #[serde(default, deserialize_with = "present_raw")]
    data: Option<Box<RawValue>>,
}

impl SubnetSection {
    /// Raw `data` text, empty when the field was absent.
    fn data_json(&self) -> &str {
        self.data.as_deref().map_or("", RawValue::get)
    }
}

fn present_raw<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}

/// Client for the Search controller.
#[derive(Debug, Clone)]
pub struct SearchController {
    client: Client,
}

impl SearchController {
    pub fn new(session: Session) -> Result<Self, IpamError> {
        Ok(Self::from_client(Client::new(session)?))
    }

    /// Wraps an existing (possibly already logged-in) client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Searches phpIPAM for subnets matching `term`.
    ///
    /// Every returned subnet has its address rewritten from the integer the
    /// API sends to dotted-quad form.
    ///
    /// # Errors
    ///
    /// * `IpamError::Http` / `IpamError::Api` / `IpamError::JsonParse` when
    ///   the request or the outer envelope fails
    /// * `IpamError::SearchStatus` when the search section is not 200 and
    ///   carries a message, `IpamError::SearchCode` when it has none
    /// * `IpamError::SubnetData` when the subnet array is malformed
    /// * `IpamError::SubnetAddress` when an address is not an integer; the
    ///   error still carries the records converted before it
    pub async fn search_subnets(&self, term: &str) -> Result<Vec<Subnet>, IpamError> {
        let path = search_path(term);
        let result: SubnetSearchResult = self.client.get(&path).await?;
        let subnets = decode_subnet_section(result.subnets)?;
        debug!(count = subnets.len(), "decoded subnet search results");

        let subnets = convert_addresses(subnets)?;
        info!(term, count = subnets.len(), "subnet search complete");
        Ok(subnets)
    }
}

/// `/search/{term}/?…` with `term` percent-encoded as one path segment.
fn search_path(term: &str) -> String {
    format!("/search/{}/?{}", urlencoding::encode(term), SUBNETS_ONLY_QUERY)
}

/// Branches on the section code, then decodes `data` into the matching shape.
fn decode_subnet_section(section: SubnetSection) -> Result<Vec<Subnet>, IpamError> {
    if section.code != SEARCH_OK {
        return Err(match serde_json::from_str::<String>(section.data_json()) {
            Ok(message) => {
                warn!(code = section.code, %message, "subnet search failed");
                IpamError::SearchStatus {
                    code: section.code,
                    message,
                }
            }
            Err(_) => {
                warn!(code = section.code, "subnet search failed without a message");
                IpamError::SearchCode(section.code)
            }
        });
    }

    // `null` is an empty result; a missing `data` is still malformed.
    serde_json::from_str::<Option<Vec<Subnet>>>(section.data_json())
        .map(Option::unwrap_or_default)
        .map_err(IpamError::SubnetData)
}

/// Rewrites each subnet address from its integer form, in order.
///
/// Stops at the first address that does not parse. The error keeps the
/// converted head and the untouched tail so nothing is lost.
fn convert_addresses(subnets: Vec<Subnet>) -> Result<Vec<Subnet>, IpamError> {
    let mut converted = Vec::with_capacity(subnets.len());
    let mut pending = subnets.into_iter();

    while let Some(mut subnet) = pending.next() {
        match decimal_to_dotted_quad(&subnet.address) {
            Ok(address) => {
                subnet.address = address;
                converted.push(subnet);
            }
            Err(source) => {
                let address = subnet.address.clone();
                let mut remaining = vec![subnet];
                remaining.extend(pending);
                return Err(IpamError::SubnetAddress {
                    address,
                    converted,
                    remaining,
                    source,
                });
            }
        }
    }

    Ok(converted)
}

/// Reads `raw` as a base-10 `u32` and formats its big-endian octets,
/// e.g. `"168099840"` becomes `"10.5.0.0"`.
pub fn decimal_to_dotted_quad(raw: &str) -> Result<String, ParseIntError> {
    let value: u32 = raw.parse()?;
    Ok(Ipv4Addr::from(value).to_string())
}
