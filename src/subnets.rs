//! Subnet record as returned by the phpIPAM subnets and search controllers.
//!
//! phpIPAM serialises nearly every column as a JSON string, so `"24"` is a
//! mask and `"1"` is `true`. Each field kind has one decoder below, wired in
//! with `deserialize_with`, instead of relying on implicit parsing.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A subnet record.
///
/// `address` holds whatever the API sent until the caller rewrites it; the
/// search controller replaces the integer form with a dotted quad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    #[serde(default, deserialize_with = "int_string")]
    pub id: i64,
    #[serde(rename = "subnet", default, deserialize_with = "nullable_string")]
    pub address: String,
    #[serde(default, deserialize_with = "int_string")]
    pub mask: i64,
    #[serde(default, deserialize_with = "int_string")]
    pub section_id: i64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "int_string")]
    pub master_subnet_id: i64,
    #[serde(default, deserialize_with = "bool_int_string")]
    pub allow_requests: bool,
    #[serde(default, deserialize_with = "int_string")]
    pub vlan_id: i64,
    #[serde(default, deserialize_with = "bool_int_string")]
    pub show_name: bool,
    /// JSON-encoded map of group id to permission level, kept as sent.
    #[serde(default, deserialize_with = "nullable_string")]
    pub permissions: String,
    #[serde(default, deserialize_with = "bool_int_string")]
    pub ping_subnet: bool,
    #[serde(default, deserialize_with = "bool_int_string")]
    pub discover_subnet: bool,
    #[serde(default, deserialize_with = "bool_int_string")]
    pub is_folder: bool,
    #[serde(default, deserialize_with = "bool_int_string")]
    pub is_full: bool,
}

impl Subnet {
    /// `address/mask`, e.g. `10.5.0.0/24`.
    pub fn cidr(&self) -> String {
        format!("{}/{}", self.address, self.mask)
    }
}

/// Any scalar phpIPAM might put in a column.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Bool(bool),
}

/// Integer column: `"24"`, `24`, `""` or `null` (the last two read as 0).
fn int_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Scalar::Int(n)) => Ok(n),
        Some(Scalar::Str(s)) if s.trim().is_empty() => Ok(0),
        Some(Scalar::Str(s)) => s.trim().parse::<i64>().map_err(|e| {
            de::Error::custom(format!("invalid integer string '{}': {}", s, e))
        }),
        Some(Scalar::Bool(b)) => Err(de::Error::custom(format!(
            "expected an integer, got boolean {}",
            b
        ))),
    }
}

/// Boolean column: `"1"`/`"0"`, `1`/`0`, `true`/`false`, `""` or `null`.
fn bool_int_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Scalar::Bool(b)) => Ok(b),
        Some(Scalar::Int(0)) => Ok(false),
        Some(Scalar::Int(1)) => Ok(true),
        Some(Scalar::Int(n)) => Err(de::Error::custom(format!("expected 0 or 1, got {}", n))),
        Some(Scalar::Str(s)) => match s.trim() {
            "" | "0" => Ok(false),
            "1" => Ok(true),
            other => Err(de::Error::custom(format!("expected \"0\" or \"1\", got \"{}\"", other))),
        },
    }
}

/// Text column that may be `null`.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
