//! Client for the phpIPAM search API.
//!
//! [`SearchController::search_subnets`] runs a subnet search and returns
//! records with human-readable addresses. The surrounding [`Config`],
//! [`Session`] and [`Client`] types carry connection settings, the API token
//! and request sending.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod session;
pub mod subnets;

pub use client::Client;
pub use config::Config;
pub use error::IpamError;
pub use search::SearchController;
pub use session::{Session, Token};
pub use subnets::Subnet;
