//! # Whois Lookup Library
//!
//! An RFC 3912 whois client.
//!
//! ## Features
//!
//! - Referral discovery through IANA's root whois directory
//! - Direct addressing for registries that bypass IANA (Ukrainian second-level zones)
//! - A single referral hop, optionally remembered per domain
//! - Connect and read timeouts on every query
//! - Best-effort parsing of expiration date, statuses and name servers
//!   using per-registry date layouts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use whois_lookup::WhoisClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WhoisClient::new().with_referral_cache(true);
//!     let response = client.query_and_parse("example.com").await?;
//!
//!     println!("Expires: {:?}", response.expiration_date);
//!     println!("Name servers: {:?}", response.name_servers);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod errors;
pub mod formats;
pub mod parser;
pub mod resolver;
pub mod tld_mappings;
pub mod transport;
pub mod whois;

// Re-export main types for easy access
pub use cache::ReferralCache;
pub use config::Config;
pub use errors::WhoisError;
pub use parser::parse;
pub use transport::{Dialer, TcpDialer};
pub use whois::{WhoisClient, WhoisResult};

use chrono::{DateTime, Utc};

/// Fields extracted from a whois response.
///
/// Extraction is best effort: `None` or an empty list means the field was
/// not found or not understood, not that the lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Response {
    pub expiration_date: Option<DateTime<Utc>>,
    /// In order of appearance, duplicates kept.
    pub domain_statuses: Vec<String>,
    /// In order of appearance, duplicates kept.
    pub name_servers: Vec<String>,
}
