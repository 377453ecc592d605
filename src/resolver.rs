//! Picks the first server to ask about a domain.

use crate::{cache::ReferralCache, errors::WhoisError, tld_mappings, whois::WHOIS_PORT};
use tracing::debug;

/// Where the first query for a domain goes, and what it asks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A server remembered from an earlier referral. Its answer is final.
    Cached { server: String },
    /// A registry queried directly with the full domain.
    Direct { server: String },
    /// The entry point, asked about the bare TLD to discover the referral server.
    EntryPoint { server: String, tld: String },
}

impl Route {
    pub fn server(&self) -> &str {
        match self {
            Route::Cached { server } | Route::Direct { server } | Route::EntryPoint { server, .. } => server,
        }
    }

    /// The query line sent to [`Route::server`].
    pub fn query<'a>(&'a self, domain: &'a str) -> &'a str {
        match self {
            Route::EntryPoint { tld, .. } => tld,
            Route::Cached { .. } | Route::Direct { .. } => domain,
        }
    }
}

/// Lower-cases and trims a domain and drops one trailing dot.
pub fn normalize_domain(domain: &str) -> Result<String, WhoisError> {
    let normalized = domain.trim().to_lowercase();
    let normalized = normalized.strip_suffix('.').unwrap_or(&normalized).to_string();

    if normalized.is_empty() {
        return Err(WhoisError::InvalidDomain("Empty domain".to_string()));
    }

    Ok(normalized)
}

/// Resolves the route for an already normalized domain.
pub async fn resolve(domain: &str, entry_server: &str, referrals: &ReferralCache) -> Result<Route, WhoisError> {
    let labels: Vec<&str> = domain.split('.').collect();
    let tld = labels[labels.len() - 1];

    if tld_mappings::lacks_expiration_date(tld) {
        return Err(WhoisError::UnsupportedTld(tld.to_string()));
    }

    if let Some(server) = referrals.get(domain).await {
        return Ok(Route::Cached { server });
    }

    if tld == "ua" {
        // Ukrainian second-level zones (co.ua, pp.ua, ...) run their own servers.
        let extension = match labels.len() {
            n if n > 2 && labels[n - 2].len() < 4 => format!("{}.{}", labels[n - 2], tld),
            _ => tld.to_string(),
        };
        let server = format!("whois.{}:{}", extension, WHOIS_PORT);
        debug!("Querying {} directly for {}", server, domain);
        return Ok(Route::Direct { server });
    }

    Ok(Route::EntryPoint {
        server: entry_server.to_string(),
        tld: tld.to_string(),
    })
}
