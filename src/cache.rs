use crate::tld_mappings::SEEDED_REFERRAL_SERVERS;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Remembers which server answered authoritatively for a domain, so later
/// lookups of the same domain skip the entry point.
///
/// Entries never expire. Concurrent writers for the same key race and the
/// last write wins.
pub struct ReferralCache {
    enabled: bool,
    servers: RwLock<HashMap<String, String>>,
}

impl ReferralCache {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            servers: RwLock::new(HashMap::new()),
        }
    }

    /// An enabled cache pre-populated with the well-known TLD servers.
    pub fn seeded() -> Self {
        let servers = SEEDED_REFERRAL_SERVERS
            .iter()
            .map(|(tld, server)| (tld.to_string(), format!("{}:{}", server, crate::whois::WHOIS_PORT)))
            .collect();

        Self {
            enabled: true,
            servers: RwLock::new(servers),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn get(&self, domain: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let servers = self.servers.read().await;
        match servers.get(domain) {
            Some(server) => {
                debug!("Referral cache hit for {}: {}", domain, server);
                Some(server.clone())
            }
            None => {
                debug!("Referral cache miss for {}", domain);
                None
            }
        }
    }

    pub async fn set(&self, domain: &str, server: &str) {
        if !self.enabled {
            return;
        }

        let mut servers = self.servers.write().await;
        servers.insert(domain.to_string(), server.to_string());
        debug!("Cached referral server for {}: {}", domain, server);
    }

    pub async fn len(&self) -> usize {
        self.servers.read().await.len()
    }
}

impl Default for ReferralCache {
    fn default() -> Self {
        Self::disabled()
    }
}
