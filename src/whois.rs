use crate::{
    cache::ReferralCache,
    config::Config,
    errors::WhoisError,
    parser,
    resolver::{self, Route},
    transport::{Dialer, TcpDialer},
    Response,
};
use std::{io, sync::Arc};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::{timeout, timeout_at, Instant},
};
use tracing::{debug, info, warn};

pub const WHOIS_PORT: u16 = 43;

// Label IANA uses for the authoritative server in its TLD records.
const REFERRAL_TOKEN: &str = "whois:";

pub struct WhoisClient<D = TcpDialer> {
    config: Arc<Config>,
    dialer: D,
    referrals: ReferralCache,
}

#[derive(Debug, Clone)]
pub struct WhoisResult {
    /// Server that produced `raw_data`.
    pub server: String,
    pub raw_data: String,
    /// True when `server` came from the referral cache.
    pub cached: bool,
}

impl WhoisClient<TcpDialer> {
    /// Client with default configuration and the referral cache disabled.
    pub fn new() -> Self {
        Self::with_config(Arc::new(Config::default()))
    }

    pub fn with_config(config: Arc<Config>) -> Self {
        Self::with_dialer(config, TcpDialer)
    }

    /// Client configured from `WHOIS_*` environment variables.
    pub fn from_env() -> Result<Self, WhoisError> {
        let config = Arc::new(Config::load()?);
        Ok(Self::with_config(config))
    }
}

impl Default for WhoisClient<TcpDialer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dialer> WhoisClient<D> {
    pub fn with_dialer(config: Arc<Config>, dialer: D) -> Self {
        let referrals = if config.referral_cache {
            ReferralCache::seeded()
        } else {
            ReferralCache::disabled()
        };

        info!(
            "WhoisClient initialized (entry point {}, referral cache {})",
            config.entry_server,
            if referrals.is_enabled() { "on" } else { "off" }
        );

        Self {
            config,
            dialer,
            referrals,
        }
    }

    /// Enables or disables the per-domain referral cache.
    ///
    /// The entry point is occasionally unavailable; remembering which server
    /// answered for a domain lets repeat lookups skip it. Enabling starts
    /// from a handful of well-known TLD servers, disabling forgets everything.
    pub fn with_referral_cache(mut self, enabled: bool) -> Self {
        self.referrals = if enabled {
            ReferralCache::seeded()
        } else {
            ReferralCache::disabled()
        };
        self
    }

    pub fn referral_cache(&self) -> &ReferralCache {
        &self.referrals
    }

    /// Raw whois text for `domain`, following at most one referral.
    pub async fn query(&self, domain: &str) -> Result<String, WhoisError> {
        Ok(self.lookup(domain).await?.raw_data)
    }

    /// Queries `domain` and extracts the fields understood by [`parser::parse`].
    pub async fn query_and_parse(&self, domain: &str) -> Result<Response, WhoisError> {
        let domain = resolver::normalize_domain(domain)?;
        let text = self.query(&domain).await?;
        Ok(parser::parse(&domain, &text))
    }

    /// Like [`WhoisClient::query`], also reporting which server answered.
    pub async fn lookup(&self, domain: &str) -> Result<WhoisResult, WhoisError> {
        let domain = resolver::normalize_domain(domain)?;
        let route = resolver::resolve(&domain, &self.config.entry_server, &self.referrals).await?;

        let raw_data = self.raw_query(route.server(), route.query(&domain)).await?;

        // A cached server is authoritative; its answer is not scanned for referrals.
        if let Route::Cached { server } = route {
            return Ok(WhoisResult {
                server,
                raw_data,
                cached: true,
            });
        }

        let Some(referral) = extract_referral(&raw_data) else {
            return Ok(WhoisResult {
                server: route.server().to_string(),
                raw_data,
                cached: false,
            });
        };

        let referral_server = format!("{}:{}", referral, WHOIS_PORT);
        debug!("Following referral from {} to {}", route.server(), referral_server);

        match self.raw_query(&referral_server, &domain).await {
            Ok(referred) => {
                self.referrals.set(&domain, &referral_server).await;
                Ok(WhoisResult {
                    server: referral_server,
                    raw_data: referred,
                    cached: false,
                })
            }
            Err(e) => {
                warn!("Failed to query referral server {}: {}", referral_server, e);
                Err(e)
            }
        }
    }

    /// One round trip: dial, send `query` and read until the server closes.
    ///
    /// The stream is owned here and dropped on every return path, which
    /// closes the connection whether the exchange succeeded or not.
    pub async fn raw_query(&self, server: &str, query: &str) -> Result<String, WhoisError> {
        debug!("Querying {} for {}", server, query);

        let mut stream = match timeout(self.config.connect_timeout(), self.dialer.dial(server)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(WhoisError::Connection {
                    server: server.to_string(),
                    source: e,
                })
            }
            Err(_) => {
                return Err(WhoisError::Connection {
                    server: server.to_string(),
                    source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
                })
            }
        };

        let deadline = Instant::now() + self.config.io_timeout();
        let response = timeout_at(deadline, exchange(&mut stream, query, &self.config)).await?;
        drop(stream);

        let response = response?;
        debug!("{} answered with {} bytes", server, response.len());
        Ok(response)
    }
}

async fn exchange<S>(stream: &mut S, query: &str, config: &Config) -> Result<String, WhoisError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let query_line = format!("{}\r\n", query);
    stream
        .write_all(query_line.as_bytes())
        .await
        .map_err(WhoisError::Write)?;

    let mut buffer = vec![0; config.buffer_size.max(1)];
    let mut response = Vec::new();

    // Whois has no framing: the server closing the connection ends the response.
    loop {
        match stream.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => {
                response.extend_from_slice(&buffer[..n]);
                if response.len() > config.max_response_size {
                    return Err(WhoisError::ResponseTooLarge);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(WhoisError::Read(e)),
        }
    }

    Ok(String::from_utf8_lossy(&response).into_owned())
}

/// Host named after the first `whois:` token, up to the end of that line.
pub fn extract_referral(text: &str) -> Option<&str> {
    let start = text.find(REFERRAL_TOKEN)? + REFERRAL_TOKEN.len();
    let rest = &text[start..];
    let end = rest.find('\n').unwrap_or(rest.len());
    let server = rest[..end].trim();

    if server.is_empty() {
        None
    } else {
        Some(server)
    }
}
