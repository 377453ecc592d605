//! End-to-end lookups against fake whois servers on loopback sockets.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    io,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use whois_lookup::{Config, Dialer, WhoisClient, WhoisError};

/// A whois server answering each query line from a fixed table, then hanging up.
struct FakeServer {
    addr: SocketAddr,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    async fn start(answers: &[(&str, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let answers: HashMap<String, String> = answers
            .iter()
            .map(|(query, answer)| (query.to_string(), answer.to_string()))
            .collect();
        let queries = Arc::new(Mutex::new(Vec::new()));
        let seen = queries.clone();

        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                let answers = answers.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut reader = BufReader::new(socket);
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.is_err() {
                        return;
                    }
                    let query = line.trim_end_matches("\r\n").to_string();
                    let answer = answers.get(&query).cloned().unwrap_or_else(|| "No match\n".to_string());
                    seen.lock().unwrap().push(query);

                    let mut socket = reader.into_inner();
                    let _ = socket.write_all(answer.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { addr, queries }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

/// Sends each `host:port` to the loopback server registered for that host.
struct LoopbackDialer {
    hosts: HashMap<String, SocketAddr>,
    dialed: Mutex<Vec<String>>,
}

impl LoopbackDialer {
    fn new(hosts: &[(&str, &FakeServer)]) -> Self {
        Self {
            hosts: hosts.iter().map(|(host, server)| (host.to_string(), server.addr)).collect(),
            dialed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Dialer for LoopbackDialer {
    type Stream = TcpStream;

    async fn dial(&self, address: &str) -> io::Result<TcpStream> {
        self.dialed.lock().unwrap().push(address.to_string());
        let host = address.rsplit_once(':').map(|(host, _)| host).unwrap_or(address);
        match self.hosts.get(host) {
            Some(addr) => TcpStream::connect(*addr).await,
            None => Err(io::Error::new(io::ErrorKind::NotFound, format!("unknown host {}", host))),
        }
    }
}

const IANA_IO: &str = "% IANA WHOIS server\n\
    % for more information on IANA, visit http://www.iana.org\n\
    \n\
    refer:        whois.nic.io\n\
    \n\
    domain:       IO\n\
    whois:        whois.nic.io\n\
    \n\
    status:       ACTIVE\n";

const NIC_IO: &str = "Domain Name: name.io\n\
    Registrar WHOIS Server: whois.example-registry.net\n\
    Registry Expiry Date: 2026-03-01T12:00:00Z\n\
    Domain Status: clientTransferProhibited https://icann.org/epp#clientTransferProhibited\n\
    Name Server: ns1.name.io\n\
    Name Server: ns2.name.io\n";

async fn io_registry() -> (FakeServer, FakeServer, Arc<LoopbackDialer>) {
    let iana = FakeServer::start(&[("io", IANA_IO)]).await;
    let nic = FakeServer::start(&[("name.io", NIC_IO)]).await;
    let dialer = Arc::new(LoopbackDialer::new(&[("whois.iana.org", &iana), ("whois.nic.io", &nic)]));
    (iana, nic, dialer)
}

#[tokio::test]
async fn test_query_follows_iana_referral() {
    let (iana, nic, dialer) = io_registry().await;
    let client = WhoisClient::with_dialer(Arc::new(Config::default()), dialer.clone());

    let output = client.query("name.io").await.unwrap();

    assert_eq!(output, NIC_IO);
    assert_eq!(iana.queries(), vec!["io"]);
    assert_eq!(nic.queries(), vec!["name.io"]);
}

#[tokio::test]
async fn test_query_and_parse_end_to_end() {
    let (_iana, _nic, dialer) = io_registry().await;
    let client = WhoisClient::with_dialer(Arc::new(Config::default()), dialer.clone());

    let response = client.query_and_parse("NAME.IO").await.unwrap();

    assert_eq!(response.expiration_date.unwrap().to_rfc3339(), "2026-03-01T12:00:00+00:00");
    assert_eq!(response.name_servers, vec!["ns1.name.io", "ns2.name.io"]);
    assert_eq!(response.domain_statuses.len(), 1);
    // The registrar server named in the answer is never contacted.
    assert!(!dialer.dialed.lock().unwrap().iter().any(|a| a.contains("example-registry")));
}

#[tokio::test]
async fn test_referral_cache_from_config() {
    let (iana, nic, dialer) = io_registry().await;
    let config = Config {
        referral_cache: true,
        ..Config::default()
    };
    let client = WhoisClient::with_dialer(Arc::new(config), dialer.clone());

    client.query("name.io").await.unwrap();
    client.query("name.io").await.unwrap();
    client.query("name.io").await.unwrap();

    assert_eq!(iana.queries().len(), 1);
    assert_eq!(nic.queries().len(), 3);
}

#[tokio::test]
async fn test_concurrent_lookups_share_the_cache() {
    let (iana, nic, dialer) = io_registry().await;
    let client = Arc::new(WhoisClient::with_dialer(Arc::new(Config::default()), dialer.clone()).with_referral_cache(true));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.query("name.io").await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), NIC_IO);
    }

    // Racing first lookups may each visit the entry point; after that the cache answers.
    let entry_visits = iana.queries().len();
    assert!((1..=4).contains(&entry_visits));
    client.query("name.io").await.unwrap();
    assert_eq!(iana.queries().len(), entry_visits);
    assert_eq!(nic.queries().len(), 5);
}

#[tokio::test]
async fn test_unknown_referral_host_fails_the_query() {
    let iana = FakeServer::start(&[("io", IANA_IO)]).await;
    let dialer = Arc::new(LoopbackDialer::new(&[("whois.iana.org", &iana)]));
    let client = WhoisClient::with_dialer(Arc::new(Config::default()), dialer);

    let result = client.query("name.io").await;

    assert!(matches!(result, Err(WhoisError::Connection { ref server, .. }) if server == "whois.nic.io:43"));
}

#[tokio::test]
async fn test_excluded_tld_is_refused_offline() {
    let dialer = Arc::new(LoopbackDialer::new(&[]));
    let client = WhoisClient::with_dialer(Arc::new(Config::default()), dialer.clone());

    let result = client.query_and_parse("example.fr").await;

    assert!(matches!(result, Err(WhoisError::UnsupportedTld(ref tld)) if tld == "fr"));
    assert!(dialer.dialed.lock().unwrap().is_empty());
}
