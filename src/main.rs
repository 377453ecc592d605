use std::process::ExitCode;
use tracing::debug;
use whois_lookup::{WhoisClient, WhoisError};

const USAGE: &str = "usage: whois <domain>\nyou must provide exactly one domain";

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the whois text
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "whois_lookup=warn".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [domain] = args.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    match run(domain).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(domain: &str) -> Result<String, WhoisError> {
    let client = WhoisClient::from_env()?;
    debug!("Looking up {}", domain);

    client.query(domain).await
}
