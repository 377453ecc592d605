use crate::{formats, Response};
use chrono::{DateTime, Utc};

/// Best-effort extraction of expiration, statuses and name servers.
///
/// Never fails: fields that are missing or unparseable stay empty. Parsing
/// is a pure fold over the lines, so the same input always yields the same
/// [`Response`].
pub fn parse(domain: &str, text: &str) -> Response {
    let domain = domain.trim().to_lowercase();
    let format = formats::format_for(&domain);
    let mut response = Response::default();

    for line in text.lines() {
        let line = line.trim();
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                k if k.contains("expir") => {
                    if format.decoy_key.is_some_and(|decoy| k.contains(decoy)) {
                        continue;
                    }
                    update_expiration(&mut response, format.expiration.parse(&value.to_uppercase()));
                }
                k if format.expiration_key == Some(k) => {
                    update_expiration(&mut response, format.expiration.parse(&value.to_uppercase()));
                }
                k if k.contains("status") => {
                    response.domain_statuses.push(value.to_string());
                }
                k if format.joined_status_key == Some(k) => {
                    response.domain_statuses = value.split(", ").map(str::to_string).collect();
                }
                k if k.contains("name server") || k.contains("nserver") => {
                    response.name_servers.push(value.to_string());
                }
                _ => {}
            }
        }
    }

    response
}

// Every expiration line overwrites the field, so an unparseable last line clears it.
fn update_expiration(response: &mut Response, parsed: Option<DateTime<Utc>>) {
    response.expiration_date = parsed;
}
