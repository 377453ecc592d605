use once_cell::sync::Lazy;
use std::collections::HashMap;

// TLDs whose registries publish no usable expiration date or grace period.
// Lookups under these are refused before any network traffic.
pub const TLDS_WITHOUT_EXPIRATION_DATE: &[&str] = &["at", "be", "ch", "de", "fr", "me", "mx", "nl"];

// Well-known referral servers, loaded into the referral cache when it is enabled.
pub static SEEDED_REFERRAL_SERVERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("com", "whois.verisign-grs.com");
    map.insert("net", "whois.verisign-grs.com");
    map.insert("org", "whois.publicinterestregistry.org");
    map.insert("black", "whois.nic.black");
    map.insert("dev", "whois.nic.google");
    map.insert("green", "whois.nic.green");
    map.insert("io", "whois.nic.io");
    map.insert("red", "whois.nic.red");
    map.insert("sh", "whois.nic.sh");

    map
});

pub fn lacks_expiration_date(tld: &str) -> bool {
    TLDS_WITHOUT_EXPIRATION_DATE.contains(&tld)
}
