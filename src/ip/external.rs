use std::net::{IpAddr, Ipv4Addr};
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{anyhow, Result};
use regex::Regex;
use reqwest::Client;

/// Services queried in order until one answers with an address.
pub const DEFAULT_LOOKUP_URLS: &[&str] = &[
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://icanhazip.com",
    "https://ipinfo.io/ip",
    "https://checkip.amazonaws.com",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static IPV4_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("IPv4 pattern is valid")
});

pub async fn get_external_ip(urls: &[String]) -> Result<IpAddr> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let mut last_error = None;

    for url in urls {
        match fetch_ip(&client, url).await {
            Ok(ip) => return Ok(ip),
            Err(e) => {
                tracing::debug!("Failed to get IP from {}: {}", url, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow!("No IP lookup services configured")))
}

async fn fetch_ip(client: &Client, url: &str) -> Result<IpAddr> {
    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    extract_ip(&response).ok_or_else(|| anyhow!("No IP address in response from {}", url))
}

/// Finds the caller's address in a lookup response.
///
/// Some services wrap the address in JSON or script text, so the first valid
/// IPv4 literal anywhere in the body wins. Otherwise the whole trimmed body
/// must parse as an address, which covers bare IPv6 answers.
pub fn extract_ip(text: &str) -> Option<IpAddr> {
    IPV4_LITERAL
        .find_iter(text)
        .find_map(|m| m.as_str().parse::<Ipv4Addr>().ok())
        .map(IpAddr::V4)
        .or_else(|| text.trim().parse().ok())
}
