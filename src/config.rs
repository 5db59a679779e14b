use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

use crate::dedupe::DEFAULT_CHAIN_PRIORITY;

pub const BACKEND_URL_VAR: &str = "AFLAM_BACKEND_URL";
pub const BIND_ADDR_VAR: &str = "AFLAM_BIND_ADDR";
pub const CHAIN_PRIORITY_VAR: &str = "AFLAM_CHAIN_PRIORITY";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub bind_addr: SocketAddr,
    pub chain_priority: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let backend_url = env::var(BACKEND_URL_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .with_context(|| format!("{BACKEND_URL_VAR} must be set"))?;

        let bind_raw = env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid {BIND_ADDR_VAR} '{bind_raw}'"))?;

        let chain_priority = env::var(CHAIN_PRIORITY_VAR)
            .map(|raw| parse_chain_priority(&raw))
            .unwrap_or_else(|_| default_chain_priority());

        Ok(Self {
            backend_url: backend_url.trim().trim_end_matches('/').to_string(),
            bind_addr,
            chain_priority,
        })
    }
}

pub fn default_chain_priority() -> Vec<String> {
    DEFAULT_CHAIN_PRIORITY.iter().map(|s| s.to_string()).collect()
}

/// Comma-separated chain names; blanks are skipped and an empty list falls
/// back to the default order.
pub fn parse_chain_priority(raw: &str) -> Vec<String> {
    let chains: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if chains.is_empty() {
        default_chain_priority()
    } else {
        chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_priority_list_with_blanks() {
        assert_eq!(
            parse_chain_priority(" Empire, ,VOX ,AMC,"),
            vec!["Empire", "VOX", "AMC"]
        );
    }

    #[test]
    fn blank_priority_uses_default_order() {
        assert_eq!(parse_chain_priority(" , "), vec!["VOX", "Muvi", "Empire", "AMC"]);
        assert_eq!(parse_chain_priority(""), default_chain_priority());
    }
}
