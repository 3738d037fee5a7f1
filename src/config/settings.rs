use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dns::{DEFAULT_MODIFY_LINE_ID, DEFAULT_RECORD_TYPE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub ddns: DdnsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// DNSPod asks for `Program/Version (contact email)`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// The record kept in sync with the caller's public IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    pub domain: String,
    pub sub_domain: String,
    #[serde(default = "default_record_type")]
    pub record_type: String,
    #[serde(default = "default_record_line_id")]
    pub record_line_id: String,
    #[serde(default = "default_ip_lookup_urls")]
    pub ip_lookup_urls: Vec<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "https://dnsapi.cn".to_string()
}

fn default_lang() -> String {
    "cn".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("dnspod-ddns/{}", env!("CARGO_PKG_VERSION"))
}

fn default_record_type() -> String {
    DEFAULT_RECORD_TYPE.to_string()
}

fn default_record_line_id() -> String {
    DEFAULT_MODIFY_LINE_ID.to_string()
}

fn default_ip_lookup_urls() -> Vec<String> {
    crate::ip::DEFAULT_LOOKUP_URLS
        .iter()
        .map(|url| url.to_string())
        .collect()
}

impl Settings {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        #[cfg(unix)]
        {
            PathBuf::from("/etc/dnspod-ddns")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\ProgramData\dnspod-ddns")
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            lang: default_lang(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
