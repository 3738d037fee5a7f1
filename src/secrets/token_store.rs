use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::dns::Credentials;

/// Environment variable holding a `"<id>,<token>"` login token.
pub const TOKEN_ENV: &str = "DNSPOD_LOGIN_TOKEN";

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    token: Option<StoredToken>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    id: String,
    token: String,
}

/// Credentials live next to the config file.
pub fn credentials_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(Settings::config_dir)
        .join("credentials.toml")
}

fn load_credentials_file(path: &Path) -> Result<CredentialsFile> {
    if !path.exists() {
        return Ok(CredentialsFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse credentials file: {}", path.display()))
}

fn save_credentials_file(path: &Path, creds: &CredentialsFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(creds)
        .context("Failed to serialize credentials")?;

    fs::write(path, &content)
        .with_context(|| format!("Failed to write credentials file: {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms)
            .with_context(|| format!("Failed to set permissions on: {}", path.display()))?;
    }

    Ok(())
}

pub fn store_credentials(path: &Path, token_id: &str, token: &str) -> Result<()> {
    let mut creds_file = load_credentials_file(path)?;

    creds_file.token = Some(StoredToken {
        id: token_id.to_string(),
        token: token.to_string(),
    });

    save_credentials_file(path, &creds_file)
}

/// The environment variable wins over the stored token.
pub fn get_credentials(path: &Path) -> Result<Credentials> {
    if let Ok(raw) = std::env::var(TOKEN_ENV) {
        return Credentials::parse(&raw)
            .ok_or_else(|| anyhow!("{} must look like '<id>,<token>'", TOKEN_ENV));
    }

    let creds_file = load_credentials_file(path)?;

    let stored = creds_file.token.ok_or_else(|| {
        anyhow!(
            "DNSPod token not found. Set {} or run 'dnspod-ddns set-key'.",
            TOKEN_ENV
        )
    })?;

    Ok(Credentials {
        token_id: stored.id,
        token: stored.token,
    })
}

pub fn delete_credentials(path: &Path) -> Result<()> {
    let mut creds_file = load_credentials_file(path)?;

    if creds_file.token.take().is_none() {
        return Err(anyhow!("No DNSPod token stored in {}", path.display()));
    }

    save_credentials_file(path, &creds_file)
}
