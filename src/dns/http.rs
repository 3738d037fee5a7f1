use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::error::{Error, Result};
use super::params::{Action, Params};
use super::transport::{Credentials, Transport};
use crate::config::ApiConfig;

/// Transport over the DNSPod form-encoded HTTP API.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    lang: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            lang: config.lang.clone(),
            credentials,
        })
    }

    fn form(&self, params: &Params) -> Params {
        let mut form = params.clone();
        form.insert("login_token", self.credentials.login_token());
        form.insert("format", "json");
        form.insert("lang", &self.lang);
        form.insert("error_on_empty", "no");
        form
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, action: Action, params: &Params) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, action);
        debug!("POST {} ({} params)", url, params.len());

        let response = self
            .client
            .post(&url)
            .form(&self.form(params))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                action: action.as_str(),
                status,
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::decode(action.as_str(), e))
    }
}
