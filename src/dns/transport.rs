use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::error::Result;
use super::params::{Action, Params};

/// DNSPod API token pair.
#[derive(Clone)]
pub struct Credentials {
    pub token_id: String,
    pub token: String,
}

impl Credentials {
    /// Parses the `"<id>,<token>"` form the provider issues.
    pub fn parse(login_token: &str) -> Option<Self> {
        let (id, token) = login_token.trim().split_once(',')?;
        let (id, token) = (id.trim(), token.trim());
        if id.is_empty() || token.is_empty() {
            return None;
        }
        Some(Self {
            token_id: id.to_string(),
            token: token.to_string(),
        })
    }

    pub fn login_token(&self) -> String {
        format!("{},{}", self.token_id, self.token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token_id", &self.token_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Performs one authenticated call to a named remote action.
///
/// Implementations own host, authentication, TLS and any retry policy, and
/// hand back the parsed JSON body untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, action: Action, params: &Params) -> Result<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn post(&self, action: Action, params: &Params) -> Result<Value> {
        (**self).post(action, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_token() {
        let creds = Credentials::parse(" 13490,6b5976c68aba5b14a0558b77c17c3932 ").unwrap();
        assert_eq!(creds.token_id, "13490");
        assert_eq!(creds.login_token(), "13490,6b5976c68aba5b14a0558b77c17c3932");

        assert!(Credentials::parse("no-comma").is_none());
        assert!(Credentials::parse(",token").is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::parse("1,secret").unwrap();
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
