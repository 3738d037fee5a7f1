use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised by the DNSPod client.
///
/// A provider answering with a non-success status code is not an error: those
/// calls return `Ok(false)` or `Ok(None)`. Everything here means the call
/// could not be interpreted at all.
#[derive(Debug, Error)]
pub enum Error {
    /// Network, TLS or timeout failure while talking to the API.
    #[error("request to DNSPod failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx HTTP status.
    #[error("DNSPod API error on {action} ({status}): {body}")]
    Http {
        action: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The response body was not the envelope the action is documented to return.
    #[error("malformed {action} response: {source}")]
    Decode {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A success envelope without the payload the action promises.
    #[error("{action} response reported success but has no `{field}`")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    #[error("operation cancelled")]
    Cancelled,

    /// The blocking client could not start its runtime.
    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl Error {
    /// True for failures of the wire itself rather than of the response shape.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Request(_) | Error::Http { .. })
    }

    pub(crate) fn decode(action: &'static str, source: serde_json::Error) -> Self {
        Error::Decode { action, source }
    }
}
