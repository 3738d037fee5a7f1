pub mod blocking;
mod client;
mod error;
mod http;
mod model;
mod params;
mod transport;

pub use client::{with_cancel, DnsPodClient};
pub use error::{Error, Result};
pub use http::HttpTransport;
pub use model::{Domain, DomainList, Info, Record, RecordList, Status};
pub use params::{
    Action, CreateRecord, DdnsUpdate, DomainRef, ModifyRecord, Params, RecordLine,
    RecordListQuery, RecordState, DEFAULT_LINE, DEFAULT_MODIFY_LINE_ID, DEFAULT_RECORD_TYPE,
};
pub use transport::{Credentials, Transport};

use anyhow::Result as AnyResult;

use crate::config::ApiConfig;

/// Builds a client that talks to the live API.
pub fn create_client(
    config: &ApiConfig,
    credentials: Credentials,
) -> AnyResult<DnsPodClient<HttpTransport>> {
    Ok(DnsPodClient::new(HttpTransport::new(config, credentials)?))
}
