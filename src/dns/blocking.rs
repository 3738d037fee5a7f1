//! Blocking wrapper around [`crate::dns::DnsPodClient`].
//!
//! Each call drives the async implementation to completion on a runtime owned
//! by the client, so both surfaces share one code path. Do not call these
//! methods from inside an async context; use the async client there.

use std::future::Future;

use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

use super::client::DnsPodClient as AsyncClient;
use super::error::Result;
use super::model::{DomainList, RecordList};
use super::params::{Action, CreateRecord, DdnsUpdate, DomainRef, ModifyRecord, Params, RecordListQuery};
use super::transport::Transport;

pub struct DnsPodClient<T> {
    inner: AsyncClient<T>,
    runtime: Runtime,
}

impl<T: Transport> DnsPodClient<T> {
    pub fn new(transport: T) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner: AsyncClient::new(transport),
            runtime,
        })
    }

    /// The async client this wrapper drives.
    pub fn inner(&self) -> &AsyncClient<T> {
        &self.inner
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn execute(&self, action: Action, params: &Params) -> Result<Value> {
        self.block_on(self.inner.execute(action, params))
    }

    pub fn create(&self, request: &CreateRecord) -> Result<Option<String>> {
        self.block_on(self.inner.create(request))
    }

    pub fn domain_list(&self) -> Result<DomainList> {
        self.block_on(self.inner.domain_list())
    }

    pub fn set_domain_status(&self, domain: &DomainRef, enabled: bool) -> Result<bool> {
        self.block_on(self.inner.set_domain_status(domain, enabled))
    }

    pub fn resume_domain(&self, domain: &DomainRef) -> Result<bool> {
        self.block_on(self.inner.resume_domain(domain))
    }

    pub fn pause_domain(&self, domain: &DomainRef) -> Result<bool> {
        self.block_on(self.inner.pause_domain(domain))
    }

    pub fn record_list(&self, domain: &DomainRef) -> Result<RecordList> {
        self.block_on(self.inner.record_list(domain))
    }

    pub fn record_list_filtered(&self, query: &RecordListQuery) -> Result<RecordList> {
        self.block_on(self.inner.record_list_filtered(query))
    }

    pub fn record_list_raw(&self, params: &Params) -> Result<Value> {
        self.block_on(self.inner.record_list_raw(params))
    }

    pub fn modify(&self, request: &ModifyRecord) -> Result<bool> {
        self.block_on(self.inner.modify(request))
    }

    pub fn remove(&self, domain: &DomainRef, record_id: &str) -> Result<bool> {
        self.block_on(self.inner.remove(domain, record_id))
    }

    pub fn set_record_status(&self, domain: &DomainRef, record_id: &str, enabled: bool) -> Result<bool> {
        self.block_on(self.inner.set_record_status(domain, record_id, enabled))
    }

    pub fn resume_record(&self, domain: &DomainRef, record_id: &str) -> Result<bool> {
        self.block_on(self.inner.resume_record(domain, record_id))
    }

    pub fn pause_record(&self, domain: &DomainRef, record_id: &str) -> Result<bool> {
        self.block_on(self.inner.pause_record(domain, record_id))
    }

    pub fn ddns(&self, request: &DdnsUpdate) -> Result<bool> {
        self.block_on(self.inner.ddns(request))
    }

    pub fn remark(&self, domain_id: u64, record_id: &str, remark: &str) -> Result<bool> {
        self.block_on(self.inner.remark(domain_id, record_id, remark))
    }

    pub fn info(&self, domain: &DomainRef, record_id: &str) -> Result<Value> {
        self.block_on(self.inner.info(domain, record_id))
    }
}
