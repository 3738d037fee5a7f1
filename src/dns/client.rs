use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::error::{Error, Result};
use super::model::{CreateEnvelope, DomainList, RecordList, StatusEnvelope};
use super::params::{self, Action, CreateRecord, DdnsUpdate, DomainRef, ModifyRecord, Params, RecordListQuery};
use super::transport::Transport;

/// DNSPod API client.
///
/// Every operation makes exactly one remote call. A provider status code other
/// than 1 comes back as `Ok(false)` or `Ok(None)`; `Err` is reserved for
/// transport failures and responses that do not have the expected shape.
pub struct DnsPodClient<T> {
    transport: T,
}

impl<T: Transport> DnsPodClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls `action` with a caller-built bag and returns the raw response.
    pub async fn execute(&self, action: Action, params: &Params) -> Result<Value> {
        debug!("calling {}", action);
        self.transport.post(action, params).await
    }

    async fn fetch<R: DeserializeOwned>(&self, action: Action, params: &Params) -> Result<R> {
        let value = self.execute(action, params).await?;
        serde_json::from_value(value).map_err(|e| Error::decode(action.as_str(), e))
    }

    async fn call_status(&self, action: Action, params: &Params) -> Result<bool> {
        let envelope: StatusEnvelope = self.fetch(action, params).await?;
        let ok = envelope.status.is_success();
        if !ok {
            warn!(
                "{} rejected (code {:?}): {}",
                action, envelope.status.code, envelope.status.message
            );
        }
        Ok(ok)
    }

    /// Creates a record and returns its id, or `None` if the provider refused.
    pub async fn create(&self, request: &CreateRecord) -> Result<Option<String>> {
        let action = Action::RecordCreate;
        let envelope: CreateEnvelope = self.fetch(action, &request.params()).await?;

        if !envelope.status.is_success() {
            warn!(
                "{} rejected (code {:?}): {}",
                action, envelope.status.code, envelope.status.message
            );
            return Ok(None);
        }

        envelope
            .record
            .map(|record| Some(record.id))
            .ok_or(Error::MissingField {
                action: action.as_str(),
                field: "record.id",
            })
    }

    pub async fn domain_list(&self) -> Result<DomainList> {
        self.fetch(Action::DomainList, &Params::new()).await
    }

    pub async fn set_domain_status(&self, domain: &DomainRef, enabled: bool) -> Result<bool> {
        let params = params::domain_status_params(domain, enabled.into());
        self.call_status(Action::DomainStatus, &params).await
    }

    pub async fn resume_domain(&self, domain: &DomainRef) -> Result<bool> {
        self.set_domain_status(domain, true).await
    }

    pub async fn pause_domain(&self, domain: &DomainRef) -> Result<bool> {
        self.set_domain_status(domain, false).await
    }

    pub async fn record_list(&self, domain: &DomainRef) -> Result<RecordList> {
        self.record_list_filtered(&RecordListQuery::new(domain.clone()))
            .await
    }

    pub async fn record_list_filtered(&self, query: &RecordListQuery) -> Result<RecordList> {
        self.fetch(Action::RecordList, &query.params()).await
    }

    /// Record.List with an arbitrary bag, returned untyped.
    pub async fn record_list_raw(&self, params: &Params) -> Result<Value> {
        self.execute(Action::RecordList, params).await
    }

    pub async fn modify(&self, request: &ModifyRecord) -> Result<bool> {
        self.call_status(Action::RecordModify, &request.params())
            .await
    }

    pub async fn remove(&self, domain: &DomainRef, record_id: &str) -> Result<bool> {
        let params = params::record_params(domain, record_id);
        self.call_status(Action::RecordRemove, &params).await
    }

    pub async fn set_record_status(
        &self,
        domain: &DomainRef,
        record_id: &str,
        enabled: bool,
    ) -> Result<bool> {
        let params = params::record_status_params(domain, record_id, enabled.into());
        self.call_status(Action::RecordStatus, &params).await
    }

    pub async fn resume_record(&self, domain: &DomainRef, record_id: &str) -> Result<bool> {
        self.set_record_status(domain, record_id, true).await
    }

    pub async fn pause_record(&self, domain: &DomainRef, record_id: &str) -> Result<bool> {
        self.set_record_status(domain, record_id, false).await
    }

    pub async fn ddns(&self, request: &DdnsUpdate) -> Result<bool> {
        self.call_status(Action::RecordDdns, &request.params()).await
    }

    pub async fn remark(&self, domain_id: u64, record_id: &str, remark: &str) -> Result<bool> {
        let params = params::remark_params(domain_id, record_id, remark);
        self.call_status(Action::RecordRemark, &params).await
    }

    /// Record.Info, returned untyped.
    pub async fn info(&self, domain: &DomainRef, record_id: &str) -> Result<Value> {
        let params = params::record_params(domain, record_id);
        self.execute(Action::RecordInfo, &params).await
    }
}

/// Runs `operation` until it finishes or `cancel` flips to `true`.
///
/// A dropped sender never cancels.
pub async fn with_cancel<F, O>(cancel: &mut watch::Receiver<bool>, operation: F) -> Result<O>
where
    F: Future<Output = Result<O>>,
{
    if *cancel.borrow() {
        return Err(Error::Cancelled);
    }

    let cancelled = async {
        loop {
            if cancel.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
            if *cancel.borrow() {
                return;
            }
        }
    };

    tokio::select! {
        result = operation => result,
        _ = cancelled => Err(Error::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every call with the same body and remembers what it was sent.
    struct Fixed {
        body: Value,
        calls: Mutex<Vec<(Action, Params)>>,
    }

    impl Fixed {
        fn new(body: Value) -> Self {
            Self {
                body,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> (Action, Params) {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for Fixed {
        async fn post(&self, action: Action, params: &Params) -> Result<Value> {
            self.calls.lock().unwrap().push((action, params.clone()));
            Ok(self.body.clone())
        }
    }

    fn client(body: Value) -> DnsPodClient<Fixed> {
        DnsPodClient::new(Fixed::new(body))
    }

    #[tokio::test]
    async fn test_create_returns_record_id() {
        let client = client(json!({
            "status": { "code": "1", "message": "ok" },
            "record": { "id": "16894439", "name": "www", "status": "enable" }
        }));

        let id = client
            .create(&CreateRecord::new(123u64, "www", "1.2.3.4"))
            .await
            .unwrap();

        assert_eq!(id.as_deref(), Some("16894439"));
        let (action, params) = client.transport().last();
        assert_eq!(action, Action::RecordCreate);
        assert_eq!(params.get("record_line"), Some("默认"));
    }

    #[tokio::test]
    async fn test_create_business_failure_is_none() {
        let client = client(json!({ "status": { "code": "104", "message": "Record already exists" } }));

        let id = client
            .create(&CreateRecord::new("example.com", "www", "1.2.3.4"))
            .await
            .unwrap();

        assert!(id.is_none());
    }

    #[tokio::test]
    async fn test_create_success_without_record_is_error() {
        let client = client(json!({ "status": { "code": "1" } }));

        let err = client
            .create(&CreateRecord::new(1u64, "www", "1.2.3.4"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MissingField { field: "record.id", .. }));
    }

    #[tokio::test]
    async fn test_status_codes_map_to_bool() {
        for (code, expected) in [
            (json!("1"), true),
            (json!(1), true),
            (json!("0"), false),
            (json!("-1"), false),
            (json!("abc"), false),
            (json!(true), false),
            (json!(1.0), false),
        ] {
            let client = client(json!({ "status": { "code": code, "message": "" } }));
            let ok = client.remove(&DomainRef::Id(1), "2").await.unwrap();
            assert_eq!(ok, expected, "code {}", code);
        }

        let missing = client(json!({ "status": { "message": "no code" } }));
        assert!(!missing.remove(&DomainRef::Id(1), "2").await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_not_business_failure() {
        let client = client(json!({ "unexpected": true }));

        let err = client
            .modify(&ModifyRecord::new(1u64, "2", "1.1.1.1", "www"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode { action: "Record.Modify", .. }));
    }

    #[tokio::test]
    async fn test_remark_posts_full_bag() {
        let client = client(json!({ "status": { "code": "1" } }));

        assert!(client.remark(10, "42", "nas").await.unwrap());

        let (action, params) = client.transport().last();
        assert_eq!(action, Action::RecordRemark);
        assert_eq!(params.get("domain_id"), Some("10"));
        assert_eq!(params.get("record_id"), Some("42"));
        assert_eq!(params.get("remark"), Some("nas"));
    }

    #[tokio::test]
    async fn test_pause_and_resume_domain() {
        let client = client(json!({ "status": { "code": "1" } }));
        let domain = DomainRef::from("example.com");

        client.pause_domain(&domain).await.unwrap();
        assert_eq!(client.transport().last().1.get("status"), Some("disable"));

        client.resume_domain(&domain).await.unwrap();
        let (action, params) = client.transport().last();
        assert_eq!(action, Action::DomainStatus);
        assert_eq!(params.get("status"), Some("enable"));
    }

    #[tokio::test]
    async fn test_info_is_untyped() {
        let client = client(json!({ "status": { "code": "1" }, "record": { "id": "42", "value": "1.2.3.4" } }));

        let info = client.info(&DomainRef::Id(1), "42").await.unwrap();

        assert_eq!(info["record"]["value"], "1.2.3.4");
        assert_eq!(client.transport().last().0, Action::RecordInfo);
    }

    #[tokio::test]
    async fn test_with_cancel_short_circuits() {
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = with_cancel(&mut rx, async { Ok::<_, Error>(()) }).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_with_cancel_lets_operation_finish() {
        let (_tx, mut rx) = watch::channel(false);

        let result = with_cancel(&mut rx, async { Ok::<_, Error>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
