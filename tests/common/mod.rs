//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use dnspod_ddns::dns::{Action, Error, Params, Result, Transport};
use serde_json::{json, Value};

pub const DOMAIN_ID: u64 = 2059079;
pub const DOMAIN: &str = "example.com";

pub fn record_json(id: &str, name: &str, value: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "line": "默认",
        "line_id": "0",
        "type": "A",
        "ttl": "600",
        "value": value,
        "weight": null,
        "mx": "0",
        "enabled": "1",
        "status": "enabled",
        "monitor_status": "",
        "remark": "",
        "updated_on": "2024-05-01 12:00:00",
        "use_aqb": "no"
    })
}

/// In-memory stand-in for the provider holding one domain.
///
/// Mutations behave like the real API: unknown record ids answer with code 8.
/// `fail_with` makes every call answer with the given status code instead.
pub struct StubTransport {
    records: Mutex<Vec<Value>>,
    calls: Mutex<Vec<(Action, Params)>>,
    next_id: Mutex<u64>,
    forced_code: Option<String>,
    unreachable: bool,
}

impl StubTransport {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(100),
            forced_code: None,
            unreachable: false,
        }
    }

    pub fn with_record(self, id: &str, name: &str, value: &str) -> Self {
        self.records.lock().unwrap().push(record_json(id, name, value));
        self
    }

    pub fn fail_with(mut self, code: &str) -> Self {
        self.forced_code = Some(code.to_string());
        self
    }

    /// Every call fails as if the network were down.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub fn calls(&self) -> Vec<(Action, Params)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, action: Action) -> Vec<Params> {
        self.calls()
            .into_iter()
            .filter(|(a, _)| *a == action)
            .map(|(_, p)| p)
            .collect()
    }

    pub fn record(&self, id: &str) -> Option<Value> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r["id"] == id)
            .cloned()
    }

    fn owns_domain(params: &Params) -> bool {
        params.get("domain_id") == Some(DOMAIN_ID.to_string().as_str())
            || params.get("domain") == Some(DOMAIN)
    }

    fn status(code: &str, message: &str) -> Value {
        json!({ "status": { "code": code, "message": message, "created_at": "2024-05-01 12:00:00" } })
    }

    fn ok() -> Value {
        Self::status("1", "Action completed successful")
    }

    fn domain() -> Value {
        json!({
            "id": DOMAIN_ID.to_string(),
            "name": DOMAIN,
            "punycode": DOMAIN,
            "grade": "DP_Free",
            "owner": "owner@example.com",
            "ext_status": "",
            "ttl": 600
        })
    }

    fn update_record(&self, params: &Params, apply: impl FnOnce(&mut Value)) -> Value {
        let mut records = self.records.lock().unwrap();
        match records
            .iter_mut()
            .find(|r| Some(r["id"].as_str().unwrap_or_default()) == params.get("record_id"))
        {
            Some(record) => {
                apply(record);
                Self::ok()
            }
            None => Self::status("8", "Record id invalid"),
        }
    }

    fn respond(&self, action: Action, params: &Params) -> Value {
        if let Some(code) = &self.forced_code {
            return Self::status(code, "Operation failed");
        }

        if action != Action::DomainList && !Self::owns_domain(params) {
            return Self::status("6", "Domain id invalid");
        }

        match action {
            Action::DomainList => json!({
                "status": Self::ok()["status"],
                "info": { "domain_total": 1, "all_total": 1 },
                "domains": [Self::domain()]
            }),
            Action::DomainStatus => Self::ok(),
            Action::RecordList => {
                let records: Vec<Value> = self
                    .records
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|r| match params.get("sub_domain") {
                        Some(name) => r["name"] == name,
                        None => true,
                    })
                    .cloned()
                    .collect();
                json!({
                    "status": Self::ok()["status"],
                    "domain": Self::domain(),
                    "info": {
                        "sub_domains": records.len().to_string(),
                        "record_total": records.len().to_string(),
                        "records_num": records.len().to_string()
                    },
                    "records": records
                })
            }
            Action::RecordCreate => {
                let mut next_id = self.next_id.lock().unwrap();
                let id = next_id.to_string();
                *next_id += 1;
                drop(next_id);

                let name = params.get("sub_domain").unwrap_or("@").to_string();
                let value = params.get("value").unwrap_or_default().to_string();
                self.records
                    .lock()
                    .unwrap()
                    .push(record_json(&id, &name, &value));

                json!({
                    "status": Self::ok()["status"],
                    "record": { "id": id, "name": name, "status": "enabled" }
                })
            }
            Action::RecordModify | Action::RecordDdns => self.update_record(params, |r| {
                r["value"] = json!(params.get("value").unwrap_or_default());
                if let Some(name) = params.get("sub_domain") {
                    r["name"] = json!(name);
                }
            }),
            Action::RecordStatus => self.update_record(params, |r| {
                let enabled = if params.get("status") == Some("enable") { "1" } else { "0" };
                r["enabled"] = json!(enabled);
            }),
            Action::RecordRemark => self.update_record(params, |r| {
                r["remark"] = json!(params.get("remark").unwrap_or_default());
            }),
            Action::RecordRemove => {
                let mut records = self.records.lock().unwrap();
                let before = records.len();
                records.retain(|r| Some(r["id"].as_str().unwrap_or_default()) != params.get("record_id"));
                if records.len() < before {
                    Self::ok()
                } else {
                    Self::status("8", "Record id invalid")
                }
            }
            Action::RecordInfo => match params.get("record_id").and_then(|id| self.record(id)) {
                Some(record) => json!({
                    "status": Self::ok()["status"],
                    "domain": { "id": DOMAIN_ID, "domain": DOMAIN },
                    "record": record
                }),
                None => Self::status("8", "Record id invalid"),
            },
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn post(&self, action: Action, params: &Params) -> Result<Value> {
        self.calls.lock().unwrap().push((action, params.clone()));

        if self.unreachable {
            return Err(Error::Http {
                action: action.as_str(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "upstream unavailable".to_string(),
            });
        }

        Ok(self.respond(action, params))
    }
}
