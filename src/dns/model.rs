use std::fmt;

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status block carried by every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, deserialize_with = "status_code")]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Status {
    /// Numeric status code, if the provider sent one.
    pub fn code_value(&self) -> Option<i64> {
        self.code.trim().parse().ok()
    }

    /// Only a code that parses as the integer 1 counts as success.
    pub fn is_success(&self) -> bool {
        self.code_value() == Some(1)
    }
}

/// Pagination counters. Record lists fill the record fields, domain lists the
/// domain fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub sub_domains: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub record_total: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub records_num: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub domain_total: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(deserialize_with = "u64_from_any")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub punycode: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub ext_status: String,
    #[serde(default, deserialize_with = "u32_from_any")]
    pub ttl: u32,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub line: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub line_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ttl: String,
    pub value: String,
    /// Opaque; the provider sends null, a number or a string.
    #[serde(default)]
    pub weight: Value,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mx: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub enabled: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub monitor_status: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub updated_on: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub use_aqb: String,
}

impl Record {
    pub fn is_enabled(&self) -> bool {
        self.enabled == "1"
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = if self.is_enabled() { "E" } else { "D" };
        write!(
            f,
            "[{}] {} ({}): {}",
            flag, self.name, self.record_type, self.value
        )
    }
}

/// Domain.List response. `domains` is empty when the status is a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainList {
    pub status: Status,
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub domains: Vec<Domain>,
}

/// Record.List response. Only `status` is present when the status is a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordList {
    pub status: Status,
    #[serde(default)]
    pub domain: Option<Domain>,
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl RecordList {
    /// First record named `name`, in provider order.
    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.name == name)
    }
}

/// The part of a response every mutating action shares.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusEnvelope {
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateEnvelope {
    pub status: Status,
    #[serde(default)]
    pub record: Option<CreatedRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

// The API encodes several counters and ids as strings in one action and as
// numbers in another.

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(opt_string_or_number(d)?.unwrap_or_default())
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(u8::from(b).to_string())),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

// Anything other than a string or number becomes an empty, failing code.
fn status_code<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn u64_from_any<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("invalid id: {}", n))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid id: {:?}", s))),
        other => Err(D::Error::custom(format!("expected id, got {}", other))),
    }
}

fn u32_from_any<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let raw = u64_from_any(d)?;
    u32::try_from(raw).map_err(|_| D::Error::custom(format!("value out of range: {}", raw)))
}
