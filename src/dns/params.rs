//! Canonical parameter bags for every remote action.
//!
//! Each action has exactly one place where its bag is assembled. Convenience
//! defaults live in the request constructors, and optional fields are left
//! out of the bag entirely rather than sent empty.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Display name of the provider's default resolution line.
pub const DEFAULT_LINE: &str = "默认";

/// `record_line_id` sent by Record.Modify when the caller gives none.
///
/// This is a line id while [`DEFAULT_LINE`] is a line name. The two defaults
/// are kept as the API consumers already rely on them.
pub const DEFAULT_MODIFY_LINE_ID: &str = "0";

pub const DEFAULT_RECORD_TYPE: &str = "A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RecordCreate,
    DomainList,
    DomainStatus,
    RecordList,
    RecordModify,
    RecordRemove,
    RecordStatus,
    RecordDdns,
    RecordRemark,
    RecordInfo,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::RecordCreate => "Record.Create",
            Action::DomainList => "Domain.List",
            Action::DomainStatus => "Domain.Status",
            Action::RecordList => "Record.List",
            Action::RecordModify => "Record.Modify",
            Action::RecordRemove => "Record.Remove",
            Action::RecordStatus => "Record.Status",
            Action::RecordDdns => "Record.Ddns",
            Action::RecordRemark => "Record.Remark",
            Action::RecordInfo => "Record.Info",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form parameters for one remote call. Keys are unique and iterate sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// Inserts `value` only when present.
    pub fn insert_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Inserts `value` only when it has non-whitespace content.
    pub fn insert_non_blank(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// A zone addressed either by its numeric id or by its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainRef {
    Id(u64),
    Name(String),
}

impl DomainRef {
    /// Writes `domain_id` or `domain`, never both.
    pub fn apply(&self, params: &mut Params) {
        match self {
            DomainRef::Id(id) => params.insert("domain_id", id),
            DomainRef::Name(name) => params.insert("domain", name),
        }
    }

    pub fn params(&self) -> Params {
        let mut params = Params::new();
        self.apply(&mut params);
        params
    }
}

impl From<u64> for DomainRef {
    fn from(id: u64) -> Self {
        DomainRef::Id(id)
    }
}

impl From<&str> for DomainRef {
    fn from(name: &str) -> Self {
        DomainRef::Name(name.to_string())
    }
}

impl From<String> for DomainRef {
    fn from(name: String) -> Self {
        DomainRef::Name(name)
    }
}

/// All-digit input is a domain id, anything else a domain name.
impl FromStr for DomainRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(id) => DomainRef::Id(id),
            Err(_) => DomainRef::Name(s.to_string()),
        })
    }
}

impl fmt::Display for DomainRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainRef::Id(id) => write!(f, "#{}", id),
            DomainRef::Name(name) => f.write_str(name),
        }
    }
}

/// Resolution line, by display name (`record_line`) or id (`record_line_id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLine {
    Name(String),
    Id(String),
}

impl RecordLine {
    fn apply(&self, params: &mut Params) {
        match self {
            RecordLine::Name(name) => params.insert("record_line", name),
            RecordLine::Id(id) => params.insert("record_line_id", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Enable,
    Disable,
}

impl RecordState {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordState::Enable => "enable",
            RecordState::Disable => "disable",
        }
    }
}

impl From<bool> for RecordState {
    fn from(enabled: bool) -> Self {
        if enabled {
            RecordState::Enable
        } else {
            RecordState::Disable
        }
    }
}

/// Bag for Domain.Status.
pub fn domain_status_params(domain: &DomainRef, state: RecordState) -> Params {
    domain.params().with("status", state.as_str())
}

/// Bag for Record.Remove and Record.Info.
pub fn record_params(domain: &DomainRef, record_id: &str) -> Params {
    domain.params().with("record_id", record_id)
}

/// Bag for Record.Status.
pub fn record_status_params(domain: &DomainRef, record_id: &str, state: RecordState) -> Params {
    record_params(domain, record_id).with("status", state.as_str())
}

/// Bag for Record.Remark. The action only accepts a numeric domain id.
pub fn remark_params(domain_id: u64, record_id: &str, remark: &str) -> Params {
    Params::new()
        .with("domain_id", domain_id)
        .with("record_id", record_id)
        .with("remark", remark)
}

/// Record.Create request.
///
/// The line default depends on how the domain is addressed: by id the default
/// line is sent by name (`record_line`), by name it is sent as `record_line_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecord {
    pub domain: DomainRef,
    pub sub_domain: String,
    pub value: String,
    pub record_type: String,
    pub line: RecordLine,
    pub mx: Option<u16>,
    pub ttl: Option<u32>,
}

impl CreateRecord {
    pub fn new(
        domain: impl Into<DomainRef>,
        sub_domain: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let domain = domain.into();
        let line = match domain {
            DomainRef::Id(_) => RecordLine::Name(DEFAULT_LINE.to_string()),
            DomainRef::Name(_) => RecordLine::Id(DEFAULT_LINE.to_string()),
        };
        Self {
            domain,
            sub_domain: sub_domain.into(),
            value: value.into(),
            record_type: DEFAULT_RECORD_TYPE.to_string(),
            line,
            mx: None,
            ttl: None,
        }
    }

    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    pub fn line(mut self, line: RecordLine) -> Self {
        self.line = line;
        self
    }

    pub fn mx(mut self, mx: u16) -> Self {
        self.mx = Some(mx);
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn params(&self) -> Params {
        let mut params = self.domain.params();
        params.insert("sub_domain", &self.sub_domain);
        params.insert("record_type", &self.record_type);
        self.line.apply(&mut params);
        params.insert("value", &self.value);
        params.insert_opt("mx", self.mx);
        params.insert_opt("ttl", self.ttl);
        params
    }
}

/// Record.Modify request. Every field is always sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyRecord {
    pub domain: DomainRef,
    pub record_id: String,
    pub value: String,
    pub sub_domain: String,
    pub record_type: String,
    pub record_line_id: String,
}

impl ModifyRecord {
    pub fn new(
        domain: impl Into<DomainRef>,
        record_id: impl Into<String>,
        value: impl Into<String>,
        sub_domain: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            record_id: record_id.into(),
            value: value.into(),
            sub_domain: sub_domain.into(),
            record_type: DEFAULT_RECORD_TYPE.to_string(),
            record_line_id: DEFAULT_MODIFY_LINE_ID.to_string(),
        }
    }

    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    pub fn record_line_id(mut self, record_line_id: impl Into<String>) -> Self {
        self.record_line_id = record_line_id.into();
        self
    }

    pub fn params(&self) -> Params {
        let mut params = record_params(&self.domain, &self.record_id);
        params.insert("value", &self.value);
        params.insert("sub_domain", &self.sub_domain);
        params.insert("record_type", &self.record_type);
        params.insert("record_line_id", &self.record_line_id);
        params
    }
}

/// Record.Ddns request.
///
/// A blank `sub_domain` is left out of the bag instead of being sent empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdnsUpdate {
    pub domain: DomainRef,
    pub record_id: String,
    pub value: String,
    pub sub_domain: Option<String>,
    pub record_line: String,
}

impl DdnsUpdate {
    pub fn new(
        domain: impl Into<DomainRef>,
        record_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            record_id: record_id.into(),
            value: value.into(),
            sub_domain: None,
            record_line: DEFAULT_LINE.to_string(),
        }
    }

    pub fn sub_domain(mut self, sub_domain: impl Into<String>) -> Self {
        self.sub_domain = Some(sub_domain.into());
        self
    }

    pub fn record_line(mut self, record_line: impl Into<String>) -> Self {
        self.record_line = record_line.into();
        self
    }

    pub fn params(&self) -> Params {
        let mut params = record_params(&self.domain, &self.record_id);
        params.insert("value", &self.value);
        params.insert("record_line", &self.record_line);
        params.insert_non_blank("sub_domain", self.sub_domain.as_deref());
        params
    }
}

/// Record.List request with optional server-side filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordListQuery {
    pub domain: Option<DomainRef>,
    pub sub_domain: Option<String>,
    pub record_type: Option<String>,
    pub keyword: Option<String>,
    pub offset: Option<u32>,
    pub length: Option<u32>,
}

impl RecordListQuery {
    pub fn new(domain: impl Into<DomainRef>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..Default::default()
        }
    }

    pub fn sub_domain(mut self, sub_domain: impl Into<String>) -> Self {
        self.sub_domain = Some(sub_domain.into());
        self
    }

    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn page(mut self, offset: u32, length: u32) -> Self {
        self.offset = Some(offset);
        self.length = Some(length);
        self
    }

    pub fn params(&self) -> Params {
        let mut params = Params::new();
        if let Some(domain) = &self.domain {
            domain.apply(&mut params);
        }
        params.insert_non_blank("sub_domain", self.sub_domain.as_deref());
        params.insert_non_blank("record_type", self.record_type.as_deref());
        params.insert_non_blank("keyword", self.keyword.as_deref());
        params.insert_opt("offset", self.offset);
        params.insert_opt("length", self.length);
        params
    }
}
