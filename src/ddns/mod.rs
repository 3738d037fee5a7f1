//! The dynamic DNS edit path: point one configured record at a new address.

use std::fmt;

use tracing::{error, info, warn};

use crate::config::DdnsConfig;
use crate::dns::{DnsPodClient, DomainRef, ModifyRecord, Result, Transport};

/// The record an update targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdnsTarget {
    pub domain: DomainRef,
    pub sub_domain: String,
    pub record_type: String,
    pub record_line_id: String,
}

impl From<&DdnsConfig> for DdnsTarget {
    fn from(config: &DdnsConfig) -> Self {
        Self {
            domain: config.domain.parse().unwrap_or_else(|e| match e {}),
            sub_domain: config.sub_domain.clone(),
            record_type: config.record_type.clone(),
            record_line_id: config.record_line_id.clone(),
        }
    }
}

impl fmt::Display for DdnsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sub_domain, self.domain)
    }
}

/// What the caller of an update gets to see. Details go to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Succeeded,
    Failed,
}

impl UpdateOutcome {
    pub fn message(self) -> &'static str {
        match self {
            UpdateOutcome::Succeeded => "DNS record updated",
            UpdateOutcome::Failed => "DNS record update failed",
        }
    }

    pub fn is_success(self) -> bool {
        self == UpdateOutcome::Succeeded
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Id of the first record in `domain` named `sub_domain`, in provider order.
///
/// A rejected listing counts as no match.
pub async fn find_record_id<T: Transport>(
    client: &DnsPodClient<T>,
    domain: &DomainRef,
    sub_domain: &str,
) -> Result<Option<String>> {
    let list = client.record_list(domain).await?;
    if !list.status.is_success() {
        warn!(
            "Record list for {} rejected (code {:?}): {}",
            domain, list.status.code, list.status.message
        );
    }
    Ok(list.find_by_name(sub_domain).map(|r| r.id.clone()))
}

/// Points `target` at `ip`.
///
/// When no record matches, Record.Modify is still sent with an empty record
/// id and the provider's answer decides the outcome.
pub async fn edit_ip<T: Transport>(
    client: &DnsPodClient<T>,
    target: &DdnsTarget,
    ip: &str,
) -> UpdateOutcome {
    match try_edit_ip(client, target, ip).await {
        Ok(true) => {
            info!("Successfully updated {} to {}", target, ip);
            UpdateOutcome::Succeeded
        }
        Ok(false) => {
            warn!("Provider refused to update {} to {}", target, ip);
            UpdateOutcome::Failed
        }
        Err(e) if e.is_transport() => {
            error!("Failed to reach DNSPod while updating {}: {}", target, e);
            UpdateOutcome::Failed
        }
        Err(e) => {
            error!("Failed to update {}: {}", target, e);
            UpdateOutcome::Failed
        }
    }
}

async fn try_edit_ip<T: Transport>(
    client: &DnsPodClient<T>,
    target: &DdnsTarget,
    ip: &str,
) -> Result<bool> {
    let record_id = find_record_id(client, &target.domain, &target.sub_domain).await?;
    if record_id.is_none() {
        warn!("No record named {:?} in {}", target.sub_domain, target.domain);
    }

    let request = ModifyRecord::new(
        target.domain.clone(),
        record_id.unwrap_or_default(),
        ip,
        target.sub_domain.as_str(),
    )
    .record_type(target.record_type.as_str())
    .record_line_id(target.record_line_id.as_str());

    client.modify(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_config() {
        let config = DdnsConfig {
            domain: "example.com".to_string(),
            sub_domain: "home".to_string(),
            record_type: "A".to_string(),
            record_line_id: "0".to_string(),
            ip_lookup_urls: Vec::new(),
        };

        let target = DdnsTarget::from(&config);
        assert_eq!(target.domain, DomainRef::Name("example.com".to_string()));
        assert_eq!(target.to_string(), "home.example.com");

        let by_id = DdnsTarget::from(&DdnsConfig {
            domain: "2059079".to_string(),
            ..config
        });
        assert_eq!(by_id.domain, DomainRef::Id(2059079));
    }

    #[test]
    fn test_exactly_two_messages() {
        assert_ne!(
            UpdateOutcome::Succeeded.message(),
            UpdateOutcome::Failed.message()
        );
        assert!(UpdateOutcome::Succeeded.is_success());
        assert!(!UpdateOutcome::Failed.is_success());
    }
}
