//! Request inputs and list results for the health-check API.
//!
//! # Design
//! Every `HealthCheckConfig` field is optional and passed through unchecked;
//! Route 53 is the authority on which combinations are valid. The serde
//! derives let callers keep these inputs in their own config files.

use serde::{Deserialize, Serialize};

use crate::health_check::HealthCheck;

/// What a health check probes and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// `HTTP`, `TCP`, ... as understood by the service.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub check_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_string: Option<String>,
}

/// Request payload for creating a health check.
///
/// A missing or empty `caller_reference` is replaced by a random UUID when the
/// request is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHealthCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_reference: Option<String>,
    #[serde(default)]
    pub config: HealthCheckConfig,
}

impl CreateHealthCheck {
    pub fn new(config: HealthCheckConfig) -> Self {
        Self {
            caller_reference: None,
            config,
        }
    }

    pub fn with_caller_reference(mut self, caller_reference: impl Into<String>) -> Self {
        self.caller_reference = Some(caller_reference.into());
        self
    }
}

/// Paging parameters for `ListHealthChecks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListHealthChecks {
    pub marker: Option<String>,
    pub max_items: Option<u32>,
}

/// One page of a `ListHealthChecks` response.
#[derive(Debug, Clone)]
pub struct HealthCheckPage {
    pub health_checks: Vec<HealthCheck>,
    pub marker: Option<String>,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
    pub max_items: Option<u32>,
}

impl HealthCheckPage {
    /// Parameters for the page after this one, or `None` on the last page.
    pub fn next_page(&self) -> Option<ListHealthChecks> {
        if !self.is_truncated {
            return None;
        }
        self.next_marker.as_ref().map(|marker| ListHealthChecks {
            marker: Some(marker.clone()),
            max_items: self.max_items,
        })
    }
}
