use std::fmt;

use crate::error::ApiError;
use crate::types::HealthCheckConfig;

/// A health check as returned by Route 53.
///
/// Values are obtained through `Route53Client::parse_*`. Once the delete
/// response for this handle has been parsed, the handle refuses further
/// operations with `ApiError::AlreadyDeleted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    pub id: String,
    pub caller_reference: String,
    pub config: HealthCheckConfig,
    deleted: bool,
}

impl HealthCheck {
    pub fn new(id: String, caller_reference: String, config: HealthCheckConfig) -> Self {
        Self {
            id,
            caller_reference,
            config,
            deleted: false,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn ensure_not_deleted(&self) -> Result<(), ApiError> {
        if self.deleted {
            return Err(ApiError::AlreadyDeleted);
        }
        Ok(())
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

impl fmt::Display for HealthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ip = self.config.ip_address.as_deref().unwrap_or("-");
        write!(f, "<HealthCheck: {ip} -- {}>", self.id)
    }
}
