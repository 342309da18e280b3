//! Static service resource attached to all telemetry

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Prefix of the reported service name
pub const SERVICE_NAME_PREFIX: &str = "kbot_";

/// Semantic conventions schema the emitted attributes follow
pub const SCHEMA_URL: &str = "https://opentelemetry.io/schemas/1.24.0";

/// Resource attributes identifying this process
///
/// Created once at startup and shared by reference; the service name is
/// `kbot_<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResource {
    version: String,
    service_name: String,
    schema_url: String,
}

impl ServiceResource {
    /// Build the resource for a release version
    pub fn new(version: impl Into<String>) -> Result<Self, DomainError> {
        let version = version.into();
        if version.is_empty() || version.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidVersion(version));
        }

        Ok(Self {
            service_name: format!("{SERVICE_NAME_PREFIX}{version}"),
            version,
            schema_url: SCHEMA_URL.to_string(),
        })
    }

    /// Release version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Service name reported as `service.name`
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Schema URL of the resource attributes
    pub fn schema_url(&self) -> &str {
        &self.schema_url
    }
}
