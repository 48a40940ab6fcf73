//! Request body writers.

use uuid::Uuid;

use crate::error::ApiError;
use crate::types::CreateHealthCheck;
use crate::xml::XmlWriter;

/// Write a `CreateHealthCheckRequest` document.
///
/// Config fields are emitted only when present, in the order Route 53
/// documents them. An absent or empty caller reference becomes a fresh UUID.
pub fn create_health_check_body(namespace: &str, input: &CreateHealthCheck) -> Result<String, ApiError> {
    let caller_reference = match input.caller_reference.as_deref() {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    let config = &input.config;
    let port = config.port.map(|p| p.to_string());

    let mut w = XmlWriter::new()?;
    w.start("CreateHealthCheckRequest", Some(namespace))?;
    w.text_element("CallerReference", &caller_reference)?;
    w.start("HealthCheckConfig", None)?;
    w.optional_element("IPAddress", config.ip_address.as_deref())?;
    w.optional_element("Port", port.as_deref())?;
    w.optional_element("Type", config.check_type.as_deref())?;
    w.optional_element("ResourcePath", config.resource_path.as_deref())?;
    w.optional_element("FullyQualifiedDomainName", config.fully_qualified_domain_name.as_deref())?;
    w.optional_element("SearchString", config.search_string.as_deref())?;
    w.end("HealthCheckConfig")?;
    w.end("CreateHealthCheckRequest")?;
    w.finish()
}
