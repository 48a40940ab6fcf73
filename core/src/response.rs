//! Response body parsers.
//!
//! Every parser works on the namespace-stripped `Element` tree, so responses
//! from any API version with the same tag layout are accepted.

use tracing::trace;

use crate::error::ApiError;
use crate::health_check::HealthCheck;
use crate::types::{HealthCheckConfig, HealthCheckPage};
use crate::xml::Element;

/// Body of a Route 53 `ErrorResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceErrorBody {
    pub error_type: Option<String>,
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

pub fn parse_created_health_check(body: &str) -> Result<HealthCheck, ApiError> {
    let root = expect_root(body, "CreateHealthCheckResponse")?;
    single_health_check(&root)
}

pub fn parse_get_health_check(body: &str) -> Result<HealthCheck, ApiError> {
    let root = expect_root(body, "GetHealthCheckResponse")?;
    single_health_check(&root)
}

pub fn parse_list_health_checks(body: &str) -> Result<HealthCheckPage, ApiError> {
    let root = expect_root(body, "ListHealthChecksResponse")?;

    let health_checks = match root.child("HealthChecks") {
        Some(list) => list
            .children_named("HealthCheck")
            .map(health_check_from_element)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let is_truncated = match root.child_text("IsTruncated") {
        Some(v) => parse_bool(v)?,
        None => false,
    };
    let max_items = root
        .child_text("MaxItems")
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<u32>()
                .map_err(|e| ApiError::DeserializationError(format!("MaxItems {v:?}: {e}")))
        })
        .transpose()?;

    Ok(HealthCheckPage {
        health_checks,
        marker: non_empty(root.child_text("Marker")),
        is_truncated,
        next_marker: non_empty(root.child_text("NextMarker")),
        max_items,
    })
}

/// Parse an `ErrorResponse` document; `None` when the body is anything else.
pub fn parse_error_response(body: &str) -> Option<ServiceErrorBody> {
    let root = Element::parse(body).ok()?;
    if root.name != "ErrorResponse" {
        return None;
    }
    let error = root.child("Error")?;
    Some(ServiceErrorBody {
        error_type: non_empty(error.child_text("Type")),
        code: error.child_text("Code")?.to_string(),
        message: error.child_text("Message").unwrap_or_default().to_string(),
        request_id: non_empty(root.child_text("RequestId")),
    })
}

fn expect_root(body: &str, name: &str) -> Result<Element, ApiError> {
    let root = Element::parse(body)?;
    if root.name != name {
        return Err(ApiError::DeserializationError(format!(
            "expected <{name}>, found <{}>",
            root.name
        )));
    }
    Ok(root)
}

fn single_health_check(root: &Element) -> Result<HealthCheck, ApiError> {
    let element = root.child("HealthCheck").ok_or_else(|| {
        ApiError::DeserializationError(format!("<{}> has no <HealthCheck>", root.name))
    })?;
    health_check_from_element(element)
}

/// Map a `<HealthCheck>` element onto a `HealthCheck`.
fn health_check_from_element(element: &Element) -> Result<HealthCheck, ApiError> {
    let mut id = None;
    let mut caller_reference = None;
    let mut config = HealthCheckConfig::default();

    for field in &element.children {
        match field.name.as_str() {
            "Id" => id = Some(field.text.clone()),
            "CallerReference" => caller_reference = Some(field.text.clone()),
            "HealthCheckConfig" => config = config_from_element(field)?,
            other => trace!(tag = other, "ignoring unknown HealthCheck field"),
        }
    }

    let id = id.ok_or_else(|| missing("Id"))?;
    let caller_reference = caller_reference.ok_or_else(|| missing("CallerReference"))?;
    Ok(HealthCheck::new(id, caller_reference, config))
}

fn config_from_element(element: &Element) -> Result<HealthCheckConfig, ApiError> {
    let text = |name: &str| element.child_text(name).map(str::to_string);

    let port = match element.child_text("Port") {
        Some(p) => Some(
            p.parse::<u16>()
                .map_err(|e| ApiError::DeserializationError(format!("Port {p:?}: {e}")))?,
        ),
        None => None,
    };

    Ok(HealthCheckConfig {
        ip_address: text("IPAddress"),
        port,
        check_type: text("Type"),
        resource_path: text("ResourcePath"),
        fully_qualified_domain_name: text("FullyQualifiedDomainName"),
        search_string: text("SearchString"),
    })
}

fn parse_bool(v: &str) -> Result<bool, ApiError> {
    match v {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ApiError::DeserializationError(format!(
            "IsTruncated {other:?} is not a boolean"
        ))),
    }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.filter(|s| !s.is_empty()).map(str::to_string)
}

fn missing(tag: &str) -> ApiError {
    ApiError::DeserializationError(format!("<HealthCheck> is missing <{tag}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GetHealthCheckResponse xmlns="https://route53.amazonaws.com/doc/2012-12-12/">
   <HealthCheck>
      <Id>Test Health Check</Id>
      <CallerReference>example.com 192.0.2.17</CallerReference>
      <HealthCheckConfig>
         <IPAddress>192.0.2.17</IPAddress>
         <Port>80</Port>
         <Type>HTTP</Type>
         <ResourcePath>/docs/route-53-health-check.html</ResourcePath>
         <FullyQualifiedDomainName>example.com</FullyQualifiedDomainName>
      </HealthCheckConfig>
      <HealthCheckVersion>1</HealthCheckVersion>
   </HealthCheck>
</GetHealthCheckResponse>"#;

    #[test]
    fn get_maps_every_config_tag() {
        let hc = parse_get_health_check(GET).unwrap();
        assert_eq!(hc.id, "Test Health Check");
        assert_eq!(hc.caller_reference, "example.com 192.0.2.17");
        assert_eq!(hc.config.ip_address.as_deref(), Some("192.0.2.17"));
        assert_eq!(hc.config.port, Some(80));
        assert_eq!(hc.config.check_type.as_deref(), Some("HTTP"));
        assert_eq!(
            hc.config.resource_path.as_deref(),
            Some("/docs/route-53-health-check.html")
        );
        assert_eq!(hc.config.fully_qualified_domain_name.as_deref(), Some("example.com"));
        assert_eq!(hc.config.search_string, None);
        assert!(!hc.is_deleted());
    }

    #[test]
    fn wrong_root_is_rejected() {
        let err = parse_created_health_check(GET).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(msg) if msg.contains("CreateHealthCheckResponse")));
    }

    #[test]
    fn missing_id_is_an_error() {
        let body = "<GetHealthCheckResponse><HealthCheck>\
                    <CallerReference>r</CallerReference>\
                    </HealthCheck></GetHealthCheckResponse>";
        assert!(matches!(
            parse_get_health_check(body),
            Err(ApiError::DeserializationError(msg)) if msg.contains("<Id>")
        ));
    }

    #[test]
    fn missing_caller_reference_is_an_error() {
        let body = "<GetHealthCheckResponse><HealthCheck><Id>i</Id>\
                    </HealthCheck></GetHealthCheckResponse>";
        assert!(matches!(
            parse_get_health_check(body),
            Err(ApiError::DeserializationError(msg)) if msg.contains("<CallerReference>")
        ));
    }

    #[test]
    fn padded_values_are_returned_verbatim() {
        let body = "<CreateHealthCheckResponse>\n  <HealthCheck>\n    <Id>i</Id>\n    \
                    <CallerReference> ref </CallerReference>\n    \
                    <HealthCheckConfig>\n      <SearchString>  alive </SearchString>\n    \
                    </HealthCheckConfig>\n  </HealthCheck>\n</CreateHealthCheckResponse>";
        let hc = parse_created_health_check(body).unwrap();
        assert_eq!(hc.caller_reference, " ref ");
        assert_eq!(hc.config.search_string.as_deref(), Some("  alive "));
    }

    #[test]
    fn non_numeric_port_is_an_error() {
        let body = "<GetHealthCheckResponse><HealthCheck><Id>i</Id>\
                    <CallerReference>r</CallerReference>\
                    <HealthCheckConfig><Port>eighty</Port></HealthCheckConfig>\
                    </HealthCheck></GetHealthCheckResponse>";
        assert!(matches!(
            parse_get_health_check(body),
            Err(ApiError::DeserializationError(_))
        ));
    }

    #[test]
    fn list_without_health_checks_element_is_empty() {
        let body = "<ListHealthChecksResponse><Marker/><IsTruncated>false</IsTruncated>\
                    <MaxItems>100</MaxItems></ListHealthChecksResponse>";
        let page = parse_list_health_checks(body).unwrap();
        assert!(page.health_checks.is_empty());
        assert!(!page.is_truncated);
        assert_eq!(page.marker, None);
        assert_eq!(page.max_items, Some(100));
    }

    #[test]
    fn list_reads_paging_fields() {
        let body = "<ListHealthChecksResponse><HealthChecks>\
                    <HealthCheck><Id>a</Id><CallerReference>1</CallerReference></HealthCheck>\
                    <HealthCheck><Id>b</Id><CallerReference>2</CallerReference></HealthCheck>\
                    </HealthChecks><Marker>a</Marker><IsTruncated>true</IsTruncated>\
                    <NextMarker>c</NextMarker><MaxItems>2</MaxItems></ListHealthChecksResponse>";
        let page = parse_list_health_checks(body).unwrap();
        let ids: Vec<&str> = page.health_checks.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(page.marker.as_deref(), Some("a"));
        assert!(page.is_truncated);
        assert_eq!(page.next_marker.as_deref(), Some("c"));
    }

    #[test]
    fn non_boolean_is_truncated_is_an_error() {
        let body = "<ListHealthChecksResponse><HealthChecks/>\
                    <IsTruncated>yes</IsTruncated></ListHealthChecksResponse>";
        assert!(matches!(
            parse_list_health_checks(body),
            Err(ApiError::DeserializationError(msg)) if msg.contains("IsTruncated")
        ));
    }

    #[test]
    fn error_response_is_recognised() {
        let body = r#"<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2012-12-12/">
            <Error><Type>Sender</Type><Code>InvalidInput</Code><Message>bad port</Message></Error>
            <RequestId>req-1</RequestId></ErrorResponse>"#;
        let parsed = parse_error_response(body).unwrap();
        assert_eq!(parsed.error_type.as_deref(), Some("Sender"));
        assert_eq!(parsed.code, "InvalidInput");
        assert_eq!(parsed.message, "bad port");
        assert_eq!(parsed.request_id.as_deref(), Some("req-1"));

        assert!(parse_error_response("internal error").is_none());
        assert!(parse_error_response(GET).is_none());
    }
}
