//! In-memory imitation of the Route 53 health-check endpoints.
//!
//! Speaks the same XML documents as the real service, checks that requests
//! carry an AWS3-HTTPS authorization header (without verifying the
//! signature), and keeps health checks in a `BTreeMap` so listing is ordered
//! by id.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use quick_xml::{escape::escape, events::Event, Reader};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const AUTHORIZATION_HEADER: &str = "x-amzn-authorization";
pub const DEFAULT_MAX_ITEMS: usize = 100;

/// Config tags accepted inside `<HealthCheckConfig>`, in document order.
const CONFIG_TAGS: [&str; 6] = [
    "IPAddress",
    "Port",
    "Type",
    "ResourcePath",
    "FullyQualifiedDomainName",
    "SearchString",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredHealthCheck {
    pub id: String,
    pub caller_reference: String,
    /// `(tag, text)` pairs as received.
    pub config: Vec<(String, String)>,
}

pub type Db = Arc<RwLock<BTreeMap<String, StoredHealthCheck>>>;

#[derive(Deserialize)]
pub struct ListParams {
    pub marker: Option<String>,
    pub maxitems: Option<usize>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(BTreeMap::new()));
    Router::new()
        .route("/{version}/healthcheck", get(list_health_checks).post(create_health_check))
        .route(
            "/{version}/healthcheck/{id}",
            get(get_health_check).delete(delete_health_check),
        )
        .layer(middleware::from_fn(require_signature))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn namespace(version: &str) -> String {
    format!("https://route53.amazonaws.com/doc/{version}/")
}

fn xml_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

fn error_response(status: StatusCode, version: &str, code: &str, message: &str) -> Response {
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><ErrorResponse xmlns="{}"><Error><Type>Sender</Type><Code>{code}</Code><Message>{}</Message></Error><RequestId>{}</RequestId></ErrorResponse>"#,
        namespace(version),
        escape(message),
        Uuid::new_v4(),
    );
    xml_response(status, body)
}

fn health_check_xml(hc: &StoredHealthCheck) -> String {
    let mut out = format!(
        "<HealthCheck><Id>{}</Id><CallerReference>{}</CallerReference><HealthCheckConfig>",
        escape(&hc.id),
        escape(&hc.caller_reference),
    );
    for (tag, text) in &hc.config {
        out.push_str(&format!("<{tag}>{}</{tag}>", escape(text)));
    }
    out.push_str("</HealthCheckConfig></HealthCheck>");
    out
}

fn document(root: &str, version: &str, inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><{root} xmlns="{}">{inner}</{root}>"#,
        namespace(version)
    )
}

async fn require_signature(request: Request, next: Next) -> Response {
    let signed = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("AWS3-HTTPS "));
    if signed {
        return next.run(request).await;
    }
    let version = request
        .uri()
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string();
    debug!(path = %request.uri().path(), "rejecting unsigned request");
    error_response(
        StatusCode::FORBIDDEN,
        &version,
        "MissingAuthenticationToken",
        "Request is missing Authentication Token",
    )
}

/// Parse a `CreateHealthCheckRequest` into caller reference and config pairs.
///
/// Leaf text is taken verbatim. Indentation between elements never reaches a
/// leaf path, so it is ignored.
pub fn parse_create_request(body: &str) -> Result<(String, Vec<(String, String)>), String> {
    let mut reader = Reader::from_str(body);

    let mut path: Vec<String> = Vec::new();
    let mut caller_reference = None;
    let mut config = Vec::new();

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if path.is_empty() && name != "CreateHealthCheckRequest" {
                    return Err(format!("unexpected root element {name}"));
                }
                path.push(name);
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| e.to_string())?.into_owned();
                match path.as_slice() {
                    [_, field] if field == "CallerReference" => caller_reference = Some(text),
                    [_, section, field] if section == "HealthCheckConfig" => {
                        if !CONFIG_TAGS.contains(&field.as_str()) {
                            return Err(format!("unknown HealthCheckConfig field {field}"));
                        }
                        config.push((field.clone(), text));
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let caller_reference = caller_reference
        .filter(|r| !r.is_empty())
        .ok_or_else(|| "CallerReference is required".to_string())?;
    if let Some((_, port)) = config.iter().find(|(tag, _)| tag == "Port") {
        port.parse::<u16>()
            .map_err(|_| format!("invalid port {port}"))?;
    }
    Ok((caller_reference, config))
}

async fn create_health_check(
    State(db): State<Db>,
    Path(version): Path<String>,
    body: String,
) -> Response {
    let (caller_reference, config) = match parse_create_request(&body) {
        Ok(parsed) => parsed,
        Err(message) => {
            return error_response(StatusCode::BAD_REQUEST, &version, "InvalidInput", &message)
        }
    };

    let mut checks = db.write().await;
    if checks.values().any(|hc| hc.caller_reference == caller_reference) {
        return error_response(
            StatusCode::CONFLICT,
            &version,
            "HealthCheckAlreadyExists",
            "A health check with this caller reference already exists",
        );
    }

    let hc = StoredHealthCheck {
        id: Uuid::new_v4().to_string(),
        caller_reference,
        config,
    };
    checks.insert(hc.id.clone(), hc.clone());
    info!(id = %hc.id, "created health check");

    let location = format!("/{version}/healthcheck/{}", hc.id);
    let body = document("CreateHealthCheckResponse", &version, &health_check_xml(&hc));
    (
        StatusCode::CREATED,
        [
            (header::CONTENT_TYPE, "text/xml".to_string()),
            (header::LOCATION, location),
        ],
        body,
    )
        .into_response()
}

async fn get_health_check(
    State(db): State<Db>,
    Path((version, id)): Path<(String, String)>,
) -> Response {
    let checks = db.read().await;
    match checks.get(&id) {
        Some(hc) => xml_response(
            StatusCode::OK,
            document("GetHealthCheckResponse", &version, &health_check_xml(hc)),
        ),
        None => no_such_health_check(&version, &id),
    }
}

async fn list_health_checks(
    State(db): State<Db>,
    Path(version): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let max_items = params.maxitems.unwrap_or(DEFAULT_MAX_ITEMS).max(1);
    let marker = params.marker.unwrap_or_default();

    let checks = db.read().await;
    let mut page: Vec<&StoredHealthCheck> = checks
        .range(marker.clone()..)
        .map(|(_, hc)| hc)
        .take(max_items.saturating_add(1))
        .collect();
    let next = if page.len() > max_items { page.pop() } else { None };

    let mut inner = String::from("<HealthChecks>");
    for hc in &page {
        inner.push_str(&health_check_xml(hc));
    }
    inner.push_str("</HealthChecks>");
    inner.push_str(&format!("<Marker>{}</Marker>", escape(&marker)));
    inner.push_str(&format!("<IsTruncated>{}</IsTruncated>", next.is_some()));
    if let Some(next) = next {
        inner.push_str(&format!("<NextMarker>{}</NextMarker>", escape(&next.id)));
    }
    inner.push_str(&format!("<MaxItems>{max_items}</MaxItems>"));

    xml_response(
        StatusCode::OK,
        document("ListHealthChecksResponse", &version, &inner),
    )
}

async fn delete_health_check(
    State(db): State<Db>,
    Path((version, id)): Path<(String, String)>,
) -> Response {
    let mut checks = db.write().await;
    match checks.remove(&id) {
        Some(_) => {
            info!(%id, "deleted health check");
            xml_response(
                StatusCode::OK,
                document("DeleteHealthCheckResponse", &version, ""),
            )
        }
        None => no_such_health_check(&version, &id),
    }
}

fn no_such_health_check(version: &str, id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        version,
        "NoSuchHealthCheck",
        &format!("A health check with id {id} does not exist."),
    )
}
