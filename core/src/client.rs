//! Stateless HTTP request builder and response parser for Route 53 health
//! checks.
//!
//! # Design
//! `Route53Client` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller signs the request, executes the round-trip and
//! hands the response back, keeping the core deterministic and free of I/O.
//!
//! The only lifecycle state lives on `HealthCheck` itself: a deleted handle
//! refuses to build or parse another delete.

use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::health_check::HealthCheck;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::create_health_check_body;
use crate::response::{self, parse_error_response};
use crate::signing::{authorization_header, http_date, AUTHORIZATION_HEADER, DATE_HEADER};
use crate::types::{CreateHealthCheck, HealthCheckPage, ListHealthChecks};

/// Characters left unescaped in a path segment or query value.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Synchronous, stateless client for the Route 53 health-check API.
#[derive(Debug, Clone)]
pub struct Route53Client {
    config: ClientConfig,
}

impl Route53Client {
    /// Client for `base_url` with the default API version and no credentials.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(mut config: ClientConfig) -> Self {
        config.endpoint = config.endpoint.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, resource: &str) -> String {
        format!(
            "{}/{}/{resource}",
            self.config.endpoint, self.config.api_version
        )
    }

    fn health_check_url(&self, id: &str) -> String {
        self.url(&format!("healthcheck/{}", utf8_percent_encode(id, UNRESERVED)))
    }

    pub fn build_create_health_check(&self, input: &CreateHealthCheck) -> Result<HttpRequest, ApiError> {
        let body = create_health_check_body(&self.config.xml_namespace(), input)?;
        let req = HttpRequest {
            method: HttpMethod::Post,
            path: self.url("healthcheck"),
            headers: vec![("content-type".to_string(), "text/xml".to_string())],
            body: Some(body),
        };
        debug!(method = req.method.as_str(), path = %req.path, "built create health check request");
        Ok(req)
    }

    pub fn build_get_health_check(&self, id: &str) -> HttpRequest {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: self.health_check_url(id),
            headers: Vec::new(),
            body: None,
        };
        debug!(method = req.method.as_str(), path = %req.path, "built get health check request");
        req
    }

    pub fn build_list_health_checks(&self, params: &ListHealthChecks) -> HttpRequest {
        let mut query = Vec::new();
        if let Some(marker) = &params.marker {
            query.push(format!("marker={}", utf8_percent_encode(marker, UNRESERVED)));
        }
        if let Some(max_items) = params.max_items {
            query.push(format!("maxitems={max_items}"));
        }

        let mut path = self.url("healthcheck");
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }
        let req = HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        };
        debug!(method = req.method.as_str(), path = %req.path, "built list health checks request");
        req
    }

    pub fn build_delete_health_check_by_id(&self, id: &str) -> HttpRequest {
        let req = HttpRequest {
            method: HttpMethod::Delete,
            path: self.health_check_url(id),
            headers: Vec::new(),
            body: None,
        };
        debug!(method = req.method.as_str(), path = %req.path, "built delete health check request");
        req
    }

    /// Build the delete request for a health check handle.
    ///
    /// Fails with `AlreadyDeleted` if the handle has been deleted before.
    pub fn build_delete_health_check(&self, health_check: &HealthCheck) -> Result<HttpRequest, ApiError> {
        health_check.ensure_not_deleted()?;
        Ok(self.build_delete_health_check_by_id(&health_check.id))
    }

    /// Sign `request` with the current time.
    pub fn sign(&self, request: HttpRequest) -> Result<HttpRequest, ApiError> {
        self.sign_at(request, &http_date(Utc::now()))
    }

    /// Sign `request` with a caller-supplied RFC 1123 date.
    pub fn sign_at(&self, mut request: HttpRequest, date: &str) -> Result<HttpRequest, ApiError> {
        let credentials = self
            .config
            .credentials
            .as_ref()
            .ok_or(ApiError::MissingCredentials)?;
        request.set_header(DATE_HEADER, date.to_string());
        request.set_header(AUTHORIZATION_HEADER, authorization_header(credentials, date));
        debug!(method = request.method.as_str(), path = %request.path, date, "signed request");
        Ok(request)
    }

    pub fn parse_create_health_check(&self, response: HttpResponse) -> Result<HealthCheck, ApiError> {
        check_status(&response, 201)?;
        let health_check = response::parse_created_health_check(&response.body)?;
        debug!(id = %health_check.id, "created health check");
        Ok(health_check)
    }

    pub fn parse_get_health_check(&self, response: HttpResponse) -> Result<HealthCheck, ApiError> {
        check_status(&response, 200)?;
        let health_check = response::parse_get_health_check(&response.body)?;
        debug!(id = %health_check.id, "fetched health check");
        Ok(health_check)
    }

    pub fn parse_list_health_checks(&self, response: HttpResponse) -> Result<HealthCheckPage, ApiError> {
        check_status(&response, 200)?;
        let page = response::parse_list_health_checks(&response.body)?;
        debug!(
            count = page.health_checks.len(),
            is_truncated = page.is_truncated,
            "listed health checks"
        );
        Ok(page)
    }

    pub fn parse_delete_health_check_by_id(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)?;
        debug!(status = response.status, "delete health check accepted");
        Ok(())
    }

    /// Parse the delete response for `health_check` and mark the handle
    /// deleted on success. A failed delete leaves the handle usable.
    pub fn parse_delete_health_check(
        &self,
        health_check: &mut HealthCheck,
        response: HttpResponse,
    ) -> Result<(), ApiError> {
        health_check.ensure_not_deleted()?;
        self.parse_delete_health_check_by_id(response)?;
        health_check.mark_deleted();
        debug!(id = %health_check.id, "deleted health check");
        Ok(())
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    if let Some(error) = parse_error_response(&response.body) {
        warn!(
            status = response.status,
            code = %error.code,
            request_id = error.request_id.as_deref().unwrap_or("-"),
            "service returned an error"
        );
        return Err(ApiError::ServiceError {
            status: response.status,
            code: error.code,
            message: error.message,
        });
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
