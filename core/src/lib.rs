//! Synchronous API client core for Route 53 health checks.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller signs and executes
//! the HTTP round-trip, making the core deterministic and testable.
//!
//! # Design
//! - `Route53Client` is stateless: it holds only a `ClientConfig`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Request bodies and responses are XML; `xml` wraps `quick-xml` in a small
//!   owned tree so parsers can walk tags by name.
//! - `HealthCheck` carries a deleted flag so a handle cannot be deleted twice.
//!
//! ```no_run
//! use route53_core::{ClientConfig, CreateHealthCheck, HealthCheckConfig, Route53Client};
//!
//! let client = Route53Client::with_config(ClientConfig::from_env());
//! let input = CreateHealthCheck::new(HealthCheckConfig {
//!     ip_address: Some("192.0.2.17".to_string()),
//!     port: Some(80),
//!     check_type: Some("HTTP".to_string()),
//!     ..HealthCheckConfig::default()
//! });
//! let request = client.sign(client.build_create_health_check(&input)?)?;
//! // execute `request` with any HTTP client, then:
//! // let health_check = client.parse_create_health_check(response)?;
//! # Ok::<(), route53_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod health_check;
pub mod http;
pub mod request;
pub mod response;
pub mod signing;
pub mod types;
pub mod xml;

pub use client::Route53Client;
pub use config::ClientConfig;
pub use error::ApiError;
pub use health_check::HealthCheck;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use signing::Credentials;
pub use types::{CreateHealthCheck, HealthCheckConfig, HealthCheckPage, ListHealthChecks};
