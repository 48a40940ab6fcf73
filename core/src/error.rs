//! Error types for the Route 53 client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the health check does not exist" from other failures. Non-success
//! responses whose body is a Route 53 `ErrorResponse` land in `ServiceError`
//! with the service's error code; anything else keeps the raw status and body
//! in `HttpError` for debugging.

use thiserror::Error;

/// Errors returned by `Route53Client` build, sign and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested health check does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned an `ErrorResponse` document.
    #[error("HTTP {status}: {code}: {message}")]
    ServiceError {
        status: u16,
        code: String,
        message: String,
    },

    /// The server returned an unexpected status without a parseable error body.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be parsed into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be written as XML.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The health check was deleted through this handle already.
    #[error("can't manipulate a deleted health check")]
    AlreadyDeleted,

    /// Signing was requested but the client has no credentials.
    #[error("no credentials configured for request signing")]
    MissingCredentials,
}
