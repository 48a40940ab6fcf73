//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network. The caller (host) executes the actual I/O with
//! whatever client it already uses.
//!
//! All fields use owned types (`String`, `Vec`) so values can be stored,
//! logged, or handed to another thread without lifetime concerns.

/// HTTP method for a request. Route 53 health checks are never updated in
/// place, so there is no `Put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `Route53Client::build_*` methods and optionally passed through
/// `Route53Client::sign`. `path` is the absolute URL, query string included.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Set `name` to `value`, replacing any header with the same name
    /// (compared case-insensitively).
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed
/// to `Route53Client::parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_header_replaces_existing_value_case_insensitively() {
        let mut req = HttpRequest {
            method: HttpMethod::Get,
            path: "http://localhost/".to_string(),
            headers: vec![("X-Amz-Date".to_string(), "old".to_string())],
            body: None,
        };
        req.set_header("x-amz-date", "new".to_string());
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("X-AMZ-DATE"), Some("new"));
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 201,
            headers: vec![("Location".to_string(), "/x".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("location"), Some("/x"));
        assert_eq!(response.header("etag"), None);
    }
}
