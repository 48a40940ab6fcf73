//! Client configuration.
//!
//! Values come from code or from the environment. Nothing here is validated
//! beyond stripping a trailing slash from the endpoint; a bad endpoint shows
//! up as a transport error when the host executes the request.

use crate::signing::Credentials;

pub const DEFAULT_ENDPOINT: &str = "https://route53.amazonaws.com";
pub const DEFAULT_API_VERSION: &str = "2012-12-12";

pub const ENV_ENDPOINT: &str = "ROUTE53_ENDPOINT";
pub const ENV_API_VERSION: &str = "ROUTE53_API_VERSION";
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_version: String,
    pub credentials: Option<Credentials>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            credentials: None,
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mut config = match get(ENV_ENDPOINT) {
            Some(endpoint) => Self::new(&endpoint),
            None => Self::default(),
        };
        if let Some(version) = get(ENV_API_VERSION) {
            config.api_version = version;
        }
        if let (Some(id), Some(secret)) = (get(ENV_ACCESS_KEY_ID), get(ENV_SECRET_ACCESS_KEY)) {
            config.credentials = Some(Credentials::new(id, secret));
        }
        config
    }

    /// XML namespace used by request and response documents.
    pub fn xml_namespace(&self) -> String {
        format!("https://route53.amazonaws.com/doc/{}/", self.api_version)
    }
}
