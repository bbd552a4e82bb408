//! Authenticated calls to vendor REST APIs

use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::provider::OAuthProvider;
use crate::error::{ApiError, ApiResult};

/// One vendor API call, relative to the provider's API base
#[derive(Debug, Clone)]
pub struct VendorRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl VendorRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query pair only when a value is present
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// How the vendor call is authorized
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    Bearer(&'a str),
    ApiKey(&'a str),
}

/// Successful vendor response; `None` body for empty (204) replies
pub type VendorBody = Option<Value>;

impl OAuthProvider {
    /// Send `request`; non-2xx statuses become [`ApiError::Upstream`]
    pub async fn call(
        &self,
        http: &reqwest::Client,
        credential: Credential<'_>,
        request: VendorRequest,
    ) -> ApiResult<VendorBody> {
        let url = format!("{}{}", self.api_base, request.path);
        debug!(provider = self.kind.name(), method = %request.method, %url, "Vendor request");

        let mut builder = http.request(request.method, &url).query(&request.query);
        builder = match credential {
            Credential::Bearer(token) => builder.bearer_auth(token),
            Credential::ApiKey(key) => builder.query(&[("key", key)]),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ApiError::Upstream {
            status: 502,
            message: format!("{} API unreachable", self.kind.name()),
            details: Value::String(e.to_string()),
        })?;
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        if !(200..300).contains(&status) {
            return Err(ApiError::Upstream {
                status,
                message: format!("{} API request failed", self.kind.name()),
                details: serde_json::from_str(&text).unwrap_or(Value::String(text)),
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(
            serde_json::from_str(&text).unwrap_or(Value::String(text)),
        ))
    }
}
