use log::warn;
use reqwest::{Client, Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::env_config::Config;
use crate::error::{AppError, Res};

/// Query parameters of a request, in order.
pub type Query = [(&'static str, String)];

/// Thin wrapper over `reqwest` that knows the backend base URL and the
/// current bearer token.
///
/// Every call is a single attempt: no retries, no timeout beyond the
/// transport default. Non-success responses are classified with
/// [`AppError::from_response`], using `fallback` when the backend does not
/// supply a message.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        ApiClient {
            client: Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL without its trailing slash, used to build public links.
    pub fn base_str(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Resolves `path` against the base URL, keeping any base path prefix.
    pub fn url(&self, path: &str) -> Res<Url> {
        let joined = format!("{}/{}", self.base_str(), path.trim_start_matches('/'));
        Ok(Url::parse(&joined)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Res<T> {
        let res = self.execute(Method::GET, path, &[], None, fallback).await?;
        decode(res).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        fallback: &str,
    ) -> Res<T> {
        let res = self.execute(Method::GET, path, query, None, fallback).await?;
        decode(res).await
    }

    /// Downloads a raw body (e.g. a CSV export).
    pub async fn get_bytes(&self, path: &str, query: &Query, fallback: &str) -> Res<Vec<u8>> {
        let res = self.execute(Method::GET, path, query, None, fallback).await?;
        Ok(res.bytes().await?.to_vec())
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Res<T> {
        let body = serde_json::to_value(body)?;
        let res = self.execute(Method::POST, path, &[], Some(body), fallback).await?;
        decode(res).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Res<T> {
        let body = serde_json::to_value(body)?;
        let res = self.execute(Method::PUT, path, &[], Some(body), fallback).await?;
        decode(res).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Res<T> {
        let res = self.execute(Method::DELETE, path, &[], None, fallback).await?;
        decode(res).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Value>,
        fallback: &str,
    ) -> Res<Response> {
        let url = self.url(path)?;
        let request_id = Uuid::new_v4().to_string();
        let mut exchange = logger::middleware(&request_id, method.as_str(), url.path());

        let mut req = self
            .client
            .request(method, url)
            .header("X-Request-Id", &request_id);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &body {
            exchange = exchange.with_body(body);
            req = req.json(body);
        }

        let res = match req.send().await {
            Ok(res) => res,
            Err(err) => {
                exchange.failed(&err);
                return Err(AppError::from(err));
            }
        };

        let status = res.status();
        exchange.finish(status.as_u16());
        if status.is_success() {
            return Ok(res);
        }

        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
        if body.is_null() && !text.is_empty() {
            warn!("Non-JSON error body from {}: {}", path, text);
        }
        Err(AppError::from_response(status, &body, fallback))
    }
}

/// Decodes a success body; an empty body decodes as JSON `null` so that
/// `()`, `Option<_>` and `Value` targets accept `204 No Content`.
async fn decode<T: DeserializeOwned>(res: Response) -> Res<T> {
    let bytes = res.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    serde_json::from_slice(&bytes).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_keeps_base_path_prefix() {
        let api = ApiClient::new(Url::parse("https://example.com/backend/").unwrap());
        assert_eq!(
            api.url("/api/forms").unwrap().as_str(),
            "https://example.com/backend/api/forms"
        );
        assert_eq!(api.base_str(), "https://example.com/backend");
    }

    #[test]
    fn token_lifecycle() {
        let mut api = ApiClient::new(Url::parse("http://localhost:3002").unwrap());
        assert!(!api.has_token());
        api.set_token("abc");
        assert_eq!(api.token(), Some("abc"));
        api.clear_token();
        assert_eq!(api.token(), None);
    }
}
