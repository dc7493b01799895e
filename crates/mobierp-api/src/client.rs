// REST client for the ERP backend.
//
// Wraps `reqwest::Client` with `/api/<resource>` URL construction, query
// encoding, envelope normalization and status-to-error mapping. Endpoint
// knowledge stops at the resource name: the client moves JSON values and
// leaves typing to the caller.

use std::fmt::Display;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::envelope::{normalize_collection, normalize_object};
use crate::error::Error;
use crate::query::ListQuery;
use crate::transport::TransportConfig;

/// Error body shape: `{"message": "..."}` or `{"error": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

/// Longest slice of a raw error body carried into an error message.
const BODY_PREVIEW: usize = 200;

/// Async client for the ERP REST backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a transport config.
    ///
    /// `base_url` is the backend root (e.g. `https://erp.example.com`);
    /// resource paths are appended as `/api/<resource>`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: Some(transport.timeout),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: None,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/{resource}`
    pub fn collection_url(&self, resource: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let resource = resource.trim_matches('/');
        Ok(Url::parse(&format!("{base}/api/{resource}"))?)
    }

    /// `{base}/api/{resource}/{id}`
    pub fn record_url(&self, resource: &str, id: impl Display) -> Result<Url, Error> {
        let mut url = self.collection_url(resource)?;
        let id = id.to_string();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(&id);
        Ok(url)
    }

    // ── Resource operations ──────────────────────────────────────────

    /// `GET /api/{resource}` -- the whole collection, envelope removed.
    pub async fn list(&self, resource: &str, query: &ListQuery) -> Result<Vec<Value>, Error> {
        let url = self.collection_url(resource)?;
        let params = query.to_params();
        debug!("GET {url} params={params:?}");

        let resp = self.send(self.http.get(url).query(&params)).await?;
        let body = Self::handle_response(resp).await?;
        Ok(normalize_collection(body))
    }

    /// `GET /api/{resource}/{id}` -- one record, envelope removed.
    pub async fn get(
        &self,
        resource: &str,
        id: impl Display,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        let url = self.record_url(resource, id)?;
        let params = query.to_params();
        debug!("GET {url} params={params:?}");

        let path = url.path().to_owned();
        let resp = self.send(self.http.get(url).query(&params)).await?;
        let body = Self::handle_response(resp).await?;
        normalize_object(body).ok_or(Error::NotFound { path })
    }

    /// `POST /api/{resource}`
    pub async fn create<B: Serialize + Sync>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<Value, Error> {
        let url = self.collection_url(resource)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        let body = Self::handle_response(resp).await?;
        Ok(normalize_object(body.clone()).unwrap_or(body))
    }

    /// `PUT /api/{resource}/{id}` -- full or partial body.
    pub async fn update<B: Serialize + Sync>(
        &self,
        resource: &str,
        id: impl Display,
        body: &B,
    ) -> Result<Value, Error> {
        let url = self.record_url(resource, id)?;
        debug!("PUT {url}");

        let resp = self.send(self.http.put(url).json(body)).await?;
        let body = Self::handle_response(resp).await?;
        Ok(normalize_object(body.clone()).unwrap_or(body))
    }

    /// `DELETE /api/{resource}/{id}` -- any response body is ignored.
    pub async fn delete(&self, resource: &str, id: impl Display) -> Result<(), Error> {
        let url = self.record_url(resource, id)?;
        debug!("DELETE {url}");

        let resp = self.send(self.http.delete(url)).await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| match self.timeout {
            Some(timeout) if e.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(e),
        })
    }

    /// Decode a success body as JSON. An empty body decodes to `null`.
    async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        trace!(bytes = body.len(), "response body received");
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let path = resp.url().path().to_owned();

        if status == StatusCode::UNAUTHORIZED {
            return Error::Unauthorized;
        }
        if status == StatusCode::NOT_FOUND {
            return Error::NotFound { path };
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|body| {
                body.message.or_else(|| match body.error {
                    Some(Value::String(s)) => Some(s),
                    Some(other @ Value::Object(_)) => other
                        .get("message")
                        .and_then(Value::as_str)
                        .map(String::from),
                    _ => None,
                })
            })
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    preview(&raw).to_owned()
                }
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Truncate to at most `BODY_PREVIEW` bytes on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW {
        return body;
    }
    let mut end = BODY_PREVIEW;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn collection_url_joins_api_prefix() {
        let c = client("https://erp.example.com/");
        assert_eq!(
            c.collection_url("purchase-receives").unwrap().as_str(),
            "https://erp.example.com/api/purchase-receives"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let c = client("https://example.com/erp");
        assert_eq!(
            c.record_url("staff", 42).unwrap().as_str(),
            "https://example.com/erp/api/staff/42"
        );
    }

    #[test]
    fn record_ids_are_escaped() {
        let c = client("https://erp.example.com");
        assert_eq!(
            c.record_url("products", "a/b").unwrap().as_str(),
            "https://erp.example.com/api/products/a%2Fb"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= BODY_PREVIEW);
        assert!(body.starts_with(cut));
    }
}
