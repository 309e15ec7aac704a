//! HTTP request types, the fluent builder, and its fetch terminals.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::{Authentication, HttpClient};
use crate::error::{HttpError, ResponseError, Result};
use crate::response::HttpResponse;

/// HTTP request methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP HEAD method.
    Head,
    /// HTTP POST method.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method.
    Delete,
    /// HTTP CONNECT method.
    Connect,
    /// HTTP OPTIONS method.
    Options,
    /// HTTP TRACE method.
    Trace,
    /// HTTP PATCH method.
    Patch,
}

impl HttpMethod {
    /// Convert to reqwest method.
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Head => reqwest::Method::HEAD,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Connect => reqwest::Method::CONNECT,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Trace => reqwest::Method::TRACE,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Head => write!(f, "HEAD"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Connect => write!(f, "CONNECT"),
            Self::Options => write!(f, "OPTIONS"),
            Self::Trace => write!(f, "TRACE"),
            Self::Patch => write!(f, "PATCH"),
        }
    }
}

/// The body of an HTTP request.
#[derive(Clone, Debug)]
pub enum RequestBody {
    /// No body.
    None,
    /// Plain text body.
    Text(String),
    /// JSON body (serialized from a value).
    Json(serde_json::Value),
    /// URL-encoded form data.
    Form(HashMap<String, String>),
    /// Raw binary body.
    Bytes(Bytes),
}

impl Default for RequestBody {
    fn default() -> Self {
        Self::None
    }
}

/// A built HTTP request ready to be sent.
#[derive(Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The request URL.
    pub url: String,
    /// Request headers, in insertion order. Duplicate names are kept.
    pub headers: Vec<(String, String)>,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// Request body.
    pub body: RequestBody,
    /// Request timeout override.
    pub timeout: Option<Duration>,
    /// Authentication.
    pub auth: Option<Authentication>,
}

/// Builder for constructing HTTP requests.
///
/// Every chain method consumes the builder and returns it, so a request
/// reads as one expression from construction to fetch.
///
/// # Example
///
/// ```ignore
/// use petrel::{HttpMethod, RequestBuilder};
///
/// let body = RequestBuilder::new("https://api.example.com")
///     .path("v1/items")
///     .method(HttpMethod::Post)
///     .header("x-request-source", "petrel")
///     .body(&b"payload"[..])
///     .fetch()
///     .await?;
/// ```
pub struct RequestBuilder {
    client: HttpClient,
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: RequestBody,
    timeout: Option<Duration>,
    auth: Option<Authentication>,
}

impl RequestBuilder {
    /// Create a GET request builder from a URL string, using a client with
    /// default configuration.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), HttpMethod::Get, url.into())
    }

    /// Create a request builder bound to an existing client.
    pub(crate) fn with_client(client: HttpClient, method: HttpMethod, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: Vec::new(),
            query: Vec::new(),
            body: RequestBody::None,
            timeout: None,
            auth: None,
        }
    }

    /// Replace the request method.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Append slash-separated path segments to the URL.
    ///
    /// Empty components contribute nothing: consecutive, leading, and
    /// trailing slashes are collapsed, so `path("a//b/")` appends exactly
    /// `a` then `b`.
    pub fn path(mut self, segments: impl AsRef<str>) -> Self {
        for segment in segments.as_ref().split('/') {
            if segment.is_empty() {
                continue;
            }
            while self.url.ends_with('/') {
                self.url.pop();
            }
            self.url.push('/');
            self.url.push_str(segment);
        }
        self
    }

    /// Add a header to the request.
    ///
    /// Headers are kept in insertion order and duplicate names are
    /// permitted; each pair is appended to the wire request as its own
    /// header field. Names and values are validated when the request is
    /// sent.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add multiple headers to the request, preserving their order.
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add multiple query parameters.
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Set a raw binary body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = RequestBody::Bytes(body.into());
        self
    }

    /// Set a plain text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = RequestBody::Text(body.into());
        self
    }

    /// Set a JSON body from a serializable value.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.body = RequestBody::Json(value),
            Err(e) => {
                tracing::error!(target: "petrel::request", "Failed to serialize JSON body: {}", e);
            }
        }
        self
    }

    /// Set a URL-encoded form body.
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.body = RequestBody::Form(data);
        self
    }

    /// Set basic authentication.
    pub fn basic_auth(
        mut self,
        username: impl Into<String>,
        password: Option<impl Into<String>>,
    ) -> Self {
        self.auth = Some(Authentication::Basic {
            username: username.into(),
            password: password.map(Into::into),
        });
        self
    }

    /// Set bearer token authentication.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Authentication::Bearer(token.into()));
        self
    }

    /// Set a timeout for this specific request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the request without sending it.
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            query: self.query,
            body: self.body,
            timeout: self.timeout,
            auth: self.auth,
        }
    }

    /// Send the request and wait for the response.
    pub async fn send(self) -> Result<HttpResponse> {
        let client = self.client.clone();
        let request = self.build();

        // Build the URL with query parameters
        let mut url = url::Url::parse(&request.url)?;
        for (key, value) in &request.query {
            url.query_pairs_mut().append_pair(key, value);
        }

        // Build the reqwest request
        let mut req_builder = client
            .reqwest_client()
            .request(request.method.to_reqwest(), url);

        // Add headers, converting each pair in order. An invalid value is
        // reported by header name only
        for (name, value) in &request.headers {
            let header_name = http::HeaderName::try_from(name.as_str())
                .map_err(|_| HttpError::InvalidHeader(name.clone()))?;
            let header_value = http::HeaderValue::try_from(value.as_str())
                .map_err(|_| HttpError::InvalidHeader(format!("value for {name}")))?;
            req_builder = req_builder.header(header_name, header_value);
        }

        // Add authentication
        if let Some(auth) = &request.auth {
            match auth {
                Authentication::Basic { username, password } => {
                    req_builder = req_builder.basic_auth(username, password.as_ref());
                }
                Authentication::Bearer(token) => {
                    req_builder = req_builder.bearer_auth(token);
                }
            }
        }

        // Add timeout
        if let Some(timeout) = request.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        // Add body
        match request.body {
            RequestBody::None => {}
            RequestBody::Text(text) => {
                req_builder = req_builder.body(text);
            }
            RequestBody::Json(value) => {
                req_builder = req_builder.json(&value);
            }
            RequestBody::Form(data) => {
                req_builder = req_builder.form(&data);
            }
            RequestBody::Bytes(bytes) => {
                req_builder = req_builder.body(bytes);
            }
        }

        // Send the request
        let response = req_builder.send().await?;
        Ok(HttpResponse::from_reqwest(response))
    }

    /// Send the request once and return the raw response body.
    ///
    /// A status in the 200-299 range yields the complete body unchanged.
    /// Any other status fails with [`HttpError::HttpStatus`], carrying the
    /// error body as the message when one is readable. Network failures
    /// surface as the matching [`HttpError`] variant. The request is never
    /// retried.
    pub async fn fetch(self) -> Result<Bytes> {
        let response = self.send().await?.error_for_status_with_body().await?;
        response.bytes().await
    }

    /// Fetch the request and decode the body as JSON.
    ///
    /// Every failure comes back as [`ResponseError::ParseFailure`],
    /// transport errors from the underlying fetch included. Callers that
    /// need the cause should use [`fetch`](Self::fetch) and decode
    /// themselves.
    ///
    /// # Example
    ///
    /// ```ignore
    /// #[derive(serde::Deserialize)]
    /// struct Item {
    ///     id: u64,
    ///     name: String,
    /// }
    ///
    /// let item: Item = client.get(url).json_response().await?;
    /// ```
    pub async fn json_response<T: DeserializeOwned>(
        self,
    ) -> std::result::Result<T, ResponseError> {
        let bytes = self.fetch().await.map_err(|e| {
            tracing::debug!(target: "petrel::request", "Fetch failed during JSON decode: {}", e);
            ResponseError::ParseFailure
        })?;
        decode_json(&bytes)
    }

    /// Fetch the request and decode the body as UTF-8 text.
    ///
    /// The decode is strict: invalid byte sequences fail with
    /// [`ResponseError::ParseFailure`] rather than being replaced. Transport
    /// failures collapse to the same error.
    pub async fn text_response(self) -> std::result::Result<String, ResponseError> {
        let bytes = self.fetch().await.map_err(|e| {
            tracing::debug!(target: "petrel::request", "Fetch failed during text decode: {}", e);
            ResponseError::ParseFailure
        })?;
        decode_text(&bytes)
    }
}

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> std::result::Result<T, ResponseError> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(target: "petrel::request", "Failed to decode JSON response: {}", e);
        ResponseError::ParseFailure
    })
}

fn decode_text(bytes: &[u8]) -> std::result::Result<String, ResponseError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_owned()),
        Err(e) => {
            tracing::debug!(target: "petrel::request", "Response body is not valid UTF-8: {}", e);
            Err(ResponseError::ParseFailure)
        }
    }
}
