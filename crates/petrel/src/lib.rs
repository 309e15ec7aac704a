//! Fluent HTTP request building and response decoding.
//!
//! Petrel is a small convenience layer over `reqwest`: construct a request
//! by chaining path, method, header, and body calls, fetch it exactly once,
//! then decode the response as raw bytes, JSON, or text. A request can also
//! be subscribed with completion callbacks, returning a cancellable handle.
//!
//! # Building and fetching
//!
//! ```ignore
//! use petrel::{HttpClient, HttpMethod};
//!
//! let client = HttpClient::new();
//!
//! // Fetch raw bytes; any non-2xx status or network failure is an error
//! let body = client.get("https://api.example.com")
//!     .path("v1/items")
//!     .header("Accept", "application/json")
//!     .fetch()
//!     .await?;
//!
//! // Or decode directly
//! let items: Vec<Item> = client.get("https://api.example.com/v1/items")
//!     .json_response()
//!     .await?;
//! ```
//!
//! # Request methods
//!
//! Entry points exist for the common verbs (`get`, `post`, `put`, `delete`,
//! `patch`, `head`); the full [`HttpMethod`] enumeration, including CONNECT,
//! OPTIONS, and TRACE, goes through [`HttpClient::request`] or
//! [`RequestBuilder::method`].
//!
//! # Request bodies
//!
//! ```ignore
//! // Raw bytes
//! client.post("/upload").body(payload).fetch().await?;
//!
//! // JSON body
//! client.post("/api/users")
//!     .json(&serde_json::json!({"name": "John"}))
//!     .send()
//!     .await?;
//!
//! // Form data
//! let mut form = HashMap::new();
//! form.insert("username".to_string(), "john".to_string());
//! client.post("/login").form(form).send().await?;
//! ```
//!
//! # Configuration
//!
//! ```ignore
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(60))
//!     .user_agent("MyApp/1.0")
//!     .no_redirects()
//!     .build()?;
//! ```
//!
//! # Callback subscriptions
//!
//! ```ignore
//! let handle = client.get("https://api.example.com/feed")
//!     .subscribe_with(
//!         |body| println!("got {} bytes", body.len()),
//!         |err| eprintln!("fetch failed: {err}"),
//!     );
//!
//! // Cancel if the result is no longer wanted; neither callback will run
//! handle.cancel();
//! ```
//!
//! # Error domains
//!
//! Transport failures ([`HttpError`]) and decode failures
//! ([`ResponseError`]) are separate types. The decoding terminals
//! `json_response` and `text_response` fold every failure they see,
//! transport included, into [`ResponseError::ParseFailure`]; callers that
//! need the cause fetch bytes and decode themselves.

mod client;
mod error;
mod handle;
mod request;
mod response;

pub use client::{Authentication, HttpClient, HttpClientBuilder, HttpClientConfig};
pub use error::{HttpError, ResponseError, Result};
pub use handle::{FetchHandle, RequestId};
pub use request::{HttpMethod, HttpRequest, RequestBody, RequestBuilder};
pub use response::HttpResponse;
