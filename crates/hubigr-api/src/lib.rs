#![warn(missing_docs)]
//! # hubigr-api
//!
//! ## Purpose
//! Gateway between the client and the profile REST API.
//!
//! ## Responsibilities
//! - Validate the configured API root.
//! - Build requests: absolute URL, JSON or multipart body, and a bearer
//!   `Authorization` header when a token is held and the caller supplied none.
//! - Decode responses: JSON when the server says so, otherwise the raw text
//!   wrapped as `{"message": ...}`.
//! - Turn non-success statuses and transport failures into [`RequestError`],
//!   surfacing each one as a `danger` notification before returning it.
//!
//! ## Data flow
//! Caller builds an [`ApiCall`] -> [`ApiGateway::request`] resolves it into an
//! [`ApiRequest`] -> [`ApiTransport::send`] returns a [`RawResponse`] ->
//! [`decode_response`] yields JSON or a [`RequestError`].
//!
//! ## Ownership and lifetimes
//! Requests and responses are owned values so the transport can move them
//! across await points without borrowing from the caller.
//!
//! ## Error model
//! Every failure a caller sees is a [`RequestError`] carrying one display
//! message. The notification has already been emitted when it is returned,
//! so callers only use it for control flow.
//!
//! ## Security and privacy notes
//! Only the endpoint path is logged. Query strings (which carry the email
//! verification token) and headers are never logged.

pub mod endpoints;
mod transport;

use hubigr_core::{AvatarFile, NotificationSink, Severity};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use url::Url;

pub use transport::ReqwestTransport;

/// API root used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api/v1";

/// Message used when a failed response carries no usable text.
pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

/// Message used in place of an empty non-JSON body.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Empty response";

/// HTTP methods used by the profile API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON document.
    Json(Value),
    /// Single-file multipart form, sent under [`hubigr_core::AVATAR_FIELD`].
    Multipart(AvatarFile),
}

/// Caller-side description of one API call, relative to the API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    method: Method,
    endpoint: String,
    body: RequestBody,
    authorization: Option<String>,
}

impl ApiCall {
    /// Creates a call without a body.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: RequestBody::Empty,
            authorization: None,
        }
    }

    /// `GET` shorthand.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    /// `POST` shorthand.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    /// `PUT` shorthand.
    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Put, endpoint)
    }

    /// Attaches a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Attaches a multipart file body.
    pub fn multipart(mut self, file: AvatarFile) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    /// Supplies an explicit `Authorization` header value, which suppresses
    /// the session bearer token.
    pub fn authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Endpoint path without its query string, safe for logs.
    pub fn log_path(&self) -> &str {
        self.endpoint
            .split_once('?')
            .map_or(self.endpoint.as_str(), |(path, _)| path)
    }
}

/// Fully resolved request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Payload.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Looks up a header value, ignoring name case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Undecoded response as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Body text.
    pub body: String,
}

impl RawResponse {
    /// JSON response shorthand.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
    }
}

/// Network layer used by [`ApiGateway`].
pub trait ApiTransport: Send + Sync {
    /// Sends one request and returns the raw response, whatever its status.
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// Resolves [`ApiCall`]s against the API root and decodes their results.
#[derive(Debug, Clone)]
pub struct ApiGateway<T> {
    base: String,
    transport: T,
}

impl<T: ApiTransport> ApiGateway<T> {
    /// Creates a gateway for a validated API root.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBase`] when `base` is not an absolute
    /// http(s) URL with a host.
    pub fn new(base: impl Into<String>, transport: T) -> Result<Self, ConfigError> {
        let base = base.into();
        validate_api_base(&base)?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            transport,
        })
    }

    /// Configured API root, without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Borrow of the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves a call into a transport request.
    pub fn build_request(&self, call: ApiCall, token: Option<&str>) -> ApiRequest {
        let mut headers = Vec::new();

        if !matches!(call.body, RequestBody::Multipart(_)) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        match (call.authorization, token) {
            (Some(explicit), _) => headers.push(("Authorization".to_string(), explicit)),
            (None, Some(token)) if !token.is_empty() => {
                headers.push(("Authorization".to_string(), format!("Bearer {token}")));
            }
            _ => {}
        }

        ApiRequest {
            method: call.method,
            url: format!("{}{}", self.base, call.endpoint),
            headers,
            body: call.body,
        }
    }

    /// Executes a call and returns its decoded JSON.
    ///
    /// # Errors
    /// Returns [`RequestError`] for transport failures, malformed JSON, and
    /// non-success statuses. A `danger` notification has been sent to `sink`
    /// before the error is returned.
    pub async fn request(
        &self,
        call: ApiCall,
        token: Option<&str>,
        sink: &mut dyn NotificationSink,
    ) -> Result<Value, RequestError> {
        let method = call.method;
        let path = call.log_path().to_string();
        log::debug!("api request method={} path={path}", method.as_str());

        let request = self.build_request(call, token);
        let outcome = match self.transport.send(request).await {
            Ok(raw) => decode_response(raw),
            Err(error) => Err(RequestError::from(error)),
        };

        outcome.map_err(|error| {
            log::warn!(
                "api request_failed method={} path={path} message={}",
                method.as_str(),
                error.message
            );
            sink.notify(&error.message, Severity::Danger);
            error
        })
    }

    /// Executes a call and decodes the JSON into `R`.
    ///
    /// # Errors
    /// As [`ApiGateway::request`]; a payload that does not fit `R` is treated
    /// as a malformed response and notified the same way.
    pub async fn request_as<R: DeserializeOwned>(
        &self,
        call: ApiCall,
        token: Option<&str>,
        sink: &mut dyn NotificationSink,
    ) -> Result<R, RequestError> {
        let value = self.request(call, token, sink).await?;
        serde_json::from_value(value).map_err(|error| {
            let error = RequestError::malformed(&error);
            sink.notify(&error.message, Severity::Danger);
            error
        })
    }
}

/// Decodes a raw response into JSON, failing on non-success statuses.
///
/// # Errors
/// Returns [`RequestError`] when a JSON body cannot be parsed or the status is
/// not 2xx. The message comes from `error.message`, then `message`, then
/// [`FALLBACK_ERROR_MESSAGE`].
pub fn decode_response(raw: RawResponse) -> Result<Value, RequestError> {
    let success = raw.is_success();
    let data = if raw.is_json() {
        serde_json::from_str::<Value>(&raw.body).map_err(|error| RequestError::malformed(&error))?
    } else if raw.body.is_empty() {
        json!({ "message": EMPTY_RESPONSE_MESSAGE })
    } else {
        json!({ "message": raw.body })
    };

    if !success {
        return Err(RequestError::new(error_message(&data)));
    }

    Ok(data)
}

/// Extracts the display message from an error payload.
pub fn error_message(data: &Value) -> String {
    data.pointer("/error/message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .or_else(|| {
            data.get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
        })
        .unwrap_or(FALLBACK_ERROR_MESSAGE)
        .to_string()
}

/// Validates an API root URL.
///
/// # Errors
/// Returns [`ConfigError::InvalidBase`] for unparsable URLs, non-http(s)
/// schemes, or a missing host.
pub fn validate_api_base(base: &str) -> Result<Url, ConfigError> {
    let parsed =
        Url::parse(base).map_err(|error| ConfigError::InvalidBase(format!("{base}: {error}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBase(format!(
            "{base}: scheme must be http or https"
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidBase(format!("{base}: missing host")));
    }

    Ok(parsed)
}

/// The single user-facing failure of an API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    /// Display message shown to the user.
    pub message: String,
}

impl RequestError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn malformed(error: &serde_json::Error) -> Self {
        Self::new(format!("Malformed response: {error}"))
    }
}

impl From<TransportError> for RequestError {
    fn from(error: TransportError) -> Self {
        Self::new(error.to_string())
    }
}

/// Failure below HTTP semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request could not be built or sent (DNS, connect, TLS).
    #[error("Network error: {0}")]
    Network(String),
    /// Response body could not be read.
    #[error("Could not read response: {0}")]
    Body(String),
}

/// Invalid gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// API root is not usable.
    #[error("invalid api base: {0}")]
    InvalidBase(String),
}
