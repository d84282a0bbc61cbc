//! `reqwest`-backed [`ApiTransport`].

use hubigr_core::AVATAR_FIELD;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

use crate::{ApiRequest, ApiTransport, Method, RawResponse, RequestBody, TransportError};

/// Sends requests with a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ApiTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Multipart(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|error| TransportError::Network(error.to_string()))?;
                builder.multipart(Form::new().part(AVATAR_FIELD, part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|error| TransportError::Network(error.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|error| TransportError::Body(error.to_string()))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
