//! Request dispatch and response normalization.
//!
//! # Design
//! `dispatch` is the only async step: it hands the request to the transport
//! and awaits exactly once. Everything after that lives in `parse`, which is
//! synchronous and I/O-free so it can be driven directly from test vectors.
//! The request is moved into `dispatch`, so each resolved request is sent at
//! most once. Nothing is retried.

use serde_json::Value;

use crate::error::{Error, RequestError};
use crate::http::{find_header, HttpMethod, HttpRequest, HttpResponse};
use crate::response::{decode, decode_lenient, Response, ResponseData};
use crate::transport::Transport;

/// Statuses whose body is never read.
const BODYLESS_STATUSES: [u16; 3] = [204, 205, 304];

/// Turns transport outcomes into `Response` or `Error`.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    accepted: Vec<u16>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `status` as a success even though it is outside 200-299.
    pub fn accept_status(mut self, status: u16) -> Self {
        if !self.accepted.contains(&status) {
            self.accepted.push(status);
        }
        self
    }

    pub fn is_success(&self, status: u16) -> bool {
        (200..300).contains(&status) || self.accepted.contains(&status)
    }

    pub async fn dispatch<T>(&self, request: HttpRequest, transport: &T) -> Result<Response, Error>
    where
        T: Transport + ?Sized,
    {
        tracing::debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = match transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(method = %request.method, url = %request.url, error = %e, "transport failed");
                return Err(RequestError::transport(e).into());
            }
        };
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            body_len = response.body.len(),
            "received response"
        );
        self.parse(request.method, &request.url, response)
    }

    /// Normalize a raw response to `request_method` / `request_url`.
    pub fn parse(
        &self,
        request_method: HttpMethod,
        request_url: &str,
        response: HttpResponse,
    ) -> Result<Response, Error> {
        let HttpResponse {
            status,
            url,
            headers,
            body,
        } = response;
        let url = if url.is_empty() {
            request_url.to_string()
        } else {
            url
        };
        let bodyless = request_method == HttpMethod::Head || BODYLESS_STATUSES.contains(&status);
        let content_type = find_header(&headers, "content-type").map(str::to_string);

        if self.is_success(status) {
            let data = if bodyless {
                ResponseData::Empty
            } else {
                decode(body, content_type.as_deref()).map_err(|source| Error::Payload { status, source })?
            };
            return Ok(Response {
                status,
                url,
                headers,
                data,
            });
        }

        let data = if bodyless {
            ResponseData::Empty
        } else {
            decode_lenient(body, content_type.as_deref())
        };
        let message = data
            .as_json()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status_text(status));
        let data = (!data.is_empty()).then_some(data);
        Err(RequestError::status(status, message, headers, data).into())
    }
}

fn status_text(status: u16) -> String {
    ::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
