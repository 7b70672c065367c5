//! Injectable transport layer.
//!
//! The core never opens a socket. A `Transport` receives a resolved
//! `HttpRequest` and returns the raw `HttpResponse`. It owns redirects,
//! retries, timeouts and TLS. Any closure `Fn(HttpRequest) -> impl Future`
//! is a transport, which keeps test doubles and adapters one-liners.

use std::future::Future;
use std::pin::Pin;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>>;

/// Contract:
/// - Must send `method`, `url`, `headers` and `body` as given.
/// - Must return the body bytes unmodified (no implicit decoding).
/// - Must report any failure before a status line as `Err`, and any status,
///   including 4xx/5xx, as `Ok`.
pub trait Transport: Send + Sync {
    fn send<'a>(&'a self, request: &'a HttpRequest) -> TransportFuture<'a>;
}

impl<F, Fut> Transport for F
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, TransportError>> + Send + 'static,
{
    fn send<'a>(&'a self, request: &'a HttpRequest) -> TransportFuture<'a> {
        Box::pin(self(request.clone()))
    }
}
