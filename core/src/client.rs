//! One-call facade over resolver, dispatcher and transport.
//!
//! # Design
//! `Client` owns a `Resolver`, a `Dispatcher` and a caller-supplied
//! `Transport`. It adds no state of its own: `request` is resolve followed by
//! dispatch, and build errors are returned before the transport is touched.

use crate::config::Defaults;
use crate::dispatcher::Dispatcher;
use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::params::Parameters;
use crate::resolver::Resolver;
use crate::response::Response;
use crate::transport::Transport;

/// Issues requests like `client.request("GET /orgs/:org", params)`.
#[derive(Debug, Clone)]
pub struct Client<T> {
    resolver: Resolver,
    dispatcher: Dispatcher,
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_defaults(Defaults::default(), transport)
    }

    /// Client whose defaults honor `REQUEST_BASE_URL` / `REQUEST_USER_AGENT`.
    pub fn from_env(transport: T) -> Self {
        Self::with_defaults(Defaults::from_env(), transport)
    }

    pub fn with_defaults(defaults: Defaults, transport: T) -> Self {
        Self {
            resolver: Resolver::new(defaults),
            dispatcher: Dispatcher::new(),
            transport,
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve the `"METHOD /path/:param"` shorthand and dispatch it.
    pub async fn request(&self, route: &str, params: Parameters) -> Result<Response, Error> {
        let request = self.resolver.resolve_route(route, params)?;
        self.dispatcher.dispatch(request, &self.transport).await
    }

    pub async fn request_endpoint(&self, endpoint: &Endpoint, params: Parameters) -> Result<Response, Error> {
        let request = self.resolver.resolve(endpoint, params)?;
        self.dispatcher.dispatch(request, &self.transport).await
    }

    /// Dispatch a bag that names its own `method` and `url`.
    pub async fn request_options(&self, params: Parameters) -> Result<Response, Error> {
        let request = self.resolver.resolve_options(params)?;
        self.dispatcher.dispatch(request, &self.transport).await
    }
}
