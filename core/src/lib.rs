//! Generic REST request core.
//!
//! # Overview
//! Turns an endpoint such as `"GET /orgs/:org/repos"` plus a bag of named
//! parameters into a fully resolved `HttpRequest`, hands it to a
//! caller-supplied `Transport`, and normalizes whatever comes back into a
//! `Response` or an `Error`. The core never touches the network itself
//! (host-does-IO pattern).
//!
//! # Design
//! - `Resolver` is stateless apart from its immutable `Defaults`.
//! - `Dispatcher` splits into an async `dispatch` (one await on the
//!   transport) and a synchronous `parse`, so normalization is testable
//!   without I/O.
//! - Types use owned `String` / `Vec` fields so requests move freely into
//!   transport futures.
//!
//! ```no_run
//! use request_core::{Client, HttpRequest, HttpResponse, Parameters, TransportError};
//!
//! # async fn run() -> Result<(), request_core::Error> {
//! let transport = |req: HttpRequest| async move {
//!     // hand `req` to a real HTTP client here
//!     Ok::<_, TransportError>(HttpResponse::new(200).with_url(req.url))
//! };
//! let client = Client::new(transport);
//! let response = client
//!     .request(
//!         "GET /orgs/:org/repos",
//!         Parameters::new().param("org", "octokit").param("type", "private"),
//!     )
//!     .await?;
//! assert_eq!(response.url, "https://api.github.com/orgs/octokit/repos?type=private");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod params;
pub mod resolver;
pub mod response;
pub mod transport;

pub use client::Client;
pub use config::Defaults;
pub use dispatcher::Dispatcher;
pub use endpoint::Endpoint;
pub use error::{BuildError, Error, RequestError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::Parameters;
pub use resolver::Resolver;
pub use response::{Response, ResponseData};
pub use transport::Transport;
