//! Query service integration.
//!
//! The remote service takes a database locator and a prompt and answers
//! with a multi-part payload. The controller only talks to it through the
//! [`QueryService`] trait.

pub mod http;
pub mod mock;

pub use http::{HttpQueryService, HttpServiceConfig};
pub use mock::{MockQueryService, MockReply};

use async_trait::async_trait;

use crate::error::{QueryLensError, Result};
use crate::payload::{ErrorDetail, QueryRequest, ResponsePayload};

/// Message used when a failed response carries no usable `detail`.
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Builds the error for a non-success response.
///
/// The service `detail` is used verbatim when present; anything else falls
/// back to [`GENERIC_ERROR_MESSAGE`].
pub(crate) fn service_failure(status: u16, detail: Option<&ErrorDetail>) -> QueryLensError {
    let message = detail
        .and_then(ErrorDetail::message)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
    let failed_query = detail
        .and_then(ErrorDetail::failed_query)
        .map(|q| q.to_display_string());

    QueryLensError::service(status, message).with_failed_query(failed_query)
}

/// A remote service that answers natural-language database questions.
///
/// Implementations must be thread-safe (Send + Sync) so requests can run on
/// background tasks.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Issues exactly one query request.
    ///
    /// Returns the decoded payload on success, `Service` for a non-success
    /// response and `Transport` when the request or decoding fails.
    async fn query(&self, request: &QueryRequest) -> Result<ResponsePayload>;

    /// Checks that the service is reachable, returning its greeting.
    async fn health(&self) -> Result<String>;
}
