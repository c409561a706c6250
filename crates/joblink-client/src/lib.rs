//! Resilient HTTP client for the JobLink API.
//!
//! The pipeline builds authenticated requests, executes them through the
//! [`Transport`] seam under a bounded timeout, and transparently recovers
//! from expired access tokens with a single refresh-and-retry cycle.
//! Responses are normalized into [`ResponseEnvelope`] values carrying the
//! error taxonomy from `joblink_core`.

pub mod api;
pub mod error;
pub mod pipeline;
pub mod response;
pub mod session;
pub mod testing;
pub mod transport;

pub use error::ClientError;
pub use pipeline::{ApiClient, RequestOptions};
pub use response::{normalize, Decoded, ResponseEnvelope};
pub use session::SessionManager;
pub use transport::{
    FilePart, HttpMethod, HttpTransport, MultipartPayload, RequestBody, Transport, TransportError,
    TransportRequest, TransportResponse,
};
