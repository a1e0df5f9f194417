//! Backend Client
//!
//! Talks to the fitness tracker's REST backend.
//!
//! ## Architecture
//!
//! - **Transport**: sends an `ApiRequest` and returns the raw `ApiResponse`
//!   (reqwest over HTTP in production)
//! - **CsrfSession**: one-time CSRF token bootstrap
//! - **ApiClient**: typed endpoint wrappers; adds `X-CSRFToken` to POSTs

mod api;
mod error;
mod session;
mod transport;

pub use api::ApiClient;
pub use error::{ClientError, ClientResult};
pub use session::{CsrfSession, CSRF_HEADER};
pub use transport::{
    ApiRequest, ApiResponse, FormPart, HttpTransport, Method, RequestBody, Transport,
};
