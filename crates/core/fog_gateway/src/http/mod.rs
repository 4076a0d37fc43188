//! The HTTP surface of the gateway.
//!
//! - `POST <path>`: translates one uplink message, `path` defaults to `/uplink`
//! - `GET /health`: reports the gateway is up

mod error;
mod router;
mod server;

pub use error::ApiError;
pub use error::HttpServerError;
pub use router::gateway_router;
pub use router::UplinkBody;
pub use server::serve;
