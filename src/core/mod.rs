//! Vipps Core Components
//!
//! The request pipeline: base transport, authentication decorators and the
//! API client facade.

pub mod api_client;
pub mod middleware;
pub mod transport;

pub use api_client::*;
pub use middleware::*;
pub use transport::*;
