//! Recurring payments service for the Vipps Recurring v2 API.
//!
//! Manages agreements and the charges made against them.

mod error;
mod requests;
mod responses;
mod service;
mod types;

pub use error::*;
pub use requests::*;
pub use responses::*;
pub use service::*;
pub use types::*;
