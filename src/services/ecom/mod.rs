//! E-commerce service for the Vipps eCom v2 API.
//!
//! Initiates, captures, cancels and refunds payments.

mod error;
mod requests;
mod responses;
mod service;

pub use error::*;
pub use requests::*;
pub use responses::*;
pub use service::*;
