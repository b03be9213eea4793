//! Vipps Types
//!
//! Credentials, environment and token types.

pub mod config;
pub mod token;

pub use config::*;
pub use token::*;
