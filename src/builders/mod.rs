//! Builders
//!
//! Fluent builder for Vipps configuration.

pub mod config;

pub use config::{vipps_config, VippsConfigBuilder};
