//! Token Management
//!
//! Access token caching and refresh.

pub mod manager;

pub use manager::{create_mock_token_manager, DefaultTokenManager, MockTokenManager, TokenManager};
