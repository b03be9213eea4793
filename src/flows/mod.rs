//! Token Flows
//!
//! Grants used to obtain access tokens. Vipps machine-to-machine access uses
//! the Client Credentials Grant (RFC 6749 Section 4.4) only.

pub mod client_credentials;

pub use client_credentials::{
    create_mock_client_credentials_flow, ClientCredentialsFlow, ClientCredentialsFlowImpl,
    MockClientCredentialsFlow,
};
