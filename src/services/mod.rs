//! Service implementations for the Vipps API surfaces.
//!
//! Each surface routes its calls through the shared [`ApiClient`] and turns
//! API error bodies into its own structured error.
//!
//! [`ApiClient`]: crate::core::ApiClient

pub mod ecom;
pub mod login;
pub mod recurring;

pub use ecom::{EcomService, EcomServiceTrait};
pub use login::LoginConfig;
pub use recurring::{RecurringService, RecurringServiceTrait};
