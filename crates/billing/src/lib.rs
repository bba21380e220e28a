//! Payment-provider integration: checkout/portal session creation, webhook
//! signature verification, and the subscription state synchronizer.

pub mod client;
pub mod event;
pub mod signature;
pub mod sync;

pub use client::{StripeClient, StripeConfig, StripeError};
pub use event::BillingEvent;
