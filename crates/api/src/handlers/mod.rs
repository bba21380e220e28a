//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `teian_db` and the provider
//! clients, and map errors via [`crate::error::AppError`].

pub mod assist;
pub mod auth_callback;
pub mod billing;
pub mod drafts;
pub mod generate;
pub mod proposals;
pub mod usage;
pub mod webhook;
