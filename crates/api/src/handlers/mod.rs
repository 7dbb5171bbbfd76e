//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate input, delegate to the corresponding repository in
//! `atelier_db`, publish the matching bus event after a successful write,
//! and map errors via [`AppError`](crate::error::AppError).

pub mod notes;
pub mod orders;
pub mod planning;
pub mod profiles;
pub mod workflow;
