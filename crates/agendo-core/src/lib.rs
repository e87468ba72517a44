//! Agendo Core — domain models, repository traits, tenant resolution
//! and the validation engine.
//!
//! This crate has no I/O. Storage implementations live in `agendo-db`,
//! orchestration in `agendo-service`.

pub mod error;
pub mod models;
pub mod repository;
pub mod tenant;
pub mod validate;

pub use error::{AgendoError, AgendoResult};
