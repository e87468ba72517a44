//! Domain models for Agendo.
//!
//! These are the core types shared across all crates.

pub mod appointment;
pub mod appointment_type;
pub mod company;
pub mod user;
