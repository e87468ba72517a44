//! Agendo Service — orchestration of tenant resolution, validation
//! and the scheduling store, plus the reporting aggregator and
//! password hashing.
//!
//! Services are generic over the `agendo-core` repository traits so
//! this crate has no dependency on the database crate.

pub mod error;
pub mod password;
pub mod report;
pub mod service;

pub use error::ServiceError;
pub use service::{
    AppointmentChange, AppointmentService, UserChange, UserService,
};
