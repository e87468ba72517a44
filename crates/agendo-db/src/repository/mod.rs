//! SurrealDB repository implementations for the `agendo-core` traits.

mod appointment;
mod appointment_type;
mod company;
mod user;

pub use appointment::SurrealAppointmentRepository;
pub use appointment_type::SurrealAppointmentTypeRepository;
pub use company::SurrealCompanyRepository;
pub use user::SurrealUserRepository;
