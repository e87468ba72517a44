//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `company_id` parameter to enforce data isolation: an id
//! belonging to another tenant behaves exactly like an unknown id
//! (`NotFound`), so callers can never probe across the boundary.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AgendoResult;
use crate::models::{
    appointment::{
        Appointment, AppointmentWithType, CreateAppointment, UpdateAppointment,
    },
    appointment_type::{AppointmentType, CreateAppointmentType},
    company::{Company, CreateCompany},
    user::{CreateUser, UpdateUser, User, UserRole},
};

// ---------------------------------------------------------------------------
// Company (global scope — tenant roots, provisioned out-of-band)
// ---------------------------------------------------------------------------

pub trait CompanyRepository: Send + Sync {
    fn create(&self, input: CreateCompany) -> impl Future<Output = AgendoResult<Company>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgendoResult<Company>> + Send;
}

// ---------------------------------------------------------------------------
// User (tenant scope, with one deliberate global read)
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Create a user under `company_id`. The tenant reference is taken
    /// from the argument, never from the input payload.
    fn create(
        &self,
        company_id: Uuid,
        input: CreateUser,
    ) -> impl Future<Output = AgendoResult<User>> + Send;

    fn get_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AgendoResult<User>> + Send;

    /// Global email lookup, across all tenants. Backs the system-wide
    /// email uniqueness check; the only read here without a tenant
    /// filter.
    fn find_by_email(&self, email: &str)
    -> impl Future<Output = AgendoResult<Option<User>>> + Send;

    /// Apply a changeset: only fields present in `input` replace the
    /// stored values (merge-overwrite).
    fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = AgendoResult<User>> + Send;

    // No delete: users are never hard-deleted by the scheduling core.

    fn list_by_role(
        &self,
        company_id: Uuid,
        role: UserRole,
    ) -> impl Future<Output = AgendoResult<Vec<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Appointment type (tenant scope, read-only in the core)
// ---------------------------------------------------------------------------

pub trait AppointmentTypeRepository: Send + Sync {
    /// Seeding/tests only; the core never creates types on behalf of
    /// a caller.
    fn create(
        &self,
        company_id: Uuid,
        input: CreateAppointmentType,
    ) -> impl Future<Output = AgendoResult<AppointmentType>> + Send;

    fn list(&self, company_id: Uuid)
    -> impl Future<Output = AgendoResult<Vec<AppointmentType>>> + Send;
}

// ---------------------------------------------------------------------------
// Appointment (tenant scope)
// ---------------------------------------------------------------------------

pub trait AppointmentRepository: Send + Sync {
    /// Create an appointment under `company_id`. The tenant reference
    /// is forced from the argument regardless of the input payload.
    fn create(
        &self,
        company_id: Uuid,
        input: CreateAppointment,
    ) -> impl Future<Output = AgendoResult<Appointment>> + Send;

    fn get_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AgendoResult<Appointment>> + Send;

    /// Apply a changeset (merge-overwrite) against the stored record.
    fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: UpdateAppointment,
    ) -> impl Future<Output = AgendoResult<Appointment>> + Send;

    fn delete(&self, company_id: Uuid, id: Uuid) -> impl Future<Output = AgendoResult<()>> + Send;

    /// All appointments of the tenant, each paired with its type name.
    fn list(
        &self,
        company_id: Uuid,
    ) -> impl Future<Output = AgendoResult<Vec<AppointmentWithType>>> + Send;

    /// Appointments with `start <= scheduled_at < end` (half-open).
    /// Shared by the calendar listing and the reporting aggregator so
    /// a boundary timestamp can never be counted twice.
    fn list_in_range(
        &self,
        company_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = AgendoResult<Vec<AppointmentWithType>>> + Send;

    /// Count over the same half-open predicate as [`list_in_range`].
    ///
    /// [`list_in_range`]: AppointmentRepository::list_in_range
    fn count_in_range(
        &self,
        company_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = AgendoResult<u64>> + Send;
}
