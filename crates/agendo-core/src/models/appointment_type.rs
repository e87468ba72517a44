//! Appointment type domain model.
//!
//! Types are read-only in the scheduling core: they are listed so an
//! appointment can reference one, but never edited here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentType {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create an appointment type (seeding only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentType {
    pub name: String,
}
