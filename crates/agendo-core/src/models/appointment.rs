//! Appointment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    /// The company this appointment belongs to.
    pub company_id: Uuid,
    pub name: String,
    pub scheduled_at: DateTime<Utc>,
    pub appointment_type_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new appointment. The tenant reference
/// is supplied separately and forced by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointment {
    pub name: String,
    pub scheduled_at: DateTime<Utc>,
    pub appointment_type_id: Option<Uuid>,
}

/// Changeset for updating an appointment. `None` = field unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAppointment {
    pub name: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    /// `Some(Some(id))` = set, `Some(None)` = clear, `None` = no change.
    pub appointment_type_id: Option<Option<Uuid>>,
}

/// Read model: an appointment paired with its type's name, as returned
/// by the calendar listing and range queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentWithType {
    pub appointment: Appointment,
    pub type_name: Option<String>,
}
