//! SurrealDB implementation of [`AppointmentRepository`].
//!
//! The half-open range predicate (`start <= scheduled_at < end`) is
//! shared verbatim by `list_in_range` and `count_in_range`, so the
//! calendar listing and the reporting aggregator can never disagree
//! about a boundary timestamp.

use std::collections::HashMap;

use agendo_core::error::AgendoResult;
use agendo_core::models::appointment::{
    Appointment, AppointmentWithType, CreateAppointment, UpdateAppointment,
};
use agendo_core::repository::AppointmentRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Shared WHERE clause for the half-open `[start, end)` range.
const RANGE_PREDICATE: &str =
    "company_id = $company_id AND scheduled_at >= $start AND scheduled_at < $end";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AppointmentRow {
    company_id: String,
    name: String,
    scheduled_at: DateTime<Utc>,
    appointment_type_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AppointmentRowWithId {
    record_id: String,
    company_id: String,
    name: String,
    scheduled_at: DateTime<Utc>,
    appointment_type_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Row struct for the type-name lookup used by the join.
#[derive(Debug, SurrealValue)]
struct TypeNameRow {
    record_id: String,
    name: String,
}

fn parse_type_id(raw: Option<String>) -> Result<Option<Uuid>, DbError> {
    raw.map(|s| {
        Uuid::parse_str(&s).map_err(|e| DbError::CorruptRow(format!("invalid type UUID: {e}")))
    })
    .transpose()
}

impl AppointmentRow {
    fn into_appointment(self, id: Uuid) -> Result<Appointment, DbError> {
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid company UUID: {e}")))?;
        Ok(Appointment {
            id,
            company_id,
            name: self.name,
            scheduled_at: self.scheduled_at,
            appointment_type_id: parse_type_id(self.appointment_type_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AppointmentRowWithId {
    fn try_into_appointment(self) -> Result<Appointment, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid UUID: {e}")))?;
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid company UUID: {e}")))?;
        Ok(Appointment {
            id,
            company_id,
            name: self.name,
            scheduled_at: self.scheduled_at,
            appointment_type_id: parse_type_id(self.appointment_type_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Appointment repository.
#[derive(Clone)]
pub struct SurrealAppointmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAppointmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Load the tenant's type names once and pair them with the given
    /// appointments, so callers see a single joined result.
    async fn pair_with_types(
        &self,
        company_id: Uuid,
        appointments: Vec<Appointment>,
    ) -> Result<Vec<AppointmentWithType>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, name FROM appointment_type \
                 WHERE company_id = $company_id",
            )
            .bind(("company_id", company_id.to_string()))
            .await?;

        let rows: Vec<TypeNameRow> = result.take(0)?;
        let names: HashMap<String, String> = rows
            .into_iter()
            .map(|row| (row.record_id, row.name))
            .collect();

        Ok(appointments
            .into_iter()
            .map(|appointment| {
                let type_name = appointment
                    .appointment_type_id
                    .and_then(|tid| names.get(&tid.to_string()).cloned());
                AppointmentWithType {
                    appointment,
                    type_name,
                }
            })
            .collect())
    }

    async fn fetch_rows(
        &self,
        query: &str,
        company_id: Uuid,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<Appointment>, DbError> {
        let mut builder = self
            .db
            .query(query)
            .bind(("company_id", company_id.to_string()));
        if let Some((start, end)) = range {
            builder = builder.bind(("start", start)).bind(("end", end));
        }

        let mut result = builder.await?;
        let rows: Vec<AppointmentRowWithId> = result.take(0)?;
        rows.into_iter()
            .map(|row| row.try_into_appointment())
            .collect()
    }
}

impl<C: Connection> AppointmentRepository for SurrealAppointmentRepository<C> {
    async fn create(&self, company_id: Uuid, input: CreateAppointment) -> AgendoResult<Appointment> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // Tenant reference forced from the argument; the payload
        // carries no company id at all.
        let result = self
            .db
            .query(
                "CREATE type::record('appointment', $id) SET \
                 company_id = $company_id, \
                 name = $name, scheduled_at = $scheduled_at, \
                 appointment_type_id = $appointment_type_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()))
            .bind(("name", input.name))
            .bind(("scheduled_at", input.scheduled_at))
            .bind((
                "appointment_type_id",
                input.appointment_type_id.map(|tid| tid.to_string()),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<AppointmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "appointment".into(),
            id: id_str,
        })?;

        Ok(row.into_appointment(id)?)
    }

    async fn get_by_id(&self, company_id: Uuid, id: Uuid) -> AgendoResult<Appointment> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('appointment', $id) \
                 WHERE company_id = $company_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AppointmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "appointment".into(),
            id: id_str,
        })?;

        Ok(row.into_appointment(id)?)
    }

    async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: UpdateAppointment,
    ) -> AgendoResult<Appointment> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.scheduled_at.is_some() {
            sets.push("scheduled_at = $scheduled_at");
        }
        if input.appointment_type_id.is_some() {
            sets.push("appointment_type_id = $appointment_type_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('appointment', $id) SET {} \
             WHERE company_id = $company_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(scheduled_at) = input.scheduled_at {
            builder = builder.bind(("scheduled_at", scheduled_at));
        }
        if let Some(type_id) = input.appointment_type_id {
            // Option<Option<Uuid>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("appointment_type_id", type_id.map(|tid| tid.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<AppointmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "appointment".into(),
            id: id_str,
        })?;

        Ok(row.into_appointment(id)?)
    }

    async fn delete(&self, company_id: Uuid, id: Uuid) -> AgendoResult<()> {
        let id_str = id.to_string();

        // RETURN BEFORE hands back the deleted record, so an empty
        // result distinguishes a miss (wrong id or wrong tenant) from
        // a successful delete.
        let mut result = self
            .db
            .query(
                "DELETE type::record('appointment', $id) \
                 WHERE company_id = $company_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AppointmentRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "appointment".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn list(&self, company_id: Uuid) -> AgendoResult<Vec<AppointmentWithType>> {
        let appointments = self
            .fetch_rows(
                "SELECT meta::id(id) AS record_id, * FROM appointment \
                 WHERE company_id = $company_id \
                 ORDER BY scheduled_at ASC",
                company_id,
                None,
            )
            .await?;

        Ok(self.pair_with_types(company_id, appointments).await?)
    }

    async fn list_in_range(
        &self,
        company_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AgendoResult<Vec<AppointmentWithType>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM appointment \
             WHERE {RANGE_PREDICATE} \
             ORDER BY scheduled_at ASC"
        );
        let appointments = self
            .fetch_rows(&query, company_id, Some((start, end)))
            .await?;

        Ok(self.pair_with_types(company_id, appointments).await?)
    }

    async fn count_in_range(
        &self,
        company_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AgendoResult<u64> {
        let query = format!(
            "SELECT count() AS total FROM appointment \
             WHERE {RANGE_PREDICATE} GROUP ALL"
        );
        let mut result = self
            .db
            .query(&query)
            .bind(("company_id", company_id.to_string()))
            .bind(("start", start))
            .bind(("end", end))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|row| row.total).unwrap_or(0))
    }
}
