//! SurrealDB implementation of [`AppointmentTypeRepository`].

use agendo_core::error::AgendoResult;
use agendo_core::models::appointment_type::{AppointmentType, CreateAppointmentType};
use agendo_core::repository::AppointmentTypeRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TypeRow {
    company_id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TypeRowWithId {
    record_id: String,
    company_id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TypeRow {
    fn into_type(self, id: Uuid) -> Result<AppointmentType, DbError> {
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid company UUID: {e}")))?;
        Ok(AppointmentType {
            id,
            company_id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TypeRowWithId {
    fn try_into_type(self) -> Result<AppointmentType, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid UUID: {e}")))?;
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid company UUID: {e}")))?;
        Ok(AppointmentType {
            id,
            company_id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealAppointmentTypeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAppointmentTypeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AppointmentTypeRepository for SurrealAppointmentTypeRepository<C> {
    async fn create(
        &self,
        company_id: Uuid,
        input: CreateAppointmentType,
    ) -> AgendoResult<AppointmentType> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('appointment_type', $id) SET \
                 company_id = $company_id, name = $name",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()))
            .bind(("name", input.name))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<TypeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "appointment_type".into(),
            id: id_str,
        })?;

        Ok(row.into_type(id)?)
    }

    async fn list(&self, company_id: Uuid) -> AgendoResult<Vec<AppointmentType>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM appointment_type \
                 WHERE company_id = $company_id \
                 ORDER BY created_at ASC",
            )
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TypeRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_type())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
