//! Appointment and user orchestration.
//!
//! Every public operation resolves the tenant from the request
//! context first, validates its input second, and only then touches
//! the store. The services hold their collaborators by composition
//! and are generic over the repository traits, so the orchestration
//! logic can be exercised against any store implementation.

use std::collections::HashMap;

use agendo_core::error::{AgendoError, AgendoResult};
use agendo_core::models::appointment::{
    Appointment, AppointmentWithType, CreateAppointment, UpdateAppointment,
};
use agendo_core::models::user::{CreateUser, UpdateUser, User, UserRole};
use agendo_core::repository::{
    AppointmentRepository, AppointmentTypeRepository, UserRepository,
};
use agendo_core::tenant::{RequestContext, resolve_tenant};
use agendo_core::validate::{
    self, AppointmentDraft, UserDraft,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::password;
use crate::report;

/// Changeset for updating an appointment, as submitted by the
/// interface layer. `None` = field unchanged; `scheduled_at` arrives
/// in the wire format and is parsed during validation.
#[derive(Debug, Clone, Default)]
pub struct AppointmentChange {
    pub name: Option<String>,
    pub scheduled_at: Option<String>,
    /// `Some(Some(id))` = set, `Some(None)` = clear, `None` = no change.
    pub appointment_type_id: Option<Option<Uuid>>,
}

/// Changeset for updating a user. A supplied password is re-hashed;
/// a supplied avatar is the reference handed back by external file
/// storage.
#[derive(Debug, Clone, Default)]
pub struct UserChange {
    pub firstname: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phonenumber: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

fn timestamp(field: &'static str, secs: i64) -> AgendoResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| AgendoError::Validation {
        violations: vec![validate::Violation {
            field,
            message: format!("{field} is not a valid timestamp"),
        }],
    })
}

// ---------------------------------------------------------------------------
// Appointment service
// ---------------------------------------------------------------------------

/// Orchestrates the appointment use cases: calendar queries, CRUD and
/// monthly statistics.
pub struct AppointmentService<A: AppointmentRepository, T: AppointmentTypeRepository> {
    appointment_repo: A,
    type_repo: T,
}

impl<A: AppointmentRepository, T: AppointmentTypeRepository> AppointmentService<A, T> {
    pub fn new(appointment_repo: A, type_repo: T) -> Self {
        Self {
            appointment_repo,
            type_repo,
        }
    }

    /// Calendar query: all of the tenant's appointments with
    /// `start <= scheduled_at < end`, paired with their type names.
    /// Inputs are epoch seconds, as submitted by the calendar widget.
    pub async fn list_for_range(
        &self,
        ctx: &RequestContext,
        start_ts: i64,
        end_ts: i64,
    ) -> AgendoResult<Vec<AppointmentWithType>> {
        let company_id = resolve_tenant(ctx)?;
        let start = timestamp("start", start_ts)?;
        let end = timestamp("end", end_ts)?;
        self.appointment_repo
            .list_in_range(company_id, start, end)
            .await
    }

    /// Validate and persist a new appointment under the resolved
    /// tenant. The tenant reference is forced from the context; the
    /// draft cannot smuggle one in.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        draft: AppointmentDraft,
    ) -> AgendoResult<Appointment> {
        let company_id = resolve_tenant(ctx)?;

        validate::validate_appointment(&draft).into_result()?;
        let scheduled_at = validate::parse_scheduled_at(&draft.scheduled_at)
            .ok_or_else(|| AgendoError::Internal("validated date failed to parse".into()))?;

        self.appointment_repo
            .create(
                company_id,
                CreateAppointment {
                    name: draft.name,
                    scheduled_at,
                    appointment_type_id: draft.appointment_type_id,
                },
            )
            .await
    }

    /// Apply a changeset to an existing appointment.
    ///
    /// The merged view (stored record + changeset) is validated as a
    /// whole, so an update can never leave the record in a state a
    /// create would have rejected. `NotFound` covers both unknown ids
    /// and ids owned by another tenant.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        change: AppointmentChange,
    ) -> AgendoResult<Appointment> {
        let company_id = resolve_tenant(ctx)?;
        let existing = self.appointment_repo.get_by_id(company_id, id).await?;

        let merged = AppointmentDraft {
            name: change.name.clone().unwrap_or_else(|| existing.name.clone()),
            scheduled_at: change
                .scheduled_at
                .clone()
                .unwrap_or_else(|| validate::format_scheduled_at(existing.scheduled_at)),
            appointment_type_id: match change.appointment_type_id {
                Some(set_or_clear) => set_or_clear,
                None => existing.appointment_type_id,
            },
        };
        validate::validate_appointment(&merged).into_result()?;

        let scheduled_at = change
            .scheduled_at
            .as_deref()
            .map(|raw| {
                validate::parse_scheduled_at(raw)
                    .ok_or_else(|| AgendoError::Internal("validated date failed to parse".into()))
            })
            .transpose()?;

        self.appointment_repo
            .update(
                company_id,
                id,
                UpdateAppointment {
                    name: change.name,
                    scheduled_at,
                    appointment_type_id: change.appointment_type_id,
                },
            )
            .await
    }

    /// Delete one of the tenant's appointments.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AgendoResult<()> {
        let company_id = resolve_tenant(ctx)?;
        self.appointment_repo.delete(company_id, id).await
    }

    /// The tenant's appointment types as an id → name mapping, for
    /// populating selection lists.
    pub async fn appointment_types(
        &self,
        ctx: &RequestContext,
    ) -> AgendoResult<HashMap<Uuid, String>> {
        let company_id = resolve_tenant(ctx)?;
        let types = self.type_repo.list(company_id).await?;
        Ok(types.into_iter().map(|t| (t.id, t.name)).collect())
    }

    /// Appointment counts per calendar month of `year`, index 0 =
    /// January.
    pub async fn stats(&self, ctx: &RequestContext, year: i32) -> AgendoResult<[u64; 12]> {
        let company_id = resolve_tenant(ctx)?;
        report::monthly_appointment_counts(&self.appointment_repo, company_id, year).await
    }
}

// ---------------------------------------------------------------------------
// User service
// ---------------------------------------------------------------------------

/// Orchestrates user management within a tenant.
pub struct UserService<U: UserRepository> {
    user_repo: U,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(user_repo: U) -> Self {
        Self {
            user_repo,
            pepper: None,
        }
    }

    pub fn with_pepper(user_repo: U, pepper: String) -> Self {
        Self {
            user_repo,
            pepper: Some(pepper),
        }
    }

    /// The tenant's regular-role users (admins are managed elsewhere).
    pub async fn list(&self, ctx: &RequestContext) -> AgendoResult<Vec<User>> {
        let company_id = resolve_tenant(ctx)?;
        self.user_repo
            .list_by_role(company_id, UserRole::Regular)
            .await
    }

    /// Validate and persist a new user under the resolved tenant.
    ///
    /// The role is always forced to `Regular` and the tenant comes
    /// from the context. A supplied password is Argon2id-hashed; the
    /// store never sees plaintext.
    pub async fn create(&self, ctx: &RequestContext, draft: UserDraft) -> AgendoResult<User> {
        let company_id = resolve_tenant(ctx)?;

        let email_in_use = self.user_repo.find_by_email(&draft.email).await?.is_some();
        validate::validate_user(&draft, email_in_use).into_result()?;

        let password_hash = draft
            .password
            .as_deref()
            .map(|pw| password::hash_password(pw, self.pepper.as_deref()))
            .transpose()
            .map_err(AgendoError::from)?;

        self.user_repo
            .create(
                company_id,
                CreateUser {
                    firstname: draft.firstname,
                    surname: draft.surname,
                    email: draft.email,
                    phonenumber: draft.phonenumber,
                    password_hash,
                    role: UserRole::Regular,
                    avatar: None,
                },
            )
            .await
    }

    /// Apply a changeset to an existing user of the resolved tenant.
    ///
    /// The merged view is validated; when the email is unchanged the
    /// uniqueness lookup is skipped entirely, so a self-update can
    /// never trip over its own email — even when duplicates already
    /// exist elsewhere in the data.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        change: UserChange,
    ) -> AgendoResult<User> {
        let company_id = resolve_tenant(ctx)?;
        let existing = self.user_repo.get_by_id(company_id, user_id).await?;

        let merged = UserDraft {
            firstname: change
                .firstname
                .clone()
                .unwrap_or_else(|| existing.firstname.clone()),
            surname: change
                .surname
                .clone()
                .unwrap_or_else(|| existing.surname.clone()),
            email: change.email.clone().unwrap_or_else(|| existing.email.clone()),
            phonenumber: change
                .phonenumber
                .clone()
                .unwrap_or_else(|| existing.phonenumber.clone()),
            password: change.password.clone(),
        };

        let email_in_use = if merged.email == existing.email {
            false
        } else {
            match self.user_repo.find_by_email(&merged.email).await? {
                Some(owner) => owner.id != existing.id,
                None => false,
            }
        };
        validate::validate_user(&merged, email_in_use).into_result()?;

        let password_hash = change
            .password
            .as_deref()
            .map(|pw| password::hash_password(pw, self.pepper.as_deref()))
            .transpose()
            .map_err(AgendoError::from)?;

        self.user_repo
            .update(
                company_id,
                user_id,
                UpdateUser {
                    firstname: change.firstname,
                    surname: change.surname,
                    email: change.email,
                    phonenumber: change.phonenumber,
                    password_hash,
                    avatar: change.avatar,
                },
            )
            .await
    }

    /// Resolve the identity to impersonate: `(company_id, user_id)`.
    ///
    /// Authorization-sensitive — only an admin actor may switch
    /// identity. Returns the target user for the external session
    /// provider to establish the session with; sessions themselves
    /// are outside the core.
    pub async fn impersonate(
        &self,
        ctx: &RequestContext,
        company_id: Uuid,
        user_id: Uuid,
    ) -> AgendoResult<User> {
        match &ctx.actor {
            Some(actor) if actor.role == UserRole::Admin => {}
            Some(_) => return Err(ServiceError::NotPermitted.into()),
            None => return Err(AgendoError::TenantContext),
        }

        self.user_repo.get_by_id(company_id, user_id).await
    }
}
