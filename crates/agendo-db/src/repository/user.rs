//! SurrealDB implementation of [`UserRepository`].
//!
//! Every query is scoped to a company, with one exception:
//! `find_by_email` reads across all tenants because email uniqueness
//! is a system-wide rule. Password hashes arrive pre-computed from
//! the service layer; this repository never sees plaintext.

use agendo_core::error::AgendoResult;
use agendo_core::models::user::{CreateUser, UpdateUser, User, UserRole};
use agendo_core::repository::UserRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    company_id: String,
    firstname: String,
    surname: String,
    email: String,
    phonenumber: String,
    password_hash: Option<String>,
    role: String,
    avatar: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    company_id: String,
    firstname: String,
    surname: String,
    email: String,
    phonenumber: String,
    password_hash: Option<String>,
    role: String,
    avatar: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<UserRole, DbError> {
    match s {
        "Admin" => Ok(UserRole::Admin),
        "Regular" => Ok(UserRole::Regular),
        other => Err(DbError::CorruptRow(format!("unknown user role: {other}"))),
    }
}

fn role_to_string(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "Admin",
        UserRole::Regular => "Regular",
    }
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid company UUID: {e}")))?;
        Ok(User {
            id,
            company_id,
            firstname: self.firstname,
            surname: self.surname,
            email: self.email,
            phonenumber: self.phonenumber,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            avatar: self.avatar,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid UUID: {e}")))?;
        let company_id = Uuid::parse_str(&self.company_id)
            .map_err(|e| DbError::CorruptRow(format!("invalid company UUID: {e}")))?;
        Ok(User {
            id,
            company_id,
            firstname: self.firstname,
            surname: self.surname,
            email: self.email,
            phonenumber: self.phonenumber,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            avatar: self.avatar,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, company_id: Uuid, input: CreateUser) -> AgendoResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // The tenant reference comes from the argument, not the
        // payload: a spoofed company id on the input cannot leak the
        // record into another tenant.
        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 company_id = $company_id, \
                 firstname = $firstname, surname = $surname, \
                 email = $email, phonenumber = $phonenumber, \
                 password_hash = $password_hash, \
                 role = $role, avatar = $avatar",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()))
            .bind(("firstname", input.firstname))
            .bind(("surname", input.surname))
            .bind(("email", input.email))
            .bind(("phonenumber", input.phonenumber))
            .bind(("password_hash", input.password_hash))
            .bind(("role", role_to_string(input.role).to_string()))
            .bind(("avatar", input.avatar))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, company_id: Uuid, id: Uuid) -> AgendoResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('user', $id) \
                 WHERE company_id = $company_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn find_by_email(&self, email: &str) -> AgendoResult<Option<User>> {
        // Deliberately unscoped: email uniqueness spans all tenants.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_user()?)),
            None => Ok(None),
        }
    }

    async fn update(&self, company_id: Uuid, id: Uuid, input: UpdateUser) -> AgendoResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.firstname.is_some() {
            sets.push("firstname = $firstname");
        }
        if input.surname.is_some() {
            sets.push("surname = $surname");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.phonenumber.is_some() {
            sets.push("phonenumber = $phonenumber");
        }
        if input.password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if input.avatar.is_some() {
            sets.push("avatar = $avatar");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {} \
             WHERE company_id = $company_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("company_id", company_id.to_string()));

        if let Some(firstname) = input.firstname {
            builder = builder.bind(("firstname", firstname));
        }
        if let Some(surname) = input.surname {
            builder = builder.bind(("surname", surname));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(phonenumber) = input.phonenumber {
            builder = builder.bind(("phonenumber", phonenumber));
        }
        if let Some(password_hash) = input.password_hash {
            builder = builder.bind(("password_hash", password_hash));
        }
        if let Some(avatar) = input.avatar {
            builder = builder.bind(("avatar", avatar));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn list_by_role(&self, company_id: Uuid, role: UserRole) -> AgendoResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE company_id = $company_id AND role = $role \
                 ORDER BY created_at ASC",
            )
            .bind(("company_id", company_id.to_string()))
            .bind(("role", role_to_string(role).to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }
}
