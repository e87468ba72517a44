//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Regular,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// The company this user belongs to. Immutable after creation.
    pub company_id: Uuid,
    pub firstname: String,
    pub surname: String,
    /// Unique across the whole system, not just within the tenant.
    pub email: String,
    pub phonenumber: String,
    /// Argon2id PHC-format hash. `None` when no password was set.
    pub password_hash: Option<String>,
    pub role: UserRole,
    /// Opaque reference into external file storage.
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new user.
///
/// The tenant reference is not part of this struct — it is passed
/// separately and forced by the repository, so a spoofed company id
/// can never cross the tenant boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub firstname: String,
    pub surname: String,
    pub email: String,
    pub phonenumber: String,
    /// Already hashed; the core never persists plaintext.
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub avatar: Option<String>,
}

/// Changeset for updating a user. `None` = field unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub firstname: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phonenumber: Option<String>,
    /// Already hashed replacement password.
    pub password_hash: Option<String>,
    pub avatar: Option<String>,
}
