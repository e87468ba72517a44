//! Company domain model.
//!
//! A company is the tenant root: every user, appointment type and
//! appointment belongs to exactly one company, and the public
//! operations of the core never cross that boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A company is the unit of data isolation.
///
/// Companies are created out-of-band (provisioning is not part of the
/// scheduling core) and are never deleted by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
}
