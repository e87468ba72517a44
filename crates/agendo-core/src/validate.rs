//! Validation engine.
//!
//! Pure field-level validation for candidate records, with no store or
//! tenant context. Callers precompute the one rule that needs storage
//! knowledge (email uniqueness) and pass the outcome in, so every
//! function here is deterministic and testable in isolation.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AgendoError, AgendoResult};

/// Maximum length for short text fields (name, email, phone, ...).
pub const MAX_FIELD_LEN: usize = 255;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Wire format for `scheduled_at` as submitted by the interface layer.
const SCHEDULED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

/// Outcome of validating a candidate record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(violations)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Convert into a result, surfacing violations as
    /// [`AgendoError::Validation`].
    pub fn into_result(self) -> AgendoResult<()> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(violations) => Err(AgendoError::Validation { violations }),
        }
    }
}

/// A candidate appointment as submitted by the interface layer.
/// `scheduled_at` arrives as text and must parse before persistence.
#[derive(Debug, Clone)]
pub struct AppointmentDraft {
    pub name: String,
    pub scheduled_at: String,
    pub appointment_type_id: Option<Uuid>,
}

/// A candidate user as submitted by the interface layer.
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub firstname: String,
    pub surname: String,
    pub email: String,
    pub phonenumber: String,
    /// Plaintext password; optional. Hashing happens after validation.
    pub password: Option<String>,
}

/// Parse a submitted `scheduled_at` value (`YYYY-MM-DD HH:MM:SS`,
/// interpreted as UTC).
pub fn parse_scheduled_at(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, SCHEDULED_AT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Render a stored `scheduled_at` back into the wire format, the
/// inverse of [`parse_scheduled_at`].
pub fn format_scheduled_at(value: DateTime<Utc>) -> String {
    value.format(SCHEDULED_AT_FORMAT).to_string()
}

fn check_required(violations: &mut Vec<Violation>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        violations.push(Violation {
            field,
            message: format!("{field} is required"),
        });
    } else if value.chars().count() > MAX_FIELD_LEN {
        violations.push(Violation {
            field,
            message: format!("{field} may not be longer than {MAX_FIELD_LEN} characters"),
        });
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.contains(char::is_whitespace)
}

/// Validate a candidate appointment.
///
/// Rules: `name` required and at most 255 characters; `scheduled_at`
/// required and parseable as a date/time.
pub fn validate_appointment(draft: &AppointmentDraft) -> ValidationResult {
    let mut violations = Vec::new();

    check_required(&mut violations, "name", &draft.name);

    if draft.scheduled_at.trim().is_empty() {
        violations.push(Violation {
            field: "scheduled_at",
            message: "scheduled_at is required".into(),
        });
    } else if parse_scheduled_at(&draft.scheduled_at).is_none() {
        violations.push(Violation {
            field: "scheduled_at",
            message: "scheduled_at is not a valid date".into(),
        });
    }

    ValidationResult::from_violations(violations)
}

/// Validate a candidate user.
///
/// `email_in_use` is the precomputed uniqueness lookup: `true` when
/// some *other* record already owns the candidate email. For updates
/// that leave the email unchanged the caller passes `false` without
/// consulting the store at all, so an unchanged email can never
/// trigger a uniqueness violation — even against pre-existing
/// duplicate data.
pub fn validate_user(draft: &UserDraft, email_in_use: bool) -> ValidationResult {
    let mut violations = Vec::new();

    check_required(&mut violations, "firstname", &draft.firstname);
    check_required(&mut violations, "surname", &draft.surname);
    check_required(&mut violations, "email", &draft.email);
    check_required(&mut violations, "phonenumber", &draft.phonenumber);

    if !draft.email.trim().is_empty() && !looks_like_email(&draft.email) {
        violations.push(Violation {
            field: "email",
            message: "email is not a valid address".into(),
        });
    }

    if email_in_use {
        violations.push(Violation {
            field: "email",
            message: "email is already taken".into(),
        });
    }

    if let Some(password) = &draft.password
        && password.chars().count() < MIN_PASSWORD_LEN
    {
        violations.push(Violation {
            field: "password",
            message: format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        });
    }

    ValidationResult::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment_draft() -> AppointmentDraft {
        AppointmentDraft {
            name: "Checkup".into(),
            scheduled_at: "2024-03-15 10:00:00".into(),
            appointment_type_id: None,
        }
    }

    fn user_draft() -> UserDraft {
        UserDraft {
            firstname: "Alice".into(),
            surname: "Smith".into(),
            email: "alice@example.com".into(),
            phonenumber: "+31612345678".into(),
            password: Some("hunter22".into()),
        }
    }

    #[test]
    fn valid_appointment_passes() {
        assert!(validate_appointment(&appointment_draft()).is_valid());
    }

    #[test]
    fn appointment_name_is_required() {
        let mut draft = appointment_draft();
        draft.name = "  ".into();
        let ValidationResult::Invalid(violations) = validate_appointment(&draft) else {
            panic!("expected violations");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
    }

    #[test]
    fn appointment_name_max_length() {
        let mut draft = appointment_draft();
        draft.name = "x".repeat(MAX_FIELD_LEN);
        assert!(validate_appointment(&draft).is_valid());

        draft.name.push('x');
        assert!(!validate_appointment(&draft).is_valid());
    }

    #[test]
    fn appointment_rejects_unparseable_date() {
        let mut draft = appointment_draft();
        draft.scheduled_at = "next tuesday".into();
        let ValidationResult::Invalid(violations) = validate_appointment(&draft) else {
            panic!("expected violations");
        };
        assert_eq!(violations[0].field, "scheduled_at");
    }

    #[test]
    fn scheduled_at_parses_wire_format() {
        let parsed = parse_scheduled_at("2024-02-29 23:59:59").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-02-29T23:59:59+00:00");
        // Not a leap year.
        assert!(parse_scheduled_at("2023-02-29 00:00:00").is_none());
    }

    #[test]
    fn valid_user_passes() {
        assert!(validate_user(&user_draft(), false).is_valid());
    }

    #[test]
    fn user_all_required_fields() {
        let draft = UserDraft {
            firstname: String::new(),
            surname: String::new(),
            email: String::new(),
            phonenumber: String::new(),
            password: None,
        };
        let ValidationResult::Invalid(violations) = validate_user(&draft, false) else {
            panic!("expected violations");
        };
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, ["firstname", "surname", "email", "phonenumber"]);
    }

    #[test]
    fn user_email_format_is_checked() {
        let mut draft = user_draft();
        for bad in ["not-an-email", "@example.com", "a@b", "a b@example.com"] {
            draft.email = bad.into();
            assert!(!validate_user(&draft, false).is_valid(), "accepted {bad:?}");
        }
    }

    #[test]
    fn user_email_uniqueness_violation() {
        let ValidationResult::Invalid(violations) = validate_user(&user_draft(), true) else {
            panic!("expected violations");
        };
        assert_eq!(violations[0].field, "email");
        assert!(violations[0].message.contains("taken"));
    }

    #[test]
    fn user_password_min_length_only_when_present() {
        let mut draft = user_draft();
        draft.password = Some("short".into());
        assert!(!validate_user(&draft, false).is_valid());

        draft.password = None;
        assert!(validate_user(&draft, false).is_valid());
    }

    #[test]
    fn validation_is_idempotent() {
        let draft = user_draft();
        assert_eq!(validate_user(&draft, false), validate_user(&draft, false));
        assert_eq!(validate_user(&draft, true), validate_user(&draft, true));
    }
}
