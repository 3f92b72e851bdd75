//! Client and phone-number domain model.
//!
//! # Responsibility
//! - Define the persisted record shapes and their write-side validation.
//! - Make the optional-field semantics of patch/filter inputs explicit.
//!
//! # Invariants
//! - `client_id` is stable and never reused for another client.
//! - `name`, `last_name` and `email` are non-empty and bounded in length.
//! - A `PhoneNumber` always references a live client.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a client row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ClientId = i64;

/// Stable identifier for a phone-number row.
pub type PhoneNumberId = i64;

pub const NAME_MAX_CHARS: usize = 40;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const PHONE_MAX_CHARS: usize = 40;

/// Canonical persisted client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: ClientId,
    pub name: String,
    pub last_name: String,
    /// Unique across all clients; uniqueness is enforced by the engine.
    pub email: String,
}

/// Canonical persisted phone-number record.
///
/// Numbers are free text: neither uniqueness nor format is an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub phone_number_id: PhoneNumberId,
    pub phone_number: String,
    /// Owning client. Deleting the client deletes this row.
    pub client_id: ClientId,
}

/// Input for creating a client, optionally with one initial phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub last_name: String,
    pub email: String,
    /// When set, a linked phone row is created in the same transaction.
    pub phone_number: Option<String>,
}

impl NewClient {
    /// Creates a new-client input without an initial phone number.
    pub fn new(
        name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: None,
        }
    }

    /// Attaches an initial phone number to this input.
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Checks field-level contracts before any SQL is issued.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        validate_name("name", &self.name)?;
        validate_name("last_name", &self.last_name)?;
        validate_bounded("email", &self.email, EMAIL_MAX_CHARS)?;
        if let Some(number) = self.phone_number.as_deref() {
            validate_phone_number(number)?;
        }
        Ok(())
    }
}

/// Field patch for `update_info`.
///
/// `Some(value)` means "set this field to `value`"; `None` means "leave the
/// field unchanged". There is no way to null a field through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ClientPatch {
    /// Returns whether the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    /// Checks field-level contracts for every supplied field.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if let Some(name) = self.name.as_deref() {
            validate_name("name", name)?;
        }
        if let Some(last_name) = self.last_name.as_deref() {
            validate_name("last_name", last_name)?;
        }
        if let Some(email) = self.email.as_deref() {
            validate_bounded("email", email, EMAIL_MAX_CHARS)?;
        }
        Ok(())
    }
}

/// Lookup filter for `find_client`/`find_clients`.
///
/// `Some(value)` means "match rows where the field equals `value`"; `None`
/// means "do not filter on this field" (never "must be null"). When
/// `phone_number` is set, lookup goes through the ownership relation and the
/// other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFilter {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl ClientFilter {
    /// Filter matching clients by first name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Filter matching clients by email.
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Filter resolving the owner of a phone number.
    pub fn by_phone_number(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            ..Self::default()
        }
    }
}

/// Field-contract violation detected before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyField { field: &'static str },
    FieldTooLong { field: &'static str, max_chars: usize },
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "field `{field}` must not be empty"),
            Self::FieldTooLong { field, max_chars } => {
                write!(f, "field `{field}` exceeds {max_chars} characters")
            }
        }
    }
}

impl Error for ClientValidationError {}

fn validate_name(field: &'static str, value: &str) -> Result<(), ClientValidationError> {
    validate_bounded(field, value, NAME_MAX_CHARS)
}

fn validate_bounded(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ClientValidationError> {
    if value.trim().is_empty() {
        return Err(ClientValidationError::EmptyField { field });
    }
    if value.chars().count() > max_chars {
        return Err(ClientValidationError::FieldTooLong { field, max_chars });
    }
    Ok(())
}

/// Checks the field contract for a standalone phone-number value.
pub fn validate_phone_number(value: &str) -> Result<(), ClientValidationError> {
    validate_bounded("phone_number", value, PHONE_MAX_CHARS)
}

#[cfg(test)]
mod tests {
    use super::{ClientFilter, ClientPatch, ClientValidationError, NewClient};

    #[test]
    fn new_client_builder_sets_all_fields() {
        let input = NewClient::new("Rin", "Hirst", "qwerty@gmail.com").with_phone_number("7894743");
        assert_eq!(input.name, "Rin");
        assert_eq!(input.last_name, "Hirst");
        assert_eq!(input.email, "qwerty@gmail.com");
        assert_eq!(input.phone_number.as_deref(), Some("7894743"));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let input = NewClient::new("", "Hirst", "a@b.c");
        assert_eq!(
            input.validate(),
            Err(ClientValidationError::EmptyField { field: "name" })
        );
    }

    #[test]
    fn validate_rejects_whitespace_only_email() {
        let input = NewClient::new("Rin", "Hirst", "   ");
        assert_eq!(
            input.validate(),
            Err(ClientValidationError::EmptyField { field: "email" })
        );
    }

    #[test]
    fn validate_rejects_overlong_fields() {
        let input = NewClient::new("x".repeat(41), "Hirst", "a@b.c");
        assert_eq!(
            input.validate(),
            Err(ClientValidationError::FieldTooLong {
                field: "name",
                max_chars: 40
            })
        );

        let input = NewClient::new("Rin", "Hirst", format!("{}@x.y", "a".repeat(100)));
        assert_eq!(
            input.validate(),
            Err(ClientValidationError::FieldTooLong {
                field: "email",
                max_chars: 100
            })
        );
    }

    #[test]
    fn validate_accepts_boundary_lengths() {
        let input = NewClient::new("x".repeat(40), "y".repeat(40), "z".repeat(100))
            .with_phone_number("7".repeat(40));
        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn patch_validates_only_supplied_fields() {
        let patch = ClientPatch {
            name: Some("Tom".to_string()),
            ..ClientPatch::default()
        };
        assert_eq!(patch.validate(), Ok(()));
        assert!(!patch.is_empty());

        let bad = ClientPatch {
            email: Some(String::new()),
            ..ClientPatch::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ClientValidationError::EmptyField { field: "email" })
        );
    }

    #[test]
    fn default_patch_and_filter_are_empty() {
        assert!(ClientPatch::default().is_empty());
        let filter = ClientFilter::default();
        assert!(filter.name.is_none());
        assert!(filter.phone_number.is_none());
    }

    #[test]
    fn filter_serde_uses_field_names() {
        let filter = ClientFilter::by_phone_number("7894743");
        let json = serde_json::to_string(&filter).unwrap();
        let parsed: ClientFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, filter);
        assert!(json.contains("\"phone_number\":\"7894743\""));
    }
}
