//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the farm registry. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Identifier errors distinguish a wrong digit count from a failed
//!   checksum, and carry the offending value.
//! - Validation errors name the field and the values that broke the rule.
//! - Integrity errors (uniqueness, dependents, missing references) carry the
//!   key or entity reference involved.
//!
//! Every error is recoverable by the caller. Nothing in the library crates
//! logs, retries, or swallows one of these.

use thiserror::Error;

use crate::identity::{EntityKind, EntityRef, IdentifierKind};
use crate::uniqueness::UniqueKey;

/// Top-level error type for the farm registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgriError {
    /// A candidate record failed its structural checks.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A natural key is already taken by a committed record.
    #[error("uniqueness violation: {key} is already registered")]
    UniquenessViolation {
        /// The colliding key.
        key: UniqueKey,
    },

    /// A non-cascading delete was blocked by records that still refer to the target.
    #[error("cannot delete {entity}: {dependents} dependent record(s) still refer to it")]
    DependentsExist {
        /// The entity that was asked to be deleted.
        entity: EntityRef,
        /// How many records directly refer to it through a referential edge.
        dependents: usize,
    },

    /// The referenced record is not committed.
    #[error("not found: {0}")]
    NotFound(EntityRef),

    /// A lifecycle transition that the state machine does not allow.
    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state name.
        from: String,
        /// Attempted target state name.
        to: String,
    },
}

impl From<IdentifierError> for AgriError {
    fn from(err: IdentifierError) -> Self {
        Self::Validation(ValidationError::Identifier(err))
    }
}

/// Rejection produced by the identifier validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The value does not normalize to 11 or 14 digits.
    #[error("invalid identifier format: {raw:?} has {digits} digit(s), expected 11 or 14")]
    InvalidFormat {
        /// The value as supplied by the caller.
        raw: String,
        /// Number of digits left after stripping formatting characters.
        digits: usize,
    },

    /// The value has the right length but its check digits do not match.
    #[error("invalid {kind} identifier checksum: {digits}")]
    InvalidChecksum {
        /// The classification implied by the length.
        kind: IdentifierKind,
        /// The normalized digits.
        digits: String,
    },
}

/// A candidate record that breaks a per-entity structural rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The producer identifier was rejected.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Arable plus vegetation area exceeds the total area.
    #[error(
        "arable area {arable} + vegetation area {vegetation} exceeds total area {total}"
    )]
    AreaInvariantViolation {
        /// Declared total area.
        total: f64,
        /// Declared arable area.
        arable: f64,
        /// Declared vegetation area.
        vegetation: f64,
    },

    /// An area field is below zero.
    #[error("{field} must not be negative, got {value}")]
    NegativeArea {
        /// Which area field.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// An area field is NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteArea {
        /// Which area field.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A name field is empty or only whitespace.
    #[error("{entity} name must not be empty")]
    EmptyName {
        /// The kind of record the name belongs to.
        entity: EntityKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RegionId;

    #[test]
    fn identifier_error_lifts_into_validation() {
        let err: AgriError = IdentifierError::InvalidFormat {
            raw: "123".into(),
            digits: 3,
        }
        .into();
        assert!(matches!(
            err,
            AgriError::Validation(ValidationError::Identifier(
                IdentifierError::InvalidFormat { digits: 3, .. }
            ))
        ));
    }

    #[test]
    fn display_messages_carry_context() {
        let err = ValidationError::AreaInvariantViolation {
            total: 100.0,
            arable: 80.0,
            vegetation: 30.0,
        };
        assert_eq!(
            err.to_string(),
            "arable area 80 + vegetation area 30 exceeds total area 100"
        );

        let err = AgriError::DependentsExist {
            entity: EntityRef::Region(RegionId::new(4)),
            dependents: 2,
        };
        assert_eq!(
            err.to_string(),
            "cannot delete region:4: 2 dependent record(s) still refer to it"
        );
    }
}
