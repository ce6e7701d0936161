//! # Error Types — Declaration and Value Errors
//!
//! Two families of errors live here, mirroring the two capabilities of a
//! model declaration:
//!
//! - [`ModelError`] — a malformed declaration. These are configuration
//!   errors: fatal, raised while a registry is being built, never
//!   recoverable by changing input data.
//! - [`ValidationError`] — a value rejected by a validator's `check`.
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.

use thiserror::Error;

/// A malformed model declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The same field name was declared twice by one model.
    ///
    /// Redeclaring an *inherited* name is an override, not a duplicate.
    #[error("model '{model}' declares field '{field}' more than once")]
    DuplicateField {
        /// Model whose declaration is invalid.
        model: String,
        /// The repeated field name.
        field: String,
    },

    /// A model inherits from itself, directly or through its ancestors.
    #[error("model '{model}' inherits from itself (chain: {chain})")]
    CyclicInheritance {
        /// Model at which the cycle was detected.
        model: String,
        /// Inheritance chain leading back to `model`, joined by ` -> `.
        chain: String,
    },

    /// An embedded or list field was declared without a target.
    #[error("field '{field}' of kind {kind} requires a target")]
    MissingTarget {
        /// Field name.
        field: String,
        /// Declared kind.
        kind: String,
    },

    /// A scalar field was declared with a target.
    #[error("field '{field}' of kind {kind} does not accept a target")]
    UnexpectedTarget {
        /// Field name.
        field: String,
        /// Declared kind.
        kind: String,
    },

    /// A candidate set with no members.
    #[error("field '{field}' declares an empty candidate set")]
    EmptyCandidates {
        /// Field name.
        field: String,
    },

    /// A kind identifier that is not part of the kind vocabulary.
    #[error("unknown field kind: {0:?}")]
    UnknownKind(String),

    /// A `Regex` validator pattern that does not compile.
    #[error("invalid regex pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern as declared.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A `Min`/`Max` bound that is NaN or infinite.
    #[error("numeric bound must be finite, got {bound}")]
    InvalidBound {
        /// The bound as written.
        bound: String,
    },

    /// A `Length` whose minimum exceeds its maximum.
    #[error("length range {min}..={max} is empty")]
    InvalidLength {
        /// Declared minimum.
        min: usize,
        /// Declared maximum.
        max: usize,
    },
}

/// A value rejected by a validator's `check`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Number below the declared minimum.
    #[error("{value} is lower than the minimum {bound}{}", exclusive_suffix(*.exclusive))]
    BelowMinimum {
        /// Checked value.
        value: f64,
        /// Declared bound.
        bound: f64,
        /// Whether the bound itself is rejected.
        exclusive: bool,
    },

    /// Number above the declared maximum.
    #[error("{value} is greater than the maximum {bound}{}", exclusive_suffix(*.exclusive))]
    AboveMaximum {
        /// Checked value.
        value: f64,
        /// Declared bound.
        bound: f64,
        /// Whether the bound itself is rejected.
        exclusive: bool,
    },

    /// String that does not match a `Regex` validator.
    #[error("{value:?} does not match pattern {pattern:?}")]
    PatternMismatch {
        /// Checked value.
        value: String,
        /// Pattern as it appears in the schema.
        pattern: String,
    },

    /// String or array length outside the declared range.
    #[error("length {length} is outside the allowed range {min}..={}", upper_bound(*.max))]
    LengthOutOfRange {
        /// Measured length.
        length: usize,
        /// Declared minimum.
        min: usize,
        /// Declared maximum, if any.
        max: Option<usize>,
    },

    /// A value of a type the validator does not apply to.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Description of accepted values.
        expected: &'static str,
        /// JSON type of the rejected value.
        found: &'static str,
    },

    /// Rejection reported by a user-supplied validator.
    #[error("{0}")]
    Rejected(String),
}

fn upper_bound(max: Option<usize>) -> String {
    max.map_or_else(|| "∞".to_string(), |m| m.to_string())
}

fn exclusive_suffix(exclusive: bool) -> &'static str {
    if exclusive {
        " (exclusive)"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_display() {
        let err = ModelError::DuplicateField {
            model: "Person".to_string(),
            field: "name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "model 'Person' declares field 'name' more than once"
        );
    }

    #[test]
    fn test_minimum_display_mentions_exclusive() {
        let err = ValidationError::BelowMinimum {
            value: 18.0,
            bound: 18.0,
            exclusive: true,
        };
        assert!(err.to_string().contains("(exclusive)"));
    }

    #[test]
    fn test_length_display_unbounded() {
        let err = ValidationError::LengthOutOfRange {
            length: 2,
            min: 5,
            max: None,
        };
        assert!(err.to_string().contains("5..=∞"));
    }
}
