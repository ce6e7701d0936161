//! # Validators — Value Checks and Schema Contributions
//!
//! A validator has two capabilities:
//!
//! 1. **`check`** — accept or reject a runtime value. Every validator has it.
//! 2. **Schema contribution** — mutate the JSON Schema fragment of the field
//!    it is attached to. This capability is optional: a validator opts in by
//!    returning `Some` from [`Validator::schema_contribution`]. The schema
//!    compiler skips validators that return `None`.
//!
//! Any `Fn(&Value) -> Result<(), ValidationError>` is a validator with only
//! the `check` capability, so plain functions can be attached to fields.
//!
//! ## Built-ins
//!
//! | validator | contribution |
//! |---|---|
//! | [`Min`] | `minimum` (+ `exclusiveMinimum: true`) |
//! | [`Max`] | `maximum` (+ `exclusiveMaximum: true`) |
//! | [`Regex`] | `pattern`, delimiters stripped, `(?i)` when case-insensitive |
//! | [`Length`] | `minLength` (+ `maxLength`) |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ValidationError};

/// A JSON Schema fragment: one key-ordered JSON object.
pub type Fragment = Map<String, Value>;

/// A value check, optionally able to contribute to a field's schema.
pub trait Validator: Send + Sync {
    /// Accept or reject `value`.
    fn check(&self, value: &Value) -> Result<(), ValidationError>;

    /// The schema contribution capability, if this validator has one.
    fn schema_contribution(&self) -> Option<&dyn SchemaContribution> {
        None
    }
}

/// In-place modification of a field's schema fragment.
pub trait SchemaContribution {
    /// Add this validator's constraints to `fragment`.
    fn modify_schema(&self, fragment: &mut Fragment);
}

impl<F> Validator for F
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        self(value)
    }
}

/// A numeric bound, kept as written so integers stay integers in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    /// Integer bound, emitted as a JSON integer.
    Int(i64),
    /// Fractional bound, emitted as a JSON number.
    Float(f64),
}

impl Bound {
    /// The bound as a float, for comparisons.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(n) => n as f64,
            Self::Float(f) => f,
        }
    }

    /// This bound, if it is a finite number.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidBound` for NaN and infinities.
    pub fn finite(self) -> Result<Self, ModelError> {
        match self {
            Self::Float(f) if !f.is_finite() => Err(ModelError::InvalidBound {
                bound: f.to_string(),
            }),
            _ => Ok(self),
        }
    }

    fn to_json(self) -> Value {
        match self {
            Self::Int(n) => Value::from(n),
            Self::Float(f) => Value::from(f),
        }
    }
}

impl From<i32> for Bound {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<i64> for Bound {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for Bound {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl TryFrom<f64> for Bound {
    type Error = ModelError;

    fn try_from(f: f64) -> Result<Self, Self::Error> {
        Self::Float(f).finite()
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn number(value: &Value) -> Result<f64, ValidationError> {
    value.as_f64().ok_or(ValidationError::TypeMismatch {
        expected: "a number",
        found: json_type_name(value),
    })
}

/// Lower bound on a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Min {
    /// The bound.
    pub bound: Bound,
    /// Reject values equal to the bound.
    pub exclusive: bool,
}

impl Min {
    /// Inclusive lower bound.
    pub fn new(bound: impl Into<Bound>) -> Self {
        Self {
            bound: bound.into(),
            exclusive: false,
        }
    }

    /// Exclusive lower bound.
    pub fn exclusive(bound: impl Into<Bound>) -> Self {
        Self {
            bound: bound.into(),
            exclusive: true,
        }
    }
}

impl Validator for Min {
    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let n = number(value)?;
        let bound = self.bound.as_f64();
        let ok = if self.exclusive { n > bound } else { n >= bound };
        if ok {
            Ok(())
        } else {
            Err(ValidationError::BelowMinimum {
                value: n,
                bound,
                exclusive: self.exclusive,
            })
        }
    }

    fn schema_contribution(&self) -> Option<&dyn SchemaContribution> {
        Some(self)
    }
}

impl SchemaContribution for Min {
    fn modify_schema(&self, fragment: &mut Fragment) {
        fragment.insert("minimum".to_string(), self.bound.to_json());
        if self.exclusive {
            fragment.insert("exclusiveMinimum".to_string(), Value::Bool(true));
        }
    }
}

/// Upper bound on a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Max {
    /// The bound.
    pub bound: Bound,
    /// Reject values equal to the bound.
    pub exclusive: bool,
}

impl Max {
    /// Inclusive upper bound.
    pub fn new(bound: impl Into<Bound>) -> Self {
        Self {
            bound: bound.into(),
            exclusive: false,
        }
    }

    /// Exclusive upper bound.
    pub fn exclusive(bound: impl Into<Bound>) -> Self {
        Self {
            bound: bound.into(),
            exclusive: true,
        }
    }
}

impl Validator for Max {
    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let n = number(value)?;
        let bound = self.bound.as_f64();
        let ok = if self.exclusive { n < bound } else { n <= bound };
        if ok {
            Ok(())
        } else {
            Err(ValidationError::AboveMaximum {
                value: n,
                bound,
                exclusive: self.exclusive,
            })
        }
    }

    fn schema_contribution(&self) -> Option<&dyn SchemaContribution> {
        Some(self)
    }
}

impl SchemaContribution for Max {
    fn modify_schema(&self, fragment: &mut Fragment) {
        fragment.insert("maximum".to_string(), self.bound.to_json());
        if self.exclusive {
            fragment.insert("exclusiveMaximum".to_string(), Value::Bool(true));
        }
    }
}

/// Strip one surrounding `/…/` pair, as in ECMAScript regex literals.
fn strip_delimiters(pattern: &str) -> &str {
    pattern
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
        .unwrap_or(pattern)
}

/// String pattern constraint.
///
/// `/^x$/` and `^x$` are the same pattern. With `ignorecase`, the schema
/// pattern carries the inline `(?i)` flag group.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    ignorecase: bool,
    compiled: regex::Regex,
}

impl Regex {
    /// Case-sensitive pattern.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidPattern` if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        Self::with_flags(pattern, false)
    }

    /// Case-insensitive pattern.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidPattern` if the pattern does not compile.
    pub fn ignorecase(pattern: &str) -> Result<Self, ModelError> {
        Self::with_flags(pattern, true)
    }

    /// Pattern with explicit case sensitivity.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidPattern` if the pattern does not compile.
    pub fn with_flags(pattern: &str, ignorecase: bool) -> Result<Self, ModelError> {
        let bare = strip_delimiters(pattern);
        let compiled = regex::RegexBuilder::new(bare)
            .case_insensitive(ignorecase)
            .build()
            .map_err(|e| ModelError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            pattern: bare.to_string(),
            ignorecase,
            compiled,
        })
    }

    /// The pattern as emitted in the schema.
    pub fn schema_pattern(&self) -> String {
        if self.ignorecase {
            format!("(?i){}", self.pattern)
        } else {
            self.pattern.clone()
        }
    }
}

impl Validator for Regex {
    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let s = value.as_str().ok_or(ValidationError::TypeMismatch {
            expected: "a string",
            found: json_type_name(value),
        })?;
        if self.compiled.is_match(s) {
            Ok(())
        } else {
            Err(ValidationError::PatternMismatch {
                value: s.to_string(),
                pattern: self.schema_pattern(),
            })
        }
    }

    fn schema_contribution(&self) -> Option<&dyn SchemaContribution> {
        Some(self)
    }
}

impl SchemaContribution for Regex {
    fn modify_schema(&self, fragment: &mut Fragment) {
        fragment.insert("pattern".to_string(), Value::String(self.schema_pattern()));
    }
}

/// Length constraint on strings (in characters) or arrays (in items).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    /// Minimum length, inclusive.
    pub min: usize,
    /// Maximum length, inclusive. `None` means unbounded.
    pub max: Option<usize>,
}

impl Length {
    /// At least `min`.
    pub fn new(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Between `min` and `max`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidLength` if `min > max`.
    pub fn between(min: usize, max: usize) -> Result<Self, ModelError> {
        if min > max {
            return Err(ModelError::InvalidLength { min, max });
        }
        Ok(Self {
            min,
            max: Some(max),
        })
    }
}

impl Validator for Length {
    fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let length = match value {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            other => {
                return Err(ValidationError::TypeMismatch {
                    expected: "a string or an array",
                    found: json_type_name(other),
                })
            }
        };
        let too_long = self.max.is_some_and(|max| length > max);
        if length < self.min || too_long {
            Err(ValidationError::LengthOutOfRange {
                length,
                min: self.min,
                max: self.max,
            })
        } else {
            Ok(())
        }
    }

    fn schema_contribution(&self) -> Option<&dyn SchemaContribution> {
        Some(self)
    }
}

impl SchemaContribution for Length {
    fn modify_schema(&self, fragment: &mut Fragment) {
        fragment.insert("minLength".to_string(), Value::from(self.min));
        if let Some(max) = self.max {
            fragment.insert("maxLength".to_string(), Value::from(max));
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// Exclusive bounds differ from inclusive ones only at the bound itself.
        #[test]
        fn min_exclusive_only_rejects_bound(bound in -1000i64..1000, value in -1000i64..1000) {
            let inclusive = Min::new(bound).check(&json!(value)).is_ok();
            let exclusive = Min::exclusive(bound).check(&json!(value)).is_ok();
            prop_assert_eq!(inclusive, value >= bound);
            prop_assert_eq!(exclusive, value > bound);
        }

        #[test]
        fn max_exclusive_only_rejects_bound(bound in -1000i64..1000, value in -1000i64..1000) {
            prop_assert_eq!(Max::new(bound).check(&json!(value)).is_ok(), value <= bound);
            prop_assert_eq!(Max::exclusive(bound).check(&json!(value)).is_ok(), value < bound);
        }

        /// Length counts characters, so multi-byte text is measured the same.
        #[test]
        fn length_counts_chars(s in "[a-zżółć]{0,12}", min in 0usize..8, extra in 0usize..8) {
            let length = Length::between(min, min + extra).unwrap();
            let n = s.chars().count();
            prop_assert_eq!(
                length.check(&Value::String(s)).is_ok(),
                n >= min && n <= min + extra
            );
        }

        /// Delimited and bare patterns behave identically.
        #[test]
        fn regex_delimiters_ignored(word in "[a-z]{1,8}", input in "[a-zA-Z]{0,8}") {
            let pattern = format!("^{word}$");
            let bare = Regex::new(&pattern).unwrap();
            let delimited = Regex::new(&format!("/{pattern}/")).unwrap();
            prop_assert_eq!(bare.schema_pattern(), delimited.schema_pattern());
            let value = Value::String(input);
            prop_assert_eq!(bare.check(&value).is_ok(), delimited.check(&value).is_ok());
        }
    }
}
