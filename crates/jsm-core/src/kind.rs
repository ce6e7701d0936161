//! # Field Kinds — Closed Kind Vocabulary
//!
//! Two enums describe what a field holds:
//!
//! - [`ScalarKind`] — the seven kinds that map directly to a JSON Schema
//!   `type`/`format` pair. These are also the only kinds allowed as
//!   primitive members of a candidate set.
//! - [`FieldKind`] — the full vocabulary, adding `Embedded` and `ListOf`,
//!   whose shape depends on a target.
//!
//! Every `match` on either enum is exhaustive. Adding a kind forces every
//! consumer (notably the schema type mapper) to handle it at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A kind whose schema is a fixed `type` (and optional `format`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// UTF-8 text.
    String,
    /// Whole number.
    Int,
    /// Floating-point number.
    Float,
    /// `true` / `false`.
    Bool,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    Date,
    /// Time of day, serialized as `HH:MM:SS`.
    Time,
    /// Date and time, serialized as RFC 3339.
    #[serde(rename = "datetime")]
    DateTime,
}

impl ScalarKind {
    /// Returns all scalar kinds in declaration order.
    pub fn all() -> &'static [ScalarKind] {
        &[
            Self::String,
            Self::Int,
            Self::Float,
            Self::Bool,
            Self::Date,
            Self::Time,
            Self::DateTime,
        ]
    }

    /// Returns the identifier used in manifests and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

/// The semantic kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// UTF-8 text.
    String,
    /// Whole number.
    Int,
    /// Floating-point number.
    Float,
    /// `true` / `false`.
    Bool,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    #[serde(rename = "datetime")]
    DateTime,
    /// A nested model, or one of several candidate models.
    Embedded,
    /// An array whose items are drawn from a candidate set.
    #[serde(rename = "list")]
    ListOf,
}

impl FieldKind {
    /// Returns all field kinds in declaration order.
    pub fn all() -> &'static [FieldKind] {
        &[
            Self::String,
            Self::Int,
            Self::Float,
            Self::Bool,
            Self::Date,
            Self::Time,
            Self::DateTime,
            Self::Embedded,
            Self::ListOf,
        ]
    }

    /// Returns the identifier used in manifests and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Embedded => "embedded",
            Self::ListOf => "list",
        }
    }

    /// Returns the scalar kind, or `None` for `Embedded` and `ListOf`.
    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::String => Some(ScalarKind::String),
            Self::Int => Some(ScalarKind::Int),
            Self::Float => Some(ScalarKind::Float),
            Self::Bool => Some(ScalarKind::Bool),
            Self::Date => Some(ScalarKind::Date),
            Self::Time => Some(ScalarKind::Time),
            Self::DateTime => Some(ScalarKind::DateTime),
            Self::Embedded | Self::ListOf => None,
        }
    }
}

impl From<ScalarKind> for FieldKind {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => Self::String,
            ScalarKind::Int => Self::Int,
            ScalarKind::Float => Self::Float,
            ScalarKind::Bool => Self::Bool,
            ScalarKind::Date => Self::Date,
            ScalarKind::Time => Self::Time,
            ScalarKind::DateTime => Self::DateTime,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}
