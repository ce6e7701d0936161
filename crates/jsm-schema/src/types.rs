//! # Type Mapping
//!
//! Scalar kind → base schema fragment. Total over [`ScalarKind`]; embedded
//! and list fields never reach here, their shape comes from the compiler.
//!
//! | kind | fragment |
//! |---|---|
//! | String | `{"type": "string"}` |
//! | Int | `{"type": "integer"}` |
//! | Float | `{"type": "number"}` |
//! | Bool | `{"type": "boolean"}` |
//! | Date | `{"type": "string", "format": "date"}` |
//! | Time | `{"type": "string", "format": "time"}` |
//! | DateTime | `{"type": "string", "format": "date-time"}` |

use jsm_core::{Fragment, ScalarKind};
use serde_json::Value;

/// JSON Schema `type` and optional `format` for a scalar kind.
pub fn type_and_format(kind: ScalarKind) -> (&'static str, Option<&'static str>) {
    match kind {
        ScalarKind::String => ("string", None),
        ScalarKind::Int => ("integer", None),
        ScalarKind::Float => ("number", None),
        ScalarKind::Bool => ("boolean", None),
        ScalarKind::Date => ("string", Some("date")),
        ScalarKind::Time => ("string", Some("time")),
        ScalarKind::DateTime => ("string", Some("date-time")),
    }
}

/// Base fragment for a scalar kind.
pub fn base_fragment(kind: ScalarKind) -> Fragment {
    let (ty, format) = type_and_format(kind);
    let mut fragment = Fragment::new();
    fragment.insert("type".to_string(), Value::String(ty.to_string()));
    if let Some(format) = format {
        fragment.insert("format".to_string(), Value::String(format.to_string()));
    }
    fragment
}
