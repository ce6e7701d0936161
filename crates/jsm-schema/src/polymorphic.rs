//! # Polymorphic Targets
//!
//! One collapsing rule for every embedded and list target:
//!
//! - exactly one candidate: that candidate's fragment, inlined;
//! - more than one: `{"oneOf": [...]}`, one branch per candidate, in
//!   declared order.
//!
//! Candidate sets are never empty; `Declaration::build` rejects them.
//!
//! A model candidate contributes its compiled document; a primitive
//! candidate contributes its type mapping. Embedded polymorphism and
//! heterogeneous lists go through the same path.

use std::sync::Arc;

use jsm_core::{Candidate, FieldDescriptor, FieldTarget, Fragment, ModelRef, ModelRegistry};
use serde_json::Value;

use crate::compiler::{CompilePath, SchemaCompiler};
use crate::error::SchemaError;
use crate::types::base_fragment;

impl SchemaCompiler<'_> {
    pub(crate) fn resolve_target(
        &self,
        owner: &ModelRegistry,
        field: &FieldDescriptor,
        target: &FieldTarget,
        path: &mut CompilePath,
    ) -> Result<Fragment, SchemaError> {
        let candidates = match target {
            FieldTarget::Single(candidate) => {
                return self.candidate_fragment(owner, field, candidate, path)
            }
            FieldTarget::Candidates(candidates) => candidates.as_slice(),
        };

        match candidates {
            [only] => self.candidate_fragment(owner, field, only, path),
            many => {
                let branches = many
                    .iter()
                    .map(|c| self.candidate_fragment(owner, field, c, path).map(Value::Object))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut fragment = Fragment::new();
                fragment.insert("oneOf".to_string(), Value::Array(branches));
                Ok(fragment)
            }
        }
    }

    fn candidate_fragment(
        &self,
        owner: &ModelRegistry,
        field: &FieldDescriptor,
        candidate: &Candidate,
        path: &mut CompilePath,
    ) -> Result<Fragment, SchemaError> {
        match candidate {
            Candidate::Primitive(kind) => Ok(base_fragment(*kind)),
            Candidate::Model(reference) => {
                let registry = self.resolve_model(owner, field, reference)?;
                self.compile_model(&registry, path)
            }
        }
    }

    fn resolve_model(
        &self,
        owner: &ModelRegistry,
        field: &FieldDescriptor,
        reference: &ModelRef,
    ) -> Result<Arc<ModelRegistry>, SchemaError> {
        match reference {
            ModelRef::Typed(typed) => Ok(typed.registry()?),
            ModelRef::Named(name) => self
                .catalog()
                .and_then(|catalog| catalog.get(name))
                .cloned()
                .ok_or_else(|| SchemaError::UnresolvedModel {
                    model: owner.name().to_string(),
                    field: field.name().to_string(),
                    target: name.clone(),
                }),
        }
    }
}
