//! # Field Targets — Single Reference or Candidate Set
//!
//! Embedded and list fields point at what they contain. A target is either
//! one [`Candidate`] or an ordered set of them. A candidate is a model (by
//! type or, for manifest-declared models, by name) or a primitive
//! [`ScalarKind`].
//!
//! The schema compiler applies one collapsing rule to every target: exactly
//! one candidate is inlined, more than one becomes a `oneOf` in declared
//! order.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;
use crate::kind::ScalarKind;
use crate::model::{registry_of, Model, ModelRegistry};

type Loader = fn() -> Result<Arc<ModelRegistry>, ModelError>;

/// A reference to a model declared as a Rust type.
///
/// Holds the type's identity and a loader for its cached registry, so a
/// field can point at a model without the model ever being instantiated.
#[derive(Clone, Copy)]
pub struct TypedModel {
    id: TypeId,
    name: &'static str,
    load: Loader,
}

impl TypedModel {
    /// Reference to model `M`.
    pub fn of<M: Model>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: M::model_name(),
            load: registry_of::<M>,
        }
    }

    /// The model's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Load (building on first use) the model's registry.
    ///
    /// # Errors
    ///
    /// Returns the `ModelError` raised while building the registry.
    pub fn registry(&self) -> Result<Arc<ModelRegistry>, ModelError> {
        (self.load)()
    }
}

impl PartialEq for TypedModel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypedModel {}

impl fmt::Debug for TypedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedModel").field(&self.name).finish()
    }
}

/// A reference to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRef {
    /// A model declared as a Rust type.
    Typed(TypedModel),
    /// A model declared by name in a manifest, resolved by the compiler.
    Named(String),
}

impl ModelRef {
    /// The referenced model's name.
    pub fn name(&self) -> &str {
        match self {
            Self::Typed(t) => t.name(),
            Self::Named(name) => name,
        }
    }
}

/// One member of a target: a model or a primitive kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A nested model.
    Model(ModelRef),
    /// A primitive value of a scalar kind.
    Primitive(ScalarKind),
}

impl Candidate {
    /// Model `M` as a candidate.
    pub fn model<M: Model>() -> Self {
        Self::Model(ModelRef::Typed(TypedModel::of::<M>()))
    }

    /// A manifest model, by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Model(ModelRef::Named(name.into()))
    }
}

impl From<ScalarKind> for Candidate {
    fn from(kind: ScalarKind) -> Self {
        Self::Primitive(kind)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(m) => f.write_str(m.name()),
            Self::Primitive(k) => write!(f, "{k}"),
        }
    }
}

/// What an embedded or list field contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTarget {
    /// Exactly one candidate.
    Single(Candidate),
    /// An ordered candidate set.
    Candidates(Vec<Candidate>),
}

impl FieldTarget {
    /// All candidates, in declared order.
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::Single(c) => std::slice::from_ref(c),
            Self::Candidates(cs) => cs,
        }
    }
}

impl From<Candidate> for FieldTarget {
    fn from(candidate: Candidate) -> Self {
        Self::Single(candidate)
    }
}

impl From<ScalarKind> for FieldTarget {
    fn from(kind: ScalarKind) -> Self {
        Self::Single(Candidate::Primitive(kind))
    }
}

impl From<Vec<Candidate>> for FieldTarget {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self::Candidates(candidates)
    }
}

impl<const N: usize> From<[Candidate; N]> for FieldTarget {
    fn from(candidates: [Candidate; N]) -> Self {
        Self::Candidates(candidates.into())
    }
}
