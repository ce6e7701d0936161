//! # Field Declarations
//!
//! [`Field`] is what a model declares; [`FieldDescriptor`] is what its
//! registry stores once the declaration site has given the field a name.
//!
//! The "target iff embedded or list" invariant holds by construction for the
//! typed constructors ([`Field::string`], [`Field::embedded`], ...) and is
//! checked by [`Field::new`], the constructor used for manifest-declared
//! fields.

use std::fmt;
use std::sync::Arc;

use crate::error::ModelError;
use crate::kind::{FieldKind, ScalarKind};
use crate::target::FieldTarget;
use crate::validator::Validator;

/// Shape of a field: a scalar, or a kind with a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// A scalar value.
    Scalar(ScalarKind),
    /// A nested model, or one of several.
    Embedded(FieldTarget),
    /// An array of candidates.
    List(FieldTarget),
}

impl FieldShape {
    /// The field kind of this shape.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Scalar(k) => FieldKind::from(*k),
            Self::Embedded(_) => FieldKind::Embedded,
            Self::List(_) => FieldKind::ListOf,
        }
    }

    /// The target, for embedded and list shapes.
    pub fn target(&self) -> Option<&FieldTarget> {
        match self {
            Self::Scalar(_) => None,
            Self::Embedded(t) | Self::List(t) => Some(t),
        }
    }
}

/// An unnamed field declaration.
#[derive(Clone)]
pub struct Field {
    shape: FieldShape,
    required: bool,
    validators: Vec<Arc<dyn Validator>>,
}

impl Field {
    fn with_shape(shape: FieldShape) -> Self {
        Self {
            shape,
            required: false,
            validators: Vec::new(),
        }
    }

    /// A field of an arbitrary kind.
    ///
    /// `field` names the field in error messages.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MissingTarget` for an embedded or list kind
    /// without a target, and `ModelError::UnexpectedTarget` for a scalar
    /// kind with one.
    pub fn new(
        field: &str,
        kind: FieldKind,
        target: Option<FieldTarget>,
    ) -> Result<Self, ModelError> {
        let shape = match (kind.as_scalar(), target) {
            (Some(scalar), None) => FieldShape::Scalar(scalar),
            (Some(_), Some(_)) => {
                return Err(ModelError::UnexpectedTarget {
                    field: field.to_string(),
                    kind: kind.to_string(),
                })
            }
            (None, None) => {
                return Err(ModelError::MissingTarget {
                    field: field.to_string(),
                    kind: kind.to_string(),
                })
            }
            (None, Some(target)) => match kind {
                FieldKind::ListOf => FieldShape::List(target),
                _ => FieldShape::Embedded(target),
            },
        };
        Ok(Self::with_shape(shape))
    }

    /// A scalar field.
    pub fn scalar(kind: ScalarKind) -> Self {
        Self::with_shape(FieldShape::Scalar(kind))
    }

    /// Text.
    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }

    /// Whole number.
    pub fn int() -> Self {
        Self::scalar(ScalarKind::Int)
    }

    /// Floating-point number.
    pub fn float() -> Self {
        Self::scalar(ScalarKind::Float)
    }

    /// Boolean.
    pub fn bool() -> Self {
        Self::scalar(ScalarKind::Bool)
    }

    /// Calendar date.
    pub fn date() -> Self {
        Self::scalar(ScalarKind::Date)
    }

    /// Time of day.
    pub fn time() -> Self {
        Self::scalar(ScalarKind::Time)
    }

    /// Date and time.
    pub fn datetime() -> Self {
        Self::scalar(ScalarKind::DateTime)
    }

    /// A nested model, or one of a candidate set.
    pub fn embedded(target: impl Into<FieldTarget>) -> Self {
        Self::with_shape(FieldShape::Embedded(target.into()))
    }

    /// An array of candidates.
    pub fn list(target: impl Into<FieldTarget>) -> Self {
        Self::with_shape(FieldShape::List(target.into()))
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set required-ness explicitly.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Attach one validator.
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Attach several validators, in order.
    pub fn validators<I>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        self.validators.extend(validators);
        self
    }

    /// The field's shape.
    pub fn shape(&self) -> &FieldShape {
        &self.shape
    }

    pub(crate) fn named(self, name: String) -> FieldDescriptor {
        FieldDescriptor {
            name,
            shape: self.shape,
            required: self.required,
            validators: self.validators,
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("shape", &self.shape)
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// A named, immutable field entry of a model registry.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    shape: FieldShape,
    required: bool,
    validators: Vec<Arc<dyn Validator>>,
}

impl FieldDescriptor {
    /// The field name, as given at the declaration site.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field kind.
    pub fn kind(&self) -> FieldKind {
        self.shape.kind()
    }

    /// The field shape.
    pub fn shape(&self) -> &FieldShape {
        &self.shape
    }

    /// The target of an embedded or list field.
    pub fn target(&self) -> Option<&FieldTarget> {
        self.shape.target()
    }

    /// Whether the field must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Attached validators, in declaration order.
    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("required", &self.required)
            .field("validators", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Candidate;
    use crate::validator::{Length, Min};

    #[test]
    fn test_new_enforces_target_invariant() {
        assert!(matches!(
            Field::new("car", FieldKind::Embedded, None),
            Err(ModelError::MissingTarget { .. })
        ));
        assert!(matches!(
            Field::new(
                "name",
                FieldKind::String,
                Some(FieldTarget::from(ScalarKind::String))
            ),
            Err(ModelError::UnexpectedTarget { .. })
        ));
        let list = Field::new(
            "tags",
            FieldKind::ListOf,
            Some(FieldTarget::from(ScalarKind::String)),
        )
        .unwrap();
        assert_eq!(list.shape().kind(), FieldKind::ListOf);
    }

    #[test]
    fn test_typed_constructors_carry_kind() {
        assert_eq!(Field::date().shape().kind(), FieldKind::Date);
        assert_eq!(Field::datetime().shape().kind(), FieldKind::DateTime);
        let field = Field::list(Candidate::named("Toy"));
        assert_eq!(field.shape().kind(), FieldKind::ListOf);
        assert_eq!(
            field.shape().target().unwrap().candidates(),
            &[Candidate::named("Toy")]
        );
        assert!(Field::int().shape().target().is_none());
    }

    #[test]
    fn test_single_validator_normalized_to_sequence() {
        let descriptor = Field::int()
            .required()
            .validator(Min::new(18))
            .named("age".to_string());
        assert_eq!(descriptor.name(), "age");
        assert!(descriptor.is_required());
        assert_eq!(descriptor.validators().len(), 1);
    }

    #[test]
    fn test_validators_keep_order() {
        let descriptor = Field::string()
            .validators([
                Arc::new(Length::new(1)) as Arc<dyn Validator>,
                Arc::new(Length::between(1, 3).unwrap()),
            ])
            .named("code".to_string());
        assert_eq!(descriptor.validators().len(), 2);
        assert!(!descriptor.is_required());
    }
}
