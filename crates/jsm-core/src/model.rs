//! # Models and Registries
//!
//! A model is a Rust type implementing [`Model`]. Its fields are declared
//! once, in [`Model::declare`], against a [`Declaration`]: never on an
//! instance, so a model's constructor can take whatever arguments it likes.
//!
//! The declaration is resolved into a [`ModelRegistry`]: the ordered,
//! inheritance-resolved list of [`FieldDescriptor`]s.
//!
//! ## Inheritance
//!
//! `Declaration::extends::<Parent>()` merges the parent's registry. Parent
//! fields come first, in the parent's order. A field the child redeclares
//! replaces the parent's descriptor in the parent's slot; new fields are
//! appended in declaration order. A model declaring the same name twice is
//! a `ModelError::DuplicateField`.
//!
//! ## Registry Cache
//!
//! [`registry_of`] builds a model's registry on first request and publishes
//! it in a process-wide cache keyed by `TypeId`. Lookups take a read lock.
//! Construction runs under a single reentrant build lock, so each registry
//! is built exactly once even under concurrent first use, and nothing is
//! published until it is complete. The reentrant lock lets a registry build
//! its parents' registries on the same thread; a model found on its own
//! build stack is a `ModelError::CyclicInheritance`.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use parking_lot::{ReentrantMutex, RwLock};

use crate::error::ModelError;
use crate::field::{Field, FieldDescriptor};

/// A model declared as a Rust type.
pub trait Model: 'static {
    /// The model's name in diagnostics. Defaults to the unqualified type name.
    fn model_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Declare the model's fields and parents.
    fn declare(model: &mut Declaration);

    /// The model's registry, built on first use.
    ///
    /// # Errors
    ///
    /// Returns the `ModelError` raised while building the registry.
    fn registry() -> Result<Arc<ModelRegistry>, ModelError>
    where
        Self: Sized,
    {
        registry_of::<Self>()
    }
}

/// Identity of a model, for caching and cycle detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelKey {
    /// A model declared as a Rust type.
    Type(TypeId),
    /// A model declared by name in a manifest.
    Named(String),
}

/// Collects a model's parents and own fields.
#[derive(Debug, Default)]
pub struct Declaration {
    parents: Vec<Arc<ModelRegistry>>,
    fields: Vec<(String, Field)>,
    error: Option<ModelError>,
}

impl Declaration {
    /// Empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inherit the fields of model `P`.
    pub fn extends<P: Model>(&mut self) -> &mut Self {
        match registry_of::<P>() {
            Ok(parent) => self.parents.push(parent),
            Err(e) => self.fail(e),
        }
        self
    }

    /// Inherit the fields of an already built registry.
    pub fn extends_registry(&mut self, parent: Arc<ModelRegistry>) -> &mut Self {
        self.parents.push(parent);
        self
    }

    /// Declare a field.
    pub fn field(&mut self, name: impl Into<String>, field: Field) -> &mut Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Record a declaration error. The first error wins.
    pub fn fail(&mut self, error: ModelError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Resolve this declaration into a registry.
    ///
    /// # Errors
    ///
    /// Returns the first recorded error, `ModelError::DuplicateField` for a
    /// name declared twice, or `ModelError::EmptyCandidates` for a target
    /// with no candidates.
    pub fn build(
        self,
        name: impl Into<String>,
        key: ModelKey,
    ) -> Result<ModelRegistry, ModelError> {
        let name = name.into();
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut fields: Vec<FieldDescriptor> = Vec::new();
        for parent in &self.parents {
            for inherited in parent.fields() {
                match fields.iter_mut().find(|f| f.name() == inherited.name()) {
                    Some(slot) => *slot = inherited.clone(),
                    None => fields.push(inherited.clone()),
                }
            }
        }

        let mut own: HashSet<&str> = HashSet::new();
        for (field_name, field) in &self.fields {
            if !own.insert(field_name) {
                return Err(ModelError::DuplicateField {
                    model: name,
                    field: field_name.clone(),
                });
            }
            if field
                .shape()
                .target()
                .is_some_and(|t| t.candidates().is_empty())
            {
                return Err(ModelError::EmptyCandidates {
                    field: field_name.clone(),
                });
            }
        }

        for (field_name, field) in self.fields {
            let descriptor = field.named(field_name);
            match fields.iter_mut().find(|f| f.name() == descriptor.name()) {
                Some(slot) => *slot = descriptor,
                None => fields.push(descriptor),
            }
        }

        Ok(ModelRegistry { name, key, fields })
    }
}

/// The ordered, inheritance-resolved fields of one model.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    name: String,
    key: ModelKey,
    fields: Vec<FieldDescriptor>,
}

impl ModelRegistry {
    /// The model's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The model's identity.
    pub fn key(&self) -> &ModelKey {
        &self.key
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the model declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// Names of required fields, in declaration order.
    pub fn required_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name())
            .collect()
    }
}

type Published = RwLock<HashMap<TypeId, Arc<ModelRegistry>>>;
type BuildStack = ReentrantMutex<RefCell<Vec<(TypeId, &'static str)>>>;

/// A model's entry on the build stack, popped when dropped so a panicking
/// `declare` does not leave it behind.
struct BuildFrame<'a>(&'a RefCell<Vec<(TypeId, &'static str)>>);

impl Drop for BuildFrame<'_> {
    fn drop(&mut self) {
        self.0.borrow_mut().pop();
    }
}

fn published() -> &'static Published {
    static CELL: OnceLock<Published> = OnceLock::new();
    CELL.get_or_init(Default::default)
}

fn build_lock() -> &'static BuildStack {
    static CELL: OnceLock<BuildStack> = OnceLock::new();
    CELL.get_or_init(|| ReentrantMutex::new(RefCell::new(Vec::new())))
}

/// The registry of model `M`, built and cached on first request.
///
/// # Errors
///
/// Returns `ModelError::CyclicInheritance` if `M` inherits from itself,
/// or any error raised by [`Declaration::build`]. Errors are not cached.
pub fn registry_of<M: Model>() -> Result<Arc<ModelRegistry>, ModelError> {
    let id = TypeId::of::<M>();
    if let Some(registry) = published().read().get(&id) {
        return Ok(Arc::clone(registry));
    }

    let guard = build_lock().lock();
    // Another thread may have published while we waited for the build lock.
    if let Some(registry) = published().read().get(&id) {
        return Ok(Arc::clone(registry));
    }

    {
        let mut stack = guard.borrow_mut();
        if let Some(pos) = stack.iter().position(|(t, _)| *t == id) {
            let mut chain: Vec<&str> = stack[pos..].iter().map(|(_, n)| *n).collect();
            chain.push(M::model_name());
            return Err(ModelError::CyclicInheritance {
                model: M::model_name().to_string(),
                chain: chain.join(" -> "),
            });
        }
        stack.push((id, M::model_name()));
    }

    let frame = BuildFrame(&guard);
    let mut declaration = Declaration::new();
    M::declare(&mut declaration);
    drop(frame);

    let registry = Arc::new(declaration.build(M::model_name(), ModelKey::Type(id))?);
    tracing::debug!(
        model = registry.name(),
        fields = registry.len(),
        "model registry built"
    );
    published().write().insert(id, Arc::clone(&registry));
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::kind::FieldKind;
    use crate::target::Candidate;

    struct Base;
    impl Model for Base {
        fn declare(model: &mut Declaration) {
            model
                .field("id", Field::int().required())
                .field("name", Field::string())
                .field("created", Field::datetime());
        }
    }

    struct Derived;
    impl Model for Derived {
        fn declare(model: &mut Declaration) {
            model
                .extends::<Base>()
                .field("email", Field::string())
                .field("name", Field::string().required());
        }
    }

    struct Doubled;
    impl Model for Doubled {
        fn declare(model: &mut Declaration) {
            model
                .field("name", Field::string())
                .field("name", Field::int());
        }
    }

    struct Ouroboros;
    impl Model for Ouroboros {
        fn declare(model: &mut Declaration) {
            model.extends::<Ouroboros>().field("tail", Field::string());
        }
    }

    struct Ping;
    impl Model for Ping {
        fn declare(model: &mut Declaration) {
            model.extends::<Pong>();
        }
    }

    struct Pong;
    impl Model for Pong {
        fn declare(model: &mut Declaration) {
            model.extends::<Ping>();
        }
    }

    struct NoCandidates;
    impl Model for NoCandidates {
        fn declare(model: &mut Declaration) {
            model.field("items", Field::list(Vec::<Candidate>::new()));
        }
    }

    #[test]
    fn test_declaration_order_preserved() {
        let registry = registry_of::<Base>().unwrap();
        assert_eq!(registry.field_names(), vec!["id", "name", "created"]);
        assert_eq!(registry.required_names(), vec!["id"]);
        assert_eq!(registry.name(), "Base");
    }

    #[test]
    fn test_override_keeps_ancestor_slot() {
        let registry = registry_of::<Derived>().unwrap();
        assert_eq!(
            registry.field_names(),
            vec!["id", "name", "created", "email"]
        );
        assert!(registry.get("name").unwrap().is_required());
        assert_eq!(registry.get("created").unwrap().kind(), FieldKind::DateTime);
    }

    #[test]
    fn test_registry_is_cached() {
        let a = registry_of::<Base>().unwrap();
        let b = Base::registry().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = registry_of::<Doubled>().unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateField {
                model: "Doubled".to_string(),
                field: "name".to_string(),
            }
        );
    }

    #[test]
    fn test_self_inheritance_rejected() {
        let err = registry_of::<Ouroboros>().unwrap_err();
        assert!(matches!(err, ModelError::CyclicInheritance { .. }));
    }

    #[test]
    fn test_mutual_inheritance_rejected() {
        match registry_of::<Ping>().unwrap_err() {
            ModelError::CyclicInheritance { chain, .. } => {
                assert_eq!(chain, "Ping -> Pong -> Ping");
            }
            other => panic!("Expected CyclicInheritance, got: {other}"),
        }
        // The failed build left nothing behind on the build stack.
        assert!(registry_of::<Base>().is_ok());
    }

    #[test]
    fn test_empty_candidate_set_rejected() {
        assert_eq!(
            registry_of::<NoCandidates>().unwrap_err(),
            ModelError::EmptyCandidates {
                field: "items".to_string()
            }
        );
    }

    #[test]
    fn test_manual_build_with_named_key() {
        let mut declaration = Declaration::new();
        declaration.field("title", Field::string().required());
        let registry = declaration
            .build("Book", ModelKey::Named("Book".to_string()))
            .unwrap();
        assert_eq!(registry.key(), &ModelKey::Named("Book".to_string()));
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    static FLAKY_PANICKED: AtomicBool = AtomicBool::new(false);

    struct Flaky;
    impl Model for Flaky {
        fn declare(model: &mut Declaration) {
            if !FLAKY_PANICKED.swap(true, Ordering::SeqCst) {
                panic!("first declaration fails");
            }
            model.field("x", Field::int());
        }
    }

    #[test]
    fn test_panicking_declare_leaves_no_build_frame() {
        let first = std::panic::catch_unwind(registry_of::<Flaky>);
        assert!(first.is_err());

        let registry = registry_of::<Flaky>().unwrap();
        assert_eq!(registry.field_names(), vec!["x"]);
    }
}
