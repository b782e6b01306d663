//! Predicate registry: field → name → factory.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, LazyLock},
};

use tracing::debug;

use super::{Predicate, PredicateError, RepoContainsPredicate};
use crate::ast::FIELD_REPO;

/// Creates a fresh, unparsed predicate instance.
pub type PredicateFactory = Arc<dyn Fn() -> Box<dyn Predicate> + Send + Sync>;

/// Two-level mapping from field and predicate name to a factory.
///
/// Every [`get`](Self::get) builds a new instance, so predicates are never shared
/// between occurrences.
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    /// Factories keyed by field, then by predicate name.
    fields: BTreeMap<String, BTreeMap<String, PredicateFactory>>,
}

impl PredicateRegistry {
    /// Creates a registry with no predicates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in predicates (`repo:contains`).
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(FIELD_REPO, "contains", || {
            Box::new(RepoContainsPredicate::default())
        });
        registry
    }

    /// Registers `factory` under `field` and `name`, replacing any previous entry.
    pub fn register<F>(&mut self, field: &str, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Predicate> + Send + Sync + 'static,
    {
        self.fields
            .entry(field.to_string())
            .or_default()
            .insert(name.to_string(), Arc::new(factory));
    }

    /// Returns true if a predicate is registered under `field` and `name`.
    pub fn contains(&self, field: &str, name: &str) -> bool {
        self.fields
            .get(field)
            .is_some_and(|names| names.contains_key(name))
    }

    /// Iterates over `(field, name)` pairs in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().flat_map(|(field, names)| {
            names
                .keys()
                .map(move |name| (field.as_str(), name.as_str()))
        })
    }

    /// Instantiates the predicate registered under `field` and `name` and parses `params`
    /// into it.
    ///
    /// A predicate that fails to parse is dropped; only fully populated instances are
    /// returned.
    pub fn get(
        &self,
        field: &str,
        name: &str,
        params: &str,
    ) -> Result<Box<dyn Predicate>, PredicateError> {
        let names = self
            .fields
            .get(field)
            .ok_or_else(|| PredicateError::UnknownField {
                field: field.to_string(),
            })?;

        let factory = names
            .get(name)
            .ok_or_else(|| PredicateError::UnknownPredicate {
                field: field.to_string(),
                name: name.to_string(),
            })?;

        let mut predicate = factory();
        predicate
            .parse_params(params)
            .map_err(PredicateError::Params)?;

        debug!(field = field, predicate = name, params = params, "resolved predicate");
        Ok(predicate)
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries().map(|(field, name)| format!("{field}:{name}")))
            .finish()
    }
}

/// The process-wide registry of built-in predicates.
static DEFAULT_REGISTRY: LazyLock<PredicateRegistry> = LazyLock::new(PredicateRegistry::builtin);

/// Returns the registry of built-in predicates.
pub fn default_registry() -> &'static PredicateRegistry {
    &DEFAULT_REGISTRY
}
