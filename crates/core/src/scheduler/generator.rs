//! Generator modules and their registration surface.

use super::task::TaskGroup;
use crate::error::{Error, Result};
use crate::priorities::PriorityOrder;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A generator module: a named bundle of task groups.
///
/// Generators are composed into a [`Scheduler`](super::Scheduler), which
/// asks each one to register its task groups exactly once.
pub trait Generator: Send + Sync {
    /// Unique namespace, e.g. `bootstrap-application`.
    fn namespace(&self) -> &str;

    /// Namespaces that must be composed (and run) before this generator.
    fn depends_on(&self) -> Vec<String> {
        Vec::new()
    }

    /// Register task groups against priorities.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPriority`] when a group targets a priority
    /// that is not part of the scheduler's order.
    fn register_tasks(&self, registrar: &mut Registrar<'_>) -> Result<()>;
}

/// Collects the task groups of one generator while it registers.
///
/// Nothing reaches the scheduler's queues unless registration as a whole
/// succeeds.
pub struct Registrar<'a> {
    order: &'a PriorityOrder,
    namespace: &'a str,
    groups: Vec<(String, TaskGroup)>,
}

impl<'a> Registrar<'a> {
    pub(crate) const fn new(order: &'a PriorityOrder, namespace: &'a str) -> Self {
        Self {
            order,
            namespace,
            groups: Vec::new(),
        }
    }

    /// Queue `group` on `priority`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPriority`] if `priority` is not defined.
    pub fn register(&mut self, priority: &str, group: TaskGroup) -> Result<()> {
        if !self.order.contains(priority) {
            return Err(Error::unknown_priority(priority, self.namespace));
        }
        tracing::trace!(
            generator = self.namespace,
            priority,
            group = group.name(),
            "Registered task group"
        );
        self.groups.push((priority.to_string(), group));
        Ok(())
    }

    /// Namespace of the registering generator.
    #[must_use]
    pub const fn namespace(&self) -> &str {
        self.namespace
    }

    /// The priority order groups are validated against.
    #[must_use]
    pub const fn order(&self) -> &PriorityOrder {
        self.order
    }

    pub(crate) fn into_groups(self) -> Vec<(String, TaskGroup)> {
        self.groups
    }
}

type Factory = Arc<dyn Fn() -> Arc<dyn Generator> + Send + Sync>;

/// Known generators, used to compose dependencies by namespace.
#[derive(Clone, Default)]
pub struct GeneratorCatalog {
    factories: HashMap<String, Factory>,
}

impl GeneratorCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog of generators shipped with this crate.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.register(crate::prepare::NAMESPACE, || {
            Arc::new(crate::prepare::BootstrapGenerator)
        });
        catalog
    }

    /// Add or replace a factory.
    pub fn register<F>(&mut self, namespace: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Generator> + Send + Sync + 'static,
    {
        self.factories.insert(namespace.into(), Arc::new(factory));
    }

    /// Whether a namespace is known.
    #[must_use]
    pub fn contains(&self, namespace: &str) -> bool {
        self.factories.contains_key(namespace)
    }

    /// Instantiate a generator.
    #[must_use]
    pub fn create(&self, namespace: &str) -> Option<Arc<dyn Generator>> {
        self.factories.get(namespace).map(|factory| factory())
    }

    /// Known namespaces, sorted.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        namespaces
    }
}

impl fmt::Debug for GeneratorCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorCatalog")
            .field("namespaces", &self.namespaces())
            .finish()
    }
}
