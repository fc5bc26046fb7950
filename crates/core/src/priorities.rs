//! Priority registry: the ordered phases of a generation run.
//!
//! A run is made of fixed priorities (the base run loop) plus custom
//! priorities spliced in front of an anchor. The standard order is resolved
//! once per process and shared read-only afterwards.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Prefix of generated queue names.
pub const QUEUE_PREFIX: &str = "entigen:";

/// Names of the standard priorities.
pub mod names {
    #![allow(missing_docs)]
    pub const INITIALIZING: &str = "initializing";
    pub const PROMPTING: &str = "prompting";
    pub const CONFIGURING: &str = "configuring";
    pub const COMPOSING: &str = "composing";
    pub const LOADING: &str = "loading";
    pub const PREPARING: &str = "preparing";
    pub const CONFIGURING_EACH_ENTITY: &str = "configuringEachEntity";
    pub const LOADING_ENTITIES: &str = "loadingEntities";
    pub const PREPARING_EACH_ENTITY: &str = "preparingEachEntity";
    pub const PREPARING_EACH_ENTITY_FIELD: &str = "preparingEachEntityField";
    pub const PREPARING_EACH_ENTITY_RELATIONSHIP: &str = "preparingEachEntityRelationship";
    pub const POST_PREPARING_EACH_ENTITY: &str = "postPreparingEachEntity";
    pub const DEFAULT: &str = "default";
    pub const WRITING: &str = "writing";
    pub const WRITING_ENTITIES: &str = "writingEntities";
    pub const TRANSFORM: &str = "transform";
    pub const POST_WRITING: &str = "postWriting";
    pub const POST_WRITING_ENTITIES: &str = "postWritingEntities";
    pub const PRE_CONFLICTS: &str = "preConflicts";
    pub const CONFLICTS: &str = "conflicts";
    pub const INSTALL: &str = "install";
    pub const POST_INSTALL: &str = "postInstall";
    pub const END: &str = "end";
}

use names::*;

/// The base run loop, in order.
const FIXED: &[&str] = &[
    INITIALIZING,
    PROMPTING,
    CONFIGURING,
    DEFAULT,
    WRITING,
    TRANSFORM,
    CONFLICTS,
    INSTALL,
    END,
];

/// Custom priorities as `(name, anchor)`, in declaration order.
const CUSTOM: &[(&str, &str)] = &[
    (COMPOSING, LOADING),
    (LOADING, PREPARING),
    (PREPARING, DEFAULT),
    (POST_WRITING, PRE_CONFLICTS),
    (PRE_CONFLICTS, CONFLICTS),
    (POST_INSTALL, END),
    (CONFIGURING_EACH_ENTITY, LOADING_ENTITIES),
    (LOADING_ENTITIES, PREPARING_EACH_ENTITY),
    (PREPARING_EACH_ENTITY, PREPARING_EACH_ENTITY_FIELD),
    (PREPARING_EACH_ENTITY_FIELD, PREPARING_EACH_ENTITY_RELATIONSHIP),
    (PREPARING_EACH_ENTITY_RELATIONSHIP, POST_PREPARING_EACH_ENTITY),
    (POST_PREPARING_EACH_ENTITY, DEFAULT),
    (WRITING_ENTITIES, TRANSFORM),
    (POST_WRITING_ENTITIES, PRE_CONFLICTS),
];

/// A named phase of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Priority {
    /// Unique name
    pub name: String,
    /// Queue the priority's tasks are registered on
    pub queue: String,
    /// Anchor this priority is spliced in front of; `None` for fixed priorities
    pub before: Option<String>,
    /// Skip the priority when no generator registered tasks for it
    pub skip: bool,
}

impl Priority {
    /// A fixed priority with the default queue name.
    #[must_use]
    pub fn fixed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            queue: format!("{QUEUE_PREFIX}{name}"),
            before: None,
            skip: false,
        }
    }

    /// A skippable custom priority anchored before `anchor`.
    #[must_use]
    pub fn custom(name: &str, anchor: &str) -> Self {
        Self {
            name: name.to_string(),
            queue: format!("{QUEUE_PREFIX}{name}"),
            before: Some(anchor.to_string()),
            skip: true,
        }
    }
}

/// A resolved, totally ordered list of priorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityOrder {
    priorities: Vec<Priority>,
}

impl PriorityOrder {
    /// Priorities in run order.
    pub fn iter(&self) -> impl Iterator<Item = &Priority> {
        self.priorities.iter()
    }

    /// Priority names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.priorities.iter().map(|p| p.name.as_str())
    }

    /// Look up a priority by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Priority> {
        self.priorities.iter().find(|p| p.name == name)
    }

    /// Whether a priority is part of the order.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Rank of a priority in the order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.priorities.iter().position(|p| p.name == name)
    }

    /// Number of priorities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    /// Whether the order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}

impl<'a> IntoIterator for &'a PriorityOrder {
    type Item = &'a Priority;
    type IntoIter = std::slice::Iter<'a, Priority>;

    fn into_iter(self) -> Self::IntoIter {
        self.priorities.iter()
    }
}

/// Collects priority definitions before they are resolved into an order.
#[derive(Debug, Clone, Default)]
pub struct PriorityRegistry {
    fixed: Vec<Priority>,
    custom: Vec<Priority>,
}

impl PriorityRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard run loop with the base and entity priorities.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in definitions; the `Result` mirrors
    /// [`Self::define_priority`].
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();
        for name in FIXED {
            registry.define_priority(name, None, None, false)?;
        }
        for (name, anchor) in CUSTOM {
            registry.define_priority(name, None, Some(*anchor), true)?;
        }
        Ok(registry)
    }

    /// Register a priority.
    ///
    /// Without an anchor the priority is appended to the fixed run loop;
    /// with one it is spliced in front of the anchor at resolution time.
    /// `queue` defaults to `entigen:<name>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicatePriority`] if `name` is already registered.
    pub fn define_priority(
        &mut self,
        name: &str,
        queue: Option<&str>,
        anchor: Option<&str>,
        skip: bool,
    ) -> Result<()> {
        if self.contains(name) {
            return Err(Error::duplicate_priority(name));
        }
        let priority = Priority {
            name: name.to_string(),
            queue: queue.map_or_else(|| format!("{QUEUE_PREFIX}{name}"), str::to_string),
            before: anchor.map(str::to_string),
            skip,
        };
        tracing::trace!(priority = name, anchor = ?anchor, skip, "Defined priority");
        if priority.before.is_some() {
            self.custom.push(priority);
        } else {
            self.fixed.push(priority);
        }
        Ok(())
    }

    /// Whether a priority name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fixed.iter().chain(&self.custom).any(|p| p.name == name)
    }

    /// Resolve the registered priorities into a run order.
    ///
    /// # Errors
    ///
    /// See [`resolve_order`].
    pub fn resolve(&self) -> Result<PriorityOrder> {
        resolve_order(&self.custom, &self.fixed)
    }
}

/// Splice custom priorities into the fixed ones.
///
/// Every entry is preceded by the expansion of the custom priorities
/// anchored on it, in declaration order. Same-anchor ties therefore keep
/// declaration order, with the last-declared entry directly before the
/// anchor, and a custom priority may anchor on another custom priority
/// declared later.
///
/// # Errors
///
/// Returns [`Error::DuplicatePriority`] if a name appears twice and
/// [`Error::UnknownAnchor`] for a custom priority that cannot be placed.
pub fn resolve_order(custom: &[Priority], fixed: &[Priority]) -> Result<PriorityOrder> {
    let mut seen = HashSet::new();
    for priority in fixed.iter().chain(custom) {
        if !seen.insert(priority.name.as_str()) {
            return Err(Error::duplicate_priority(&priority.name));
        }
    }

    let mut anchored: HashMap<&str, Vec<&Priority>> = HashMap::new();
    let mut roots: Vec<&Priority> = fixed.iter().collect();
    for priority in custom {
        match priority.before.as_deref() {
            Some(anchor) => anchored.entry(anchor).or_default().push(priority),
            None => roots.push(priority),
        }
    }

    let mut ordered = Vec::with_capacity(fixed.len() + custom.len());
    for root in roots {
        expand(root, &anchored, &mut ordered);
    }

    if ordered.len() < fixed.len() + custom.len() {
        let placed: HashSet<&str> = ordered.iter().map(|p| p.name.as_str()).collect();
        if let Some(unplaced) = custom.iter().find(|p| !placed.contains(p.name.as_str())) {
            return Err(Error::unknown_anchor(
                &unplaced.name,
                unplaced.before.as_deref().unwrap_or_default(),
            ));
        }
    }

    Ok(PriorityOrder { priorities: ordered })
}

fn expand(priority: &Priority, anchored: &HashMap<&str, Vec<&Priority>>, out: &mut Vec<Priority>) {
    if let Some(children) = anchored.get(priority.name.as_str()) {
        for child in children {
            expand(child, anchored, out);
        }
    }
    out.push(priority.clone());
}

static STANDARD_ORDER: OnceLock<PriorityOrder> = OnceLock::new();

/// The standard priority order, resolved on first use.
///
/// # Errors
///
/// Returns the resolution error if the standard definitions are invalid.
pub fn standard_order() -> Result<&'static PriorityOrder> {
    if let Some(order) = STANDARD_ORDER.get() {
        return Ok(order);
    }
    let order = PriorityRegistry::standard()?.resolve()?;
    Ok(STANDARD_ORDER.get_or_init(|| order))
}
