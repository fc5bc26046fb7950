//! Error types for the generation pipeline

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for entigen-core operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A priority name was registered twice
    #[error("Priority '{name}' is already defined")]
    #[diagnostic(code(entigen::priority::duplicate))]
    DuplicatePriority {
        /// The duplicated priority name
        name: String,
    },

    /// A custom priority is anchored on a priority that never appears in the order
    #[error("Priority '{priority}' is anchored before unknown priority '{anchor}'")]
    #[diagnostic(
        code(entigen::priority::unknown_anchor),
        help("Anchor custom priorities on a fixed priority or on another custom priority")
    )]
    UnknownAnchor {
        /// The custom priority being placed
        priority: String,
        /// The anchor that could not be found
        anchor: String,
    },

    /// A task group was registered against an undefined priority
    #[error("Generator '{generator}' registered tasks for unknown priority '{name}'")]
    #[diagnostic(
        code(entigen::priority::unknown),
        help("Run `entigen priorities` to list the available priorities")
    )]
    UnknownPriority {
        /// The unknown priority name
        name: String,
        /// Namespace of the registering generator
        generator: String,
    },

    /// A generator namespace is not known to the catalog
    #[error("Unknown generator '{namespace}'{}", required_by.as_ref().map(|r| format!(" required by '{r}'")).unwrap_or_default())]
    #[diagnostic(code(entigen::generator::unknown))]
    UnknownGenerator {
        /// The namespace that could not be found
        namespace: String,
        /// The generator that depends on it, if any
        required_by: Option<String>,
    },

    /// Generator dependencies form a cycle
    #[error("Cyclic generator dependency: {}", members.join(" -> "))]
    #[diagnostic(code(entigen::generator::cycle))]
    CyclicDependency {
        /// Namespaces taking part in the cycle
        members: Vec<String>,
    },

    /// A relationship targets an entity absent from the registry
    #[error("Relationship '{relationship}' of entity '{entity}' references unknown entity '{other_entity}'")]
    #[diagnostic(code(entigen::entity::unresolved_reference))]
    UnresolvedEntityReference {
        /// The entity declaring the relationship
        entity: String,
        /// The relationship name
        relationship: String,
        /// The missing target entity
        other_entity: String,
    },

    /// A field declares a type outside the supported set
    #[error("Field '{field}' of entity '{entity}' has unknown type '{field_type}'")]
    #[diagnostic(
        code(entigen::entity::unknown_field_type),
        help("Enumerations must declare their values with `fieldValues`")
    )]
    UnknownFieldType {
        /// The entity owning the field
        entity: String,
        /// The field name
        field: String,
        /// The declared type
        field_type: String,
    },

    /// A relationship is incompatible with the primary keys involved
    #[error("Invalid relationship '{relationship}' on entity '{entity}': {reason}")]
    #[diagnostic(code(entigen::entity::invalid_relationship))]
    InvalidRelationship {
        /// The entity declaring the relationship
        entity: String,
        /// The relationship name
        relationship: String,
        /// Why the relationship is rejected
        reason: String,
    },

    /// Two entities share a name within one run
    #[error("Entity '{name}' is defined more than once")]
    #[diagnostic(code(entigen::entity::duplicate))]
    DuplicateEntity {
        /// The duplicated entity name
        name: String,
    },

    /// An entity was looked up by name but is not registered
    #[error("Entity '{name}' is not registered")]
    #[diagnostic(code(entigen::entity::not_found))]
    EntityNotFound {
        /// The missing entity name
        name: String,
    },

    /// A prepared entity was mutated after it was frozen
    #[error("Entity '{name}' is frozen and can no longer be modified")]
    #[diagnostic(code(entigen::entity::frozen))]
    EntityFrozen {
        /// The frozen entity name
        name: String,
    },

    /// Malformed input to the merge resolver
    #[error("Merge failed: {message}")]
    #[diagnostic(code(entigen::merge))]
    Merge {
        /// Description of the malformed input
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(entigen::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(entigen::io::error))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<Path>>,
        /// Description of the operation that failed
        operation: String,
    },

    /// JSON (de)serialization error
    #[error("JSON error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(code(entigen::json))]
    Json {
        /// The underlying serde_json error
        #[source]
        source: serde_json::Error,
        /// The file being read, if any
        path: Option<Box<Path>>,
    },

    /// Error raised by a collaborator crate inside a task
    #[error("{0}")]
    #[diagnostic(code(entigen::external))]
    External(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A task failed; carries the phase it was running in
    #[error("Phase '{phase}' failed in generator '{generator}' (task '{task}'): {source}")]
    #[diagnostic(code(entigen::scheduler::phase_failed))]
    PhaseFailed {
        /// The priority being drained
        phase: String,
        /// Namespace of the generator owning the task
        generator: String,
        /// The failing task
        task: String,
        /// The original error, unmodified
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a duplicate priority error
    pub fn duplicate_priority(name: impl Into<String>) -> Self {
        Self::DuplicatePriority { name: name.into() }
    }

    /// Create an unknown anchor error
    pub fn unknown_anchor(priority: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self::UnknownAnchor {
            priority: priority.into(),
            anchor: anchor.into(),
        }
    }

    /// Create an unknown priority error
    pub fn unknown_priority(name: impl Into<String>, generator: impl Into<String>) -> Self {
        Self::UnknownPriority {
            name: name.into(),
            generator: generator.into(),
        }
    }

    /// Create an unknown generator error
    pub fn unknown_generator(namespace: impl Into<String>, required_by: Option<String>) -> Self {
        Self::UnknownGenerator {
            namespace: namespace.into(),
            required_by,
        }
    }

    /// Create a cyclic dependency error
    pub fn cyclic_dependency(members: Vec<String>) -> Self {
        Self::CyclicDependency { members }
    }

    /// Create an unresolved entity reference error
    pub fn unresolved_entity_reference(
        entity: impl Into<String>,
        relationship: impl Into<String>,
        other_entity: impl Into<String>,
    ) -> Self {
        Self::UnresolvedEntityReference {
            entity: entity.into(),
            relationship: relationship.into(),
            other_entity: other_entity.into(),
        }
    }

    /// Create an unknown field type error
    pub fn unknown_field_type(
        entity: impl Into<String>,
        field: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self::UnknownFieldType {
            entity: entity.into(),
            field: field.into(),
            field_type: field_type.into(),
        }
    }

    /// Create an invalid relationship error
    pub fn invalid_relationship(
        entity: impl Into<String>,
        relationship: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRelationship {
            entity: entity.into(),
            relationship: relationship.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate entity error
    pub fn duplicate_entity(name: impl Into<String>) -> Self {
        Self::DuplicateEntity { name: name.into() }
    }

    /// Create an entity not found error
    pub fn entity_not_found(name: impl Into<String>) -> Self {
        Self::EntityNotFound { name: name.into() }
    }

    /// Create an entity frozen error
    pub fn entity_frozen(name: impl Into<String>) -> Self {
        Self::EntityFrozen { name: name.into() }
    }

    /// Create a merge error
    pub fn merge(message: impl Into<String>) -> Self {
        Self::Merge {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(PathBuf::into_boxed_path),
            operation: operation.into(),
        }
    }

    /// Create a JSON error for a given file
    pub fn json(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        Self::Json {
            source,
            path: path.map(PathBuf::into_boxed_path),
        }
    }

    /// Wrap a collaborator error
    pub fn external(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::External(Box::new(source))
    }

    /// Attach the failing phase to an error raised by a task
    pub fn phase_failed(
        phase: impl Into<String>,
        generator: impl Into<String>,
        task: impl Into<String>,
        source: Self,
    ) -> Self {
        Self::PhaseFailed {
            phase: phase.into(),
            generator: generator.into(),
            task: task.into(),
            source: Box::new(source),
        }
    }

    /// The error originally raised, with phase wrappers removed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::PhaseFailed { source, .. } = current {
            current = source;
        }
        current
    }

    /// The phase a failure occurred in, if the scheduler attached one.
    #[must_use]
    pub fn phase(&self) -> Option<&str> {
        match self {
            Self::PhaseFailed { phase, .. } => Some(phase),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::json(source, None)
    }
}

impl From<entigen_task_graph::Error> for Error {
    fn from(error: entigen_task_graph::Error) -> Self {
        match error {
            entigen_task_graph::Error::CycleDetected { members } => Self::cyclic_dependency(members),
            entigen_task_graph::Error::MissingDependencies { missing } => {
                let (dependent, dependency) = missing.into_iter().next().unwrap_or_default();
                Self::unknown_generator(dependency, Some(dependent))
            }
        }
    }
}

/// Result type for entigen-core operations
pub type Result<T> = std::result::Result<T, Error>;
