//! Core pipeline for entigen.
//!
//! The crate is organised around a single generation run:
//!
//! - [`priorities`] defines the ordered phases of a run and resolves custom
//!   phases spliced in front of their anchors.
//! - [`scheduler`] composes generators, queues their task groups per phase and
//!   drains the queues in order.
//! - [`prepare`] holds the entity preparation phases, registered by the
//!   built-in [`prepare::BootstrapGenerator`].
//! - [`registry`] is the run-scoped store of prepared entities.
//! - [`merge`] and [`equality`] merge configuration overrides and detect
//!   changed entity definitions between runs.
//!
//! ```rust,ignore
//! use entigen_core::{GenerationContext, Scheduler, prepare::BootstrapGenerator};
//!
//! let mut scheduler = Scheduler::standard()?;
//! scheduler.compose(std::sync::Arc::new(BootstrapGenerator))?;
//! let mut ctx = GenerationContext::new(config);
//! let summary = scheduler.run(&mut ctx).await?;
//! ```

pub mod config;
pub mod context;
pub mod equality;
pub mod error;
pub mod merge;
pub mod model;
pub mod prepare;
pub mod priorities;
pub mod reader;
pub mod registry;
pub mod scheduler;
pub mod snapshot;

pub use config::ApplicationConfig;
pub use context::{EntitySource, GenerationContext, OutputRecord, OutputStatus};
pub use error::{Error, Result};
pub use model::{Entity, EntityDefinition, Field, FieldDefinition, Relationship};
pub use priorities::{Priority, PriorityOrder, PriorityRegistry, resolve_order, standard_order};
pub use registry::{EntityKey, EntityRegistry};
pub use scheduler::{
    FnTask, Generator, GeneratorCatalog, Registrar, RunSummary, Scheduler, Task, TaskGroup,
};
