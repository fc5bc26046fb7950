//! Task scheduler / queue runner.
//!
//! Generators are composed into a [`Scheduler`]; each registers task groups
//! against named priorities. [`Scheduler::run`] then drains the queues in
//! priority order, one task at a time. Within a queue, groups run in
//! generator order: dependencies first, then composition order.
//!
//! A failing task aborts the run. Its error is wrapped in
//! [`Error::PhaseFailed`] so callers learn which phase broke.

mod generator;
mod task;

pub use generator::{Generator, GeneratorCatalog, Registrar};
pub use task::{FnTask, Task, TaskGroup};

use crate::context::GenerationContext;
use crate::error::{Error, Result};
use crate::priorities::{PriorityOrder, standard_order};
use entigen_events::{
    emit_priority_completed, emit_priority_skipped, emit_priority_started, emit_task_completed,
    emit_task_failed, emit_task_started,
};
use entigen_task_graph::{DependencyGraph, NodeData};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// A phase that ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSummary {
    /// Priority name.
    pub priority: String,
    /// Number of tasks executed.
    pub task_count: usize,
}

/// Outcome of [`Scheduler::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Phases in the order they ran.
    pub phases: Vec<PhaseSummary>,
    /// Skippable phases with nothing queued.
    pub skipped: Vec<String>,
}

impl RunSummary {
    /// Names of the phases that ran.
    pub fn executed(&self) -> impl Iterator<Item = &str> {
        self.phases.iter().map(|phase| phase.priority.as_str())
    }

    /// Total number of tasks executed.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.task_count).sum()
    }
}

struct Composed {
    generator: Arc<dyn Generator>,
    depends_on: Vec<String>,
    executed: bool,
}

#[derive(Clone)]
struct Composition {
    depends_on: Vec<String>,
}

impl NodeData for Composition {
    fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.depends_on.iter().map(String::as_str)
    }
}

struct QueuedGroup {
    generator: String,
    group: TaskGroup,
}

/// Composes generators and runs their queued task groups.
pub struct Scheduler {
    order: Cow<'static, PriorityOrder>,
    catalog: GeneratorCatalog,
    generators: IndexMap<String, Composed>,
    queues: HashMap<String, Vec<QueuedGroup>>,
    composing: Vec<String>,
}

impl Scheduler {
    /// A scheduler over an explicit priority order.
    #[must_use]
    pub fn new(order: PriorityOrder, catalog: GeneratorCatalog) -> Self {
        Self::with_order(Cow::Owned(order), catalog)
    }

    /// A scheduler over the standard priorities with the standard catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the standard priorities fail to resolve.
    pub fn standard() -> Result<Self> {
        Ok(Self::with_order(
            Cow::Borrowed(standard_order()?),
            GeneratorCatalog::standard(),
        ))
    }

    fn with_order(order: Cow<'static, PriorityOrder>, catalog: GeneratorCatalog) -> Self {
        Self {
            order,
            catalog,
            generators: IndexMap::new(),
            queues: HashMap::new(),
            composing: Vec::new(),
        }
    }

    /// The priority order this scheduler drains.
    #[must_use]
    pub fn order(&self) -> &PriorityOrder {
        &self.order
    }

    /// Catalog used to compose dependencies.
    pub fn catalog_mut(&mut self) -> &mut GeneratorCatalog {
        &mut self.catalog
    }

    /// Composed namespaces, in composition order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    /// Whether a namespace has been composed.
    #[must_use]
    pub fn is_composed(&self, namespace: &str) -> bool {
        self.generators.contains_key(namespace)
    }

    /// Compose a generator and, first, every generator it depends on.
    ///
    /// Returns `false` when the namespace is already composed (or already
    /// ran); its tasks are not registered a second time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicDependency`] when dependencies loop back,
    /// [`Error::UnknownGenerator`] for a dependency missing from the
    /// catalog and [`Error::UnknownPriority`] for a bad registration.
    pub fn compose(&mut self, generator: Arc<dyn Generator>) -> Result<bool> {
        let namespace = generator.namespace().to_string();
        if self.generators.contains_key(&namespace) {
            tracing::debug!(generator = %namespace, "Generator already composed");
            return Ok(false);
        }
        if let Some(start) = self.composing.iter().position(|ns| *ns == namespace) {
            let mut members = self.composing[start..].to_vec();
            members.push(namespace);
            return Err(Error::cyclic_dependency(members));
        }

        self.composing.push(namespace.clone());
        let result = self.compose_inner(&namespace, &generator);
        self.composing.pop();
        result?;
        Ok(true)
    }

    fn compose_inner(&mut self, namespace: &str, generator: &Arc<dyn Generator>) -> Result<()> {
        let depends_on = generator.depends_on();
        for dependency in &depends_on {
            if self.generators.contains_key(dependency) {
                continue;
            }
            let dependency_generator = self.catalog.create(dependency).ok_or_else(|| {
                Error::unknown_generator(dependency.as_str(), Some(namespace.to_string()))
            })?;
            self.compose(dependency_generator)?;
        }

        let mut registrar = Registrar::new(&self.order, namespace);
        generator.register_tasks(&mut registrar)?;
        let groups = registrar.into_groups();
        tracing::debug!(
            generator = namespace,
            groups = groups.len(),
            "Composed generator"
        );
        for (priority, group) in groups {
            self.queues.entry(priority).or_default().push(QueuedGroup {
                generator: namespace.to_string(),
                group,
            });
        }

        self.generators.insert(
            namespace.to_string(),
            Composed {
                generator: Arc::clone(generator),
                depends_on,
                executed: false,
            },
        );
        Ok(())
    }

    /// Compose a generator from the catalog by namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownGenerator`] when the catalog does not know the
    /// namespace, plus anything [`Self::compose`] returns.
    pub fn compose_with(&mut self, namespace: &str) -> Result<bool> {
        let generator = self
            .catalog
            .create(namespace)
            .ok_or_else(|| Error::unknown_generator(namespace, None))?;
        self.compose(generator)
    }

    /// Queue an extra task group for an already composed generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPriority`] for an undefined priority and
    /// [`Error::UnknownGenerator`] when the generator is not composed.
    pub fn register_tasks(&mut self, namespace: &str, priority: &str, group: TaskGroup) -> Result<()> {
        if !self.order.contains(priority) {
            return Err(Error::unknown_priority(priority, namespace));
        }
        if !self.generators.contains_key(namespace) {
            return Err(Error::unknown_generator(namespace, None));
        }
        self.queues
            .entry(priority.to_string())
            .or_default()
            .push(QueuedGroup {
                generator: namespace.to_string(),
                group,
            });
        Ok(())
    }

    /// Composed namespaces in run order: dependencies first, ties kept in
    /// composition order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicDependency`] or [`Error::UnknownGenerator`] if
    /// the dependency graph is broken.
    pub fn generator_order(&self) -> Result<Vec<String>> {
        let mut graph = DependencyGraph::new();
        for (namespace, composed) in &self.generators {
            graph.add_node(
                namespace,
                Composition {
                    depends_on: composed.depends_on.clone(),
                },
            );
        }
        graph.add_dependency_edges()?;
        Ok(graph
            .topological_sort()?
            .into_iter()
            .map(|node| node.name)
            .collect())
    }

    /// Drain every queue in priority order.
    ///
    /// Empty skippable priorities are skipped. The first failing task
    /// aborts the run; later phases never start. Composed generators are
    /// marked executed afterwards and are not run again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PhaseFailed`] wrapping the task's error, or a
    /// dependency graph error raised before anything runs.
    pub async fn run(&mut self, ctx: &mut GenerationContext) -> Result<RunSummary> {
        let rank: HashMap<String, usize> = self
            .generator_order()?
            .into_iter()
            .enumerate()
            .map(|(index, namespace)| (namespace, index))
            .collect();
        let mut queues = std::mem::take(&mut self.queues);
        for composed in self.generators.values_mut() {
            composed.executed = true;
        }

        let mut summary = RunSummary::default();
        let run_started = Instant::now();
        for priority in self.order.iter() {
            let mut groups = queues.remove(&priority.name).unwrap_or_default();
            if groups.is_empty() && priority.skip {
                emit_priority_skipped!(priority.name);
                summary.skipped.push(priority.name.clone());
                continue;
            }
            groups.sort_by_key(|queued| rank.get(&queued.generator).copied().unwrap_or(usize::MAX));

            emit_priority_started!(priority.name, priority.queue, groups.len());
            let phase_started = Instant::now();
            let mut task_count = 0_usize;
            for queued in &groups {
                for task in queued.group.tasks() {
                    emit_task_started!(priority.name, queued.generator, task.name());
                    let task_started = Instant::now();
                    if let Err(error) = task.run(ctx).await {
                        emit_task_failed!(priority.name, queued.generator, task.name(), error);
                        return Err(Error::phase_failed(
                            priority.name.as_str(),
                            queued.generator.as_str(),
                            task.name(),
                            error,
                        ));
                    }
                    emit_task_completed!(
                        priority.name,
                        queued.generator,
                        task.name(),
                        elapsed_ms(task_started)
                    );
                    task_count += 1;
                }
            }
            emit_priority_completed!(priority.name, task_count, elapsed_ms(phase_started));
            summary.phases.push(PhaseSummary {
                priority: priority.name.clone(),
                task_count,
            });
        }

        tracing::info!(
            phases = summary.phases.len(),
            tasks = summary.task_count(),
            duration_ms = elapsed_ms(run_started),
            "Run completed"
        );
        Ok(summary)
    }

    /// Whether a composed generator already ran.
    #[must_use]
    pub fn has_executed(&self, namespace: &str) -> bool {
        self.generators
            .get(namespace)
            .is_some_and(|composed| composed.executed)
    }

    /// Look up a composed generator.
    #[must_use]
    pub fn generator(&self, namespace: &str) -> Option<&Arc<dyn Generator>> {
        self.generators
            .get(namespace)
            .map(|composed| &composed.generator)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
