//! Tasks and task groups.

use crate::context::GenerationContext;
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// A unit of work run inside one priority.
///
/// Tasks may suspend (for example while writing files) but the scheduler
/// awaits each one before starting the next, so a task has exclusive access
/// to the context while it runs.
#[async_trait]
pub trait Task: Send + Sync {
    /// Name used in logs and failures.
    fn name(&self) -> &str;

    /// Run the task.
    async fn run(&self, ctx: &mut GenerationContext) -> Result<()>;
}

type TaskFn = Box<dyn Fn(&mut GenerationContext) -> Result<()> + Send + Sync>;

/// A synchronous closure run as a task.
pub struct FnTask {
    name: String,
    body: TaskFn,
}

impl FnTask {
    /// Wrap a closure.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut GenerationContext) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for FnTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTask").field("name", &self.name).finish()
    }
}

#[async_trait]
impl Task for FnTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: &mut GenerationContext) -> Result<()> {
        (self.body)(ctx)
    }
}

/// A named, ordered list of tasks registered against one priority.
pub struct TaskGroup {
    name: String,
    tasks: Vec<Box<dyn Task>>,
}

impl TaskGroup {
    /// An empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Append a task.
    #[must_use]
    pub fn with_task(mut self, task: impl Task + 'static) -> Self {
        self.tasks.push(Box::new(task));
        self
    }

    /// Append a closure task.
    #[must_use]
    pub fn task<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut GenerationContext) -> Result<()> + Send + Sync + 'static,
    {
        self.with_task(FnTask::new(name, body))
    }

    /// Group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tasks in run order.
    pub fn tasks(&self) -> impl Iterator<Item = &dyn Task> {
        self.tasks.iter().map(|task| task.as_ref())
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the group has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl fmt::Debug for TaskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGroup")
            .field("name", &self.name)
            .field(
                "tasks",
                &self.tasks.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
