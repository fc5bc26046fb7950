//! Entity snapshot writer
//!
//! Writes the raw definition of every prepared entity to
//! `<output>/.jhipster/<Entity>.json`:
//! - New snapshots are created
//! - Existing snapshots are rewritten only when the definition changed
//! - Check mode writes nothing and fails on any would-be change

use crate::{CodegenError, Result};
use async_trait::async_trait;
use entigen_core::equality::entities_equal;
use entigen_core::prepare;
use entigen_core::priorities::names;
use entigen_core::snapshot::{snapshot_path, to_canonical_string, to_canonical_value};
use entigen_core::{
    GenerationContext, Generator, OutputRecord, OutputStatus, Registrar, Task, TaskGroup,
};
use entigen_events::emit_file_written;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Namespace of the snapshot writer.
pub const NAMESPACE: &str = "entity-snapshots";

/// Options for snapshot writing
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Project directory the `.jhipster` folder is written under
    pub output_dir: PathBuf,
    /// Check mode: don't write files, just check if they would change
    pub check: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            check: false,
        }
    }
}

/// Counts of written snapshots by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSummary {
    /// Snapshots that did not exist
    pub created: usize,
    /// Snapshots rewritten with a changed definition
    pub updated: usize,
    /// Snapshots left alone
    pub unchanged: usize,
}

impl OutputSummary {
    /// Tally output records
    #[must_use]
    pub fn from_records(records: &[OutputRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match record.status {
                OutputStatus::Created => summary.created += 1,
                OutputStatus::Updated => summary.updated += 1,
                OutputStatus::Unchanged => summary.unchanged += 1,
            }
            summary
        })
    }
}

/// Generator writing entity snapshots
#[derive(Debug, Clone, Default)]
pub struct SnapshotWriter {
    options: Arc<WriteOptions>,
}

impl SnapshotWriter {
    /// Create a writer
    #[must_use]
    pub fn new(options: WriteOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    /// Writer options
    #[must_use]
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }
}

impl Generator for SnapshotWriter {
    fn namespace(&self) -> &str {
        NAMESPACE
    }

    fn depends_on(&self) -> Vec<String> {
        vec![prepare::NAMESPACE.to_string()]
    }

    fn register_tasks(&self, registrar: &mut Registrar<'_>) -> entigen_core::Result<()> {
        registrar.register(
            names::WRITING_ENTITIES,
            TaskGroup::new("writeEntities").with_task(WriteSnapshots {
                options: Arc::clone(&self.options),
            }),
        )?;
        registrar.register(
            names::POST_WRITING_ENTITIES,
            TaskGroup::new("summarize").task("logSummary", |ctx| {
                let summary = OutputSummary::from_records(&ctx.outputs);
                tracing::info!(
                    created = summary.created,
                    updated = summary.updated,
                    unchanged = summary.unchanged,
                    "Entity snapshots written"
                );
                Ok(())
            }),
        )
    }
}

struct WriteSnapshots {
    options: Arc<WriteOptions>,
}

#[async_trait]
impl Task for WriteSnapshots {
    fn name(&self) -> &str {
        "writeSnapshots"
    }

    async fn run(&self, ctx: &mut GenerationContext) -> entigen_core::Result<()> {
        write_snapshots(ctx, &self.options).await?;
        Ok(())
    }
}

/// Write the snapshot of every prepared, non built-in entity
///
/// Each outcome is recorded on the context and returned.
///
/// # Errors
///
/// Returns an error if a snapshot cannot be rendered or written, or, in
/// check mode, if any snapshot is missing or would change
pub async fn write_snapshots(
    ctx: &mut GenerationContext,
    options: &WriteOptions,
) -> Result<Vec<OutputRecord>> {
    let mut pending = Vec::new();
    for entity in ctx.entities.iter().filter(|entity| !entity.built_in) {
        pending.push((
            snapshot_path(&options.output_dir, &entity.name),
            to_canonical_value(&entity.definition)?,
            to_canonical_string(&entity.definition)?,
        ));
    }

    let mut records = Vec::with_capacity(pending.len());
    for (path, value, contents) in pending {
        let status = snapshot_status(&path, &value).await?;
        if options.check {
            if status != OutputStatus::Unchanged {
                return Err(CodegenError::Generation(format!(
                    "Snapshot would be {status}: {}",
                    path.display()
                )));
            }
        } else if status != OutputStatus::Unchanged {
            write_file(&path, &contents).await?;
        }

        emit_file_written!(path.display(), status);
        ctx.record_output(path.clone(), status);
        records.push(OutputRecord { path, status });
    }
    Ok(records)
}

/// Compare a snapshot on disk with the definition about to be written
async fn snapshot_status(path: &Path, expected: &Value) -> Result<OutputStatus> {
    let existing = match tokio::fs::read_to_string(path).await {
        Ok(existing) => existing,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(OutputStatus::Created),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str::<Value>(&existing) {
        Ok(existing) if entities_equal(&existing, expected) => Ok(OutputStatus::Unchanged),
        Ok(_) => Ok(OutputStatus::Updated),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "Replacing unreadable snapshot");
            Ok(OutputStatus::Updated)
        }
    }
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    tracing::debug!("Generated: {}", path.display());
    Ok(())
}
