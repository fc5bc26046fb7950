use super::load_context;
use crate::errors::{CliError, CliResult};
use entigen_codegen::{Blueprint, BlueprintGenerator, OutputSummary, SnapshotWriter, WriteOptions};
use entigen_core::Scheduler;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub path: PathBuf,
    pub blueprints: Vec<PathBuf>,
    pub check: bool,
    pub skip_user_management: bool,
}

#[tracing::instrument(skip_all, fields(path = %options.path.display(), check = options.check))]
pub async fn execute(options: GenerateOptions) -> CliResult<String> {
    let mut ctx = load_context(&options.path, options.skip_user_management)?;

    let mut scheduler = Scheduler::standard()?;
    for blueprint_path in &options.blueprints {
        let blueprint = Blueprint::load(blueprint_path)
            .map_err(|source| CliError::blueprint(blueprint_path, source))?;
        let name = blueprint.name().to_string();
        if !scheduler.compose(Arc::new(BlueprintGenerator::new(blueprint)))? {
            tracing::warn!(blueprint = %name, "Blueprint already composed, ignoring duplicate");
        }
    }
    scheduler.compose(Arc::new(SnapshotWriter::new(WriteOptions {
        output_dir: options.path,
        check: options.check,
    })))?;

    let summary = scheduler.run(&mut ctx).await?;
    tracing::debug!(
        phases = summary.phases.len(),
        tasks = summary.task_count(),
        "Pipeline finished"
    );

    let mut output = String::new();
    for record in &ctx.outputs {
        let _ = writeln!(output, "{:<9} {}", record.status.as_str(), record.path.display());
    }
    let counts = OutputSummary::from_records(&ctx.outputs);
    let _ = write!(
        output,
        "{} entities: {} created, {} updated, {} unchanged",
        ctx.outputs.len(),
        counts.created,
        counts.updated,
        counts.unchanged
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let entities = dir.path().join(".jhipster");
        std::fs::create_dir_all(&entities).unwrap();
        std::fs::write(
            entities.join("Book.json"),
            r#"{ "name": "Book", "changelogDate": "20220129025419", "fields": [{ "fieldName": "title", "fieldType": "String" }], "relationships": [] }"#,
        )
        .unwrap();
        dir
    }

    fn options(dir: &TempDir) -> GenerateOptions {
        GenerateOptions {
            path: dir.path().to_path_buf(),
            ..GenerateOptions::default()
        }
    }

    #[tokio::test]
    async fn test_generate_reports_each_snapshot() {
        let dir = project();
        let output = execute(options(&dir)).await.unwrap();
        assert!(output.starts_with("unchanged"));
        assert!(output.contains("Book.json"));
        assert!(output.ends_with("1 entities: 0 created, 0 updated, 1 unchanged"));
    }

    #[tokio::test]
    async fn test_missing_blueprint_is_reported() {
        let dir = project();
        let mut options = options(&dir);
        options.blueprints.push(dir.path().join("missing.json"));

        let error = execute(options).await.unwrap_err();
        assert!(matches!(error, CliError::Blueprint { .. }));
    }
}
