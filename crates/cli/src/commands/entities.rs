use super::load_context;
use crate::errors::CliResult;
use entigen_core::Scheduler;
use entigen_core::prepare::BootstrapGenerator;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct EntitiesOptions {
    pub path: PathBuf,
    pub json: bool,
    pub skip_user_management: bool,
}

#[tracing::instrument(skip_all, fields(path = %options.path.display()))]
pub async fn execute(options: EntitiesOptions) -> CliResult<String> {
    let mut ctx = load_context(&options.path, options.skip_user_management)?;

    let mut scheduler = Scheduler::standard()?;
    scheduler.compose(Arc::new(BootstrapGenerator))?;
    scheduler.run(&mut ctx).await?;

    if options.json {
        let entities: Vec<_> = ctx.entities.iter().collect();
        return Ok(serde_json::to_string_pretty(&entities)?);
    }

    let mut output = String::new();
    for entity in ctx.entities.iter() {
        let _ = write!(
            output,
            "{} (table {}, {} fields, {} relationships)",
            entity.name,
            entity.entity_table_name,
            entity.fields.len(),
            entity.relationships.len()
        );
        if entity.built_in {
            output.push_str(" [built-in]");
        }
        output.push('\n');
    }
    Ok(output.trim_end().to_string())
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
            entities.join("Order.json"),
            r#"{ "name": "Order", "fields": [{ "fieldName": "total", "fieldType": "BigDecimal" }] }"#,
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_text_listing_includes_built_in_user() {
        let dir = project();
        let output = execute(EntitiesOptions {
            path: dir.path().to_path_buf(),
            ..EntitiesOptions::default()
        })
        .await
        .unwrap();

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("User (table jhi_user"));
        assert!(lines[0].ends_with("[built-in]"));
        assert!(lines[1].starts_with("Order (table jhi_order, 2 fields"));
    }

    #[tokio::test]
    async fn test_json_listing() {
        let dir = project();
        let output = execute(EntitiesOptions {
            path: dir.path().to_path_buf(),
            json: true,
            skip_user_management: true,
        })
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let entities = value.as_array().unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0]["name"], "Order");
        assert_eq!(entities[0]["entityTableName"], "jhi_order");
        assert_eq!(entities[0]["fields"][0]["fieldName"], "id");
    }
}
