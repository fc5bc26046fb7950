//! # entigen-codegen
//!
//! Generators that sit on top of the entity pipeline in `entigen-core`:
//!
//! - [`BlueprintGenerator`] applies a JSON blueprint's configuration and
//!   entity overrides while the run is `configuring`.
//! - [`SnapshotWriter`] writes every prepared entity back to
//!   `.jhipster/<Entity>.json` during `writingEntities`, leaving equivalent
//!   snapshots untouched.
//!
//! ## Example
//!
//! ```rust,ignore
//! use entigen_codegen::{Blueprint, BlueprintGenerator, SnapshotWriter, WriteOptions};
//!
//! let mut scheduler = Scheduler::standard()?;
//! scheduler.compose(Arc::new(BlueprintGenerator::new(Blueprint::load("shop.json")?)))?;
//! scheduler.compose(Arc::new(SnapshotWriter::new(WriteOptions::default())))?;
//! scheduler.run(&mut ctx).await?;
//! ```

pub mod blueprint;
pub mod generator;

pub use blueprint::{Blueprint, BlueprintData, BlueprintGenerator};
pub use generator::{NAMESPACE, OutputSummary, SnapshotWriter, WriteOptions, write_snapshots};

use thiserror::Error;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Error loading or applying a blueprint
    #[error("Blueprint error: {0}")]
    Blueprint(String),

    /// Error during file generation
    #[error("Generation error: {0}")]
    Generation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error raised by the core pipeline
    #[error(transparent)]
    Core(#[from] entigen_core::Error),
}

impl From<CodegenError> for entigen_core::Error {
    fn from(error: CodegenError) -> Self {
        match error {
            CodegenError::Core(inner) => inner,
            other => Self::external(other),
        }
    }
}

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codegen_error_display() {
        let error = CodegenError::Generation("snapshot would change".to_string());
        assert_eq!(error.to_string(), "Generation error: snapshot would change");

        let error = CodegenError::Blueprint("missing name".to_string());
        assert_eq!(error.to_string(), "Blueprint error: missing name");
    }

    #[test]
    fn test_codegen_error_io_from() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CodegenError = io_error.into();
        assert!(matches!(error, CodegenError::Io(_)));
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_core_error_round_trips() {
        let error = CodegenError::from(entigen_core::Error::merge("bad override"));
        let core: entigen_core::Error = error.into();
        assert!(matches!(core, entigen_core::Error::Merge { .. }));
    }

    #[test]
    fn test_other_errors_become_external() {
        let core: entigen_core::Error = CodegenError::Generation("boom".to_string()).into();
        assert!(matches!(core, entigen_core::Error::External(_)));
        assert_eq!(core.to_string(), "Generation error: boom");
    }
}
