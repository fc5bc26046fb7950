//! CLI error type rendered through miette
//!
//! Pipeline errors keep their own diagnostic codes; the rest get a code
//! and a hint here.

use entigen_codegen::CodegenError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error types with diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// The pipeline failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] entigen_core::Error),

    /// A blueprint could not be loaded
    #[error("Failed to load blueprint {}", path.display())]
    #[diagnostic(
        code(entigen::cli::blueprint),
        help("Blueprints are JSON objects with optional `name`, `config` and `entities` keys")
    )]
    Blueprint {
        /// Blueprint file
        path: PathBuf,
        #[source]
        source: CodegenError,
    },

    /// Output could not be rendered
    #[error("Failed to render output")]
    #[diagnostic(code(entigen::cli::output))]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Wrap a blueprint loading error
    pub fn blueprint(path: impl Into<PathBuf>, source: CodegenError) -> Self {
        Self::Blueprint {
            path: path.into(),
            source,
        }
    }
}

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;
