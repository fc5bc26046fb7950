//! Command implementations
//!
//! Every command returns its rendered output; printing is left to `main`.

pub mod entities;
pub mod generate;
pub mod priorities;
pub mod version;

use crate::errors::CliResult;
use entigen_core::reader::read_entity_dir;
use entigen_core::{ApplicationConfig, GenerationContext};
use std::path::Path;

pub use entities::EntitiesOptions;
pub use generate::GenerateOptions;

#[derive(Debug, Clone)]
pub enum Command {
    Generate(GenerateOptions),
    Entities(EntitiesOptions),
    Priorities { json: bool },
    Version,
}

impl Command {
    /// Name used in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Generate(_) => "generate",
            Self::Entities(_) => "entities",
            Self::Priorities { .. } => "priorities",
            Self::Version => "version",
        }
    }
}

/// Run a command and return what it prints
pub async fn execute(command: Command) -> CliResult<String> {
    tracing::debug!(command = command.name(), "Executing command");
    match command {
        Command::Generate(options) => generate::execute(options).await,
        Command::Entities(options) => entities::execute(options).await,
        Command::Priorities { json } => priorities::execute(json),
        Command::Version => Ok(version::get_version_info()),
    }
}

/// Load the project configuration and entity definitions under `path`.
pub(crate) fn load_context(path: &Path, skip_user_management: bool) -> CliResult<GenerationContext> {
    let mut config = ApplicationConfig::load(path)?;
    if skip_user_management {
        config.skip_user_management = true;
    }
    let definitions = read_entity_dir(path, &config)?;
    tracing::info!(
        project = %path.display(),
        base_name = %config.base_name,
        entities = definitions.len(),
        "Loaded project"
    );
    Ok(GenerationContext::with_definitions(config, definitions))
}
