use crate::context::GenerationContext;
use crate::error::{Error, Result};
use crate::model::ResolvedOptions;

/// Apply the application's default options to every pending entity.
///
/// Explicit options are never overwritten.
///
/// # Errors
///
/// Returns [`Error::Configuration`] for a definition without a name.
pub fn configure_entities(ctx: &mut GenerationContext) -> Result<()> {
    let defaults = ResolvedOptions::defaults(&ctx.config);
    for (name, source) in &mut ctx.sources {
        if name.is_empty() || source.definition.name.is_empty() {
            return Err(Error::configuration("an entity definition has no name"));
        }
        source.options = Some(ResolvedOptions::resolve(
            &source.definition.options,
            &defaults,
        ));
        tracing::trace!(entity = %name, "Applied default options");
    }
    Ok(())
}
