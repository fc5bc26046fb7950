//! Session metadata attached to scheduler events.

use std::sync::OnceLock;
use uuid::Uuid;

/// Global correlation ID for the current generation session.
static CORRELATION_ID: OnceLock<Uuid> = OnceLock::new();

/// Get or create a correlation ID for the current session.
///
/// This returns the same ID throughout the lifetime of the process,
/// so every priority and task event of one run can be grouped together.
#[must_use]
pub fn correlation_id() -> Uuid {
    *CORRELATION_ID.get_or_init(Uuid::new_v4)
}

/// Set the correlation ID for the current session.
///
/// Only the first call wins. Returns `true` if the ID was set.
pub fn set_correlation_id(id: Uuid) -> bool {
    CORRELATION_ID.set(id).is_ok()
}
