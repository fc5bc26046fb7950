//! Structured events for the entigen scheduler.
//!
//! Every event is a plain `tracing` record carrying an `event_type` field, so
//! whatever subscriber the binary installs (pretty, compact or JSON) renders
//! the scheduler's progress without a dedicated event bus.
//!
//! # Usage
//!
//! ```rust,ignore
//! use entigen_events::{emit_priority_started, emit_task_completed};
//!
//! emit_priority_started!("preparingEachEntity", "entigen:preparingEachEntity", 1);
//! emit_task_completed!("preparingEachEntity", "bootstrap-application", "computeNames", 3);
//! ```

pub mod metadata;

pub use metadata::{correlation_id, set_correlation_id};

/// Target used by every scheduler event.
pub const SCHEDULER_TARGET: &str = "entigen::scheduler";

// ============================================================================
// Priority Events
// ============================================================================

/// Emit a priority started event.
///
/// # Example
/// ```rust,ignore
/// emit_priority_started!("writing", "entigen:writing", 2);
/// ```
#[macro_export]
macro_rules! emit_priority_started {
    ($priority:expr, $queue:expr, $group_count:expr) => {
        ::tracing::info!(
            target: "entigen::scheduler",
            event_type = "priority.started",
            priority = %$priority,
            queue = %$queue,
            group_count = $group_count,
        )
    };
}

/// Emit a priority skipped event, raised for empty skippable priorities.
#[macro_export]
macro_rules! emit_priority_skipped {
    ($priority:expr) => {
        ::tracing::debug!(
            target: "entigen::scheduler",
            event_type = "priority.skipped",
            priority = %$priority,
        )
    };
}

/// Emit a priority completed event.
#[macro_export]
macro_rules! emit_priority_completed {
    ($priority:expr, $task_count:expr, $duration_ms:expr) => {
        ::tracing::info!(
            target: "entigen::scheduler",
            event_type = "priority.completed",
            priority = %$priority,
            task_count = $task_count,
            duration_ms = $duration_ms,
        )
    };
}

// ============================================================================
// Task Events
// ============================================================================

/// Emit a task started event.
///
/// # Example
/// ```rust,ignore
/// emit_task_started!("loadingEntities", "bootstrap-application", "loadEntities");
/// ```
#[macro_export]
macro_rules! emit_task_started {
    ($priority:expr, $generator:expr, $task:expr) => {
        ::tracing::debug!(
            target: "entigen::scheduler",
            event_type = "task.started",
            priority = %$priority,
            generator = %$generator,
            task_name = %$task,
        )
    };
}

/// Emit a task completed event.
#[macro_export]
macro_rules! emit_task_completed {
    ($priority:expr, $generator:expr, $task:expr, $duration_ms:expr) => {
        ::tracing::debug!(
            target: "entigen::scheduler",
            event_type = "task.completed",
            priority = %$priority,
            generator = %$generator,
            task_name = %$task,
            duration_ms = $duration_ms,
        )
    };
}

/// Emit a task failed event.
#[macro_export]
macro_rules! emit_task_failed {
    ($priority:expr, $generator:expr, $task:expr, $error:expr) => {
        ::tracing::error!(
            target: "entigen::scheduler",
            event_type = "task.failed",
            priority = %$priority,
            generator = %$generator,
            task_name = %$task,
            error = %$error,
        )
    };
}

// ============================================================================
// Entity Events
// ============================================================================

/// Emit an entity prepared event once an entity is frozen.
#[macro_export]
macro_rules! emit_entity_prepared {
    ($entity:expr, $field_count:expr, $relationship_count:expr) => {
        ::tracing::debug!(
            target: "entigen::entity",
            event_type = "entity.prepared",
            entity = %$entity,
            field_count = $field_count,
            relationship_count = $relationship_count,
        )
    };
}

/// Emit a file written event.
///
/// # Example
/// ```rust,ignore
/// emit_file_written!(".jhipster/Order.json", "created");
/// ```
#[macro_export]
macro_rules! emit_file_written {
    ($path:expr, $status:expr) => {
        ::tracing::info!(
            target: "entigen::output",
            event_type = "file.written",
            path = %$path,
            status = %$status,
        )
    };
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_priority_events_carry_event_type() {
        let logs = capture(|| {
            emit_priority_started!("writing", "entigen:writing", 2_usize);
            emit_priority_skipped!("composing");
            emit_priority_completed!("writing", 3_usize, 12_u64);
        });
        assert!(logs.contains("priority.started"));
        assert!(logs.contains("entigen:writing"));
        assert!(logs.contains("priority.skipped"));
        assert!(logs.contains("priority.completed"));
        assert!(logs.contains(super::SCHEDULER_TARGET));
    }

    #[test]
    fn test_task_failed_is_error_level() {
        let logs = capture(|| {
            emit_task_failed!("loadingEntities", "bootstrap", "loadEntities", "boom");
        });
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("task.failed"));
        assert!(logs.contains("boom"));
    }

    #[test]
    fn test_entity_and_file_events() {
        let logs = capture(|| {
            emit_entity_prepared!("Order", 4_usize, 1_usize);
            emit_file_written!(".jhipster/Order.json", "created");
        });
        assert!(logs.contains("entity.prepared"));
        assert!(logs.contains("Order"));
        assert!(logs.contains("file.written"));
    }
}
