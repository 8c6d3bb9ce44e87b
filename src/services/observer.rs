use crate::models::LoadEvent;

/// Receives progress events from a load run.
///
/// Observers are advisory: they cannot influence control flow.
pub trait LoadObserver: Send + Sync {
    fn on_event(&self, event: &LoadEvent);
}

/// Emits every event as a structured `tracing` record
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_event(&self, event: &LoadEvent) {
        match event {
            LoadEvent::RunStarted {
                run_id,
                stage_count,
                insert_count,
            } => tracing::info!(%run_id, stage_count, insert_count, "Starting load run"),
            LoadEvent::PhaseStarted { phase, count } => {
                tracing::info!(%phase, count, "Starting {} phase", phase)
            }
            LoadEvent::StatementStarted {
                phase,
                index,
                name,
                sql,
            } => tracing::info!(%phase, index, name = %name, sql = %sql, "Executing statement"),
            LoadEvent::StatementCommitted {
                phase,
                index,
                name,
                elapsed_ms,
            } => tracing::info!(%phase, index, name = %name, elapsed_ms, "Committed statement"),
            LoadEvent::StatementFailed {
                phase,
                index,
                name,
                error,
            } => tracing::error!(%phase, index, name = %name, error = %error, "Statement failed"),
            LoadEvent::PhaseCompleted { phase } => tracing::info!(%phase, "Completed {} phase", phase),
            LoadEvent::RunCompleted { run_id, committed } => {
                tracing::info!(%run_id, committed, "Load run completed")
            }
        }
    }
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LoadObserver for NoopObserver {
    fn on_event(&self, _event: &LoadEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phase;

    #[test]
    fn test_observers_accept_every_event() {
        let events = vec![
            LoadEvent::PhaseStarted {
                phase: Phase::Stage,
                count: 1,
            },
            LoadEvent::StatementFailed {
                phase: Phase::Stage,
                index: 0,
                name: "staging_events".to_string(),
                error: "Database error: permission denied".to_string(),
            },
        ];

        let observers: Vec<Box<dyn LoadObserver>> =
            vec![Box::new(TracingObserver), Box::new(NoopObserver)];
        for observer in &observers {
            for event in &events {
                observer.on_event(event);
            }
        }
    }
}
