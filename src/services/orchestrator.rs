use crate::error::{LoadError, SessionError};
use crate::models::{Catalog, LoadEvent, Phase, RunReport, StatementOutcome, StatementTemplate};
use crate::services::observer::{LoadObserver, TracingObserver};
use crate::services::session::Session;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Runs a [`Catalog`] against a borrowed [`Session`] in two phases.
///
/// Every stage statement is executed and committed, in catalog order, before
/// the first insert statement is attempted. The first failing execute or
/// commit aborts the run; statements committed before it stay committed.
pub struct LoadOrchestrator {
    observer: Arc<dyn LoadObserver>,
}

impl LoadOrchestrator {
    pub fn new() -> Self {
        Self {
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(observer: Arc<dyn LoadObserver>) -> Self {
        Self { observer }
    }

    pub async fn run(
        &self,
        session: &mut dyn Session,
        catalog: &Catalog,
    ) -> Result<RunReport, LoadError> {
        let report = RunReport::new();
        let span = tracing::info_span!("load_run", run_id = %report.run_id);

        self.run_phases(session, catalog, report)
            .instrument(span)
            .await
    }

    async fn run_phases(
        &self,
        session: &mut dyn Session,
        catalog: &Catalog,
        mut report: RunReport,
    ) -> Result<RunReport, LoadError> {
        self.observer.on_event(&LoadEvent::RunStarted {
            run_id: report.run_id,
            stage_count: catalog.stage_statements().len(),
            insert_count: catalog.insert_statements().len(),
        });

        // Insert statements read from staging tables
        for phase in [Phase::Stage, Phase::Insert] {
            self.run_phase(session, phase, catalog.statements(phase), &mut report)
                .await?;
        }

        report.mark_finished();
        self.observer.on_event(&LoadEvent::RunCompleted {
            run_id: report.run_id,
            committed: report.committed(),
        });

        Ok(report)
    }

    async fn run_phase(
        &self,
        session: &mut dyn Session,
        phase: Phase,
        statements: &[StatementTemplate],
        report: &mut RunReport,
    ) -> Result<(), LoadError> {
        self.observer.on_event(&LoadEvent::PhaseStarted {
            phase,
            count: statements.len(),
        });

        for (index, statement) in statements.iter().enumerate() {
            self.observer.on_event(&LoadEvent::StatementStarted {
                phase,
                index,
                name: statement.name().to_string(),
                sql: statement.sql().to_string(),
            });

            let start_time = Instant::now();

            if let Err(source) = session.execute(statement.sql()).await {
                self.report_failure(phase, index, statement, &source);
                return Err(LoadError::Statement {
                    phase,
                    index,
                    name: statement.name().to_string(),
                    sql: statement.sql().to_string(),
                    committed: report.committed(),
                    source,
                });
            }

            if let Err(source) = session.commit().await {
                self.report_failure(phase, index, statement, &source);
                return Err(LoadError::Commit {
                    phase,
                    index,
                    name: statement.name().to_string(),
                    sql: statement.sql().to_string(),
                    committed: report.committed(),
                    source,
                });
            }

            let elapsed_ms = start_time.elapsed().as_millis() as u64;
            self.observer.on_event(&LoadEvent::StatementCommitted {
                phase,
                index,
                name: statement.name().to_string(),
                elapsed_ms,
            });
            report.record(StatementOutcome {
                phase,
                index,
                name: statement.name().to_string(),
                elapsed_ms,
            });
        }

        self.observer.on_event(&LoadEvent::PhaseCompleted { phase });
        Ok(())
    }

    fn report_failure(
        &self,
        phase: Phase,
        index: usize,
        statement: &StatementTemplate,
        error: &SessionError,
    ) {
        self.observer.on_event(&LoadEvent::StatementFailed {
            phase,
            index,
            name: statement.name().to_string(),
            error: error.to_string(),
        });
    }
}

impl Default for LoadOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
