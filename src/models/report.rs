use super::statement::Phase;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A statement that executed and committed
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatementOutcome {
    pub phase: Phase,
    pub index: usize,
    pub name: String,
    pub elapsed_ms: u64,
}

/// Summary of a run that completed both phases
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub statements: Vec<StatementOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            statements: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: StatementOutcome) {
        self.statements.push(outcome);
    }

    pub fn mark_finished(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn committed(&self) -> usize {
        self.statements.len()
    }

    pub fn committed_in(&self, phase: Phase) -> usize {
        self.statements.iter().filter(|s| s.phase == phase).count()
    }

    pub fn total_elapsed_ms(&self) -> u64 {
        self.statements.iter().map(|s| s.elapsed_ms).sum()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Events emitted to a [`LoadObserver`](crate::services::LoadObserver)
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    RunStarted {
        run_id: Uuid,
        stage_count: usize,
        insert_count: usize,
    },
    PhaseStarted {
        phase: Phase,
        count: usize,
    },
    StatementStarted {
        phase: Phase,
        index: usize,
        name: String,
        sql: String,
    },
    StatementCommitted {
        phase: Phase,
        index: usize,
        name: String,
        elapsed_ms: u64,
    },
    StatementFailed {
        phase: Phase,
        index: usize,
        name: String,
        error: String,
    },
    PhaseCompleted {
        phase: Phase,
    },
    RunCompleted {
        run_id: Uuid,
        committed: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_per_phase() {
        let mut report = RunReport::new();
        report.record(StatementOutcome {
            phase: Phase::Stage,
            index: 0,
            name: "staging_events".to_string(),
            elapsed_ms: 40,
        });
        report.record(StatementOutcome {
            phase: Phase::Insert,
            index: 0,
            name: "songplays".to_string(),
            elapsed_ms: 2,
        });

        assert_eq!(report.committed(), 2);
        assert_eq!(report.committed_in(Phase::Stage), 1);
        assert_eq!(report.total_elapsed_ms(), 42);
        assert!(report.finished_at.is_none());

        report.mark_finished();
        assert!(report.finished_at.unwrap() >= report.started_at);
    }
}
