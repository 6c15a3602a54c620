//! Wall-clock budget for analysis runs.
//!
//! The library has no timeout logic; the CLI runs each analysis on a worker
//! thread and stops waiting once the budget is spent.

use std::fmt;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};

/// Why a budgeted run produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetError {
    /// The worker did not finish in time
    Exceeded(Duration),
    /// The worker panicked before sending a result
    WorkerFailed,
}

impl fmt::Display for BudgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetError::Exceeded(budget) => {
                write!(f, "time budget of {:.1}s exceeded", budget.as_secs_f64())
            }
            BudgetError::WorkerFailed => write!(f, "analysis worker stopped unexpectedly"),
        }
    }
}

impl std::error::Error for BudgetError {}

/// Convert a budget in seconds; non-positive or non-finite values disable it.
pub fn budget_from_secs(secs: Option<f64>) -> Option<Duration> {
    secs.filter(|s| s.is_finite() && *s > 0.0)
        .map(Duration::from_secs_f64)
}

/// Run `job` within `budget`, or inline when there is no budget.
///
/// An overrun is final: the job is not retried and its late result is
/// discarded.
pub fn run_with_budget<T, F>(budget: Option<Duration>, job: F) -> Result<T, BudgetError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let Some(budget) = budget else {
        return Ok(job());
    };

    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        // The receiver is gone once the budget expired
        let _ = tx.send(job());
    });

    match rx.recv_timeout(budget) {
        Ok(value) => Ok(value),
        Err(RecvTimeoutError::Timeout) => {
            log::error!("Analysis exceeded its {:?} budget", budget);
            Err(BudgetError::Exceeded(budget))
        }
        Err(RecvTimeoutError::Disconnected) => Err(BudgetError::WorkerFailed),
    }
}
