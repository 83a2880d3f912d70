//! # Execution Meter Adapters
//!
//! Budget meters for the batch executor: an unlimited meter for deployments
//! without execution pricing, and a fixed-budget meter for tests and metered
//! environments.

use crate::ports::outbound::ExecutionMeter;
use std::sync::atomic::{AtomicU64, Ordering};

/// Meter that never runs out.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnmeteredExecution;

impl ExecutionMeter for UnmeteredExecution {
    fn remaining(&self) -> u64 {
        u64::MAX
    }

    fn charge(&self, _units: u64) {}
}

/// Meter with a fixed budget, decremented as work is charged.
#[derive(Debug)]
pub struct FixedBudgetMeter {
    remaining: AtomicU64,
}

impl FixedBudgetMeter {
    /// Create a meter holding `budget` work units.
    #[must_use]
    pub fn new(budget: u64) -> Self {
        Self {
            remaining: AtomicU64::new(budget),
        }
    }

    /// Top the meter back up to `budget` (fresh call, fresh budget).
    pub fn reset(&self, budget: u64) {
        self.remaining.store(budget, Ordering::Relaxed);
    }
}

impl ExecutionMeter for FixedBudgetMeter {
    fn remaining(&self) -> u64 {
        self.remaining.load(Ordering::Relaxed)
    }

    fn charge(&self, units: u64) {
        // Saturating: charging past empty pins the meter at zero.
        let mut current = self.remaining.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_sub(units);
            match self.remaining.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}
