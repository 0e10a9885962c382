//! Shared builders for analytics tests.

use chrono::{DateTime, Utc};

use crate::history::HistoryRecord;
use crate::simulation::{simulate, SimulationInput};

/// Build a history record from a real simulation run.
pub(crate) fn record(
    initial_value: f64,
    monthly_contribution: f64,
    annual_rate_pct: f64,
    period_months: u32,
) -> HistoryRecord {
    let input = SimulationInput {
        initial_value,
        monthly_contribution,
        annual_rate_pct,
        period_months,
    };
    let result = simulate(&input).unwrap();
    HistoryRecord::new(input, result)
}

/// Same as [`record`], pinned to a specific creation time.
pub(crate) fn record_at(
    initial_value: f64,
    monthly_contribution: f64,
    annual_rate_pct: f64,
    period_months: u32,
    created_at: DateTime<Utc>,
) -> HistoryRecord {
    record(initial_value, monthly_contribution, annual_rate_pct, period_months)
        .with_created_at(created_at)
}
