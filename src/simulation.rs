//! Compound-interest simulation
//!
//! This module computes the month-by-month evolution of an investment given
//! an initial value, a fixed monthly contribution, an annual interest rate
//! and a period in months. Its output feeds the history store and, from
//! there, the analytics pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{InsightsError, Result};

/// Input parameters for a compound-interest simulation.
///
/// The serde names match the keys used by the original calculator's stored
/// data, so exported histories deserialize directly. Missing numeric fields
/// default to zero instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    #[serde(rename = "valorInicial", default)]
    pub initial_value: f64,
    #[serde(rename = "valorMensal", default)]
    pub monthly_contribution: f64,
    /// Annual interest rate in percent (e.g. 10.0 for 10% a year).
    #[serde(rename = "taxa", default)]
    pub annual_rate_pct: f64,
    #[serde(rename = "periodo", default)]
    pub period_months: u32,
}

/// Computed result of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimulationResult {
    #[serde(rename = "valorFinal", default)]
    pub final_balance: f64,
    #[serde(rename = "totalInvestido", default)]
    pub total_contributed: f64,
    #[serde(rename = "totalJuros", default)]
    pub total_interest: f64,
    #[serde(rename = "evolucaoMensal", default)]
    pub monthly_evolution: Vec<MonthlyBalance>,
}

/// One point of the month-by-month evolution sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "saldo")]
    pub balance: f64,
    #[serde(rename = "investido")]
    pub contributed: f64,
    #[serde(rename = "juros")]
    pub interest: f64,
}

/// Run a compound-interest simulation.
///
/// The annual rate is converted to an equivalent monthly rate and
/// contributions are applied at the end of each month.
///
/// # Errors
///
/// Returns [`InsightsError::InvalidInput`] when the period is zero or any
/// monetary input is negative.
pub fn simulate(input: &SimulationInput) -> Result<SimulationResult> {
    if input.period_months == 0 {
        return Err(InsightsError::invalid_input(
            "period must be at least one month",
        ));
    }
    if input.initial_value < 0.0 || input.monthly_contribution < 0.0 {
        return Err(InsightsError::invalid_input(
            "initial value and monthly contribution must not be negative",
        ));
    }
    if input.annual_rate_pct < 0.0 {
        return Err(InsightsError::invalid_input("rate must not be negative"));
    }

    let monthly_rate = monthly_rate_from_annual(input.annual_rate_pct);

    let mut balance = input.initial_value;
    let mut evolution = Vec::with_capacity(input.period_months as usize);

    for month in 1..=input.period_months {
        balance = balance * (1.0 + monthly_rate) + input.monthly_contribution;
        let contributed = input.initial_value + input.monthly_contribution * month as f64;
        evolution.push(MonthlyBalance {
            month,
            balance,
            contributed,
            interest: balance - contributed,
        });
    }

    let total_contributed =
        input.initial_value + input.monthly_contribution * input.period_months as f64;

    Ok(SimulationResult {
        final_balance: balance,
        total_contributed,
        total_interest: balance - total_contributed,
        monthly_evolution: evolution,
    })
}

/// Equivalent monthly rate for an annual percentage rate.
pub fn monthly_rate_from_annual(annual_rate_pct: f64) -> f64 {
    (1.0 + annual_rate_pct / 100.0).powf(1.0 / 12.0) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_without_interest() {
        let input = SimulationInput {
            initial_value: 1000.0,
            monthly_contribution: 100.0,
            annual_rate_pct: 0.0,
            period_months: 12,
        };

        let result = simulate(&input).unwrap();

        assert_eq!(result.monthly_evolution.len(), 12);
        assert!((result.final_balance - 2200.0).abs() < 1e-9);
        assert!((result.total_contributed - 2200.0).abs() < 1e-9);
        assert!(result.total_interest.abs() < 1e-9);
    }

    #[test]
    fn test_simulate_accumulates_interest() {
        let input = SimulationInput {
            initial_value: 10_000.0,
            monthly_contribution: 0.0,
            annual_rate_pct: 10.0,
            period_months: 12,
        };

        let result = simulate(&input).unwrap();

        // One full year at 10% a year.
        assert!((result.final_balance - 11_000.0).abs() < 0.01);
        assert!((result.total_interest - 1000.0).abs() < 0.01);
        assert_eq!(result.monthly_evolution.last().unwrap().month, 12);
    }

    #[test]
    fn test_evolution_is_monotonic_with_contributions() {
        let input = SimulationInput {
            initial_value: 500.0,
            monthly_contribution: 50.0,
            annual_rate_pct: 8.0,
            period_months: 24,
        };

        let result = simulate(&input).unwrap();
        for window in result.monthly_evolution.windows(2) {
            assert!(window[1].balance > window[0].balance);
        }
    }

    #[test]
    fn test_simulate_rejects_zero_period() {
        let input = SimulationInput {
            initial_value: 1000.0,
            monthly_contribution: 100.0,
            annual_rate_pct: 10.0,
            period_months: 0,
        };

        assert!(matches!(
            simulate(&input),
            Err(InsightsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_simulate_rejects_negative_values() {
        let input = SimulationInput {
            initial_value: -1.0,
            monthly_contribution: 100.0,
            annual_rate_pct: 10.0,
            period_months: 12,
        };

        assert!(simulate(&input).is_err());
    }

    #[test]
    fn test_input_deserializes_from_original_keys() {
        let json = r#"{"valorInicial": 1000, "valorMensal": 100, "taxa": 10, "periodo": 12}"#;
        let input: SimulationInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.initial_value, 1000.0);
        assert_eq!(input.monthly_contribution, 100.0);
        assert_eq!(input.annual_rate_pct, 10.0);
        assert_eq!(input.period_months, 12);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let input: SimulationInput = serde_json::from_str("{}").unwrap();

        assert_eq!(input.initial_value, 0.0);
        assert_eq!(input.monthly_contribution, 0.0);
        assert_eq!(input.annual_rate_pct, 0.0);
        assert_eq!(input.period_months, 0);
    }
}
