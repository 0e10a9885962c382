//! Performance metrics and threshold alerts
//!
//! Metrics wrap a handful of scalar KPIs with a benchmark comparison and a
//! trend classification; alerts fire on fixed thresholds (a low monthly
//! contribution on the latest record, or a confident negative trend among
//! the detected patterns).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patterns::{Pattern, TrendDirection};
use super::profile::{consistency_score, diversification_score};
use super::{stats, AnalyticsConfig};
use crate::history::HistoryRecord;

/// A scalar KPI with a benchmark comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub trend: MetricTrend,
    /// Value minus its benchmark.
    pub benchmark_delta: f64,
    pub category: MetricCategory,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricTrend {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Returns,
    Behavior,
    Allocation,
}

/// A threshold-triggered notice requiring user attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub title: String,
    pub description: String,
    pub urgency: AlertUrgency,
    pub category: MetricCategory,
    pub recommended_action: String,
    /// UI-owned flags; toggling them is external to the analytics pipeline.
    pub viewed: bool,
    pub dismissed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowContribution,
    NegativeTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertUrgency {
    Info,
    Warning,
    Critical,
}

/// Derive the scalar performance metrics from the history.
///
/// Empty history yields an empty list, never an error.
pub fn generate_metrics(history: &[HistoryRecord], config: &AnalyticsConfig) -> Vec<Metric> {
    if history.is_empty() {
        return Vec::new();
    }

    let average_return = stats::mean(
        &history
            .iter()
            .map(|r| r.realized_return_pct())
            .collect::<Vec<_>>(),
    );
    let consistency = consistency_score(history);
    let diversification = diversification_score(history);
    let average_invested = stats::mean(
        &history
            .iter()
            .map(|r| r.input.initial_value)
            .collect::<Vec<_>>(),
    );

    vec![
        metric(
            "Average realized return",
            average_return,
            "%",
            config.benchmark_return_pct,
            MetricCategory::Returns,
            "Mean interest earned over contributed amounts, against the benchmark rate",
        ),
        metric(
            "Consistency",
            consistency,
            "score",
            config.consistency_benchmark,
            MetricCategory::Behavior,
            "Regularity of your simulation habit; 100 means perfectly even spacing",
        ),
        metric(
            "Diversification",
            diversification,
            "%",
            config.diversification_benchmark,
            MetricCategory::Allocation,
            "Distinct modalities relative to the number of simulations",
        ),
        metric(
            "Average invested value",
            average_invested,
            "currency",
            config.low_investment_threshold,
            MetricCategory::Behavior,
            "Mean initial value across simulations",
        ),
    ]
}

fn metric(
    name: &str,
    value: f64,
    unit: &str,
    benchmark: f64,
    category: MetricCategory,
    description: &str,
) -> Metric {
    Metric {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        value,
        unit: unit.to_string(),
        trend: classify_trend(value, benchmark),
        benchmark_delta: value - benchmark,
        category,
        description: description.to_string(),
    }
}

/// Positive at or above the benchmark, negative below 80% of it, neutral in
/// between.
fn classify_trend(value: f64, benchmark: f64) -> MetricTrend {
    if value >= benchmark {
        MetricTrend::Positive
    } else if value < benchmark * 0.8 {
        MetricTrend::Negative
    } else {
        MetricTrend::Neutral
    }
}

/// Derive threshold alerts from the history and detected patterns.
pub fn generate_alerts(
    history: &[HistoryRecord],
    patterns: &[Pattern],
    config: &AnalyticsConfig,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(latest) = history.iter().max_by_key(|r| r.created_at) {
        let contribution = latest.input.monthly_contribution;
        if contribution < config.low_contribution_threshold {
            let suggested = (contribution * config.contribution_increase_factor)
                .min(config.contribution_suggestion_cap);
            alerts.push(Alert {
                id: Uuid::new_v4().to_string(),
                kind: AlertKind::LowContribution,
                title: "Low monthly contribution".to_string(),
                description: format!(
                    "Your latest simulation contributes {:.0} a month. Raising it to {:.0} would meaningfully speed up compounding.",
                    contribution, suggested
                ),
                urgency: AlertUrgency::Warning,
                category: MetricCategory::Behavior,
                recommended_action: format!("Simulate with a monthly contribution of {:.0}", suggested),
                viewed: false,
                dismissed: false,
            });
        }
    }

    for pattern in patterns {
        if pattern.direction == TrendDirection::Decreasing
            && pattern.confidence > config.suggestion_confidence_threshold
        {
            alerts.push(Alert {
                id: Uuid::new_v4().to_string(),
                kind: AlertKind::NegativeTrend,
                title: "Negative trend detected".to_string(),
                description: pattern.description.clone(),
                urgency: AlertUrgency::Warning,
                category: MetricCategory::Returns,
                recommended_action: "Review recent simulations and confirm the decline is intentional"
                    .to_string(),
                viewed: false,
                dismissed: false,
            });
        }
    }

    alerts
}
