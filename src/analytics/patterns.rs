//! Statistical pattern detection over the simulation history
//!
//! Four detectors run over the chronological record sequence:
//!
//! - **Trend**: least-squares regression of a numeric field against its
//!   sequence index, one pass per subject field
//! - **Seasonality**: variation of per-calendar-month means
//! - **Correlation**: Pearson correlation between period length and
//!   realized return
//! - **Outliers**: values further than a configured number of standard
//!   deviations from the sample mean
//!
//! Each detector has a minimum sample size below which it silently yields
//! nothing; short histories are a normal state, not an error.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::stats;
use super::AnalyticsConfig;
use crate::history::HistoryRecord;

/// A detected statistical regularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub kind: PatternKind,
    pub field: PatternField,
    pub direction: TrendDirection,
    /// Detector-specific magnitude: percent change for trends, coefficient
    /// of variation (percent) for seasonality, the correlation coefficient
    /// for correlations, and the outlier count for outliers.
    pub magnitude: f64,
    pub description: String,
    pub sample_count: usize,
    pub last_occurrence: DateTime<Utc>,
    /// Confidence in [0, 100].
    pub confidence: f64,
}

/// Kind of statistical signal a pattern represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Trend,
    Seasonal,
    Correlation,
    Outlier,
}

/// Numeric record field a detector can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternField {
    InitialValue,
    MonthlyContribution,
    Rate,
    FinalBalance,
    Period,
}

impl PatternField {
    /// Extract this field's value from a record. Missing data was already
    /// coerced to zero at deserialization time, so extraction is total.
    pub fn extract(&self, record: &HistoryRecord) -> f64 {
        match self {
            Self::InitialValue => record.input.initial_value,
            Self::MonthlyContribution => record.input.monthly_contribution,
            Self::Rate => record.input.annual_rate_pct,
            Self::FinalBalance => record.result.final_balance,
            Self::Period => record.input.period_months as f64,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::InitialValue => "initial value",
            Self::MonthlyContribution => "monthly contribution",
            Self::Rate => "interest rate",
            Self::FinalBalance => "final balance",
            Self::Period => "period",
        }
    }
}

/// Direction of a detected trend. Serialized with the original
/// application's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    #[serde(rename = "crescente")]
    Increasing,
    #[serde(rename = "decrescente")]
    Decreasing,
    #[serde(rename = "estavel")]
    Stable,
}

/// Trend signal shared with the behavioral profiler.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TrendSignal {
    pub direction: TrendDirection,
    /// Percent change between the regression-predicted first and last values.
    pub magnitude_pct: f64,
    pub confidence: f64,
}

/// Fit a trend over a raw value series. Returns `None` below the minimum
/// sample size or when the series starts at zero (percent change would be
/// meaningless).
pub(crate) fn trend_signal(values: &[f64], config: &AnalyticsConfig) -> Option<TrendSignal> {
    if values.len() < config.min_trend_samples {
        return None;
    }

    let fit = stats::linear_regression(values)?;
    let predicted_first = fit.predict(0.0);
    let predicted_last = fit.predict((values.len() - 1) as f64);

    if predicted_first.abs() < f64::EPSILON {
        return None;
    }

    let magnitude_pct = (predicted_last - predicted_first) / predicted_first.abs() * 100.0;
    let direction = if magnitude_pct > 0.0 {
        TrendDirection::Increasing
    } else if magnitude_pct < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    Some(TrendSignal {
        direction,
        magnitude_pct,
        confidence: (fit.r_squared.max(0.0) * 100.0).clamp(0.0, 100.0),
    })
}

/// Run every detector over the history and collect the emitted patterns.
///
/// The history must be in chronological order (oldest first). The function
/// is pure: two calls over the same records produce the same patterns apart
/// from their generated ids.
pub fn analyze_patterns(history: &[HistoryRecord], config: &AnalyticsConfig) -> Vec<Pattern> {
    let mut patterns = Vec::new();

    for field in [
        PatternField::InitialValue,
        PatternField::MonthlyContribution,
        PatternField::Rate,
        PatternField::FinalBalance,
    ] {
        if let Some(pattern) = detect_trend(history, field, config) {
            patterns.push(pattern);
        }
    }

    if let Some(pattern) = detect_seasonality(history, PatternField::InitialValue, config) {
        patterns.push(pattern);
    }
    if let Some(pattern) = detect_correlation(history, config) {
        patterns.push(pattern);
    }
    if let Some(pattern) = detect_outliers(history, PatternField::InitialValue, config) {
        patterns.push(pattern);
    }

    patterns
}

fn detect_trend(
    history: &[HistoryRecord],
    field: PatternField,
    config: &AnalyticsConfig,
) -> Option<Pattern> {
    let values: Vec<f64> = history.iter().map(|r| field.extract(r)).collect();
    let signal = trend_signal(&values, config)?;

    if signal.magnitude_pct.abs() <= config.trend_significance_pct {
        return None;
    }

    let verb = match signal.direction {
        TrendDirection::Increasing => "increased",
        TrendDirection::Decreasing => "decreased",
        TrendDirection::Stable => "held steady",
    };

    Some(Pattern {
        id: Uuid::new_v4().to_string(),
        kind: PatternKind::Trend,
        field,
        direction: signal.direction,
        magnitude: signal.magnitude_pct,
        description: format!(
            "Your {} has {} by {:.1}% across {} simulations",
            field.label(),
            verb,
            signal.magnitude_pct.abs(),
            values.len()
        ),
        sample_count: values.len(),
        last_occurrence: last_timestamp(history),
        confidence: signal.confidence,
    })
}

fn detect_seasonality(
    history: &[HistoryRecord],
    field: PatternField,
    config: &AnalyticsConfig,
) -> Option<Pattern> {
    if history.len() < config.min_seasonal_samples {
        return None;
    }

    let mut by_month: HashMap<u32, Vec<f64>> = HashMap::new();
    for record in history {
        by_month
            .entry(record.created_at.month())
            .or_default()
            .push(field.extract(record));
    }

    let monthly_means: Vec<f64> = by_month.values().map(|v| stats::mean(v)).collect();
    let cv_pct = stats::coefficient_of_variation(&monthly_means) * 100.0;

    if cv_pct <= config.seasonal_cv_threshold_pct {
        return None;
    }

    Some(Pattern {
        id: Uuid::new_v4().to_string(),
        kind: PatternKind::Seasonal,
        field,
        direction: TrendDirection::Stable,
        magnitude: cv_pct,
        description: format!(
            "Your {} varies {:.0}% between calendar months",
            field.label(),
            cv_pct
        ),
        sample_count: history.len(),
        last_occurrence: last_timestamp(history),
        confidence: cv_pct.clamp(0.0, 100.0),
    })
}

fn detect_correlation(history: &[HistoryRecord], config: &AnalyticsConfig) -> Option<Pattern> {
    if history.len() < config.min_correlation_samples {
        return None;
    }

    let periods: Vec<f64> = history.iter().map(|r| r.input.period_months as f64).collect();
    let returns: Vec<f64> = history.iter().map(|r| r.realized_return_pct()).collect();
    let r = stats::pearson(&periods, &returns);

    if r.abs() <= config.correlation_threshold {
        return None;
    }

    let direction = if r > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    Some(Pattern {
        id: Uuid::new_v4().to_string(),
        kind: PatternKind::Correlation,
        field: PatternField::Period,
        direction,
        magnitude: r,
        description: format!(
            "Longer periods {} your realized return (r = {:.2})",
            if r > 0.0 { "raise" } else { "lower" },
            r
        ),
        sample_count: history.len(),
        last_occurrence: last_timestamp(history),
        confidence: (r.abs() * 100.0).clamp(0.0, 100.0),
    })
}

fn detect_outliers(
    history: &[HistoryRecord],
    field: PatternField,
    config: &AnalyticsConfig,
) -> Option<Pattern> {
    if history.len() < config.min_outlier_samples {
        return None;
    }

    let values: Vec<f64> = history.iter().map(|r| field.extract(r)).collect();
    let mean = stats::mean(&values);
    let sd = stats::std_dev(&values);
    if sd.abs() < f64::EPSILON {
        return None;
    }

    let mut count = 0usize;
    let mut max_z = 0.0f64;
    for v in &values {
        let z = (v - mean).abs() / sd;
        if z > config.outlier_sigma {
            count += 1;
            max_z = max_z.max(z);
        }
    }

    if count == 0 {
        return None;
    }

    let fraction = count as f64 / values.len() as f64;

    Some(Pattern {
        id: Uuid::new_v4().to_string(),
        kind: PatternKind::Outlier,
        field,
        direction: TrendDirection::Stable,
        magnitude: count as f64,
        description: format!(
            "{} of {} simulations ({:.0}%) deviate strongly from your usual {}",
            count,
            values.len(),
            fraction * 100.0,
            field.label()
        ),
        sample_count: values.len(),
        last_occurrence: last_timestamp(history),
        confidence: (max_z * 25.0).clamp(0.0, 100.0),
    })
}

fn last_timestamp(history: &[HistoryRecord]) -> DateTime<Utc> {
    history
        .iter()
        .map(|r| r.created_at)
        .max()
        .unwrap_or_else(Utc::now)
}
