//! Behavioral profiling over the simulation history
//!
//! Aggregates how often, how much and how consistently a user simulates,
//! derives a risk-tolerance score from the rates they pick, and classifies
//! the combination into a conservative/moderate/aggressive category.

use serde::{Deserialize, Serialize};

use super::patterns::{trend_signal, TrendDirection};
use super::{stats, AnalyticsConfig};
use crate::history::HistoryRecord;

/// Derived characterization of a user's investing behavior.
///
/// Recomputed on demand; a pure function of the history at computation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralProfile {
    pub risk_category: RiskCategory,
    /// Simulations per 30-day window, measured over the span between the
    /// earliest and latest record rather than up to the present, so the
    /// value does not decay while no new simulations arrive.
    pub simulation_frequency: f64,
    pub average_invested: f64,
    pub average_period_months: f64,
    /// Distinct modalities over record count, as a percentage capped at 100.
    pub diversification: f64,
    /// 100 minus the coefficient of variation of inter-record gaps, floored
    /// at 0. Fewer than three records give fewer than two gaps, which is
    /// not enough to judge regularity, so they score 0.
    pub consistency: f64,
    /// Linear rescaling of the mean interest rate, clamped to [0, 100].
    pub risk_tolerance: f64,
    pub trends: ProfileTrends,
    pub recommendations: Vec<String>,
}

/// Risk category buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Conservative,
    Moderate,
    Aggressive,
}

/// Boolean trend flags derived from the trend detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileTrends {
    pub rising_contributions: bool,
    pub extending_periods: bool,
    pub diversifying: bool,
    pub chasing_yield: bool,
}

impl BehavioralProfile {
    /// Profile for an empty history: all-zero characteristics, the moderate
    /// category and a single bootstrap recommendation.
    fn bootstrap() -> Self {
        Self {
            risk_category: RiskCategory::Moderate,
            simulation_frequency: 0.0,
            average_invested: 0.0,
            average_period_months: 0.0,
            diversification: 0.0,
            consistency: 0.0,
            risk_tolerance: 0.0,
            trends: ProfileTrends::default(),
            recommendations: vec![
                "Run your first simulation to start building a behavioral profile".to_string(),
            ],
        }
    }
}

/// Build a behavioral profile from the chronological history.
///
/// Total over its input: an empty history yields the bootstrap profile,
/// never an error.
pub fn analyze_behavior(history: &[HistoryRecord], config: &AnalyticsConfig) -> BehavioralProfile {
    if history.is_empty() {
        return BehavioralProfile::bootstrap();
    }

    let count = history.len();
    let earliest = history.iter().map(|r| r.created_at).min().unwrap();
    let latest = history.iter().map(|r| r.created_at).max().unwrap();

    // Anchoring the window on the latest record keeps the profile a pure
    // function of the history.
    let span_days = (latest - earliest).num_days().max(1) as f64;
    let simulation_frequency = count as f64 / span_days * 30.0;

    let average_invested = stats::mean(
        &history
            .iter()
            .map(|r| r.input.initial_value)
            .collect::<Vec<_>>(),
    );
    let average_period_months = stats::mean(
        &history
            .iter()
            .map(|r| r.input.period_months as f64)
            .collect::<Vec<_>>(),
    );

    let diversification = diversification_score(history);
    let consistency = consistency_score(history);

    let mean_rate = stats::mean(
        &history
            .iter()
            .map(|r| r.input.annual_rate_pct)
            .collect::<Vec<_>>(),
    );
    let risk_tolerance = (mean_rate * config.risk_tolerance_per_rate_pct).clamp(0.0, 100.0);

    let risk_category = if risk_tolerance < 30.0 && average_period_months > 36.0 {
        RiskCategory::Conservative
    } else if risk_tolerance > 70.0 && diversification > 60.0 {
        RiskCategory::Aggressive
    } else {
        RiskCategory::Moderate
    };

    let trends = detect_profile_trends(history, config);
    let recommendations = profile_recommendations(risk_category, &trends, diversification);

    BehavioralProfile {
        risk_category,
        simulation_frequency,
        average_invested,
        average_period_months,
        diversification,
        consistency,
        risk_tolerance,
        trends,
        recommendations,
    }
}

/// Distinct modalities over record count, as a percentage capped at 100.
/// Records without a modality bucket under a single default.
pub(crate) fn diversification_score(history: &[HistoryRecord]) -> f64 {
    if history.is_empty() {
        return 0.0;
    }

    let distinct: std::collections::HashSet<&str> = history
        .iter()
        .map(|r| r.modality.as_deref().unwrap_or("padrao"))
        .collect();

    (distinct.len() as f64 / history.len() as f64 * 100.0).min(100.0)
}

/// 100 minus the coefficient of variation (percent) of the gaps between
/// consecutive records, floored at 0. Needs at least two gaps.
pub(crate) fn consistency_score(history: &[HistoryRecord]) -> f64 {
    if history.len() < 3 {
        return 0.0;
    }

    let mut timestamps: Vec<_> = history.iter().map(|r| r.created_at).collect();
    timestamps.sort();

    let gaps: Vec<f64> = timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds() as f64 / 3600.0)
        .collect();

    (100.0 - stats::coefficient_of_variation(&gaps) * 100.0).max(0.0)
}

fn detect_profile_trends(history: &[HistoryRecord], config: &AnalyticsConfig) -> ProfileTrends {
    let rising_contributions = field_trend(
        &history
            .iter()
            .map(|r| r.input.monthly_contribution)
            .collect::<Vec<_>>(),
        TrendDirection::Increasing,
        config,
    );
    let extending_periods = field_trend(
        &history
            .iter()
            .map(|r| r.input.period_months as f64)
            .collect::<Vec<_>>(),
        TrendDirection::Increasing,
        config,
    );
    let chasing_yield = field_trend(
        &history
            .iter()
            .map(|r| r.input.annual_rate_pct)
            .collect::<Vec<_>>(),
        TrendDirection::Increasing,
        config,
    );

    // Running count of distinct modalities per record index.
    let mut seen = std::collections::HashSet::new();
    let running_distinct: Vec<f64> = history
        .iter()
        .map(|r| {
            seen.insert(r.modality.as_deref().unwrap_or("padrao"));
            seen.len() as f64
        })
        .collect();
    let diversifying = field_trend(&running_distinct, TrendDirection::Increasing, config);

    ProfileTrends {
        rising_contributions,
        extending_periods,
        diversifying,
        chasing_yield,
    }
}

fn field_trend(values: &[f64], wanted: TrendDirection, config: &AnalyticsConfig) -> bool {
    match trend_signal(values, config) {
        Some(signal) => {
            signal.direction == wanted
                && signal.magnitude_pct.abs() > config.trend_significance_pct
                && signal.confidence >= config.profile_trend_confidence
        }
        None => false,
    }
}

fn profile_recommendations(
    category: RiskCategory,
    trends: &ProfileTrends,
    diversification: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    match category {
        RiskCategory::Conservative => recommendations.push(
            "Your long periods and low rates favor safety; a small higher-yield slice could lift returns without much added risk".to_string(),
        ),
        RiskCategory::Moderate => recommendations.push(
            "Your balanced profile leaves room to tune either safety or yield as your goals firm up".to_string(),
        ),
        RiskCategory::Aggressive => recommendations.push(
            "High rates across varied modalities add up; keep an emergency reserve outside these positions".to_string(),
        ),
    }

    if trends.chasing_yield {
        recommendations.push(
            "Your simulated rates keep climbing; double-check that the underlying products really pay them".to_string(),
        );
    }
    if diversification < 30.0 {
        recommendations
            .push("Most simulations use the same modality; comparing alternatives may pay off".to_string());
    }

    recommendations
}
