//! Analytics over the simulation history
//!
//! This module turns the stored simulation history into insight: detected
//! patterns, a behavioral profile, templated suggestions, performance
//! metrics, threshold alerts and a combined dashboard snapshot.
//!
//! All generators are pure functions over a slice of [`HistoryRecord`]s plus
//! an [`AnalyticsConfig`]; the [`AnalyticsEngine`] wraps them with a shared
//! [`HistoryStore`] handle for async callers.
//!
//! # Example
//!
//! ```no_run
//! use invest_insights::analytics::{generate_dashboard, AnalyticsConfig};
//!
//! let dashboard = generate_dashboard(&[], &AnalyticsConfig::default());
//! assert_eq!(dashboard.summary.record_count, 0);
//! ```

pub mod metrics;
pub mod patterns;
pub mod profile;
pub mod stats;
pub mod suggestions;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::history::{HistoryRecord, HistoryStore};

pub use metrics::{
    generate_alerts, generate_metrics, Alert, AlertKind, AlertUrgency, Metric, MetricCategory,
    MetricTrend,
};
pub use patterns::{analyze_patterns, Pattern, PatternField, PatternKind, TrendDirection};
pub use profile::{analyze_behavior, BehavioralProfile, ProfileTrends, RiskCategory};
pub use suggestions::{
    generate_suggestions, ImpactLevel, Suggestion, SuggestionCategory, SuggestionKind,
};

/// Tunable thresholds for every analytics generator.
///
/// Defaults reproduce the documented behavior; override individual fields to
/// tighten or loosen a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Minimum records before trend detection runs.
    pub min_trend_samples: usize,
    /// Minimum absolute percent change for a trend to be reported.
    pub trend_significance_pct: f64,
    /// Minimum records before seasonality detection runs.
    pub min_seasonal_samples: usize,
    /// Coefficient of variation (in percent) across monthly means above
    /// which a seasonal pattern is reported.
    pub seasonal_cv_threshold_pct: f64,
    /// Minimum records before correlation detection runs.
    pub min_correlation_samples: usize,
    /// Absolute Pearson coefficient above which a correlation is reported.
    pub correlation_threshold: f64,
    /// Minimum records before outlier detection runs.
    pub min_outlier_samples: usize,
    /// Z-score beyond which a value counts as an outlier.
    pub outlier_sigma: f64,
    /// Risk tolerance points granted per percent of average annual rate.
    pub risk_tolerance_per_rate_pct: f64,
    /// Minimum trend confidence for a profile trend flag to be set.
    pub profile_trend_confidence: f64,
    /// Minimum pattern confidence for a suggestion or alert to be derived
    /// from it.
    pub suggestion_confidence_threshold: f64,
    /// Hard cap on the suggestion list length.
    pub max_suggestions: usize,
    /// Average initial value below which the ticket-size suggestion fires.
    pub low_investment_threshold: f64,
    /// Monthly contribution below which the low-contribution alert fires.
    pub low_contribution_threshold: f64,
    /// Multiplier applied to a low contribution to propose a new one.
    pub contribution_increase_factor: f64,
    /// Ceiling on the proposed contribution.
    pub contribution_suggestion_cap: f64,
    /// Annual return benchmark in percent.
    pub benchmark_return_pct: f64,
    /// Consistency score benchmark.
    pub consistency_benchmark: f64,
    /// Diversification score benchmark.
    pub diversification_benchmark: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            min_trend_samples: 3,
            trend_significance_pct: 5.0,
            min_seasonal_samples: 12,
            seasonal_cv_threshold_pct: 20.0,
            min_correlation_samples: 5,
            correlation_threshold: 0.7,
            min_outlier_samples: 10,
            outlier_sigma: 2.0,
            risk_tolerance_per_rate_pct: 5.0,
            profile_trend_confidence: 50.0,
            suggestion_confidence_threshold: 70.0,
            max_suggestions: 10,
            low_investment_threshold: 10_000.0,
            low_contribution_threshold: 1000.0,
            contribution_increase_factor: 1.5,
            contribution_suggestion_cap: 2000.0,
            benchmark_return_pct: 12.0,
            consistency_benchmark: 70.0,
            diversification_benchmark: 50.0,
        }
    }
}

/// Everything the dashboard shows, produced in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub patterns: Vec<Pattern>,
    pub suggestions: Vec<Suggestion>,
    pub metrics: Vec<Metric>,
    pub alerts: Vec<Alert>,
    pub profile: BehavioralProfile,
    pub summary: DashboardSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Weighted health score in [0, 100].
    pub overall_score: u8,
    pub record_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Run every generator over the history and combine the results.
///
/// Patterns are detected once and shared between the suggestion and alert
/// generators, so the snapshot is internally consistent.
pub fn generate_dashboard(history: &[HistoryRecord], config: &AnalyticsConfig) -> DashboardSnapshot {
    let patterns = analyze_patterns(history, config);
    let profile = analyze_behavior(history, config);
    let suggestions = generate_suggestions(history, &patterns, config);
    let metrics = generate_metrics(history, config);
    let alerts = generate_alerts(history, &patterns, config);

    let summary = DashboardSummary {
        overall_score: overall_score(history, &profile, config),
        record_count: history.len(),
        generated_at: Utc::now(),
    };

    DashboardSnapshot {
        patterns,
        suggestions,
        metrics,
        alerts,
        profile,
        summary,
    }
}

/// Weighted blend of return (40%), consistency (30%) and diversification
/// (30%), each on a 0-100 scale.
fn overall_score(history: &[HistoryRecord], profile: &BehavioralProfile, config: &AnalyticsConfig) -> u8 {
    if history.is_empty() {
        return 0;
    }

    let average_return = stats::mean(
        &history
            .iter()
            .map(|r| r.realized_return_pct())
            .collect::<Vec<_>>(),
    );
    // 50 points at the benchmark, 100 at double the benchmark.
    let scaled_return = (average_return / config.benchmark_return_pct * 50.0).clamp(0.0, 100.0);

    let score = 0.4 * scaled_return + 0.3 * profile.consistency + 0.3 * profile.diversification;
    score.round().clamp(0.0, 100.0) as u8
}

/// Async facade over the generators, bound to a shared history store.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct AnalyticsEngine {
    store: Arc<RwLock<HistoryStore>>,
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    /// Create an engine over an existing store with default thresholds.
    pub fn new(store: Arc<RwLock<HistoryStore>>) -> Self {
        Self::with_config(store, AnalyticsConfig::default())
    }

    /// Create an engine with custom thresholds.
    pub fn with_config(store: Arc<RwLock<HistoryStore>>, config: AnalyticsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    async fn history(&self) -> Vec<HistoryRecord> {
        self.store.read().await.chronological()
    }

    pub async fn analyze_patterns(&self) -> Vec<Pattern> {
        let history = self.history().await;
        debug!("analyzing patterns over {} records", history.len());
        analyze_patterns(&history, &self.config)
    }

    pub async fn analyze_behavior(&self) -> BehavioralProfile {
        let history = self.history().await;
        debug!("profiling behavior over {} records", history.len());
        analyze_behavior(&history, &self.config)
    }

    pub async fn generate_suggestions(&self) -> Vec<Suggestion> {
        let history = self.history().await;
        let patterns = analyze_patterns(&history, &self.config);
        generate_suggestions(&history, &patterns, &self.config)
    }

    pub async fn generate_metrics(&self) -> Vec<Metric> {
        let history = self.history().await;
        generate_metrics(&history, &self.config)
    }

    pub async fn generate_alerts(&self) -> Vec<Alert> {
        let history = self.history().await;
        let patterns = analyze_patterns(&history, &self.config);
        generate_alerts(&history, &patterns, &self.config)
    }

    pub async fn generate_dashboard(&self) -> DashboardSnapshot {
        let history = self.history().await;
        debug!("building dashboard over {} records", history.len());
        generate_dashboard(&history, &self.config)
    }
}

#[cfg(test)]
mod mod_test;
