//! Rule-based suggestion generation
//!
//! Suggestions are templated, not learned: the profile category maps to one
//! fixed suggestion, every sufficiently confident pattern yields one, and a
//! generic ticket-size suggestion fires for small average investments. Order
//! is construction order (profile first, then patterns, then generic) and
//! the list is truncated to a configured maximum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patterns::{Pattern, PatternKind, TrendDirection};
use super::profile::{analyze_behavior, RiskCategory};
use super::{stats, AnalyticsConfig};
use crate::history::HistoryRecord;

/// A templated, rule-triggered recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub impact: ImpactLevel,
    /// Lower number means higher priority.
    pub priority: u8,
    pub category: SuggestionCategory,
    pub actions: Vec<String>,
    /// Ids of the patterns this suggestion was derived from, if any.
    pub source_patterns: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// UI-owned flags; toggling them is external to the analytics pipeline.
    pub viewed: bool,
    pub applied: bool,
}

impl Suggestion {
    /// Mark the suggestion as viewed
    pub fn mark_viewed(mut self) -> Self {
        self.viewed = true;
        self
    }

    /// Mark the suggestion as applied
    pub fn mark_applied(mut self) -> Self {
        self.applied = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Diversification,
    Contribution,
    RiskAdjustment,
    PatternInsight,
    Optimization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Profile,
    Pattern,
    Optimization,
}

/// Generate suggestions from the history and previously detected patterns.
///
/// Pure apart from generated ids and creation timestamps; no side effects.
pub fn generate_suggestions(
    history: &[HistoryRecord],
    patterns: &[Pattern],
    config: &AnalyticsConfig,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    let profile = analyze_behavior(history, config);
    suggestions.push(profile_suggestion(profile.risk_category));

    for pattern in patterns {
        if pattern.confidence > config.suggestion_confidence_threshold {
            suggestions.push(pattern_suggestion(pattern));
        }
    }

    if !history.is_empty() {
        let average_invested = stats::mean(
            &history
                .iter()
                .map(|r| r.input.initial_value)
                .collect::<Vec<_>>(),
        );
        if average_invested < config.low_investment_threshold {
            suggestions.push(ticket_size_suggestion(average_invested));
        }
    }

    suggestions.truncate(config.max_suggestions);
    suggestions
}

fn profile_suggestion(category: RiskCategory) -> Suggestion {
    let (kind, title, description, actions) = match category {
        RiskCategory::Conservative => (
            SuggestionKind::Diversification,
            "Add a higher-yield slice".to_string(),
            "Your profile favors long, low-rate positions. Moving a small share into a higher-yield modality can improve returns with limited extra risk.".to_string(),
            vec![
                "Simulate 10-20% of your usual amount at a higher rate".to_string(),
                "Compare the combined result with your current allocation".to_string(),
            ],
        ),
        RiskCategory::Moderate => (
            SuggestionKind::Optimization,
            "Tune your allocation to a goal".to_string(),
            "Your balanced profile works for general saving. Anchoring simulations to a concrete goal makes it easier to pick between safety and yield.".to_string(),
            vec![
                "Set a target amount and date".to_string(),
                "Re-run your usual simulation against that target".to_string(),
            ],
        ),
        RiskCategory::Aggressive => (
            SuggestionKind::RiskAdjustment,
            "Protect the downside".to_string(),
            "High rates across varied modalities compound well, but leave little margin for surprises. A reserve in a liquid, safe modality balances the book.".to_string(),
            vec![
                "Keep 3-6 months of expenses in a liquid position".to_string(),
                "Simulate a pessimistic rate to see the spread".to_string(),
            ],
        ),
    };

    Suggestion {
        id: Uuid::new_v4().to_string(),
        kind,
        title,
        description,
        impact: ImpactLevel::Medium,
        priority: 1,
        category: SuggestionCategory::Profile,
        actions,
        source_patterns: Vec::new(),
        created_at: Utc::now(),
        viewed: false,
        applied: false,
    }
}

fn pattern_suggestion(pattern: &Pattern) -> Suggestion {
    let (title, action) = match pattern.kind {
        PatternKind::Trend => match pattern.direction {
            TrendDirection::Decreasing => (
                "Reverse a declining habit".to_string(),
                "Check what changed and whether the decline is intentional".to_string(),
            ),
            _ => (
                "Build on a growing habit".to_string(),
                "Keep the pace and consider automating the increase".to_string(),
            ),
        },
        PatternKind::Seasonal => (
            "Smooth out seasonal swings".to_string(),
            "Spread larger contributions across the year".to_string(),
        ),
        PatternKind::Correlation => (
            "Use the period-return link".to_string(),
            "Prefer longer periods where liquidity allows".to_string(),
        ),
        PatternKind::Outlier => (
            "Review unusual simulations".to_string(),
            "Confirm outlier values were intentional, not typos".to_string(),
        ),
    };

    Suggestion {
        id: Uuid::new_v4().to_string(),
        kind: SuggestionKind::PatternInsight,
        title,
        description: pattern.description.clone(),
        impact: if pattern.confidence > 85.0 {
            ImpactLevel::High
        } else {
            ImpactLevel::Medium
        },
        priority: 2,
        category: SuggestionCategory::Pattern,
        actions: vec![action],
        source_patterns: vec![pattern.id.clone()],
        created_at: Utc::now(),
        viewed: false,
        applied: false,
    }
}

fn ticket_size_suggestion(average_invested: f64) -> Suggestion {
    Suggestion {
        id: Uuid::new_v4().to_string(),
        kind: SuggestionKind::Contribution,
        title: "Increase your ticket size".to_string(),
        description: format!(
            "Your average simulated investment is {:.0}. Larger initial values compound noticeably faster over the same period.",
            average_invested
        ),
        impact: ImpactLevel::Medium,
        priority: 3,
        category: SuggestionCategory::Optimization,
        actions: vec!["Simulate the same plan with a 25% larger initial value".to_string()],
        source_patterns: Vec::new(),
        created_at: Utc::now(),
        viewed: false,
        applied: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::patterns::{analyze_patterns, PatternField};
    use crate::analytics::test_support::record;
    use chrono::Utc;

    fn test_pattern(confidence: f64) -> Pattern {
        Pattern {
            id: Uuid::new_v4().to_string(),
            kind: PatternKind::Trend,
            field: PatternField::InitialValue,
            direction: TrendDirection::Increasing,
            magnitude: 25.0,
            description: "test pattern".to_string(),
            sample_count: 5,
            last_occurrence: Utc::now(),
            confidence,
        }
    }

    #[test]
    fn test_profile_suggestion_comes_first() {
        let config = AnalyticsConfig::default();
        let history: Vec<_> = (0..3).map(|_| record(50_000.0, 500.0, 10.0, 12)).collect();

        let suggestions = generate_suggestions(&history, &[test_pattern(90.0)], &config);
        assert_eq!(suggestions[0].category, SuggestionCategory::Profile);
        assert_eq!(suggestions[1].category, SuggestionCategory::Pattern);
    }

    #[test]
    fn test_low_confidence_patterns_are_skipped() {
        let config = AnalyticsConfig::default();
        let history: Vec<_> = (0..3).map(|_| record(50_000.0, 500.0, 10.0, 12)).collect();

        let suggestions =
            generate_suggestions(&history, &[test_pattern(50.0), test_pattern(70.0)], &config);
        assert!(suggestions
            .iter()
            .all(|s| s.category != SuggestionCategory::Pattern));
    }

    #[test]
    fn test_ticket_size_fires_below_threshold() {
        let config = AnalyticsConfig::default();
        let small: Vec<_> = (0..3).map(|_| record(2000.0, 100.0, 10.0, 12)).collect();
        let large: Vec<_> = (0..3).map(|_| record(50_000.0, 100.0, 10.0, 12)).collect();

        let with = generate_suggestions(&small, &[], &config);
        assert!(with
            .iter()
            .any(|s| s.kind == SuggestionKind::Contribution));

        let without = generate_suggestions(&large, &[], &config);
        assert!(!without
            .iter()
            .any(|s| s.kind == SuggestionKind::Contribution));
    }

    #[test]
    fn test_truncated_to_maximum() {
        let config = AnalyticsConfig::default();
        let history: Vec<_> = (0..3).map(|_| record(2000.0, 100.0, 10.0, 12)).collect();
        let patterns: Vec<_> = (0..20).map(|_| test_pattern(95.0)).collect();

        let suggestions = generate_suggestions(&history, &patterns, &config);
        assert_eq!(suggestions.len(), config.max_suggestions);
    }

    #[test]
    fn test_pattern_suggestion_links_source() {
        let config = AnalyticsConfig::default();
        let pattern = test_pattern(90.0);
        let pattern_id = pattern.id.clone();
        let history: Vec<_> = (0..3).map(|_| record(50_000.0, 500.0, 10.0, 12)).collect();

        let suggestions = generate_suggestions(&history, &[pattern], &config);
        let linked = suggestions
            .iter()
            .find(|s| s.category == SuggestionCategory::Pattern)
            .unwrap();
        assert_eq!(linked.source_patterns, vec![pattern_id]);
    }

    #[test]
    fn test_empty_history_still_yields_profile_suggestion() {
        let config = AnalyticsConfig::default();
        let suggestions = generate_suggestions(&[], &[], &config);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category, SuggestionCategory::Profile);
    }

    #[test]
    fn test_flag_builders() {
        let config = AnalyticsConfig::default();
        let suggestion = generate_suggestions(&[], &[], &config)
            .remove(0)
            .mark_viewed()
            .mark_applied();
        assert!(suggestion.viewed);
        assert!(suggestion.applied);
    }

    #[test]
    fn test_end_to_end_with_detected_patterns() {
        let config = AnalyticsConfig::default();
        let history: Vec<_> = vec![
            record(1000.0, 100.0, 10.0, 12),
            record(1500.0, 100.0, 10.0, 12),
            record(2100.0, 100.0, 10.0, 12),
            record(2800.0, 100.0, 10.0, 12),
        ];

        let patterns = analyze_patterns(&history, &config);
        let suggestions = generate_suggestions(&history, &patterns, &config);

        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= config.max_suggestions);
    }
}
