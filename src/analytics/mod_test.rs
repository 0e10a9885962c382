//! Tests for the dashboard aggregator and the analytics engine.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;
use tokio::sync::RwLock;
use tokio_test::assert_ok;

use super::test_support::{record, record_at};
use super::*;

#[test]
fn test_empty_history_dashboard() {
    let config = AnalyticsConfig::default();
    let dashboard = generate_dashboard(&[], &config);

    assert!(dashboard.patterns.is_empty());
    assert!(dashboard.metrics.is_empty());
    assert!(dashboard.alerts.is_empty());
    assert_eq!(dashboard.suggestions.len(), 1);
    assert_eq!(dashboard.summary.overall_score, 0);
    assert_eq!(dashboard.summary.record_count, 0);
}

#[test]
fn test_overall_score_within_bounds() {
    let config = AnalyticsConfig::default();
    let base = Utc::now() - Duration::days(60);

    // Long, high-rate positions over distinct modalities and an even cadence
    // should score well, but never above 100.
    let history: Vec<_> = (0..6)
        .map(|i| {
            record_at(20_000.0, 1500.0, 15.0, 120, base + Duration::days(i * 10))
                .with_modality(format!("modality-{i}"))
        })
        .collect();

    let dashboard = generate_dashboard(&history, &config);
    let score = dashboard.summary.overall_score;
    assert!(score <= 100);
    assert!(score > 50, "score was {score}");
}

#[test]
fn test_dashboard_is_internally_consistent() {
    let config = AnalyticsConfig::default();
    let history: Vec<_> = vec![
        record(1000.0, 100.0, 10.0, 12),
        record(1500.0, 100.0, 10.0, 12),
        record(2100.0, 100.0, 10.0, 12),
        record(2800.0, 100.0, 10.0, 12),
    ];

    let dashboard = generate_dashboard(&history, &config);

    // Pattern-derived suggestions must reference patterns from the same
    // snapshot.
    let pattern_ids: Vec<_> = dashboard.patterns.iter().map(|p| p.id.clone()).collect();
    for suggestion in &dashboard.suggestions {
        for source in &suggestion.source_patterns {
            assert!(pattern_ids.contains(source));
        }
    }
    assert_eq!(dashboard.summary.record_count, history.len());
}

#[test]
fn test_dashboard_values_are_deterministic() {
    let config = AnalyticsConfig::default();
    let base = Utc::now() - Duration::days(30);
    let history: Vec<_> = (0..5)
        .map(|i| record_at(5000.0 + i as f64 * 1000.0, 500.0, 10.0, 24, base + Duration::days(i * 5)))
        .collect();

    let first = generate_dashboard(&history, &config);
    let second = generate_dashboard(&history, &config);

    assert_eq!(first.summary.overall_score, second.summary.overall_score);
    assert_eq!(first.patterns.len(), second.patterns.len());
    assert_eq!(first.suggestions.len(), second.suggestions.len());
    assert_eq!(first.metrics.len(), second.metrics.len());
    assert_eq!(first.alerts.len(), second.alerts.len());
}

#[tokio::test]
async fn test_engine_over_shared_store() {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::new(dir.path().join("history.json")).unwrap();

    for i in 0..4 {
        assert_ok!(
            store
                .store_record(record(5000.0, 500.0 + i as f64 * 100.0, 10.0, 12))
                .await
        );
    }

    let store = Arc::new(RwLock::new(store));
    let engine = AnalyticsEngine::new(store.clone());

    let dashboard = engine.generate_dashboard().await;
    assert_eq!(dashboard.summary.record_count, 4);

    // Records added after construction are picked up on the next call.
    assert_ok!(
        store
            .write()
            .await
            .store_record(record(6000.0, 900.0, 10.0, 12))
            .await
    );
    assert_eq!(engine.generate_dashboard().await.summary.record_count, 5);
}

#[tokio::test]
async fn test_engine_facade_matches_pure_functions() {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::new(dir.path().join("history.json")).unwrap();
    for _ in 0..3 {
        store
            .store_record(record(5000.0, 500.0, 10.0, 12))
            .await
            .unwrap();
    }
    let history = store.chronological();

    let engine = AnalyticsEngine::new(Arc::new(RwLock::new(store)));

    assert_eq!(
        engine.generate_metrics().await.len(),
        generate_metrics(&history, engine.config()).len()
    );
    assert_eq!(
        engine.analyze_behavior().await.risk_category,
        analyze_behavior(&history, engine.config()).risk_category
    );
    assert_eq!(
        engine.generate_suggestions().await.len(),
        generate_suggestions(&history, &[], engine.config()).len()
    );
}

#[test]
fn test_config_round_trips_through_json() {
    let config = AnalyticsConfig {
        max_suggestions: 3,
        outlier_sigma: 2.5,
        ..AnalyticsConfig::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let back: AnalyticsConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
