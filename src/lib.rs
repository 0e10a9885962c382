//! # invest-insights
//!
//! Analytics for compound-interest simulation history: pattern detection,
//! behavioral profiling, rule-based suggestions, performance metrics,
//! threshold alerts and a combined dashboard snapshot.
//!
//! The crate is built around three layers:
//!
//! - [`simulation`] runs compound-interest projections
//! - [`history`] persists simulation runs to a JSON file and searches them
//! - [`analytics`] derives insight from the stored history
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::sync::RwLock;
//! use invest_insights::analytics::AnalyticsEngine;
//! use invest_insights::history::{HistoryRecord, HistoryStore};
//! use invest_insights::simulation::{simulate, SimulationInput};
//!
//! # async fn run() -> invest_insights::Result<()> {
//! let mut store = HistoryStore::new("history.json".into())?;
//!
//! let input = SimulationInput {
//!     initial_value: 10_000.0,
//!     monthly_contribution: 500.0,
//!     annual_rate_pct: 12.0,
//!     period_months: 24,
//! };
//! let result = simulate(&input)?;
//! store.store_record(HistoryRecord::new(input, result)).await?;
//!
//! let engine = AnalyticsEngine::new(Arc::new(RwLock::new(store)));
//! let dashboard = engine.generate_dashboard().await;
//! println!("overall score: {}", dashboard.summary.overall_score);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod error;
pub mod history;
pub mod simulation;

pub use analytics::{AnalyticsConfig, AnalyticsEngine, DashboardSnapshot};
pub use error::{InsightsError, Result};
pub use history::{HistoryRecord, HistorySearch, HistoryStats, HistoryStore};
pub use simulation::{simulate, SimulationInput, SimulationResult};

/// Crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
