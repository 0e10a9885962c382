//! Simulation history storage and search
//!
//! This module handles:
//! - Storing past simulations (inputs plus computed results)
//! - Searching and filtering historical data
//! - Aggregate statistics over the stored records
//! - History export functionality
//!
//! Records are append-only: once stored they are never mutated, which is
//! what lets the analytics pipeline treat the history as an immutable input.


use crate::error::{InsightsError, Result};
use crate::simulation::{SimulationInput, SimulationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// One stored past simulation.
///
/// Serializes with the original calculator's flat JSON keys
/// (`valorInicial`, `valorFinal`, ...) so histories exported from the
/// browser application load without conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub input: SimulationInput,
    #[serde(flatten)]
    pub result: SimulationResult,
    /// Investment modality identifier (e.g. "cdb", "tesouro", "poupanca").
    #[serde(rename = "tipoInvestimento", default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
}

impl HistoryRecord {
    /// Create a new history record from a simulation run
    pub fn new(input: SimulationInput, result: SimulationResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            input,
            result,
            modality: None,
        }
    }

    /// Tag the record with an investment modality
    pub fn with_modality<S: Into<String>>(mut self, modality: S) -> Self {
        self.modality = Some(modality.into());
        self
    }

    /// Override the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Realized return of this simulation, in percent of the contributed
    /// amount. Zero when nothing was contributed.
    pub fn realized_return_pct(&self) -> f64 {
        if self.result.total_contributed > 0.0 {
            self.result.total_interest / self.result.total_contributed * 100.0
        } else {
            0.0
        }
    }
}

/// Search criteria for history queries
#[derive(Debug, Clone)]
pub struct HistorySearch {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub min_initial_value: Option<f64>,
    pub max_initial_value: Option<f64>,
    pub modality: Option<String>,
    pub limit: usize,
    pub offset: usize,
    /// Most recent first when set; chronological otherwise.
    pub sort_desc: bool,
}

impl Default for HistorySearch {
    fn default() -> Self {
        Self {
            since: None,
            until: None,
            min_initial_value: None,
            max_initial_value: None,
            modality: None,
            limit: 100,
            offset: 0,
            sort_desc: false,
        }
    }
}

/// Aggregate statistics over stored records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_records: usize,
    pub total_contributed: f64,
    pub total_interest: f64,
    pub average_invested: f64,
    pub average_period_months: f64,
    pub average_rate_pct: f64,
    pub modality_counts: HashMap<String, usize>,
    pub date_range: (DateTime<Utc>, DateTime<Utc>),
}

/// History export format
#[derive(Debug, Clone)]
pub enum ExportFormat {
    Json,
    Csv,
}

/// History store service with persistent JSON storage
pub struct HistoryStore {
    storage_path: PathBuf,
    records: Vec<HistoryRecord>,
    index: HashMap<String, usize>, // ID -> index mapping for fast lookups
}

impl HistoryStore {
    /// Create a new history store with the specified storage path
    pub fn new(storage_path: PathBuf) -> Result<Self> {
        let mut store = Self {
            storage_path,
            records: Vec::new(),
            index: HashMap::new(),
        };

        // Load existing records if storage file exists
        store.load_records()?;
        Ok(store)
    }

    /// Store a history record
    pub async fn store_record(&mut self, record: HistoryRecord) -> Result<()> {
        let id = record.id.clone();
        let index = self.records.len();

        self.records.push(record);
        self.index.insert(id, index);

        self.save_records().await?;
        Ok(())
    }

    /// Get a specific record by ID
    pub fn get_record(&self, id: &str) -> Option<&HistoryRecord> {
        self.index.get(id).and_then(|&index| self.records.get(index))
    }

    /// All records in chronological order (oldest first), the ordering the
    /// analytics pipeline expects.
    pub fn chronological(&self) -> Vec<HistoryRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        records
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Search history records
    pub fn search(&self, criteria: &HistorySearch) -> Vec<HistoryRecord> {
        let mut results: Vec<_> = self
            .records
            .iter()
            .filter(|r| Self::matches_criteria(r, criteria))
            .cloned()
            .collect();

        results.sort_by(|a, b| {
            if criteria.sort_desc {
                b.created_at.cmp(&a.created_at)
            } else {
                a.created_at.cmp(&b.created_at)
            }
        });

        results
            .into_iter()
            .skip(criteria.offset)
            .take(criteria.limit)
            .collect()
    }

    /// Get aggregate statistics, optionally over a filtered subset
    pub fn get_stats(&self, filter: Option<&HistorySearch>) -> HistoryStats {
        let records: Vec<_> = if let Some(criteria) = filter {
            self.records
                .iter()
                .filter(|r| Self::matches_criteria(r, criteria))
                .collect()
        } else {
            self.records.iter().collect()
        };

        if records.is_empty() {
            let now = Utc::now();
            return HistoryStats {
                total_records: 0,
                total_contributed: 0.0,
                total_interest: 0.0,
                average_invested: 0.0,
                average_period_months: 0.0,
                average_rate_pct: 0.0,
                modality_counts: HashMap::new(),
                date_range: (now, now),
            };
        }

        let total_records = records.len();
        let total_contributed: f64 = records.iter().map(|r| r.result.total_contributed).sum();
        let total_interest: f64 = records.iter().map(|r| r.result.total_interest).sum();
        let average_invested =
            records.iter().map(|r| r.input.initial_value).sum::<f64>() / total_records as f64;
        let average_period_months = records
            .iter()
            .map(|r| r.input.period_months as f64)
            .sum::<f64>()
            / total_records as f64;
        let average_rate_pct =
            records.iter().map(|r| r.input.annual_rate_pct).sum::<f64>() / total_records as f64;

        let mut modality_counts: HashMap<String, usize> = HashMap::new();
        for record in &records {
            if let Some(modality) = &record.modality {
                *modality_counts.entry(modality.clone()).or_insert(0) += 1;
            }
        }

        let min_date = records.iter().map(|r| r.created_at).min().unwrap();
        let max_date = records.iter().map(|r| r.created_at).max().unwrap();

        HistoryStats {
            total_records,
            total_contributed,
            total_interest,
            average_invested,
            average_period_months,
            average_rate_pct,
            modality_counts,
            date_range: (min_date, max_date),
        }
    }

    /// Export history data in the specified format
    pub async fn export(
        &self,
        path: &PathBuf,
        format: ExportFormat,
        filter: Option<&HistorySearch>,
    ) -> Result<()> {
        let records = if let Some(criteria) = filter {
            self.search(criteria)
        } else {
            self.chronological()
        };

        match format {
            ExportFormat::Json => {
                let content = serde_json::to_string_pretty(&records)?;
                tokio::fs::write(path, content).await?;
            }
            ExportFormat::Csv => {
                let mut content = String::from(
                    "id,created_at,initial_value,monthly_contribution,annual_rate_pct,period_months,final_balance,total_contributed,total_interest,modality\n",
                );
                for r in &records {
                    content.push_str(&format!(
                        "{},{},{},{},{},{},{},{},{},{}\n",
                        r.id,
                        r.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        r.input.initial_value,
                        r.input.monthly_contribution,
                        r.input.annual_rate_pct,
                        r.input.period_months,
                        r.result.final_balance,
                        r.result.total_contributed,
                        r.result.total_interest,
                        r.modality.as_deref().unwrap_or(""),
                    ));
                }
                tokio::fs::write(path, content).await?;
            }
        }

        Ok(())
    }

    /// Remove a record by ID
    pub async fn remove_record(&mut self, id: &str) -> Result<()> {
        let index = *self
            .index
            .get(id)
            .ok_or_else(|| InsightsError::record_not_found(id))?;

        self.records.remove(index);
        self.rebuild_index();
        self.save_records().await?;
        Ok(())
    }

    /// Clear all history data
    pub async fn clear_all(&mut self) -> Result<()> {
        self.records.clear();
        self.index.clear();
        self.save_records().await?;
        Ok(())
    }

    // Private helper methods

    fn matches_criteria(record: &HistoryRecord, criteria: &HistorySearch) -> bool {
        if let Some(since) = criteria.since {
            if record.created_at < since {
                return false;
            }
        }
        if let Some(until) = criteria.until {
            if record.created_at > until {
                return false;
            }
        }
        if let Some(min) = criteria.min_initial_value {
            if record.input.initial_value < min {
                return false;
            }
        }
        if let Some(max) = criteria.max_initial_value {
            if record.input.initial_value > max {
                return false;
            }
        }
        if let Some(modality) = &criteria.modality {
            if record.modality.as_deref() != Some(modality.as_str()) {
                return false;
            }
        }
        true
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, record) in self.records.iter().enumerate() {
            self.index.insert(record.id.clone(), i);
        }
    }

    fn load_records(&mut self) -> Result<()> {
        if !self.storage_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.storage_path)?;
        if content.trim().is_empty() {
            return Ok(());
        }

        self.records = serde_json::from_str(&content)?;
        self.rebuild_index();
        tracing::debug!(
            records = self.records.len(),
            path = %self.storage_path.display(),
            "loaded history"
        );
        Ok(())
    }

    async fn save_records(&self) -> Result<()> {
        if let Some(parent) = self.storage_path.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(&self.records)?;
        tokio::fs::write(&self.storage_path, content).await?;
        tracing::debug!(records = self.records.len(), "saved history");
        Ok(())
    }
}
