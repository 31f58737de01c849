use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};
use crate::models::{new_entity_id, Conviction, Screenshot, TradeKind};

/// A draft of a future trade. Carries the same annotation fields as a
/// [`crate::models::TradeRecord`] plus planned price levels, but no P/L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTrade {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: TradeKind,
    pub target_entry: f64,
    pub target_exit: f64,
    pub stop_loss: Option<f64>,
    pub quantity: f64,
    pub planned_date: Option<String>,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub conviction: Conviction,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannedTradeInput {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: TradeKind,
    pub target_entry: f64,
    pub target_exit: f64,
    pub stop_loss: Option<f64>,
    pub quantity: f64,
    pub planned_date: Option<String>,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub conviction: Conviction,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
}

impl PlannedTradeInput {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(JournalError::InvalidInput("symbol is required".into()));
        }
        for (label, value) in [
            ("target entry", self.target_entry),
            ("target exit", self.target_exit),
            ("quantity", self.quantity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(JournalError::InvalidInput(format!(
                    "{} must be a non-negative number",
                    label
                )));
            }
        }
        Ok(())
    }
}

impl PlannedTrade {
    pub fn create(input: PlannedTradeInput, now: DateTime<Utc>) -> PlannedTrade {
        PlannedTrade {
            id: new_entity_id("PLAN", now),
            symbol: input.symbol.trim().to_string(),
            kind: input.kind,
            target_entry: input.target_entry,
            target_exit: input.target_exit,
            stop_loss: input.stop_loss,
            quantity: input.quantity,
            planned_date: input.planned_date,
            strategy: input.strategy.trim().to_string(),
            tags: input.tags,
            conviction: input.conviction,
            notes: input.notes,
            screenshots: input.screenshots,
            created_at: now,
        }
    }
}
