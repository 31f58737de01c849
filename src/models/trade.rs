use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};
use crate::models::new_entity_id;

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeKind {
    #[default]
    Long,
    Short,
}

impl TradeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeKind::Long => "long",
            TradeKind::Short => "short",
        }
    }

    /// Tolerant parse used by the CSV importer: anything that is not
    /// recognizably "short" counts as a long.
    pub fn parse_lenient(s: &str) -> TradeKind {
        if s.trim().eq_ignore_ascii_case("short") {
            TradeKind::Short
        } else {
            TradeKind::Long
        }
    }
}

/// Self-rated confidence tier for a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Conviction {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
}

impl Conviction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conviction::None => "",
            Conviction::APlus => "A+",
            Conviction::A => "A",
            Conviction::B => "B",
        }
    }

    /// Unrecognized tiers fall back to unrated.
    pub fn parse_lenient(s: &str) -> Conviction {
        match s.trim() {
            "A+" => Conviction::APlus,
            "A" => Conviction::A,
            "B" => Conviction::B,
            _ => Conviction::None,
        }
    }
}

/// Chart capture attached to a trade or a plan; `data` carries the embedded
/// image (data-URL) as produced by the form upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub data: String,
}

/// One closed or open position.
///
/// `pnl` and `pnl_percent` are derived: they are recomputed from
/// prices/quantity/kind at every write and never trusted from outside
/// (including a CSV's own P/L columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: TradeKind,
    pub entry_price: f64,
    /// Absent while the position is still open.
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub pnl: f64,
    /// Formatted to 2 decimals for display; "0.00" when undefined.
    pub pnl_percent: String,
    /// Normalized `YYYY-MM-DD` when parseable; the tolerant importer passes
    /// unrecognized date strings through unchanged, so these stay strings.
    pub entry_date: Option<String>,
    pub exit_date: Option<String>,
    /// Soft reference to a strategy by name. Deleting the strategy leaves
    /// this string in place.
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub conviction: Conviction,
    #[serde(default)]
    pub mistakes: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
    pub created_at: DateTime<Utc>,
}

/// Editable fields of a trade, supplied by the form or the importer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeInput {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: TradeKind,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub entry_date: Option<String>,
    pub exit_date: Option<String>,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub conviction: Conviction,
    #[serde(default)]
    pub mistakes: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
}

impl TradeInput {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(JournalError::InvalidInput("symbol is required".into()));
        }
        if !self.entry_price.is_finite() || self.entry_price < 0.0 {
            return Err(JournalError::InvalidInput("entry price must be a non-negative number".into()));
        }
        if let Some(exit) = self.exit_price {
            if !exit.is_finite() || exit < 0.0 {
                return Err(JournalError::InvalidInput("exit price must be a non-negative number".into()));
            }
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(JournalError::InvalidInput("quantity must be a non-negative number".into()));
        }
        Ok(())
    }
}

impl TradeRecord {
    /// Build a new record with a fresh id and derived P/L.
    pub fn create(input: TradeInput, now: DateTime<Utc>) -> TradeRecord {
        let mut trade = TradeRecord {
            id: new_entity_id("TRADE", now),
            symbol: input.symbol.trim().to_string(),
            kind: input.kind,
            entry_price: input.entry_price,
            exit_price: input.exit_price,
            quantity: input.quantity,
            pnl: 0.0,
            pnl_percent: "0.00".to_string(),
            entry_date: input.entry_date,
            exit_date: input.exit_date,
            strategy: input.strategy.trim().to_string(),
            tags: input.tags,
            conviction: input.conviction,
            mistakes: input.mistakes,
            notes: input.notes,
            urls: input.urls,
            screenshots: input.screenshots,
            created_at: now,
        };
        trade.recompute_pnl();
        trade
    }

    /// Re-derive `pnl`/`pnl_percent` from the economic fields. Open
    /// positions (no exit price) carry zero P/L.
    pub fn recompute_pnl(&mut self) {
        self.pnl = match self.exit_price {
            Some(exit) => compute_pnl(self.kind, self.entry_price, exit, self.quantity),
            None => 0.0,
        };
        self.pnl_percent = compute_pnl_percent(self.pnl, self.entry_price, self.quantity);
    }

    /// The date a trade is attributed to for ordering and bucketing:
    /// exit date, falling back to entry date, falling back to the creation
    /// timestamp's calendar date.
    pub fn effective_date(&self) -> String {
        self.exit_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.entry_date.as_deref().filter(|d| !d.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| self.created_at.format("%Y-%m-%d").to_string())
    }
}

/// Signed P/L in currency units for a single position.
pub fn compute_pnl(kind: TradeKind, entry_price: f64, exit_price: f64, quantity: f64) -> f64 {
    match kind {
        TradeKind::Long => (exit_price - entry_price) * quantity,
        TradeKind::Short => (entry_price - exit_price) * quantity,
    }
}

/// P/L as a percentage of position cost, formatted to 2 decimals.
/// A zero-cost position yields "0.00" rather than NaN.
pub fn compute_pnl_percent(pnl: f64, entry_price: f64, quantity: f64) -> String {
    let cost = entry_price * quantity;
    if cost == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", pnl / cost * 100.0)
}
