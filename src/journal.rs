//! Pure collection mutations: each function takes owned collections in and
//! returns the new collections, never touching storage itself. A thin
//! adapter (see [`crate::store`]) owns the load/save calls around these.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::{JournalError, Result};
use crate::models::{
    new_entity_id, PlannedTrade, TradeInput, TradeRecord,
};

/// Add a trade to the front of the collection with a fresh id and derived
/// P/L.
pub fn add_trade(
    mut trades: Vec<TradeRecord>,
    input: TradeInput,
    now: DateTime<Utc>,
) -> Result<Vec<TradeRecord>> {
    input.validate()?;
    trades.insert(0, TradeRecord::create(input, now));
    Ok(trades)
}

/// Wholesale replace of the trade with the same id. Identity and creation
/// timestamp are preserved; P/L is rederived from the edited economics.
pub fn update_trade(mut trades: Vec<TradeRecord>, mut edited: TradeRecord) -> Result<Vec<TradeRecord>> {
    let slot = trades
        .iter_mut()
        .find(|t| t.id == edited.id)
        .ok_or_else(|| JournalError::InvalidInput(format!("no trade with id {}", edited.id)))?;
    edited.created_at = slot.created_at;
    edited.recompute_pnl();
    *slot = edited;
    Ok(trades)
}

pub fn delete_trade(trades: Vec<TradeRecord>, id: &str) -> Vec<TradeRecord> {
    trades.into_iter().filter(|t| t.id != id).collect()
}

/// Merge an imported batch in front of the existing collection. Imported
/// trades whose id collides with an existing one get a fresh id; existing
/// trades are never overwritten by an import.
pub fn merge_imported(
    existing: Vec<TradeRecord>,
    imported: Vec<TradeRecord>,
    now: DateTime<Utc>,
) -> Vec<TradeRecord> {
    let existing_ids: HashSet<&str> = existing.iter().map(|t| t.id.as_str()).collect();

    let mut merged: Vec<TradeRecord> = imported
        .into_iter()
        .map(|mut trade| {
            if existing_ids.contains(trade.id.as_str()) {
                log::warn!("import: id {} already exists, assigning a new one", trade.id);
                trade.id = new_entity_id("TRADE", now);
            }
            trade
        })
        .collect();

    merged.extend(existing);
    merged
}

/// Execute a planned trade: copy its annotation fields into a new trade
/// record using the actual fill, and remove the plan. A move, not a copy —
/// the plan does not survive execution.
pub fn execute_plan(
    plans: Vec<PlannedTrade>,
    trades: Vec<TradeRecord>,
    plan_id: &str,
    fill: PlanFill,
    now: DateTime<Utc>,
) -> Result<(Vec<PlannedTrade>, Vec<TradeRecord>)> {
    let plan = plans
        .iter()
        .find(|p| p.id == plan_id)
        .cloned()
        .ok_or_else(|| JournalError::InvalidInput(format!("no planned trade with id {}", plan_id)))?;

    let input = TradeInput {
        symbol: plan.symbol,
        kind: plan.kind,
        entry_price: fill.entry_price.unwrap_or(plan.target_entry),
        exit_price: fill.exit_price,
        quantity: if fill.quantity > 0.0 { fill.quantity } else { plan.quantity },
        entry_date: fill.entry_date,
        exit_date: fill.exit_date,
        strategy: plan.strategy,
        tags: plan.tags,
        conviction: plan.conviction,
        mistakes: Vec::new(),
        notes: plan.notes,
        urls: Vec::new(),
        screenshots: plan.screenshots,
    };

    let trades = add_trade(trades, input, now)?;
    let plans = plans.into_iter().filter(|p| p.id != plan_id).collect();
    Ok((plans, trades))
}

/// Actual execution details applied when a plan becomes a trade. `None`
/// fields fall back to the planned values.
#[derive(Debug, Clone, Default)]
pub struct PlanFill {
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub entry_date: Option<String>,
    pub exit_date: Option<String>,
}
