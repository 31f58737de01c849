use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::TradeRecord;

/// Per-day aggregate, keyed by the trade's effective date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: String,
    pub pnl: f64,
    pub count: u32,
    pub wins: u32,
    pub losses: u32,
}

/// Per-month (`YYYY-MM`) aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: String,
    pub pnl: f64,
    pub count: u32,
    pub wins: u32,
    pub losses: u32,
}

/// Per-strategy aggregate; trades without a strategy land in "No Strategy".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyBucket {
    pub strategy: String,
    pub count: u32,
    pub pnl: f64,
    pub wins: u32,
    pub losses: u32,
}

#[derive(Default)]
struct Acc {
    pnl: f64,
    count: u32,
    wins: u32,
    losses: u32,
}

impl Acc {
    fn add(&mut self, pnl: f64) {
        self.pnl += pnl;
        self.count += 1;
        if pnl > 0.0 {
            self.wins += 1;
        } else if pnl < 0.0 {
            self.losses += 1;
        }
    }
}

/// Group trades by exact effective date, chronologically ascending.
pub fn daily_buckets(trades: &[TradeRecord]) -> Vec<DailyBucket> {
    let mut map: BTreeMap<String, Acc> = BTreeMap::new();
    for trade in trades {
        map.entry(trade.effective_date()).or_default().add(trade.pnl);
    }
    map.into_iter()
        .map(|(date, acc)| DailyBucket {
            date,
            pnl: acc.pnl,
            count: acc.count,
            wins: acc.wins,
            losses: acc.losses,
        })
        .collect()
}

/// Group trades by `YYYY-MM`, chronologically ascending.
pub fn monthly_buckets(trades: &[TradeRecord]) -> Vec<MonthlyBucket> {
    let mut map: BTreeMap<String, Acc> = BTreeMap::new();
    for trade in trades {
        let date = trade.effective_date();
        let month = date.get(..7).unwrap_or(&date).to_string();
        map.entry(month).or_default().add(trade.pnl);
    }
    map.into_iter()
        .map(|(month, acc)| MonthlyBucket {
            month,
            pnl: acc.pnl,
            count: acc.count,
            wins: acc.wins,
            losses: acc.losses,
        })
        .collect()
}

/// Group trades by strategy name (alphabetical order).
pub fn strategy_breakdown(trades: &[TradeRecord]) -> Vec<StrategyBucket> {
    let mut map: BTreeMap<String, Acc> = BTreeMap::new();
    for trade in trades {
        let name = if trade.strategy.trim().is_empty() {
            "No Strategy".to_string()
        } else {
            trade.strategy.clone()
        };
        map.entry(name).or_default().add(trade.pnl);
    }
    map.into_iter()
        .map(|(strategy, acc)| StrategyBucket {
            strategy,
            count: acc.count,
            pnl: acc.pnl,
            wins: acc.wins,
            losses: acc.losses,
        })
        .collect()
}

/// Mean holding period in days over trades with parseable entry and exit
/// dates; 0 when none qualify.
pub fn average_duration_days(trades: &[TradeRecord]) -> f64 {
    let durations: Vec<f64> = trades
        .iter()
        .filter_map(|t| {
            let entry = NaiveDate::parse_from_str(t.entry_date.as_deref()?, "%Y-%m-%d").ok()?;
            let exit = NaiveDate::parse_from_str(t.exit_date.as_deref()?, "%Y-%m-%d").ok()?;
            Some((exit - entry).num_days() as f64)
        })
        .collect();

    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<f64>() / durations.len() as f64
}
