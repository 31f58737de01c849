use serde::{Deserialize, Serialize};

use crate::models::TradeRecord;

/// One point of the equity curve: account capital after the trade dated
/// `date` has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: String,
    pub capital: f64,
}

/// Peak-to-trough decline measured against the most recent peak.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Drawdown {
    pub max_drawdown: f64,
    pub max_drawdown_percent: f64,
}

/// Trades ordered ascending by effective date (exit, then entry, then
/// creation date). Normalized `YYYY-MM-DD` keys sort chronologically.
pub fn sort_by_effective_date(trades: &[TradeRecord]) -> Vec<&TradeRecord> {
    let mut sorted: Vec<&TradeRecord> = trades.iter().collect();
    sorted.sort_by(|a, b| a.effective_date().cmp(&b.effective_date()));
    sorted
}

/// Running capital over the date-sorted trade sequence, starting from a
/// synthetic "Start" point at the adjusted starting capital.
pub fn equity_curve(trades: &[TradeRecord], starting_capital: f64) -> Vec<EquityPoint> {
    let mut points = Vec::with_capacity(trades.len() + 1);
    points.push(EquityPoint {
        date: "Start".to_string(),
        capital: starting_capital,
    });

    let mut capital = starting_capital;
    for trade in sort_by_effective_date(trades) {
        capital += trade.pnl;
        points.push(EquityPoint {
            date: trade.effective_date(),
            capital,
        });
    }
    points
}

/// Walk the date-sorted sequence tracking the running peak; drawdown is
/// measured against the most recent peak, not the starting value.
pub fn max_drawdown(trades: &[TradeRecord], starting_capital: f64) -> Drawdown {
    let mut peak = starting_capital;
    let mut capital = starting_capital;
    let mut result = Drawdown::default();

    for trade in sort_by_effective_date(trades) {
        capital += trade.pnl;
        if capital > peak {
            peak = capital;
        } else if peak > 0.0 {
            let drawdown = peak - capital;
            if drawdown > result.max_drawdown {
                result.max_drawdown = drawdown;
                result.max_drawdown_percent = drawdown / peak * 100.0;
            }
        }
    }
    result
}
