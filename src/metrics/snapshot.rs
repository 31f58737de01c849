use serde::{Deserialize, Serialize};

use crate::metrics::buckets::{
    average_duration_days, daily_buckets, monthly_buckets, strategy_breakdown, DailyBucket,
    MonthlyBucket, StrategyBucket,
};
use crate::metrics::chart::trade_score;
use crate::metrics::equity::{equity_curve, max_drawdown, EquityPoint};
use crate::models::{CapitalAdjustment, Settings, TradeRecord};

/// Numeric stand-in for "loss-free profitable history" in profit factor and
/// risk/reward. Converted to "∞" only at the presentation boundary
/// ([`crate::metrics::chart::display_ratio`]).
pub const PROFIT_FACTOR_SENTINEL: f64 = 999.0;

/// The full set of analytics derived from one `(trades, adjustments,
/// settings)` snapshot. Never persisted; recomputed whenever inputs change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,

    pub net_adjustments: f64,
    pub adjusted_starting_capital: f64,
    pub total_pnl: f64,
    pub current_capital: f64,
    pub roi: f64,

    pub win_rate: f64,
    pub total_wins: f64,
    pub total_losses: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub expectancy: f64,
    pub risk_reward_ratio: f64,
    pub best_trade: f64,
    pub worst_trade: f64,

    pub avg_duration_days: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_percent: f64,
    pub trade_score: u32,

    pub equity_curve: Vec<EquityPoint>,
    pub daily_pnl: Vec<DailyBucket>,
    pub monthly_pnl: Vec<MonthlyBucket>,
    pub strategy_breakdown: Vec<StrategyBucket>,
}

/// Compute every derived analytic for the given inputs.
///
/// Pure and total: empty trade lists and zero capital produce neutral
/// values (0 or the documented sentinel), never NaN or a panic.
pub fn compute_metrics(
    trades: &[TradeRecord],
    adjustments: &[CapitalAdjustment],
    settings: &Settings,
) -> MetricsSnapshot {
    let net_adjustments: f64 = adjustments.iter().map(|a| a.signed_amount()).sum();
    let adjusted_starting_capital = settings.starting_capital + net_adjustments;

    let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
    let current_capital = adjusted_starting_capital + total_pnl;

    let roi = if adjusted_starting_capital > 0.0 {
        total_pnl / adjusted_starting_capital * 100.0
    } else {
        0.0
    };

    // pnl == 0 counts as neither a win nor a loss
    let winners: Vec<&TradeRecord> = trades.iter().filter(|t| t.pnl > 0.0).collect();
    let losers: Vec<&TradeRecord> = trades.iter().filter(|t| t.pnl < 0.0).collect();

    let win_rate = if trades.is_empty() {
        0.0
    } else {
        winners.len() as f64 / trades.len() as f64 * 100.0
    };

    let total_wins: f64 = winners.iter().map(|t| t.pnl).sum();
    let total_losses: f64 = losers.iter().map(|t| t.pnl).sum::<f64>().abs();

    let avg_win = if winners.is_empty() {
        0.0
    } else {
        total_wins / winners.len() as f64
    };
    let avg_loss = if losers.is_empty() {
        0.0
    } else {
        total_losses / losers.len() as f64
    };

    let profit_factor = sentinel_ratio(total_wins, total_losses);
    let risk_reward_ratio = sentinel_ratio(avg_win, avg_loss);

    let expectancy = if trades.is_empty() {
        0.0
    } else {
        (win_rate / 100.0) * avg_win - (1.0 - win_rate / 100.0) * avg_loss
    };

    let best_trade = trades.iter().map(|t| t.pnl).fold(f64::MIN, f64::max);
    let worst_trade = trades.iter().map(|t| t.pnl).fold(f64::MAX, f64::min);
    let (best_trade, worst_trade) = if trades.is_empty() {
        (0.0, 0.0)
    } else {
        (best_trade, worst_trade)
    };

    let drawdown = max_drawdown(trades, adjusted_starting_capital);

    MetricsSnapshot {
        total_trades: trades.len(),
        winning_trades: winners.len(),
        losing_trades: losers.len(),
        net_adjustments,
        adjusted_starting_capital,
        total_pnl,
        current_capital,
        roi,
        win_rate,
        total_wins,
        total_losses,
        avg_win,
        avg_loss,
        profit_factor,
        expectancy,
        risk_reward_ratio,
        best_trade,
        worst_trade,
        avg_duration_days: average_duration_days(trades),
        sharpe_ratio: sharpe_ratio(trades, settings.starting_capital),
        max_drawdown: drawdown.max_drawdown,
        max_drawdown_percent: drawdown.max_drawdown_percent,
        trade_score: trade_score(win_rate, profit_factor),
        equity_curve: equity_curve(trades, adjusted_starting_capital),
        daily_pnl: daily_buckets(trades),
        monthly_pnl: monthly_buckets(trades),
        strategy_breakdown: strategy_breakdown(trades),
    }
}

/// gross/gross ratio with the zero-denominator sentinel: 999 for a
/// loss-free profitable history, 0 otherwise.
fn sentinel_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else if numerator > 0.0 {
        PROFIT_FACTOR_SENTINEL
    } else {
        0.0
    }
}

/// Mean per-trade return over its population standard deviation, returns
/// measured against the unadjusted starting capital. 0 when undefined.
fn sharpe_ratio(trades: &[TradeRecord], starting_capital: f64) -> f64 {
    if trades.is_empty() || starting_capital == 0.0 {
        return 0.0;
    }
    let returns: Vec<f64> = trades.iter().map(|t| t.pnl / starting_capital).collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        0.0
    } else {
        mean / stddev
    }
}
