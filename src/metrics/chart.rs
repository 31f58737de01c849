//! Chart-ready transforms: deterministic, side-effect-free shaping of
//! metrics into the series the dashboard widgets draw. Rendering itself is
//! someone else's job.

use serde::{Deserialize, Serialize};

use crate::metrics::buckets::DailyBucket;
use crate::metrics::snapshot::{MetricsSnapshot, PROFIT_FACTOR_SENTINEL};

/// How many daily buckets the dashboard charts show.
pub const CHART_DAILY_WINDOW: usize = 30;

/// Reference ceiling for normalizing profit factor and win/loss ratio onto
/// the radar chart.
pub const RADAR_RATIO_CEILING: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: String,
    pub cumulative_pnl: f64,
}

/// Radar-chart axes, each clamped into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarShape {
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win_loss: f64,
}

/// Signed daily P/L bars: the most recent `CHART_DAILY_WINDOW` buckets in
/// chronological order, zero baseline implied.
pub fn daily_bar_series(daily: &[DailyBucket]) -> Vec<DailyBucket> {
    let start = daily.len().saturating_sub(CHART_DAILY_WINDOW);
    daily[start..].to_vec()
}

/// Running sum over an (already windowed) daily series.
pub fn cumulative_series(daily: &[DailyBucket]) -> Vec<CumulativePoint> {
    let mut running = 0.0;
    daily
        .iter()
        .map(|bucket| {
            running += bucket.pnl;
            CumulativePoint {
                date: bucket.date.clone(),
                cumulative_pnl: running,
            }
        })
        .collect()
}

/// Normalize dashboard metrics onto the radar chart's three axes.
pub fn radar_shape(snapshot: &MetricsSnapshot) -> RadarShape {
    let loss_basis = if snapshot.avg_loss == 0.0 { 1.0 } else { snapshot.avg_loss };
    RadarShape {
        win_rate: (snapshot.win_rate / 100.0).clamp(0.0, 1.0),
        profit_factor: (snapshot.profit_factor / RADAR_RATIO_CEILING).clamp(0.0, 1.0),
        avg_win_loss: (snapshot.avg_win / loss_basis / RADAR_RATIO_CEILING).clamp(0.0, 1.0),
    }
}

/// Presentation heuristic, not a financial metric: a 0-100 account score
/// blending win rate and profit factor.
pub fn trade_score(win_rate: f64, profit_factor: f64) -> u32 {
    let score = (50.0 + win_rate / 4.0 + profit_factor * 5.0).round();
    (score as u32).min(100)
}

/// Presentation-boundary formatting for ratios: the loss-free sentinel
/// renders as "∞", everything else to 2 decimals.
pub fn display_ratio(value: f64) -> String {
    if value >= PROFIT_FACTOR_SENTINEL {
        "∞".to_string()
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(date: &str, pnl: f64) -> DailyBucket {
        DailyBucket {
            date: date.to_string(),
            pnl,
            count: 1,
            wins: u32::from(pnl > 0.0),
            losses: u32::from(pnl < 0.0),
        }
    }

    #[test]
    fn test_bar_series_keeps_most_recent_window() {
        let daily: Vec<DailyBucket> = (1..=40)
            .map(|d| bucket(&format!("2024-01-{:02}", d.min(31)), d as f64))
            .collect();
        let series = daily_bar_series(&daily);
        assert_eq!(series.len(), CHART_DAILY_WINDOW);
        assert_eq!(series[0].pnl, 11.0);
        assert_eq!(series.last().unwrap().pnl, 40.0);
    }

    #[test]
    fn test_bar_series_shorter_than_window_passes_through() {
        let daily = vec![bucket("2024-01-01", 5.0), bucket("2024-01-02", -3.0)];
        assert_eq!(daily_bar_series(&daily), daily);
    }

    #[test]
    fn test_cumulative_series_runs_in_order() {
        let daily = vec![
            bucket("2024-01-01", 100.0),
            bucket("2024-01-02", -30.0),
            bucket("2024-01-03", 10.0),
        ];
        let series = cumulative_series(&daily);
        let sums: Vec<f64> = series.iter().map(|p| p.cumulative_pnl).collect();
        assert_eq!(sums, vec![100.0, 70.0, 80.0]);
    }

    #[test]
    fn test_trade_score_clamps_at_100() {
        assert_eq!(trade_score(50.0, 2.5), 75);
        assert_eq!(trade_score(100.0, 999.0), 100);
        assert_eq!(trade_score(0.0, 0.0), 50);
    }

    #[test]
    fn test_display_ratio_sentinel() {
        assert_eq!(display_ratio(2.5), "2.50");
        assert_eq!(display_ratio(PROFIT_FACTOR_SENTINEL), "∞");
        assert_eq!(display_ratio(0.0), "0.00");
    }
}
