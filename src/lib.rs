//! Trading journal core.
//!
//! Trade records, planned trades, strategies, and capital adjustments, with
//! a CSV codec, a performance-metrics engine, and chart-ready data shaping.
//! The analytics are pure functions of `(trades, adjustments, settings)`;
//! persistence lives behind the [`store`] adapter and the UI layer is a
//! separate consumer of [`metrics::MetricsSnapshot`].
//!
//! ```
//! use chrono::Utc;
//! use trade_journal::journal::add_trade;
//! use trade_journal::metrics::compute_metrics;
//! use trade_journal::models::{Settings, TradeInput};
//!
//! let now = Utc::now();
//! let trades = add_trade(
//!     Vec::new(),
//!     TradeInput {
//!         symbol: "BTC/USDT".into(),
//!         entry_price: 100.0,
//!         exit_price: Some(110.0),
//!         quantity: 2.0,
//!         ..Default::default()
//!     },
//!     now,
//! )
//! .unwrap();
//!
//! let snapshot = compute_metrics(&trades, &[], &Settings::default());
//! assert_eq!(snapshot.total_pnl, 20.0);
//! ```

pub mod codec;
pub mod error;
pub mod journal;
pub mod metrics;
pub mod models;
pub mod store;

pub use error::{JournalError, Result};
