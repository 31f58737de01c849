//! Persistence collaborator: a document store backed by SQLite.
//!
//! The core never depends on this — metrics and the codec take collections
//! as arguments. This adapter owns the load/save calls: one `documents`
//! table keyed by `(kind, id)` with JSON bodies, one kind per entity
//! collection, plus a singleton settings document.

mod sqlite;

pub use sqlite::SqliteStore;

/// Document kinds, one per entity collection.
pub(crate) mod kind {
    pub const TRADES: &str = "trades";
    pub const PLANNED_TRADES: &str = "planned_trades";
    pub const STRATEGIES: &str = "strategies";
    pub const CAPITAL_ADJUSTMENTS: &str = "capital_adjustments";
    pub const SETTINGS: &str = "settings";
}
