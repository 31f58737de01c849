use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{JournalError, Result};
use crate::models::{CapitalAdjustment, PlannedTrade, Settings, Strategy, TradeRecord};
use crate::store::kind;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    kind TEXT NOT NULL,
    id   TEXT NOT NULL,
    pos  INTEGER NOT NULL DEFAULT 0,
    doc  TEXT NOT NULL,
    PRIMARY KEY (kind, id)
);
CREATE INDEX IF NOT EXISTS idx_documents_kind_pos ON documents (kind, pos);
";

/// SQLite-backed document store. Collections round-trip in insertion order
/// so "newest first" ordering survives a reload.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init(conn, db_path)
    }

    /// Ephemeral store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, ":memory:")
    }

    fn init(conn: Connection, label: &str) -> Result<Self> {
        // WAL for better concurrency between reader/writer handles
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(SCHEMA)?;
        log::info!("journal store ready at {}", label);
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| JournalError::LockPoisoned)
    }

    // Generic document plumbing

    fn load_all<T: DeserializeOwned>(&self, kind: &str) -> Result<Vec<T>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT doc FROM documents WHERE kind = ? ORDER BY pos ASC")?;
        let rows = stmt.query_map([kind], |row| row.get::<_, String>(0))?;

        let mut items = Vec::new();
        for doc in rows {
            items.push(serde_json::from_str(&doc?)?);
        }
        Ok(items)
    }

    fn save_all<T: Serialize>(
        &self,
        kind: &str,
        items: &[T],
        id_of: impl Fn(&T) -> &str,
    ) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM documents WHERE kind = ?", [kind])?;
        for (pos, item) in items.iter().enumerate() {
            tx.execute(
                "INSERT INTO documents (kind, id, pos, doc) VALUES (?, ?, ?, ?)",
                params![kind, id_of(item), pos as i64, serde_json::to_string(item)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn put<T: Serialize>(&self, kind: &str, id: &str, item: &T) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (kind, id, pos, doc)
             VALUES (?1, ?2, (SELECT COALESCE(MAX(pos), -1) + 1 FROM documents WHERE kind = ?1), ?3)
             ON CONFLICT (kind, id) DO UPDATE SET doc = excluded.doc",
            params![kind, id, serde_json::to_string(item)?],
        )?;
        Ok(())
    }

    fn delete(&self, kind: &str, id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM documents WHERE kind = ? AND id = ?", [kind, id])?;
        Ok(())
    }

    // Trades

    pub fn load_trades(&self) -> Result<Vec<TradeRecord>> {
        self.load_all(kind::TRADES)
    }

    pub fn save_trades(&self, trades: &[TradeRecord]) -> Result<()> {
        self.save_all(kind::TRADES, trades, |t| &t.id)
    }

    pub fn put_trade(&self, trade: &TradeRecord) -> Result<()> {
        self.put(kind::TRADES, &trade.id, trade)
    }

    pub fn delete_trade(&self, id: &str) -> Result<()> {
        self.delete(kind::TRADES, id)
    }

    // Planned trades

    pub fn load_planned_trades(&self) -> Result<Vec<PlannedTrade>> {
        self.load_all(kind::PLANNED_TRADES)
    }

    pub fn save_planned_trades(&self, plans: &[PlannedTrade]) -> Result<()> {
        self.save_all(kind::PLANNED_TRADES, plans, |p| &p.id)
    }

    pub fn put_planned_trade(&self, plan: &PlannedTrade) -> Result<()> {
        self.put(kind::PLANNED_TRADES, &plan.id, plan)
    }

    pub fn delete_planned_trade(&self, id: &str) -> Result<()> {
        self.delete(kind::PLANNED_TRADES, id)
    }

    // Strategies

    pub fn load_strategies(&self) -> Result<Vec<Strategy>> {
        self.load_all(kind::STRATEGIES)
    }

    pub fn save_strategies(&self, strategies: &[Strategy]) -> Result<()> {
        self.save_all(kind::STRATEGIES, strategies, |s| &s.id)
    }

    pub fn put_strategy(&self, strategy: &Strategy) -> Result<()> {
        self.put(kind::STRATEGIES, &strategy.id, strategy)
    }

    /// No cascade: trades referencing the strategy's name keep the name.
    pub fn delete_strategy(&self, id: &str) -> Result<()> {
        self.delete(kind::STRATEGIES, id)
    }

    // Capital adjustments

    pub fn load_capital_adjustments(&self) -> Result<Vec<CapitalAdjustment>> {
        self.load_all(kind::CAPITAL_ADJUSTMENTS)
    }

    pub fn save_capital_adjustments(&self, adjustments: &[CapitalAdjustment]) -> Result<()> {
        self.save_all(kind::CAPITAL_ADJUSTMENTS, adjustments, |a| &a.id)
    }

    pub fn put_capital_adjustment(&self, adjustment: &CapitalAdjustment) -> Result<()> {
        self.put(kind::CAPITAL_ADJUSTMENTS, &adjustment.id, adjustment)
    }

    pub fn delete_capital_adjustment(&self, id: &str) -> Result<()> {
        self.delete(kind::CAPITAL_ADJUSTMENTS, id)
    }

    // Settings (singleton)

    pub fn load_settings(&self) -> Result<Settings> {
        let docs: Vec<Settings> = self.load_all(kind::SETTINGS)?;
        Ok(docs.into_iter().next().unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.put(kind::SETTINGS, "settings", settings)
    }
}
