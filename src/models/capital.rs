use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};
use crate::models::new_entity_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Deposit,
    Withdrawal,
}

/// External cash flow (deposit or withdrawal) not reflected in trade P/L.
/// Feeds into the adjusted starting capital used by the metrics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalAdjustment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl CapitalAdjustment {
    pub fn create(
        kind: AdjustmentKind,
        amount: f64,
        date: &str,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<CapitalAdjustment> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(JournalError::InvalidInput(
                "adjustment amount must be a positive number".into(),
            ));
        }
        Ok(CapitalAdjustment {
            id: new_entity_id("ADJ", now),
            kind,
            amount,
            date: date.to_string(),
            notes: notes.trim().to_string(),
            created_at: now,
        })
    }

    /// Signed contribution to capital: deposits positive, withdrawals negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            AdjustmentKind::Deposit => self.amount,
            AdjustmentKind::Withdrawal => -self.amount,
        }
    }
}
