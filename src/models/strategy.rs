use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::new_entity_id;

/// Directional bias a strategy is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

/// A named trading strategy. Trades reference strategies by `name`, not id;
/// deleting a strategy leaves referencing trades untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bias: Bias,
    pub created_at: DateTime<Utc>,
}

impl Strategy {
    pub fn create(name: &str, description: &str, bias: Bias, now: DateTime<Utc>) -> Strategy {
        Strategy {
            id: new_entity_id("STRAT", now),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            bias,
            created_at: now,
        }
    }
}
