pub mod capital;
pub mod planned_trade;
pub mod settings;
pub mod strategy;
pub mod trade;

pub use capital::*;
pub use planned_trade::*;
pub use settings::*;
pub use strategy::*;
pub use trade::*;

use chrono::{DateTime, Utc};

/// Generate a unique entity id in the `{PREFIX}-{millis}-{uuid-prefix}`
/// format. The timestamp comes in as a parameter so nothing in the core
/// reads the wall clock on its own.
pub fn new_entity_id(prefix: &str, now: DateTime<Utc>) -> String {
    let uuid = uuid::Uuid::new_v4().to_string();
    let short = uuid.split('-').next().unwrap_or("0").to_string();
    format!("{}-{}-{}", prefix, now.timestamp_millis(), short)
}
