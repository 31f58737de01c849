use serde::{Deserialize, Serialize};

/// Account-level settings. A singleton with no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub currency: String,
    pub starting_capital: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency: "USD".to_string(),
            starting_capital: 10_000.0,
        }
    }
}
