use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::text_utils::capitalize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: f64,
    #[serde(default)]
    pub is_recurring: bool,
    pub category_id: i64,
}

impl Payment {
    /// Name as shown in the transaction listing.
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    pub fn value_display(&self) -> String {
        format!("{:.2}", self.value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub name: String,
    pub date: NaiveDate,
    pub value: f64,
    #[serde(default)]
    pub is_recurring: bool,
    pub category_id: i64,
}

/// Accept the monetary value as a number or a numeric string; anything else
/// (null, malformed text) coerces to zero so a single bad record never takes
/// down the listing or the summary.
fn lenient_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let value = match raw {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if value.is_finite() { value } else { 0.0 })
}
