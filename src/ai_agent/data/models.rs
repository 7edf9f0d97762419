use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

pub const DEFAULT_CURRENCY: &str = "₹";

const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '¥', '₹'];

/// Headline figures pulled out of a report for charting.
///
/// Always fully populated: a zero means "not reported", never a literal
/// zero, and the currency falls back to rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
  pub revenue: f64,
  pub profit: f64,
  pub expenses: f64,
  pub market_cap: f64,
  pub currency: String,
}

impl Default for FinancialMetrics {
  fn default() -> Self {
    FinancialMetrics { revenue: 0.0, profit: 0.0, expenses: 0.0, market_cap: 0.0, currency: DEFAULT_CURRENCY.to_string() }
  }
}

impl FinancialMetrics {

  /// Decodes an oracle reply. `None` unless the value is a JSON object.
  pub fn from_json(value: &Value) -> Option<Self> {
    value.as_object().map(Self::merge_over_defaults)
  }

  /// Starts from the defaults and overwrites each field the map carries in
  /// a usable form. Fields that are missing or cannot be coerced keep
  /// their default.
  pub fn merge_over_defaults(fields: &Map<String, Value>) -> Self {
    let mut metrics: FinancialMetrics = FinancialMetrics::default();

    let numeric: [(&str, &mut f64); 4] = [
      ("revenue", &mut metrics.revenue),
      ("profit", &mut metrics.profit),
      ("expenses", &mut metrics.expenses),
      ("market_cap", &mut metrics.market_cap),
    ];
    for (key, slot) in numeric {
      if let Some(value) = fields.get(key) {
        match coerce_number(value) {
          Some(number) => *slot = number,
          None => log::debug!("Ignoring non-numeric {} value {}", key, value),
        }
      }
    }

    if let Some(currency) = fields.get("currency").and_then(Value::as_str).map(str::trim).filter(|c| !c.is_empty()) {
      metrics.currency = currency.to_string();
    }

    return metrics;
  }

  /// True when nothing beyond the defaults was recovered.
  pub fn is_unknown(&self) -> bool {
    *self == FinancialMetrics::default()
  }
}

/// Numbers pass through; strings like "₹1,200.5" are parsed after dropping a
/// leading currency symbol, thousands separators and whitespace.
pub fn coerce_number(value: &Value) -> Option<f64> {
  let number: Option<f64> = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => {
      let cleaned: String = s.trim()
        .trim_start_matches(&CURRENCY_SYMBOLS[..])
        .chars()
        .filter(|c| !(*c == ',' || *c == '_' || c.is_whitespace()))
        .collect();
      cleaned.parse::<f64>().ok()
    }
    _ => None,
  };
  number.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn default_is_zero_rupees() {
    let metrics = FinancialMetrics::default();
    assert_eq!(metrics.revenue, 0.0);
    assert_eq!(metrics.market_cap, 0.0);
    assert_eq!(metrics.currency, "₹");
    assert!(metrics.is_unknown());
  }

  #[test]
  fn partial_object_keeps_defaults() {
    let metrics = FinancialMetrics::from_json(&json!({"revenue": 500, "currency": "$"})).unwrap();
    assert_eq!(metrics, FinancialMetrics { revenue: 500.0, currency: "$".to_string(), ..FinancialMetrics::default() });
  }

  #[test]
  fn non_objects_are_rejected() {
    assert!(FinancialMetrics::from_json(&json!([1, 2, 3])).is_none());
    assert!(FinancialMetrics::from_json(&json!("revenue")).is_none());
    assert!(FinancialMetrics::from_json(&Value::Null).is_none());
  }

  #[test]
  fn wrong_types_fall_back_per_field() {
    let metrics = FinancialMetrics::from_json(&json!({
      "revenue": "1,200",
      "profit": null,
      "expenses": {"q1": 3},
      "market_cap": "₹ 9,000.5",
      "currency": 42
    })).unwrap();
    assert_eq!(metrics.revenue, 1200.0);
    assert_eq!(metrics.profit, 0.0);
    assert_eq!(metrics.expenses, 0.0);
    assert_eq!(metrics.market_cap, 9000.5);
    assert_eq!(metrics.currency, "₹");
  }

  #[test]
  fn unparseable_strings_are_ignored() {
    assert_eq!(coerce_number(&json!("12 crore")), None);
    assert_eq!(coerce_number(&json!("N/A")), None);
    assert_eq!(coerce_number(&json!(true)), None);
    assert_eq!(coerce_number(&json!("-3.5")), Some(-3.5));
    assert_eq!(coerce_number(&json!("inf")), None);
  }

  #[test]
  fn blank_currency_keeps_default() {
    let metrics = FinancialMetrics::from_json(&json!({"currency": "  "})).unwrap();
    assert_eq!(metrics.currency, "₹");
  }
}
