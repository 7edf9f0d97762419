use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of analysis intents, plus the document-grounded fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisCategory {
  BusinessModel,
  ManagementCommentary,
  RedFlags,
  KeyProducts,
  Evolution,
  StockPerformance,
  GrowthOutlook,
  GuidanceVsDelivery,
  General,
}

impl AnalysisCategory {

  pub const ALL: [AnalysisCategory; 9] = [
    AnalysisCategory::BusinessModel,
    AnalysisCategory::ManagementCommentary,
    AnalysisCategory::RedFlags,
    AnalysisCategory::KeyProducts,
    AnalysisCategory::Evolution,
    AnalysisCategory::StockPerformance,
    AnalysisCategory::GrowthOutlook,
    AnalysisCategory::GuidanceVsDelivery,
    AnalysisCategory::General,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      AnalysisCategory::BusinessModel => "business_model",
      AnalysisCategory::ManagementCommentary => "management_commentary",
      AnalysisCategory::RedFlags => "red_flags",
      AnalysisCategory::KeyProducts => "key_products",
      AnalysisCategory::Evolution => "evolution",
      AnalysisCategory::StockPerformance => "stock_performance",
      AnalysisCategory::GrowthOutlook => "growth_outlook",
      AnalysisCategory::GuidanceVsDelivery => "guidance_vs_delivery",
      AnalysisCategory::General => "general",
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      AnalysisCategory::BusinessModel => "Business Model",
      AnalysisCategory::ManagementCommentary => "Management Commentary",
      AnalysisCategory::RedFlags => "Red Flags",
      AnalysisCategory::KeyProducts => "Key Products & Services",
      AnalysisCategory::Evolution => "3-Year Evolution",
      AnalysisCategory::StockPerformance => "Stock Performance",
      AnalysisCategory::GrowthOutlook => "Growth Outlook",
      AnalysisCategory::GuidanceVsDelivery => "Guidance vs Delivery",
      AnalysisCategory::General => "General Document Analysis",
    }
  }

  pub fn is_fallback(&self) -> bool {
    *self == AnalysisCategory::General
  }
}

impl fmt::Display for AnalysisCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for AnalysisCategory {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let key = s.trim().to_lowercase();
    AnalysisCategory::ALL.iter().copied()
      .find(|category| category.as_str() == key)
      .ok_or_else(|| format!("Unknown analysis category: {}", s))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tags_round_trip_through_from_str() {
    for category in AnalysisCategory::ALL {
      assert_eq!(category.as_str().parse::<AnalysisCategory>(), Ok(category));
    }
  }

  #[test]
  fn serializes_as_snake_case_tag() {
    let value = serde_json::to_value(AnalysisCategory::GuidanceVsDelivery).unwrap();
    assert_eq!(value, serde_json::json!("guidance_vs_delivery"));
  }

  #[test]
  fn only_general_is_fallback() {
    let fallbacks: Vec<_> = AnalysisCategory::ALL.iter().filter(|c| c.is_fallback()).collect();
    assert_eq!(fallbacks, vec![&AnalysisCategory::General]);
  }
}
