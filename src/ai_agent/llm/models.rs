use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMModel {
  pub display_name: String,
  pub model_name: String, // The actual name used in API calls
}

impl LLMModel {
  pub fn new(display_name: &str, model_name: &str) -> Self {
    LLMModel {
      display_name: display_name.to_string(),
      model_name: model_name.to_string(),
    }
  }
}

fn available_models_data() -> Vec<LLMModel> {
  vec![
    LLMModel::new("[groq] llama-3.1-8b-instant", "llama-3.1-8b-instant"),
    LLMModel::new("[groq] llama-3.3-70b-versatile", "llama-3.3-70b-versatile"),
    LLMModel::new("[groq] gemma2-9b-it", "gemma2-9b-it"),
  ]
}

pub static AVAILABLE_MODELS: OnceLock<Vec<LLMModel>> = OnceLock::new();

pub fn get_available_models() -> &'static [LLMModel] {
  AVAILABLE_MODELS.get_or_init(available_models_data).as_slice()
}

pub fn get_model_info(model_name: &str) -> Option<&'static LLMModel> {
  get_available_models().iter().find(|&model_desc| model_desc.model_name == model_name)
}

/// Sampling profile picked by the user for the main analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
  Smart,
  Expert,
}

impl AnalysisMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      AnalysisMode::Smart => "smart",
      AnalysisMode::Expert => "expert",
    }
  }

  pub fn temperature(&self) -> f32 {
    match self {
      AnalysisMode::Smart => 0.7,
      AnalysisMode::Expert => 0.5,
    }
  }

  pub fn all() -> [AnalysisMode; 2] {
    [AnalysisMode::Smart, AnalysisMode::Expert]
  }

  /// Lenient lookup used for user-supplied labels: anything that is not
  /// "smart" samples with the expert profile.
  pub fn from_label(label: &str) -> AnalysisMode {
    label.parse::<AnalysisMode>().unwrap_or(AnalysisMode::Expert)
  }
}

impl Default for AnalysisMode {
  fn default() -> Self {
    AnalysisMode::Smart
  }
}

impl fmt::Display for AnalysisMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for AnalysisMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "smart" => Ok(AnalysisMode::Smart),
      "expert" => Ok(AnalysisMode::Expert),
      _ => Err(format!("Unknown analysis mode: {}", s)),
    }
  }
}
