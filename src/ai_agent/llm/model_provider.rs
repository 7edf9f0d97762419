use serde::{Serialize, Deserialize};
use async_trait::async_trait;

use crate::ai_agent::error::AnalysisResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMModelConfig {
  pub model_name: String,
  pub temperature: Option<f32>,
  pub max_tokens: Option<u32>,
  pub top_p : Option<f32>
}

impl LLMModelConfig {
  pub fn new(model_name: &str) -> Self {
    LLMModelConfig { model_name: model_name.to_string(), temperature: None, max_tokens: None, top_p: None }
  }

  pub fn with_temperature(mut self, temperature: f32) -> Self {
    self.temperature = Some(temperature);
    return self;
  }

  pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
    self.max_tokens = Some(max_tokens);
    return self;
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: String, // "user", "assistant", "system"
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    ChatMessage { role: "system".to_string(), content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    ChatMessage { role: "user".to_string(), content: content.into() }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMResponse {
  pub content: String,
}

/// A chat-completion oracle: role-tagged messages plus sampling parameters
/// in, one text completion out.
#[async_trait]
pub trait LLMChatter : Send + Sync {
  async fn chat(&self, messages: Vec<ChatMessage>, config : &LLMModelConfig) -> AnalysisResult<LLMResponse>;
}
