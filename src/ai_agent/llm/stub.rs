use std::sync::Mutex;
use async_trait::async_trait;

use crate::ai_agent::error::{AnalysisError, AnalysisResult};
use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse};

/// Canned oracle for tests. Records every call it receives.
pub struct StubChatter {
  reply: Result<String, fn() -> AnalysisError>,
  calls: Mutex<Vec<(Vec<ChatMessage>, LLMModelConfig)>>,
}

impl StubChatter {
  pub fn replying(reply: &str) -> Self {
    StubChatter { reply: Ok(reply.to_string()), calls: Mutex::new(Vec::new()) }
  }

  pub fn failing(error: fn() -> AnalysisError) -> Self {
    StubChatter { reply: Err(error), calls: Mutex::new(Vec::new()) }
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }

  pub fn last_call(&self) -> Option<(Vec<ChatMessage>, LLMModelConfig)> {
    self.calls.lock().unwrap().last().cloned()
  }
}

#[async_trait]
impl LLMChatter for StubChatter {
  async fn chat(&self, messages: Vec<ChatMessage>, config: &LLMModelConfig) -> AnalysisResult<LLMResponse> {
    self.calls.lock().unwrap().push((messages, config.clone()));
    match &self.reply {
      Ok(content) => Ok(LLMResponse { content: content.clone() }),
      Err(make_error) => Err(make_error()),
    }
  }
}
