use crate::ai_agent::error::{AnalysisError, AnalysisResult};
use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse};

use reqwest::{header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE}, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use std::time::Duration;

pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

#[derive(Serialize, Debug)]
struct GroqChatRequest {
  messages: Vec<ChatMessage>,
  model: String,              // e.g. "llama-3.1-8b-instant"
  #[serde(skip_serializing_if = "Option::is_none")]
  temperature: Option<f32>,
  #[serde(rename = "max_tokens")]
  #[serde(skip_serializing_if = "Option::is_none")]
  max_completion_tokens: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  top_p: Option<f32>,
}

#[derive(Deserialize, Debug)]
struct GroqResponseMessage {
  content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GroqChoice {
  message: GroqResponseMessage,
}

#[derive(Deserialize, Debug)]
struct GroqChatResponse {
  choices: Vec<GroqChoice>,
}

pub struct GroqProvider {
  groq_url : String,
  api_key : String,
  client : Client
}

impl GroqProvider {

  pub fn new(api_key: &str, groq_url: &str, timeout: Duration) -> AnalysisResult<Self> {
    let client: Client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| AnalysisError::OracleUnavailable(format!("failed to build HTTP client: {}", e)))?;
    Ok(GroqProvider { groq_url: groq_url.to_string(), api_key: api_key.to_string(), client })
  }

  fn headers(&self) -> AnalysisResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
      .map_err(|_| AnalysisError::MissingCredential("GROQ_API_KEY".to_string()))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
  }
}

#[async_trait]
impl LLMChatter for GroqProvider {
  async fn chat(&self, messages: Vec<ChatMessage>, config: &LLMModelConfig) -> AnalysisResult<LLMResponse> {
    let request: GroqChatRequest = GroqChatRequest {
      model: config.model_name.clone(),
      messages: messages,
      temperature: config.temperature,
      max_completion_tokens: config.max_tokens,
      top_p: config.top_p,
    };

    let response: Response = self.client.post(&self.groq_url).headers(self.headers()?).json(&request).send().await
      .map_err(|e| {
        log::error!("Groq request failed: {}", e);
        AnalysisError::OracleUnavailable(e.to_string())
      })?;

    let status: StatusCode = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
      log::warn!("Groq rate limited the request for model {}", config.model_name);
      return Err(AnalysisError::OracleRateLimited);
    }
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      log::error!("Error getting response from Groq: {:?} {}", status, body);
      return Err(AnalysisError::OracleUnavailable(format!("Groq returned {}", status)));
    }

    let groq_response : GroqChatResponse = response.json().await
      .map_err(|e| AnalysisError::MalformedOracleResponse(format!("undecodable Groq body: {}", e)))?;
    let first : GroqChoice = groq_response.choices.into_iter().next()
      .ok_or_else(|| AnalysisError::MalformedOracleResponse("no response choices received from Groq".to_string()))?;
    let content: String = first.message.content
      .ok_or_else(|| AnalysisError::MalformedOracleResponse("Groq choice had no content".to_string()))?;

    return Ok(LLMResponse { content });
  }
}
