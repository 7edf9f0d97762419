use std::sync::Arc;

use crate::ai_agent::data::models::FinancialMetrics;
use crate::ai_agent::error::{AnalysisError, AnalysisResult};
use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse};
use crate::ai_agent::utils::response::{parse_json_reply, show_oracle_reply, truncate_chars};

pub const REPORT_EXCERPT_CHARS: usize = 2000;
pub const EXTRACTION_MAX_TOKENS: u32 = 150;

const EXTRACTION_SYSTEM_PROMPT: &str = "You are a financial data extraction assistant. Respond with only a JSON object and nothing else: no prose, no explanation, no markdown.";

/// Re-prompts the oracle to turn a prose report into `FinancialMetrics`.
pub struct MetricExtractor {
  chatter: Arc<dyn LLMChatter>,
  model_name: String,
}

impl MetricExtractor {
  pub fn new(chatter: Arc<dyn LLMChatter>, model_name: &str) -> Self {
    MetricExtractor { chatter, model_name: model_name.to_string() }
  }

  pub fn build_messages(report_text: &str) -> Vec<ChatMessage> {
    let user_prompt: String = format!(r#"Extract the following financial metrics from the report below and respond with ONLY a JSON object with exactly these five fields:
{{"revenue": 0, "profit": 0, "expenses": 0, "market_cap": 0, "currency": "₹"}}

Use plain numbers for revenue, profit, expenses and market_cap, and use 0 for any value the report does not state.

Report:
{}"#, truncate_chars(report_text, REPORT_EXCERPT_CHARS));

    vec![ChatMessage::system(EXTRACTION_SYSTEM_PROMPT), ChatMessage::user(user_prompt)]
  }

  fn call_config(&self) -> LLMModelConfig {
    LLMModelConfig::new(&self.model_name).with_temperature(0.0).with_max_tokens(EXTRACTION_MAX_TOKENS)
  }

  /// Same as `extract`, but keeps oracle failures apart from unusable replies.
  pub async fn try_extract(&self, report_text: &str) -> AnalysisResult<FinancialMetrics> {
    if report_text.trim().is_empty() {
      log::debug!("Empty report, skipping metric extraction");
      return Ok(FinancialMetrics::default());
    }

    let response: LLMResponse = self.chatter.chat(Self::build_messages(report_text), &self.call_config()).await?;
    show_oracle_reply(&response.content, "metric extraction");

    let value = parse_json_reply(&response.content)
      .map_err(|e| AnalysisError::MalformedOracleResponse(format!("metrics reply is not JSON: {}", e)))?;
    FinancialMetrics::from_json(&value)
      .ok_or_else(|| AnalysisError::MalformedOracleResponse("metrics reply is not a JSON object".to_string()))
  }

  /// Never fails: any oracle or decode problem yields the default metrics.
  pub async fn extract(&self, report_text: &str) -> FinancialMetrics {
    match self.try_extract(report_text).await {
      Ok(metrics) => metrics,
      Err(e) => {
        log::warn!("Metric extraction fell back to defaults: {}", e);
        FinancialMetrics::default()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ai_agent::llm::stub::StubChatter;

  fn extractor(stub: &Arc<StubChatter>) -> MetricExtractor {
    MetricExtractor::new(stub.clone(), "llama-3.1-8b-instant")
  }

  #[tokio::test]
  async fn fenced_partial_reply_merges_with_defaults() {
    let stub = Arc::new(StubChatter::replying("```json\n{\"revenue\": 500, \"currency\": \"$\"}\n```"));
    let metrics = extractor(&stub).extract("Revenue was $500.").await;
    assert_eq!(metrics, FinancialMetrics { revenue: 500.0, profit: 0.0, expenses: 0.0, market_cap: 0.0, currency: "$".to_string() });
  }

  #[tokio::test]
  async fn bare_full_reply_is_returned_unchanged() {
    let stub = Arc::new(StubChatter::replying(r#"{"revenue": 500, "profit": 100, "expenses": 50, "market_cap": 9000, "currency": "₹"}"#));
    let metrics = extractor(&stub).extract("report").await;
    assert_eq!(metrics, FinancialMetrics { revenue: 500.0, profit: 100.0, expenses: 50.0, market_cap: 9000.0, currency: "₹".to_string() });
  }

  #[tokio::test]
  async fn garbage_reply_yields_defaults() {
    let stub = Arc::new(StubChatter::replying("I could not find any numbers, sorry!"));
    assert_eq!(extractor(&stub).extract("No figures here.").await, FinancialMetrics::default());
  }

  #[tokio::test]
  async fn empty_report_skips_the_oracle() {
    let stub = Arc::new(StubChatter::replying(r#"{"revenue": 42}"#));
    let extractor = extractor(&stub);
    assert_eq!(extractor.extract("").await, FinancialMetrics::default());
    assert_eq!(extractor.try_extract(" \n\t").await.unwrap(), FinancialMetrics::default());
    assert_eq!(stub.call_count(), 0);
  }

  #[tokio::test]
  async fn non_object_json_yields_defaults() {
    let stub = Arc::new(StubChatter::replying("[500, 100]"));
    let extractor = extractor(&stub);
    assert!(matches!(extractor.try_extract("x").await, Err(AnalysisError::MalformedOracleResponse(_))));
    assert_eq!(extractor.extract("x").await, FinancialMetrics::default());
  }

  #[tokio::test]
  async fn oracle_failures_are_masked_but_distinguishable() {
    let stub = Arc::new(StubChatter::failing(|| AnalysisError::OracleUnavailable("connection refused".to_string())));
    let extractor = extractor(&stub);
    assert!(matches!(extractor.try_extract("x").await, Err(AnalysisError::OracleUnavailable(_))));
    assert_eq!(extractor.extract("x").await, FinancialMetrics::default());

    let limited = Arc::new(StubChatter::failing(|| AnalysisError::OracleRateLimited));
    assert_eq!(MetricExtractor::new(limited, "m").extract("x").await, FinancialMetrics::default());
  }

  #[tokio::test]
  async fn repeated_extraction_is_stable() {
    let stub = Arc::new(StubChatter::replying(r#"{"revenue": 1, "profit": 2}"#));
    let extractor = extractor(&stub);
    let first = extractor.extract("same report").await;
    let second = extractor.extract("same report").await;
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn calls_oracle_deterministically_with_small_budget() {
    let stub = Arc::new(StubChatter::replying("{}"));
    extractor(&stub).extract("report").await;

    let (messages, config) = stub.last_call().unwrap();
    assert_eq!(config.temperature, Some(0.0));
    assert_eq!(config.max_tokens, Some(EXTRACTION_MAX_TOKENS));
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[1].role, "user");
    assert!(messages[1].content.contains(r#""market_cap": 0"#));
  }

  #[test]
  fn report_is_truncated_to_excerpt() {
    let report: String = "é".repeat(REPORT_EXCERPT_CHARS + 500);
    let messages = MetricExtractor::build_messages(&report);
    let excerpt_len = messages[1].content.chars().filter(|c| *c == 'é').count();
    assert_eq!(excerpt_len, REPORT_EXCERPT_CHARS);
  }
}
