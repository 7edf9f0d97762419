use std::sync::Arc;

use crate::ai_agent::data::models::FinancialMetrics;
use crate::ai_agent::documents::ingestion::MAX_DOCUMENT_CHARS;
use crate::ai_agent::error::AnalysisResult;
use crate::ai_agent::extractor::metric_extractor::MetricExtractor;
use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig};
use crate::ai_agent::llm::models::{get_model_info, AnalysisMode};
use crate::ai_agent::router::intent_router::AnalysisRequest;
use crate::ai_agent::utils::response::truncate_chars;

pub const ANALYSIS_MAX_TOKENS: u32 = 1024;
pub const SUMMARY_MAX_TOKENS: u32 = 512;
pub const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Owns the oracle handle and issues every model call the service makes.
pub struct AgentService {
  chatter: Arc<dyn LLMChatter>,
  extractor: MetricExtractor,
  model_name: String,
}

impl AgentService {
  pub fn new(chatter: Arc<dyn LLMChatter>, model_name: &str) -> Self {
    if get_model_info(model_name).is_none() {
      log::warn!("Model {} is not in the known Groq model list; requests may be rejected", model_name);
    }
    let extractor: MetricExtractor = MetricExtractor::new(chatter.clone(), model_name);
    AgentService { chatter, extractor, model_name: model_name.to_string() }
  }

  pub fn model_name(&self) -> &str {
    &self.model_name
  }

  pub async fn run_analysis(&self, request: AnalysisRequest, mode: AnalysisMode, document: Option<&str>) -> AnalysisResult<String> {
    log::info!("Routing query for {} to category {} ({} mode)", request.company_name, request.category, mode);

    let prompt: String = request.into_prompt(document);
    let config: LLMModelConfig = LLMModelConfig::new(&self.model_name)
      .with_temperature(mode.temperature())
      .with_max_tokens(ANALYSIS_MAX_TOKENS);

    let response = self.chatter.chat(vec![ChatMessage::user(prompt)], &config).await?;
    log::debug!("Analysis reply: {} characters", response.content.chars().count());
    return Ok(response.content);
  }

  pub async fn extract_metrics(&self, report: &str) -> FinancialMetrics {
    self.extractor.extract(report).await
  }

  pub async fn summarize(&self, report: &str) -> AnalysisResult<String> {
    let prompt: String = format!(r#"Summarize the following financial report in 5 concise bullet points.
Focus on revenue, profitability, risks and outlook. Do not invent figures that are not in the report.

Report:
{}"#, truncate_chars(report, MAX_DOCUMENT_CHARS));

    let config: LLMModelConfig = LLMModelConfig::new(&self.model_name)
      .with_temperature(SUMMARY_TEMPERATURE)
      .with_max_tokens(SUMMARY_MAX_TOKENS);

    log::info!("Summarizing report of {} characters", report.chars().count());
    let response = self.chatter.chat(vec![ChatMessage::user(prompt)], &config).await?;
    return Ok(response.content);
  }
}
