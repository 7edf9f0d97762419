use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::agent_service::AgentService;
use crate::ai_agent::data::cache::{normalize_report, SessionStore, DEFAULT_SESSION};
use crate::ai_agent::data::models::FinancialMetrics;
use crate::ai_agent::documents::ingestion::{self, IngestedDocument, DocumentKind, MAX_DOCUMENT_CHARS};
use crate::ai_agent::error::{AnalysisError, AnalysisResult};
use crate::ai_agent::llm::models::{get_available_models, AnalysisMode, LLMModel};
use crate::ai_agent::router::category::AnalysisCategory;
use crate::ai_agent::router::intent_router::AnalysisRequest;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
  pub success: bool,
  pub response: String,
  pub company: String,
  pub model_used: String,
  pub category: AnalysisCategory,
  pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
  pub success: bool,
  pub file_name: String,
  pub kind: DocumentKind,
  pub characters: usize,
  pub truncated: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
  pub success: bool,
  pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
  pub key: AnalysisCategory,
  pub display_name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
  pub active_model: String,
  pub models: Vec<LLMModel>,
  pub modes: Vec<AnalysisMode>,
}

/// Input validation, session bookkeeping and defaults around `AgentService`.
pub struct AnalysisServices {
  agent_service : AgentService,
  sessions: SessionStore,
}

fn session_key(session_id: Option<&str>) -> &str {
  session_id.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SESSION)
}

fn required<'a>(value: &'a str, field: &str) -> AnalysisResult<&'a str> {
  let trimmed: &str = value.trim();
  if trimmed.is_empty() {
    let mut label: String = field.replace('_', " ");
    if let Some(first) = label.get_mut(0..1) {
      first.make_ascii_uppercase();
    }
    return Err(AnalysisError::InvalidRequest(format!("{} is required", label)));
  }
  Ok(trimmed)
}

impl AnalysisServices {

  pub fn new(agent_service: AgentService) -> Self {
    AnalysisServices { agent_service, sessions: SessionStore::new() }
  }

  pub fn get_categories(&self) -> Vec<CategoryInfo> {
    AnalysisCategory::ALL.iter().map(|category| CategoryInfo { key: *category, display_name: category.display_name() }).collect()
  }

  pub fn get_models(&self) -> ModelsResponse {
    ModelsResponse {
      active_model: self.agent_service.model_name().to_string(),
      models: get_available_models().to_vec(),
      modes: AnalysisMode::all().to_vec(),
    }
  }

  pub async fn analyze(&self, company_name: &str, query: &str, model: Option<&str>, session_id: Option<&str>) -> AnalysisResult<AnalysisResponse> {
    let company_name: &str = required(company_name, "company_name")?;
    let query: &str = required(query, "query")?;
    let model_used: &str = model.map(str::trim).filter(|m| !m.is_empty()).unwrap_or(AnalysisMode::default().as_str());
    let mode: AnalysisMode = AnalysisMode::from_label(model_used);
    let session: &str = session_key(session_id);

    let request: AnalysisRequest = AnalysisRequest::new(company_name, query);
    let category: AnalysisCategory = request.category;
    let document: Option<String> = if category.is_fallback() { self.sessions.document_text(session) } else { None };

    let report: String = self.agent_service.run_analysis(request, mode, document.as_deref()).await?;
    self.sessions.set_last_report(session, normalize_report(&report));

    Ok(AnalysisResponse {
      success: true,
      response: report,
      company: company_name.to_string(),
      model_used: model_used.to_string(),
      category,
      analyzed_at: Utc::now(),
    })
  }

  pub fn upload_document(&self, file_name: &str, kind: Option<&str>, content_base64: &str, session_id: Option<&str>) -> AnalysisResult<DocumentResponse> {
    let file_name: &str = required(file_name, "file_name")?;
    let bytes: Vec<u8> = STANDARD.decode(content_base64.trim())
      .map_err(|e| AnalysisError::InvalidRequest(format!("content_base64 is not valid base64: {}", e)))?;

    let document: IngestedDocument = ingestion::ingest(file_name, kind, &bytes)?;
    let session: &str = session_key(session_id);
    self.sessions.set_document(session, &document.name, &document.text);

    let warning: Option<String> = if document.truncated {
      Some(format!("Document has {} characters; only the first {} are used for analysis", document.total_chars, MAX_DOCUMENT_CHARS))
    } else {
      None
    };

    Ok(DocumentResponse {
      success: true,
      file_name: document.name,
      kind: document.kind,
      characters: document.text.chars().count(),
      truncated: document.truncated,
      warning,
    })
  }

  fn resolve_report(&self, report: Option<&str>, session: &str) -> AnalysisResult<String> {
    match report.map(normalize_report).filter(|r| !r.is_empty()) {
      Some(report) => Ok(report.to_string()),
      None => self.sessions.last_report(session)
        .ok_or_else(|| AnalysisError::InvalidRequest("No report available; run an analysis first or pass a report".to_string())),
    }
  }

  /// Memoised per report text within the session.
  pub async fn metrics(&self, report: Option<&str>, session_id: Option<&str>) -> AnalysisResult<FinancialMetrics> {
    let session: &str = session_key(session_id);
    let report: String = self.resolve_report(report, session)?;

    if let Some(metrics) = self.sessions.cached_metrics(session, &report) {
      return Ok(metrics);
    }

    let metrics: FinancialMetrics = self.agent_service.extract_metrics(&report).await;
    if metrics.is_unknown() {
      log::info!("No figures recovered from report for session {}", session);
    }
    self.sessions.set_metrics(session, &report, metrics.clone());
    Ok(metrics)
  }

  pub async fn summarize(&self, report: Option<&str>, session_id: Option<&str>) -> AnalysisResult<SummaryResponse> {
    let session: &str = session_key(session_id);
    let report: String = self.resolve_report(report, session)?;
    let summary: String = self.agent_service.summarize(&report).await?;
    Ok(SummaryResponse { success: true, summary })
  }
}
