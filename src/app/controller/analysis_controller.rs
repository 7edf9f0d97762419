use std::sync::Arc;

use crate::ai_agent::data::models::FinancialMetrics;
use crate::ai_agent::error::AnalysisResult;
use crate::app::services::service::{AnalysisResponse, AnalysisServices, CategoryInfo, DocumentResponse, ModelsResponse, SummaryResponse};

pub struct AnalysisController {
  services : Arc<AnalysisServices>,
  api_key_configured: bool,
}

impl AnalysisController {
  pub fn new(services: Arc<AnalysisServices>, api_key_configured: bool) -> Self {
    AnalysisController { services, api_key_configured }
  }

  pub fn api_key_configured(&self) -> bool {
    self.api_key_configured
  }

  pub fn get_categories(&self) -> Vec<CategoryInfo> {
    self.services.get_categories()
  }

  pub fn get_models(&self) -> ModelsResponse {
    self.services.get_models()
  }

  pub async fn analyze(&self, company_name: &str, query: &str, model: Option<&str>, session_id: Option<&str>) -> AnalysisResult<AnalysisResponse> {
    let result = self.services.analyze(company_name, query, model, session_id).await;
    match &result {
      Err(e) if e.is_oracle_failure() => log::warn!("Oracle failed during analysis for {:?}: {}", company_name, e),
      Err(e) => log::error!("Analysis for {:?} failed: {}", company_name, e),
      Ok(_) => {}
    }
    return result;
  }

  pub fn upload_document(&self, file_name: &str, kind: Option<&str>, content_base64: &str, session_id: Option<&str>) -> AnalysisResult<DocumentResponse> {
    let result = self.services.upload_document(file_name, kind, content_base64, session_id);
    match &result {
      Ok(document) => log::info!("Stored {} ({} characters) for session {:?}", document.file_name, document.characters, session_id),
      Err(e) => log::error!("Document upload {:?} failed: {}", file_name, e),
    }
    return result;
  }

  pub async fn metrics(&self, report: Option<&str>, session_id: Option<&str>) -> AnalysisResult<FinancialMetrics> {
    let result = self.services.metrics(report, session_id).await;
    if let Err(e) = &result {
      log::error!("Cannot extract metrics: {}", e);
    }
    return result;
  }

  pub async fn summarize(&self, report: Option<&str>, session_id: Option<&str>) -> AnalysisResult<SummaryResponse> {
    let result = self.services.summarize(report, session_id).await;
    if let Err(e) = &result {
      log::error!("Cannot summarize report: {}", e);
    }
    return result;
  }
}
