use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use serde::{Serialize, Deserialize};

use crate::ai_agent::error::AnalysisError;
use crate::app::controller::analysis_controller::AnalysisController;

/// Uploads travel base64-encoded inside JSON, so allow bodies well above
/// actix's 32 KiB default.
const JSON_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Deserialize, Serialize)]
pub struct AnalyzeRequest {
  #[serde(default)]
  company_name: String,
  #[serde(default)]
  query: String,
  model: Option<String>,
  session_id: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct DocumentUploadRequest {
  #[serde(default)]
  file_name: String,
  kind: Option<String>,
  #[serde(default)]
  content_base64: String,
  session_id: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct ReportRequest {
  report: Option<String>,
  session_id: Option<String>,
}

pub fn status_for(e: &AnalysisError) -> StatusCode {
  match e {
    AnalysisError::InvalidRequest(_) | AnalysisError::UnsupportedDocumentType(_) | AnalysisError::EmptyExtractedText => StatusCode::BAD_REQUEST,
    AnalysisError::OracleRateLimited => StatusCode::TOO_MANY_REQUESTS,
    AnalysisError::OracleUnavailable(_) | AnalysisError::MalformedOracleResponse(_) => StatusCode::BAD_GATEWAY,
    AnalysisError::MissingCredential(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

fn error_response(e: &AnalysisError) -> HttpResponse {
  HttpResponse::build(status_for(e)).json(serde_json::json!({"error": e.to_string()}))
}

pub struct Routes;

impl Routes {

  pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(Self::json_config());
    cfg.service(web::resource("/").route(web::get().to(Self::health)));
    cfg.service(web::resource("/api/health").route(web::get().to(Self::health)));
    cfg.service(web::resource("/api/categories").route(web::get().to(Self::get_categories)));
    cfg.service(web::resource("/api/models").route(web::get().to(Self::get_models)));
    cfg.service(web::resource("/api/analyze").route(web::post().to(Self::analyze)));
    cfg.service(web::resource("/api/documents").route(web::post().to(Self::upload_document)));
    cfg.service(web::resource("/api/metrics").route(web::post().to(Self::metrics)));
    cfg.service(web::resource("/api/summarize").route(web::post().to(Self::summarize)));
    cfg.default_service(web::route().to(Self::not_found));
  }

  fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
      .limit(JSON_BODY_LIMIT)
      .error_handler(|err, _req: &HttpRequest| {
        let body = serde_json::json!({"error": format!("Invalid request body: {}", err)});
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
      })
  }

  async fn health(controller: web::Data<Arc<AnalysisController>>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
      "status": "healthy",
      "api_key_configured": controller.api_key_configured(),
    }))
  }

  async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "Endpoint not found"}))
  }

  async fn get_categories(controller: web::Data<Arc<AnalysisController>>) -> impl Responder {
    HttpResponse::Ok().json(controller.get_categories())
  }

  async fn get_models(controller: web::Data<Arc<AnalysisController>>) -> impl Responder {
    HttpResponse::Ok().json(controller.get_models())
  }

  async fn analyze(controller: web::Data<Arc<AnalysisController>>, request: web::Json<AnalyzeRequest>) -> impl Responder {
    let result = controller.analyze(&request.company_name, &request.query, request.model.as_deref(), request.session_id.as_deref()).await;

    match result {
      Ok(data) => HttpResponse::Ok().json(data),
      Err(e) => error_response(&e),
    }
  }

  // PDF extraction is CPU-bound, so it runs on the blocking pool.
  async fn upload_document(controller: web::Data<Arc<AnalysisController>>, request: web::Json<DocumentUploadRequest>) -> impl Responder {
    let controller: Arc<AnalysisController> = controller.get_ref().clone();
    let request: DocumentUploadRequest = request.into_inner();
    let result = web::block(move || {
      controller.upload_document(&request.file_name, request.kind.as_deref(), &request.content_base64, request.session_id.as_deref())
    }).await;

    match result {
      Ok(Ok(data)) => HttpResponse::Ok().json(data),
      Ok(Err(e)) => error_response(&e),
      Err(e) => {
        log::error!("Document upload worker failed: {}", e);
        HttpResponse::InternalServerError().json(serde_json::json!({"error": "Document processing failed"}))
      }
    }
  }

  async fn metrics(controller: web::Data<Arc<AnalysisController>>, request: web::Json<ReportRequest>) -> impl Responder {
    match controller.metrics(request.report.as_deref(), request.session_id.as_deref()).await {
      Ok(metrics) => HttpResponse::Ok().json(metrics),
      Err(e) => error_response(&e),
    }
  }

  async fn summarize(controller: web::Data<Arc<AnalysisController>>, request: web::Json<ReportRequest>) -> impl Responder {
    match controller.summarize(request.report.as_deref(), request.session_id.as_deref()).await {
      Ok(data) => HttpResponse::Ok().json(data),
      Err(e) => error_response(&e),
    }
  }
}
