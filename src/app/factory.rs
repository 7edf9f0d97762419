use actix_web::{web, App};
use std::sync::Arc;

use crate::ai_agent::llm::model_provider::LLMChatter;
use crate::app::config::Config;
use crate::app::routes::routes::Routes;

use super::controller::analysis_controller::AnalysisController;
use super::services::agent_service::AgentService;
use super::services::service::AnalysisServices;

/// Shared by every worker so sessions survive across them.
#[derive(Clone)]
pub struct AppState {
  pub analysis_controller: Arc<AnalysisController>
}

impl AppState {

  pub fn new(app_config: &Config, chatter: Arc<dyn LLMChatter>) -> Self {
    let agent_service : AgentService = AgentService::new(chatter, &app_config.model_name);
    let analysis_services: Arc<AnalysisServices> = Arc::new(AnalysisServices::new(agent_service));
    let analysis_controller : Arc<AnalysisController> = Arc::new(AnalysisController::new(analysis_services, app_config.api_key_configured()));
    AppState { analysis_controller }
  }
}

pub struct CreateApp {
  app_state: AppState,
}

impl CreateApp {
  pub fn new(app_state: AppState) -> Self {
    CreateApp { app_state }
  }

  pub fn build_app(&self,) -> App<impl actix_web::dev::ServiceFactory<actix_web::dev::ServiceRequest,Config = (),Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,Error = actix_web::Error,InitError = (),>,> {
    App::new()
    .app_data(web::Data::new(self.app_state.analysis_controller.clone()))
    .configure(Routes::configure)
  }
}
