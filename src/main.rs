use actix_web::HttpServer;
use anyhow::Context;
use std::env;
use std::sync::Arc;

use crate::ai_agent::llm::groq::GroqProvider;
use crate::ai_agent::llm::model_provider::LLMChatter;
use crate::app::config::Config;
use crate::app::factory::{AppState, CreateApp};

mod app;
mod ai_agent;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  if env::var_os("RUST_LOG").is_none() {
    env::set_var("RUST_LOG", "actix_web=info,fin_insight=debug");
  }
  env_logger::init();

  let config : Config = Config::load().context("cannot start without oracle credentials")?;
  log::info!("Starting with {:?}", config);

  let chatter: Arc<dyn LLMChatter> = Arc::new(
    GroqProvider::new(&config.groq_api_key, &config.groq_url, config.oracle_timeout).context("failed to build oracle client")?
  );
  let app_state: AppState = AppState::new(&config, chatter);

  let server_builder = HttpServer::new(move || {
    let factory: CreateApp = CreateApp::new(app_state.clone());
    factory.build_app().wrap(actix_web::middleware::Logger::default())
  });

  let server = server_builder.bind((config.bind_address.as_str(), config.port))
    .with_context(|| format!("cannot bind {}:{}", config.bind_address, config.port))?;
  log::info!("Listening on {}:{}", config.bind_address, config.port);

  server.run().await?;

  Ok(())
}
