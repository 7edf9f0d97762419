pub mod agent_service;
pub mod service;
