pub mod category;
pub mod intent_router;
pub mod prompts;
