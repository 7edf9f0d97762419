pub mod groq;
pub mod model_provider;
pub mod models;

#[cfg(test)]
pub mod stub;
