pub mod dot_pipeline;
pub mod logger;
