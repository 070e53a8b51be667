pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod pipeline;
pub mod reachability;

#[cfg(test)]
mod testing;

pub use config::PipelineConfig;
pub use error::{FinishError, Result};
pub use pipeline::{FinishPipeline, FinishRequest, PipelineReport};
