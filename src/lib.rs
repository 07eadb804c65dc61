pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;

pub use pipeline::{run, transform, PipelineError, PipelineOutput};
