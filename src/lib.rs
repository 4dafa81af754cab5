pub mod align;
pub mod config;
pub mod error;
pub mod linewrap;
pub mod pairs;
pub mod pipeline;
pub mod segmenter;
pub mod sentence;
pub mod subtitle;
pub mod timecode;
pub mod transcript;
pub mod translate;

pub use config::Config;
pub use error::{Result, SubalignError};
pub use pipeline::{print_summary, run_pipeline, PipelineResult, PipelineStats};
