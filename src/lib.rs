pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{allocation::AllocationConfig, cli::LocalStorage, CliConfig};
pub use crate::core::{etl::EtlEngine, pipeline::DelegateVotesPipeline, schedule::ScheduledTime};
pub use crate::domain::model::LoadOutcome;
pub use crate::utils::error::{ExportError, Result};
