pub mod entries;
pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod schedule;

pub use crate::domain::model::{ExportTable, LoadOutcome, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
