use crate::core::schedule::ScheduledTime;
use crate::core::{LoadOutcome, Pipeline};
use crate::utils::error::Result;

/// Runs a pipeline once: optional time gate, then extract, transform, load.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    schedule: Option<ScheduledTime>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            schedule: None,
        }
    }

    pub fn with_schedule(mut self, schedule: Option<ScheduledTime>) -> Self {
        self.schedule = schedule;
        self
    }

    pub async fn run(&self) -> Result<LoadOutcome> {
        if let Some(schedule) = &self.schedule {
            schedule.wait_until().await;
        }

        // Extract
        tracing::debug!("Extracting data...");
        let raw_data = self.pipeline.extract().await?;

        // Transform
        tracing::debug!("Transforming {} records...", raw_data.len());
        let table = self.pipeline.transform(raw_data).await?;

        // Load
        tracing::debug!("Loading {} rows...", table.len());
        self.pipeline.load(table).await
    }
}
