use crate::utils::error::{ExportError, Result};
use chrono::{Local, NaiveDateTime, NaiveTime};
use std::str::FromStr;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A wall-clock time of day (`HH:MM`, 24-hour) at which the export should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTime {
    time: NaiveTime,
}

impl ScheduledTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|time| Self { time })
    }

    /// Next occurrence strictly after `now`: today if still ahead, otherwise tomorrow.
    pub fn next_run_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.time);
        if today <= now {
            today + chrono::Duration::days(1)
        } else {
            today
        }
    }

    /// Blocks the pipeline until the next occurrence in local time.
    pub async fn wait_until(&self) {
        let now = Local::now().naive_local();
        let target = self.next_run_after(now);
        let wait = target - now;

        tracing::info!("🕒 Current time: {}", now.format(DISPLAY_FORMAT));
        tracing::info!("📅 Scheduled to run at: {}", target.format(DISPLAY_FORMAT));
        tracing::info!("⏳ Waiting {} seconds...", wait.num_seconds());

        tokio::time::sleep(wait.to_std().unwrap_or_default()).await;

        tracing::info!(
            "🚀 Executing at {}",
            Local::now().naive_local().format(DISPLAY_FORMAT)
        );
    }
}

impl FromStr for ScheduledTime {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ExportError::InvalidTimeFormatError {
            value: s.to_string(),
        };

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
        let minute: u32 = minute.trim().parse().map_err(|_| invalid())?;

        Self::new(hour, minute).ok_or_else(invalid)
    }
}
