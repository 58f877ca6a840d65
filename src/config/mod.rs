pub mod allocation;
pub mod cli;

use crate::core::schedule::ScheduledTime;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://postgrest-production-148c.up.railway.app";

const EXAMPLES: &str = "\
Examples:
  # Run immediately with default output filename
  delegate-votes

  # Run immediately with custom output filename
  delegate-votes -o votes_2024.csv

  # Schedule to run at 14:30 (2:30 PM)
  delegate-votes -t 14:30

  # Schedule to run at 9:00 AM with custom filename
  delegate-votes -t 09:00 -o morning_votes.csv

  # Use custom API URL
  delegate-votes --api-url https://custom-api.example.com";

/// 預設輸出檔名，時間戳取自程式啟動當下
pub fn default_output_path() -> String {
    format!(
        "delegate_votes_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "delegate-votes")]
#[command(about = "Query delegate votes and save to CSV")]
#[command(after_help = EXAMPLES)]
pub struct CliConfig {
    /// Output CSV filename (default: delegate_votes_YYYYMMDD_HHMMSS.csv)
    #[arg(short, long, default_value_t = default_output_path(), hide_default_value = true)]
    pub output: String,

    /// Schedule execution time in HH:MM format (24-hour). If not specified, runs immediately.
    #[arg(short, long)]
    pub time: Option<String>,

    /// API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    pub fn schedule(&self) -> Result<Option<ScheduledTime>> {
        self.time.as_deref().map(str::parse).transpose()
    }
}

impl ConfigProvider for CliConfig {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn output_path(&self) -> &str {
        &self.output
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_path("output", &self.output)?;
        self.schedule()?;
        Ok(())
    }
}
