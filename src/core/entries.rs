//! Converts exported delegate vote weights into entry allocations.
//!
//! Delegates below `min_votes` get nothing, delegates at or above `max_votes`
//! get `max_entries`, and everyone in between is scaled linearly from
//! `min_entries` and rounded to the nearest whole entry.

use crate::config::allocation::AllocationConfig;
use crate::core::normalize::DECIMAL_COLUMN;
use crate::core::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Column holding the delegate address in the exported CSV.
pub const ADDRESS_COLUMN: &str = "delegate_hex";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelegateEntry {
    pub address: Option<String>,
    pub entries: u32,
    pub votes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleEntry {
    pub address: Option<String>,
    pub entries: u32,
}

impl From<&DelegateEntry> for SimpleEntry {
    fn from(entry: &DelegateEntry) -> Self {
        Self {
            address: entry.address.clone(),
            entries: entry.entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStats {
    pub total_delegates: usize,
    pub total_entries: u64,
    pub avg_entries: f64,
    pub max_entries_delegate: Option<DelegateEntry>,
    pub min_entries_delegate: Option<DelegateEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesReport {
    pub config: AllocationConfig,
    pub generated_at: DateTime<Utc>,
    pub stats: EntryStats,
    pub delegates: Vec<DelegateEntry>,
}

impl EntriesReport {
    pub fn new(config: AllocationConfig, delegates: Vec<DelegateEntry>) -> Self {
        let stats = generate_stats(&delegates);
        Self {
            config,
            generated_at: Utc::now(),
            stats,
            delegates,
        }
    }

    pub fn simple(&self) -> Vec<SimpleEntry> {
        self.delegates.iter().map(SimpleEntry::from).collect()
    }
}

pub fn calculate_entries(config: &AllocationConfig, votes: f64) -> u32 {
    if votes.is_nan() || votes < config.min_votes {
        return 0;
    }

    if votes >= config.max_votes {
        return config.max_entries;
    }

    let vote_range = config.max_votes - config.min_votes;
    let entry_range = f64::from(config.max_entries) - f64::from(config.min_entries);
    let votes_above_min = votes - config.min_votes;

    let entries = f64::from(config.min_entries) + (votes_above_min / vote_range) * entry_range;
    entries.round() as u32
}

/// Reads an exported CSV and returns delegates with at least one entry,
/// ordered by entries descending. Ties keep their CSV order.
pub fn process_delegate_votes(
    config: &AllocationConfig,
    csv_data: &[u8],
) -> Result<Vec<DelegateEntry>> {
    let mut reader = csv::Reader::from_reader(csv_data);

    let mut rows = Vec::new();
    for row in reader.deserialize::<HashMap<String, String>>() {
        rows.push(row?);
    }
    tracing::info!("📥 Loaded {} records from CSV", rows.len());

    let mut results: Vec<DelegateEntry> = rows
        .into_iter()
        .filter_map(|row| {
            let votes = parse_votes(row.get(DECIMAL_COLUMN).map(String::as_str))?;
            let entries = calculate_entries(config, votes);
            Some(DelegateEntry {
                address: row.get(ADDRESS_COLUMN).cloned(),
                entries,
                votes,
            })
        })
        .filter(|entry| entry.entries > 0)
        .collect();

    results.sort_by(|a, b| b.entries.cmp(&a.entries));
    Ok(results)
}

// 空值視為 0；無法解析的值回傳 None，該列直接略過
fn parse_votes(raw: Option<&str>) -> Option<f64> {
    match raw.map(str::trim) {
        None | Some("") => Some(0.0),
        Some(text) => text.parse::<f64>().ok().filter(|v| !v.is_nan()),
    }
}

pub fn generate_stats(results: &[DelegateEntry]) -> EntryStats {
    let total_entries: u64 = results.iter().map(|entry| u64::from(entry.entries)).sum();
    let total_delegates = results.len();
    let avg_entries = if total_delegates > 0 {
        total_entries as f64 / total_delegates as f64
    } else {
        0.0
    };

    EntryStats {
        total_delegates,
        total_entries,
        avg_entries: (avg_entries * 100.0).round() / 100.0,
        max_entries_delegate: results.first().cloned(),
        min_entries_delegate: results.last().cloned(),
    }
}

pub fn default_report_path() -> String {
    format!("delegate_entries_{}.json", Utc::now().timestamp_millis())
}

/// `entries.json` -> `entries_simple.json`, next to the full report.
pub fn simple_report_path(output_path: &str) -> String {
    let path = Path::new(output_path);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}_simple.json", stem))
        .to_string_lossy()
        .into_owned()
}

/// Writes the full report and its `{address, entries}` companion; returns the companion's path.
pub async fn write_report<S: Storage>(
    storage: &S,
    output_path: &str,
    report: &EntriesReport,
) -> Result<String> {
    let full = serde_json::to_string_pretty(report)?;
    storage.write_file(output_path, full.as_bytes()).await?;
    tracing::debug!("Wrote full report ({} bytes) to {}", full.len(), output_path);

    let simple_path = simple_report_path(output_path);
    let simple = serde_json::to_string_pretty(&report.simple())?;
    storage.write_file(&simple_path, simple.as_bytes()).await?;

    Ok(simple_path)
}
