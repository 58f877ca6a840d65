use crate::core::normalize::{normalize_votes, render_cell, DECIMAL_COLUMN, VOTES_FIELD};
use crate::core::{ConfigProvider, ExportTable, LoadOutcome, Pipeline, Record, Storage};
use crate::utils::error::{ExportError, Result};
use reqwest::Client;

/// PostgREST view exposing the current delegate vote weights.
pub const VOTES_VIEW: &str = "current_delegate_votes_view";

pub struct DelegateVotesPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> DelegateVotesPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            storage,
            config,
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.config.api_url().trim_end_matches('/'), VOTES_VIEW)
    }
}

/// 以第一筆記錄的欄位作為表頭，後續記錄多出的欄位會被捨棄
pub fn build_table(records: &[Record]) -> ExportTable {
    let Some(first) = records.first() else {
        return ExportTable::default();
    };

    let source_columns: Vec<String> = first.keys().cloned().collect();

    let rows = records
        .iter()
        .map(|record| {
            let mut row: Vec<String> = source_columns
                .iter()
                .map(|column| record.data.get(column).map(render_cell).unwrap_or_default())
                .collect();
            row.push(normalize_votes(record.data.get(VOTES_FIELD)).render());
            row
        })
        .collect();

    let mut headers = source_columns;
    headers.push(DECIMAL_COLUMN.to_string());

    ExportTable { headers, rows }
}

pub fn encode_csv(table: &ExportTable) -> Result<Vec<u8>> {
    // 與 RFC 4180 一致，每列以 CRLF 結尾
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DelegateVotesPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let endpoint = self.endpoint();
        tracing::info!("🌐 Fetching data from {}...", endpoint);

        let response = self.client.get(&endpoint).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let json_data: serde_json::Value = response.error_for_status()?.json().await?;

        let serde_json::Value::Array(items) = json_data else {
            return Err(ExportError::UnexpectedResponseError {
                endpoint,
                message: "expected a JSON array of records".to_string(),
            });
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                serde_json::Value::Object(data) => records.push(Record::new(data)),
                other => {
                    return Err(ExportError::UnexpectedResponseError {
                        endpoint,
                        message: format!("element {} is not an object: {}", index, other),
                    });
                }
            }
        }

        tracing::info!("✅ Successfully fetched {} records", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<ExportTable> {
        let table = build_table(&data);
        tracing::debug!(
            "Built table with {} columns and {} rows",
            table.headers.len(),
            table.len()
        );
        Ok(table)
    }

    async fn load(&self, table: ExportTable) -> Result<LoadOutcome> {
        if table.is_empty() {
            tracing::warn!("⚠️ No data to save");
            return Ok(LoadOutcome::Skipped);
        }

        let path = self.config.output_path();
        let csv_data = encode_csv(&table)?;

        tracing::debug!("Writing CSV ({} bytes) to {}", csv_data.len(), path);
        self.storage.write_file(path, &csv_data).await?;

        Ok(LoadOutcome::Written {
            path: path.to_string(),
            records: table.len(),
        })
    }
}
