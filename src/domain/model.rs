use serde::{Deserialize, Serialize};

/// 一筆 delegate vote 記錄；欄位順序與 API 回傳順序一致
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }
}

/// Transform 階段的輸出：表頭與已轉成字串的資料列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Load 階段的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Written { path: String, records: usize },
    Skipped,
}
