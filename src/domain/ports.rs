use crate::domain::model::{ExportTable, LoadOutcome, Record};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn output_path(&self) -> &str;

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(30)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<ExportTable>;
    async fn load(&self, table: ExportTable) -> Result<LoadOutcome>;
}
