use delegate_votes::config::cli::LocalStorage;
use delegate_votes::core::entries::{process_delegate_votes, write_report, EntriesReport};
use delegate_votes::core::Storage;
use delegate_votes::{AllocationConfig, CliConfig, DelegateVotesPipeline, EtlEngine};
use httpmock::prelude::*;
use tempfile::TempDir;

/// 匯出的 CSV 直接作為分配工具的輸入
#[tokio::test]
async fn test_exported_csv_feeds_entry_allocation() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path());

    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(GET).path("/current_delegate_votes_view");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(
                r#"[
                    {"delegate_hex": "0xsmall", "current_votes": "0xde0b6b3a7640000"},
                    {"delegate_hex": "0xwhale", "current_votes": "0xa968163f0a57b400000"},
                    {"delegate_hex": "0xmid", "current_votes": "0x3635c9adc5dea00000"}
                ]"#,
            );
    }).await;

    let config = CliConfig {
        output: "votes.csv".to_string(),
        time: None,
        api_url: server.base_url(),
        verbose: false,
    };
    let pipeline = DelegateVotesPipeline::new(storage.clone(), config).unwrap();
    EtlEngine::new(pipeline).run().await.unwrap();

    let csv_data = storage.read_file("votes.csv").await.unwrap();
    let allocation = AllocationConfig::default();
    let delegates = process_delegate_votes(&allocation, &csv_data).unwrap();

    // 0xsmall 只有 1 票，低於門檻
    assert_eq!(delegates.len(), 2);
    assert_eq!(delegates[0].address.as_deref(), Some("0xwhale"));
    assert_eq!(delegates[0].votes, 50_000.0);
    assert_eq!(delegates[0].entries, 100);
    assert_eq!(delegates[1].address.as_deref(), Some("0xmid"));
    assert_eq!(delegates[1].entries, 5);

    let report = EntriesReport::new(allocation, delegates);
    let simple_path = write_report(&storage, "entries.json", &report).await.unwrap();

    assert!(storage.exists("entries.json"));
    assert!(storage.exists(&simple_path));

    let simple: serde_json::Value =
        serde_json::from_slice(&storage.read_file(&simple_path).await.unwrap()).unwrap();
    assert_eq!(
        simple,
        serde_json::json!([
            {"address": "0xwhale", "entries": 100},
            {"address": "0xmid", "entries": 5}
        ])
    );
}
