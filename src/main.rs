use clap::Parser;
use delegate_votes::utils::{error::ExportError, logger, validation::Validate};
use delegate_votes::{CliConfig, DelegateVotesPipeline, EtlEngine, LoadOutcome, LocalStorage};
use std::io::Write;

fn fail(e: ExportError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置，需在等待與網路請求之前完成
    if let Err(e) = config.validate() {
        fail(e);
    }
    let schedule = config.schedule().unwrap_or_else(|e| fail(e));

    let pipeline = match DelegateVotesPipeline::new(LocalStorage::default(), config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(e),
    };
    let engine = EtlEngine::new(pipeline).with_schedule(schedule);

    let outcome = engine.run().await.unwrap_or_else(|e| fail(e));
    if let Err(e) = report_outcome(&outcome, &mut std::io::stdout(), &mut std::io::stderr()) {
        fail(e.into());
    }
}

// 成功訊息寫到 stdout，沒有資料時的警告寫到 stderr
fn report_outcome(
    outcome: &LoadOutcome,
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<()> {
    match outcome {
        LoadOutcome::Written { path, records } => {
            writeln!(out, "Data successfully saved to {}", path)?;
            writeln!(out, "Total records: {}", records)
        }
        LoadOutcome::Skipped => writeln!(err, "No data to save"),
    }
}
