use anyhow::{bail, Context};
use clap::Parser;
use delegate_votes::config::allocation::{AllocationConfig, AllocationOverrides};
use delegate_votes::core::entries::{
    default_report_path, process_delegate_votes, write_report, EntriesReport, EntryStats,
};
use delegate_votes::core::Storage;
use delegate_votes::utils::{logger, validation::Validate};
use delegate_votes::LocalStorage;

#[derive(Parser)]
#[command(name = "delegate-entries")]
#[command(about = "Calculate delegate entries from an exported delegate votes CSV")]
struct Args {
    /// Delegate votes CSV produced by delegate-votes
    csv_file: String,

    /// Output JSON file (default: delegate_entries_<timestamp>.json)
    output_file: Option<String>,

    /// TOML file with an [allocation] table
    #[arg(short, long)]
    config: Option<String>,

    /// Minimum votes required to receive entries
    #[arg(long)]
    min_votes: Option<f64>,

    /// Votes at which the maximum number of entries is reached
    #[arg(long)]
    max_votes: Option<f64>,

    /// Entries granted at the minimum threshold
    #[arg(long)]
    min_entries: Option<u32>,

    /// Entries granted at or above the maximum threshold
    #[arg(long)]
    max_entries: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> AllocationOverrides {
        AllocationOverrides {
            min_votes: self.min_votes,
            max_votes: self.max_votes,
            min_entries: self.min_entries,
            max_entries: self.max_entries,
        }
    }
}

fn load_config(args: &Args) -> anyhow::Result<AllocationConfig> {
    let base = match &args.config {
        Some(path) => AllocationConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => AllocationConfig::default(),
    };

    // 命令列參數優先於設定檔
    let config = base.with_overrides(&args.overrides());
    config.validate().context("Invalid allocation configuration")?;
    Ok(config)
}

fn display_config(config: &AllocationConfig) {
    tracing::info!("⚙️ Processing Configuration:");
    tracing::info!("  Min votes: {} → {} entries", config.min_votes, config.min_entries);
    tracing::info!("  Max votes: {} → {} entries", config.max_votes, config.max_entries);
}

fn display_stats(stats: &EntryStats) {
    println!("\n=== Statistics ===");
    println!("Total delegates with entries: {}", stats.total_delegates);
    println!("Total entries allocated: {}", stats.total_entries);
    println!("Average entries per delegate: {}", stats.avg_entries);

    let sides = [
        ("Top delegate", &stats.max_entries_delegate),
        ("Bottom delegate (min threshold)", &stats.min_entries_delegate),
    ];
    for (label, delegate) in sides {
        if let Some(delegate) = delegate {
            println!("\n{}:", label);
            println!("  Address: {}", delegate.address.as_deref().unwrap_or("-"));
            println!("  Votes: {}", delegate.votes);
            println!("  Entries: {}", delegate.entries);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    let config = load_config(&args)?;
    let storage = LocalStorage::default();

    if !storage.exists(&args.csv_file) {
        bail!("CSV file not found: {}", args.csv_file);
    }

    display_config(&config);

    let csv_data = storage
        .read_file(&args.csv_file)
        .await
        .with_context(|| format!("Failed to read {}", args.csv_file))?;
    let delegates = process_delegate_votes(&config, &csv_data)
        .with_context(|| format!("Error processing CSV {}", args.csv_file))?;

    let report = EntriesReport::new(config, delegates);
    display_stats(&report.stats);

    let output_path = args.output_file.clone().unwrap_or_else(default_report_path);
    let simple_path = write_report(&storage, &output_path, &report)
        .await
        .with_context(|| format!("Failed to write results to {}", output_path))?;

    tracing::info!("💾 Results saved to: {}", output_path);
    println!("\nResults saved to: {}", output_path);
    println!("Simple format saved to: {}", simple_path);

    Ok(())
}
