use clap::Parser;
use lotto_live::config::toml_config::TomlConfig;
use lotto_live::core::ConfigProvider;
use lotto_live::utils::{logger, validation::Validate};
use lotto_live::{CanonicalDate, HttpFetcher, LiveResultsPipeline, ResultsEngine};

#[derive(Parser)]
#[command(name = "toml-results")]
#[command(about = "Live lottery results with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "lotto-live.toml")]
    config: String,

    /// Report draws for this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    date: Option<CanonicalDate>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(date) = args.date {
        config.date = Some(date);
        tracing::info!("🔧 Date overridden to: {}", date);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No pages will be fetched");
        return Ok(());
    }

    let fetcher = HttpFetcher::new(&config.service.user_agent, config.fetch_timeout())?;
    let pipeline = LiveResultsPipeline::new(fetcher, config)?;
    let engine = ResultsEngine::new(pipeline);

    match engine.run().await {
        Ok(output) => {
            println!("{}", output.body);
        }
        Err(e) => {
            tracing::error!(
                "❌ Live results run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  Service: {}", config.service.name);
    tracing::info!("  Time zone: {}", config.service.time_zone);
    tracing::info!("  Timeout: {}s", config.service.timeout_seconds);
    match config.fixed_date() {
        Some(date) => tracing::info!("  Date: {}", date),
        None => tracing::info!("  Date: today"),
    }
    for source in &config.sources {
        tracing::info!(
            "  Source: {} ({:?}){}",
            source.label(),
            source.format,
            source
                .game
                .as_deref()
                .map(|g| format!(" game={}", g))
                .unwrap_or_default()
        );
    }
    tracing::info!("  Games: {}", config.game_table().len());
}
