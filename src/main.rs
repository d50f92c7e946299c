use clap::Parser;
use lotto_live::utils::error::ErrorSeverity;
use lotto_live::utils::{logger, validation::Validate};
use lotto_live::{CliConfig, HttpFetcher, LiveResultsPipeline, ResultsEngine, ResultsError};

fn exit_code(e: &ResultsError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &ResultsError) -> ! {
    tracing::error!(
        "❌ Live results run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting lotto-live CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = cli.to_config();
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let fetcher = HttpFetcher::new(
        &config.service.user_agent,
        std::time::Duration::from_secs(config.service.timeout_seconds),
    )
    .unwrap_or_else(|e| fail(&e));
    let pipeline = LiveResultsPipeline::new(fetcher, config).unwrap_or_else(|e| fail(&e));
    let engine = ResultsEngine::new(pipeline);

    match engine.run().await {
        Ok(output) => {
            if output.results.is_empty() {
                tracing::warn!("No draws for today were found");
            }
            if let Some(path) = &cli.output {
                std::fs::write(path, &output.body)?;
                tracing::info!("📁 Output saved to: {}", path);
            }
            println!("{}", output.body);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
