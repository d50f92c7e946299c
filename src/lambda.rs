#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use lotto_live::config::lambda::config_from_env;
#[cfg(feature = "lambda")]
use lotto_live::core::ConfigProvider;
#[cfg(feature = "lambda")]
use lotto_live::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use lotto_live::{HttpFetcher, HttpResponse, LiveResultsPipeline, ResultsEngine, ResultsError};

#[cfg(feature = "lambda")]
async fn live_results() -> Result<HttpResponse, ResultsError> {
    let config = config_from_env()?;
    config.validate()?;

    let fetcher = HttpFetcher::new(&config.service.user_agent, config.fetch_timeout())?;
    let pipeline = LiveResultsPipeline::new(fetcher, config)?;
    let output = ResultsEngine::new(pipeline).run().await?;

    Ok(HttpResponse::ok(&output.results))
}

#[cfg(feature = "lambda")]
async fn function_handler(_event: LambdaEvent<serde_json::Value>) -> Result<HttpResponse, Error> {
    tracing::info!("Starting live results function");

    // 部分遊戲失敗仍回傳 200，只有整體失敗才回傳 500
    let response = match live_results().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                "Live results function failed: {} (Category: {:?})",
                e,
                e.category()
            );
            HttpResponse::failure(&e)
        }
    };

    tracing::info!("Live results function finished with {}", response.status_code);
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
