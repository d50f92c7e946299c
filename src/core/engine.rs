use crate::core::{Pipeline, ResultSet};
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub results: ResultSet,
    /// Serialized result set, as produced by the pipeline's load step.
    pub body: String,
}

pub struct ResultsEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ResultsEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunOutput> {
        let started = Instant::now();
        tracing::info!("Starting live results run");

        // Extract
        let blocks = self.pipeline.extract().await?;
        tracing::info!("Extracted {} game block(s)", blocks.len());

        // Transform
        let results = self.pipeline.transform(blocks).await?;
        tracing::info!("Matched today's draws for {} game(s)", results.len());

        // Load
        let body = self.pipeline.load(&results).await?;
        tracing::info!("Run finished in {:?}", started.elapsed());

        Ok(RunOutput { results, body })
    }
}
