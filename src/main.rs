use paca_climate::{ClimateError, ClimatePipeline, PipelineConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const PARTIAL_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(report) if report.is_complete() => {
            log::info!(
                "Processed dataset ready at {:?} ({} rows)",
                report.processed_path,
                report.rows
            );
            ExitCode::SUCCESS
        }
        Ok(report) => {
            for failure in &report.failures {
                log::error!(
                    "No data for {} over {}: {}",
                    failure.location,
                    failure.range,
                    failure.error
                );
            }
            log::warn!(
                "Processed dataset at {:?} is missing {} location(s)",
                report.processed_path,
                report.failures.len()
            );
            ExitCode::from(PARTIAL_FAILURE)
        }
        Err(e) => {
            log::error!("Pipeline failed: {}", error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<paca_climate::RunReport, ClimateError> {
    let config = PipelineConfig::from_env()?;
    log::info!(
        "Running pipeline for {} location(s) over {}",
        config.locations.len(),
        config.period
    );
    ClimatePipeline::new(config)?.run().await
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
