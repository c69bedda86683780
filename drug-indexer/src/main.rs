use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use drug_indexer::{Dependencies, IndexerSettings, IndexingError, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Run the indexer once. Returns `false` when the run was interrupted.
async fn run(settings: IndexerSettings) -> Result<bool, IndexingError> {
    let dependencies = Dependencies::new(&settings).await?;

    tokio::select! {
        report = dependencies.orchestrator.run() => {
            let report = report?;
            if report.has_failures() {
                let ids: Vec<i32> = report.failed.iter().map(|r| r.drug_id).collect();
                warn!(failed = ?ids, "Some drugs were not indexed");
            }
            Ok(true)
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Received shutdown signal");
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let settings = match IndexerSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(settings.log_format);

    match run(settings).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "Drug indexer failed");
            ExitCode::FAILURE
        }
    }
}
