use anyhow::{Context, Result};
use log::{info, warn};
use std::io;
use std::sync::Arc;

pub mod assessment;
pub mod client;
pub mod config;
pub mod terminal;

use assessment::SubmissionPayload;
use client::{ClientError, FileDownloadSink, SubmissionClient};
use config::AppConfig;
use terminal::{CliArgs, Session, TerminalView};

/// A client failure the view has already alerted about.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AlreadyReported(#[from] pub ClientError);

/// The line to print when `run` fails, or `None` if the user has seen it.
pub fn failure_message(error: &anyhow::Error) -> Option<String> {
    if error.downcast_ref::<AlreadyReported>().is_some() {
        None
    } else {
        Some(format!("Error running application: {:#}", error))
    }
}

pub async fn run() -> Result<()> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", CliArgs::usage());
        return Ok(());
    }

    let config = AppConfig::load().context("Failed to load configuration")?;
    let client = build_client(&config)?;

    match args.form {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read form file {}", path.display()))?;
            let payload: SubmissionPayload = serde_json::from_str(&contents)
                .with_context(|| format!("Form file {} is not valid JSON", path.display()))?;

            info!("Submitting answers from {}", path.display());
            client.submit(&payload).await.map_err(AlreadyReported)?;

            if args.report {
                let saved = client.download_report().await.map_err(AlreadyReported)?;
                println!("📄 Report saved to {}", saved.display());
            }
            Ok(())
        }
        None => {
            let stdin = io::stdin();
            let mut session = Session::new(stdin.lock(), io::stdout());
            session.run(&client).await
        }
    }
}

pub fn build_client(config: &AppConfig) -> Result<SubmissionClient> {
    let sink = FileDownloadSink::new(&config.output_dir);
    if !config.output_dir.exists() {
        warn!("Output directory {} will be created on first download", config.output_dir.display());
    }

    let client = SubmissionClient::new(config, Arc::new(TerminalView), Arc::new(sink))
        .context("Failed to create backend client")?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_failures_are_not_printed_again() {
        let reported = anyhow::Error::from(AlreadyReported(ClientError::Precondition));
        assert_eq!(failure_message(&reported), None);

        let config = anyhow::anyhow!("bad value").context("Failed to load configuration");
        assert_eq!(
            failure_message(&config).as_deref(),
            Some("Error running application: Failed to load configuration: bad value")
        );
    }
}
