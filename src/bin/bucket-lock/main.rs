use anyhow::{Context, Result};
use bucket_policy::{adapters::inbound::cli::{run_command, BucketLockCli}, AppBuilder};
use clap::Parser;
use tracing::{debug, Level};

fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    // stdout is reserved for confirmation lines
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = BucketLockCli::parse();
    init_logging(&cli.log_level)?;

    debug!("Cloud Storage endpoint: {}", cli.backend.gcs_endpoint);
    let config = cli.backend.to_app_config();
    let app = AppBuilder::new()
        .with_config(config)
        .build()
        .context("Failed to build application")?;

    let mut stdout = std::io::stdout().lock();
    run_command(&app.policy_controller, &cli.command, &mut stdout)
        .await
        .with_context(|| format!("bucket-lock failed for {}", cli.command.bucket))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucket_policy::StorageBackend;

    #[test]
    fn test_cli_parsing() {
        let cli = BucketLockCli::parse_from([
            "bucket-lock",
            "my-bucket",
            "--retention-period",
            "5",
            "--set-retention-policy",
            "--gcs-endpoint",
            "http://localhost:4443",
        ]);

        assert_eq!(cli.command.bucket, "my-bucket");
        assert_eq!(cli.command.retention_period, Some(5));
        assert!(cli.command.set_retention_policy);
        assert!(matches!(
            cli.backend.to_app_config().storage_backend,
            StorageBackend::Gcs(_)
        ));
        assert!(AppBuilder::new()
            .with_config(cli.backend.to_app_config())
            .build()
            .is_ok());
    }
}
