use anyhow::Result;
use log::{error, info};
use std::time::Duration;
use stress_check_lib::client::BackendClient;
use stress_check_lib::config::AppConfig;
use tokio::time::timeout;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;
    let backend = BackendClient::new(&config)?;

    info!("🧪 Checking backend at {}", config.base_url);
    println!("\n=== STRESS CHECK BACKEND ===\n");
    println!("Prediction endpoint: {}", backend.predict_url());
    println!("Report endpoint:     {}", backend.report_url());

    match timeout(Duration::from_secs(5), backend.health()).await {
        Ok(Ok(message)) => {
            println!("\n✅ Backend is up: {}", message);
            Ok(())
        }
        Ok(Err(e)) => {
            error!("❌ Backend check failed: {}", e);
            println!("\n❌ Backend unreachable: {}", e);
            std::process::exit(1);
        }
        Err(_) => {
            error!("❌ Backend did not answer within 5s");
            println!("\n❌ Backend did not answer within 5 seconds");
            std::process::exit(1);
        }
    }
}
