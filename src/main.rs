#[tokio::main]
async fn main() {
    // Keep the questionnaire readable; RUST_LOG=info shows request traces.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = stress_check_lib::run().await {
        if let Some(message) = stress_check_lib::failure_message(&e) {
            eprintln!("{}", message);
        }
        std::process::exit(1);
    }
}
