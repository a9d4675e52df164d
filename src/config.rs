use config::{Config, ConfigError, Environment, File, Source};
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REPORT_FILENAME: &str = "stress_report.pdf";
pub const ENV_PREFIX: &str = "STRESS_CHECK";
const CONFIG_FILE_NAME: &str = "stress-check";

/// Runtime settings for the submission client.
///
/// Layered as: built-in defaults, then an optional `stress-check.toml`
/// (or any format the `config` crate recognises), then `STRESS_CHECK_*`
/// environment variables. A `.env` file is loaded first when present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub base_url: String,
    pub predict_path: String,
    pub report_path: String,
    pub report_filename: String,
    pub output_dir: PathBuf,
    /// No timeout unless set; the backend is trusted to answer.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Drop responses from submissions older than the stored one.
    pub supersede_stale: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: "/predict".to_string(),
            report_path: "/generate-pdf".to_string(),
            report_filename: DEFAULT_REPORT_FILENAME.to_string(),
            output_dir: PathBuf::from("."),
            request_timeout_secs: None,
            supersede_stale: false,
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then `stress-check.*` from the working directory, then
    /// the environment.
    pub fn load() -> Result<Self, ConfigError> {
        // Don't fail if .env doesn't exist
        dotenvy::dotenv().ok();

        let config = Self::build(Some(File::with_name(CONFIG_FILE_NAME).required(false)), ENV_PREFIX)?;
        info!(
            "🔧 Backend: {} (predict: {}, report: {})",
            config.base_url, config.predict_path, config.report_path
        );
        Ok(config)
    }

    /// Same layering as [`AppConfig::load`] with an explicit file and prefix.
    pub fn load_from(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        Self::build(path.map(|p| File::from(p).required(false)), env_prefix)
    }

    fn build<S>(file: Option<S>, env_prefix: &str) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let defaults = AppConfig::default();

        let mut builder = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("predict_path", defaults.predict_path)?
            .set_default("report_path", defaults.report_path)?
            .set_default("report_filename", defaults.report_filename)?
            .set_default("output_dir", defaults.output_dir.to_string_lossy().to_string())?
            .set_default("supersede_stale", defaults.supersede_stale)?;

        if let Some(file) = file {
            builder = builder.add_source(file);
        }

        let config: AppConfig = builder
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_sources() {
        let config = AppConfig::load_from(None, "STRESS_CHECK_TEST_DEFAULTS").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"http://10.0.0.5:8000\"").unwrap();
        writeln!(file, "request_timeout_secs = 20").unwrap();
        writeln!(file, "supersede_stale = true").unwrap();

        let config = AppConfig::load_from(Some(file.path()), "STRESS_CHECK_TEST_FILE").unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
        assert!(config.supersede_stale);
        assert_eq!(config.predict_path, "/predict");
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "report_filename = \"from_file.pdf\"").unwrap();

        std::env::set_var("STRESS_CHECK_TEST_ENV_REPORT_FILENAME", "from_env.pdf");
        std::env::set_var("STRESS_CHECK_TEST_ENV_SUPERSEDE_STALE", "true");
        let config = AppConfig::load_from(Some(file.path()), "STRESS_CHECK_TEST_ENV").unwrap();
        std::env::remove_var("STRESS_CHECK_TEST_ENV_REPORT_FILENAME");
        std::env::remove_var("STRESS_CHECK_TEST_ENV_SUPERSEDE_STALE");

        assert_eq!(config.report_filename, "from_env.pdf");
        assert!(config.supersede_stale);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let file = NamedTempFile::new().unwrap();
        let missing = file.path().with_extension("does-not-exist.toml");
        let config = AppConfig::load_from(Some(&missing), "STRESS_CHECK_TEST_MISSING").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
