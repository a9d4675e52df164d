use log::{error, info, warn};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::backend::{BackendClient, PredictionResponse};
use super::view::{DownloadSink, ResultView};
use super::{ClientError, Result};
use crate::assessment::{
    PredictionResult, ResponseKind, StoredAssessment, SubmissionPayload, SubmitOutcome,
};
use crate::config::AppConfig;

/// Drives the questionnaire against the backend and owns the latest result.
///
/// Both actions take `&self` so they can run concurrently. By default the
/// response that resolves last owns the slot, whatever order the requests
/// were sent in. With `supersede_stale` a response from an older
/// submission is dropped once a newer one has been stored.
///
/// No lock on the slot is held while the view is called, so a view may read
/// [`SubmissionClient::latest`] from its callbacks.
pub struct SubmissionClient {
    backend: BackendClient,
    view: Arc<dyn ResultView>,
    sink: Arc<dyn DownloadSink>,
    report_filename: String,
    supersede_stale: bool,
    latest: Mutex<Option<StoredAssessment>>,
    render: Mutex<()>,
    generation: AtomicU64,
}

impl SubmissionClient {
    pub fn new(
        config: &AppConfig,
        view: Arc<dyn ResultView>,
        sink: Arc<dyn DownloadSink>,
    ) -> Result<Self> {
        let backend = BackendClient::new(config)?;
        Ok(Self {
            backend,
            view,
            sink,
            report_filename: config.report_filename.clone(),
            supersede_stale: config.supersede_stale,
            latest: Mutex::new(None),
            render: Mutex::new(()),
            generation: AtomicU64::new(0),
        })
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub fn latest(&self) -> Option<StoredAssessment> {
        self.latest.lock().clone()
    }

    pub fn latest_result(&self) -> Option<PredictionResult> {
        self.latest.lock().as_ref().map(|stored| stored.result.clone())
    }

    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.view.set_result_visible(false);
        self.view.set_loading(true);

        if payload.narrative_is_empty() {
            warn!("⚠️ Submission #{} has no free-text answers", generation);
        }
        info!("📤 Sending submission #{} to {}", generation, self.backend.predict_url());

        match self.backend.predict(payload).await {
            Ok(response) => Ok(self.accept(generation, response)),
            Err(e) => {
                self.view.set_loading(false);
                error!("❌ Submission #{} failed: {}", generation, e);
                self.view.alert(&format!("Error connecting to backend: {}", e));
                Err(e)
            }
        }
    }

    fn accept(&self, generation: u64, response: PredictionResponse) -> SubmitOutcome {
        let PredictionResponse { status, result } = response;
        let kind = ResponseKind::classify(status, &result);

        // Held until the view is updated so concurrent responses render in
        // the order they were stored. The slot lock is released first: views
        // may read the slot from any callback.
        let _render = self.render.lock();

        {
            let mut latest = self.latest.lock();
            if self.supersede_stale {
                if let Some(current) = latest.as_ref().map(|stored| stored.generation) {
                    if current > generation {
                        info!(
                            "⏭️ Dropping response for submission #{}; #{} is already shown",
                            generation, current
                        );
                        return SubmitOutcome::Superseded { generation, current };
                    }
                }
            }
            *latest = Some(StoredAssessment::new(result.clone(), generation));
        }

        if let ResponseKind::ErrorPayload { status, message } = &kind {
            warn!(
                "⚠️ Submission #{} got an error-shaped response (status {}, message {:?}); rendering it anyway",
                generation, status, message
            );
        }

        self.view.set_loading(false);
        self.view.set_result_visible(true);
        self.view.render(
            &result.stress_level_line(),
            &result.confidence_line(),
            &result.generated_at_line(),
        );
        info!("✅ Submission #{} rendered: {}", generation, result.stress_level());

        SubmitOutcome::Rendered {
            generation,
            kind,
            result,
        }
    }

    /// Renders the stored result into a report and saves it.
    pub async fn download_report(&self) -> Result<PathBuf> {
        let stored = match self.latest() {
            Some(stored) => stored,
            None => {
                warn!("Report requested before any successful submission");
                self.view.alert(&ClientError::Precondition.to_string());
                return Err(ClientError::Precondition);
            }
        };

        info!(
            "📄 Requesting report for submission #{} from {}",
            stored.generation,
            self.backend.report_url()
        );

        match self.fetch_report(&stored.result).await {
            Ok(path) => {
                info!("✅ Report saved to {}", path.display());
                Ok(path)
            }
            Err(e) => {
                error!("❌ Report download failed: {}", e);
                self.view.alert(&format!("Error generating PDF: {}", e));
                Err(e)
            }
        }
    }

    async fn fetch_report(&self, result: &PredictionResult) -> Result<PathBuf> {
        let report = self.backend.generate_report(result).await?;
        let path = self.sink.save(&self.report_filename, &report)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FileDownloadSink;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recorder {
        loading: Mutex<bool>,
        result_visible: Mutex<bool>,
        alerts: Mutex<Vec<String>>,
    }

    impl ResultView for Recorder {
        fn set_loading(&self, visible: bool) {
            *self.loading.lock() = visible;
        }

        fn set_result_visible(&self, visible: bool) {
            *self.result_visible.lock() = visible;
        }

        fn render(&self, _: &str, _: &str, _: &str) {}

        fn alert(&self, message: &str) {
            self.alerts.lock().push(message.to_string());
        }
    }

    fn unreachable_config() -> AppConfig {
        // Port 1 is never listening on a test host.
        AppConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_report_before_submit_is_precondition_failure() {
        let dir = tempdir().unwrap();
        let view = Arc::new(Recorder::default());
        let client = SubmissionClient::new(
            &unreachable_config(),
            view.clone(),
            Arc::new(FileDownloadSink::new(dir.path())),
        )
        .unwrap();

        let result = client.download_report().await;

        assert!(matches!(result, Err(ClientError::Precondition)));
        assert_eq!(
            *view.alerts.lock(),
            vec!["Please submit the form first to get your result!".to_string()]
        );
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_submit_network_failure_alerts_and_keeps_slot_empty() {
        let dir = tempdir().unwrap();
        let view = Arc::new(Recorder::default());
        let client = SubmissionClient::new(
            &unreachable_config(),
            view.clone(),
            Arc::new(FileDownloadSink::new(dir.path())),
        )
        .unwrap();

        let result = client.submit(&SubmissionPayload::default()).await;

        assert!(matches!(result, Err(ClientError::Network(_))));
        assert!(!*view.loading.lock());
        assert!(!*view.result_visible.lock());
        let alerts = view.alerts.lock();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Error connecting to backend: "));
        assert!(client.latest().is_none());
    }
}
