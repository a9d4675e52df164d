use bytes::Bytes;
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::{ClientError, Result};
use crate::assessment::{display_value, PredictionResult, SubmissionPayload};
use crate::config::AppConfig;

/// Parsed `/predict` answer together with the status it came with.
#[derive(Debug, Clone)]
pub struct PredictionResponse {
    pub status: u16,
    pub result: PredictionResult,
}

// HTTP client for the assessment backend
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    predict_url: Url,
    report_url: Url,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(&config.base_url)?;
        let predict_url = base_url.join(&config.predict_path)?;
        let report_url = base_url.join(&config.report_path)?;

        Ok(Self {
            client,
            base_url,
            predict_url,
            report_url,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    pub fn report_url(&self) -> &Url {
        &self.report_url
    }

    /// POSTs the questionnaire and parses whatever comes back as JSON.
    /// The status is reported, never checked.
    pub async fn predict(&self, payload: &SubmissionPayload) -> Result<PredictionResponse> {
        debug!("POST {}", self.predict_url);

        let response = self
            .client
            .post(self.predict_url.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;

        debug!("Prediction response: status={}, {} bytes", status, body.len());
        Ok(PredictionResponse {
            status,
            result: PredictionResult::new(value),
        })
    }

    /// POSTs a stored result and returns the rendered document's bytes.
    pub async fn generate_report(&self, result: &PredictionResult) -> Result<Bytes> {
        debug!("POST {}", self.report_url);

        let response = self
            .client
            .post(self.report_url.clone())
            .json(result)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        if !status.is_success() {
            warn!("⚠️ Report endpoint answered {}", status);
        }

        if let Some(ct) = content_type.as_deref() {
            let ct = ct.to_ascii_lowercase();
            if ct.starts_with("application/json") || ct.starts_with("text/") {
                return Err(ClientError::Decode(format!(
                    "expected a binary report, got {}",
                    ct
                )));
            }
        }

        if bytes.is_empty() {
            return Err(ClientError::Decode("report body is empty".to_string()));
        }

        info!("📄 Received report: {} bytes", bytes.len());
        Ok(bytes)
    }

    /// GETs the backend root and returns its status message.
    pub async fn health(&self) -> Result<String> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Decode(format!("backend answered {}: {}", status, body)));
        }

        Ok(match serde_json::from_str::<Value>(&body) {
            Ok(value) if value.get("message").is_some() => display_value(value.get("message")),
            _ => body,
        })
    }
}
