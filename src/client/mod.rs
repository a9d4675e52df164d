pub mod backend;
pub mod controller;
pub mod view;

pub use backend::{BackendClient, PredictionResponse};
pub use controller::SubmissionClient;
pub use view::{DownloadSink, FileDownloadSink, ResultView};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Please submit the form first to get your result!")]
    Precondition,
    #[error("Failed to save report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
