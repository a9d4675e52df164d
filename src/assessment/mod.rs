pub mod models;
pub mod outcome;

pub use models::{display_value, PredictionResult, SubmissionPayload, TextField};
pub use outcome::{ResponseKind, SubmitOutcome};

use chrono::{DateTime, Utc};

/// The latest-result slot's content: the backend's answer plus when and by
/// which submission it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAssessment {
    pub result: PredictionResult,
    pub generation: u64,
    pub received_at: DateTime<Utc>,
}

impl StoredAssessment {
    pub fn new(result: PredictionResult, generation: u64) -> Self {
        Self {
            result,
            generation,
            received_at: Utc::now(),
        }
    }
}
