use super::models::PredictionResult;

/// How a parsed prediction response looks once the HTTP status is taken
/// into account. Rendering and storage ignore this; it only feeds logging
/// and callers that want to tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    Success,
    ErrorPayload { status: u16, message: Option<String> },
}

impl ResponseKind {
    pub fn classify(status: u16, result: &PredictionResult) -> Self {
        let message = result.error_message();
        if (200..300).contains(&status) && message.is_none() {
            ResponseKind::Success
        } else {
            ResponseKind::ErrorPayload { status, message }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseKind::Success)
    }
}

/// What a `submit` call ended up doing with its response.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Rendered and stored as the latest result.
    Rendered {
        generation: u64,
        kind: ResponseKind,
        result: PredictionResult,
    },
    /// A newer submission had already been stored; this response was dropped.
    Superseded { generation: u64, current: u64 },
}

impl SubmitOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            SubmitOutcome::Rendered { generation, .. } => *generation,
            SubmitOutcome::Superseded { generation, .. } => *generation,
        }
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmitOutcome::Rendered { result, .. } => Some(result),
            SubmitOutcome::Superseded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_ok_body() {
        let result = PredictionResult::new(json!({"stressLevel": "1 - Calm"}));
        assert_eq!(ResponseKind::classify(200, &result), ResponseKind::Success);
    }

    #[test]
    fn test_classify_error_status() {
        let result = PredictionResult::new(json!({"error": "No text provided"}));
        let kind = ResponseKind::classify(400, &result);
        assert_eq!(
            kind,
            ResponseKind::ErrorPayload {
                status: 400,
                message: Some("No text provided".to_string())
            }
        );
        assert!(!kind.is_success());
    }

    #[test]
    fn test_classify_error_key_with_ok_status() {
        let result = PredictionResult::new(json!({"error": "model unavailable"}));
        assert!(!ResponseKind::classify(200, &result).is_success());
    }

    #[test]
    fn test_classify_server_error_without_message() {
        let result = PredictionResult::new(json!({"detail": "oops"}));
        assert_eq!(
            ResponseKind::classify(503, &result),
            ResponseKind::ErrorPayload { status: 503, message: None }
        );
    }
}
