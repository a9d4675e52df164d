use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Questionnaire answers as the prediction endpoint expects them.
/// Every text field is sent verbatim, empty strings included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lifestyle: String,
    #[serde(default)]
    pub lately: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub stress_causes: String,
    #[serde(default)]
    pub handling: String,
    #[serde(default)]
    pub worries: String,
    #[serde(default)]
    pub extra: String,
    #[serde(default)]
    pub consent: bool,
}

/// The thirteen free-text answers of the form, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Username,
    Password,
    Gender,
    Age,
    Description,
    Lifestyle,
    Lately,
    Mood,
    Reflection,
    StressCauses,
    Handling,
    Worries,
    Extra,
}

impl SubmissionPayload {
    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Username => &mut self.username,
            TextField::Password => &mut self.password,
            TextField::Gender => &mut self.gender,
            TextField::Age => &mut self.age,
            TextField::Description => &mut self.description,
            TextField::Lifestyle => &mut self.lifestyle,
            TextField::Lately => &mut self.lately,
            TextField::Mood => &mut self.mood,
            TextField::Reflection => &mut self.reflection,
            TextField::StressCauses => &mut self.stress_causes,
            TextField::Handling => &mut self.handling,
            TextField::Worries => &mut self.worries,
            TextField::Extra => &mut self.extra,
        }
    }

    /// The free-text answers the backend scores, in the order it joins them.
    pub fn narrative_fields(&self) -> [&str; 9] {
        [
            self.description.as_str(),
            self.lifestyle.as_str(),
            self.lately.as_str(),
            self.mood.as_str(),
            self.reflection.as_str(),
            self.stress_causes.as_str(),
            self.handling.as_str(),
            self.worries.as_str(),
            self.extra.as_str(),
        ]
    }

    /// True when no narrative answer carries any text. The backend answers
    /// such a payload with an error body, which is still rendered.
    pub fn narrative_is_empty(&self) -> bool {
        self.narrative_fields().iter().all(|f| f.trim().is_empty())
    }
}

/// Whatever JSON the prediction endpoint answered with.
///
/// Kept verbatim so the report request echoes exactly what was received;
/// the accessors only read from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionResult(Value);

impl PredictionResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Top-level field lookup. Non-object bodies have no fields.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(key))
    }

    pub fn stress_level(&self) -> String {
        display_value(self.field("stressLevel"))
    }

    pub fn confidence(&self) -> String {
        display_value(self.field("confidence"))
    }

    pub fn timestamp(&self) -> String {
        display_value(self.field("timestamp"))
    }

    /// Numeric stress level (0-5) when the backend includes one.
    pub fn level(&self) -> Option<i64> {
        self.field("level").and_then(Value::as_i64)
    }

    pub fn recommendations(&self) -> Vec<String> {
        match self.field("recommendations") {
            Some(Value::Array(items)) => items.iter().map(|v| display_value(Some(v))).collect(),
            _ => Vec::new(),
        }
    }

    /// Error message carried in the body, e.g. `{"error": "No text provided"}`.
    pub fn error_message(&self) -> Option<String> {
        self.field("error").map(|v| display_value(Some(v)))
    }

    pub fn stress_level_line(&self) -> String {
        format!("Stress Level: {}", self.stress_level())
    }

    pub fn confidence_line(&self) -> String {
        format!("Model Confidence: {}", self.confidence())
    }

    pub fn generated_at_line(&self) -> String {
        format!("Generated at: {}", self.timestamp())
    }
}

/// Renders a JSON value the way a browser would concatenate it into text.
/// Absent fields read as `undefined` rather than failing.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}
