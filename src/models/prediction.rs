use serde::Serialize;

/// Normalized classifier output for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub delayed: bool,
    pub confidence_on_time: f64,
    pub confidence_delayed: f64,
}

impl PredictionResult {
    /// Wire label: 0 = on time, 1 = delayed.
    pub fn label(&self) -> u8 {
        u8::from(self.delayed)
    }

    pub fn label_text(&self) -> &'static str {
        if self.delayed {
            "Delayed"
        } else {
            "On Time"
        }
    }

    /// Confidence in the predicted class.
    pub fn confidence(&self) -> f64 {
        if self.delayed {
            self.confidence_delayed
        } else {
            self.confidence_on_time
        }
    }
}

/// Response body of `POST /predict`. Confidences are 4-decimal strings.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub prediction: u8,
    pub prediction_label: &'static str,
    pub confidence_on_time: String,
    pub confidence_delayed: String,
}

impl From<&PredictionResult> for PredictionResponse {
    fn from(result: &PredictionResult) -> Self {
        Self {
            prediction: result.label(),
            prediction_label: result.label_text(),
            confidence_on_time: format!("{:.4}", result.confidence_on_time),
            confidence_delayed: format!("{:.4}", result.confidence_delayed),
        }
    }
}
