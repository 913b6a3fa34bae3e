use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{SubmitReason, Violation};

/// Body of `POST /assessments/{id}/attempts`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSubmission {
    pub assessment_id: String,
    pub responses: Vec<ResponseFragment>,
    pub time_spent: u64,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
    pub submit_reason: SubmitReason,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl AttemptSubmission {
    pub fn response(&self, question_id: &str) -> Option<&ResponseFragment> {
        self.responses.iter().find(|r| r.question_id == question_id)
    }
}

/// One question's answer in wire form.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFragment {
    pub question_id: String,
    #[serde(flatten)]
    pub answer: WireAnswer,
    pub time_spent: u64,
}

/// Type-dependent answer fields; fields that do not belong to the question type
/// stay `None` and are left off the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_answer: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_urls: Option<Vec<String>>,
}

impl WireAnswer {
    /// Names of the wire fields that are present, in declaration order.
    pub fn populated_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.selected_options.is_some() {
            fields.push("selectedOptions");
        }
        if self.text_answer.is_some() {
            fields.push("textAnswer");
        }
        if self.numeric_answer.is_some() {
            fields.push("numericAnswer");
        }
        if self.date_answer.is_some() {
            fields.push("dateAnswer");
        }
        if self.file_urls.is_some() {
            fields.push("fileUrls");
        }
        fields
    }
}
