use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptPhase {
    NotStarted,
    InProgress,
    Submitting,
    Completed,
}

/// What caused a submission to be dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    Manual,
    TimeUp,
    Exit,
    ViolationLimit,
}

/// Result of asking a session to submit.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Submitted(SubmissionReceipt),
    /// Another submission was already in flight; nothing was sent.
    InFlight,
    /// The attempt already completed; nothing was sent.
    AlreadySubmitted,
}

/// The one-time navigation a host performs after the attempt ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Results { attempt_id: String },
    Exit,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub attempt_id: String,
    pub results: AttemptResults,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResults {
    pub score: f64,
    pub percentage: f64,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
