#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};

use assessment_attempt::{
    errors::{AttemptError, AttemptResult},
    models::{
        domain::{Assessment, AttemptResults, DurationUnit, SubmissionReceipt},
        dto::{AssessmentDto, AttemptSubmission},
    },
    repositories::AssessmentRepository,
};

/// Grading backend kept in memory. Records every submission it receives.
#[derive(Clone, Default)]
pub struct InMemoryAssessmentRepository {
    assessments: Arc<RwLock<HashMap<String, Assessment>>>,
    submissions: Arc<Mutex<Vec<AttemptSubmission>>>,
    failures_left: Arc<Mutex<usize>>,
    latency: Option<Duration>,
}

impl InMemoryAssessmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn insert(&self, assessment: Assessment) {
        self.assessments
            .write()
            .await
            .insert(assessment.id.clone(), assessment);
    }

    /// The next `count` submissions fail with a network error.
    pub async fn fail_next(&self, count: usize) {
        *self.failures_left.lock().await = count;
    }

    pub async fn submissions(&self) -> Vec<AttemptSubmission> {
        self.submissions.lock().await.clone()
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn fetch_assessment(&self, assessment_id: &str) -> AttemptResult<Assessment> {
        let assessments = self.assessments.read().await;
        assessments.get(assessment_id).cloned().ok_or_else(|| {
            AttemptError::NotFound(format!("Assessment with id '{}' not found", assessment_id))
        })
    }

    async fn submit_attempt(
        &self,
        assessment_id: &str,
        submission: &AttemptSubmission,
    ) -> AttemptResult<SubmissionReceipt> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if !self.assessments.read().await.contains_key(assessment_id) {
            return Err(AttemptError::NotFound(format!(
                "Assessment with id '{}' not found",
                assessment_id
            )));
        }

        {
            let mut failures_left = self.failures_left.lock().await;
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(AttemptError::NetworkError("connection reset".to_string()));
            }
        }

        let mut submissions = self.submissions.lock().await;
        submissions.push(submission.clone());
        let answered = submission
            .responses
            .iter()
            .filter(|r| {
                r.answer
                    .selected_options
                    .as_ref()
                    .is_some_and(|options| !options.is_empty())
            })
            .count();

        Ok(SubmissionReceipt {
            attempt_id: format!("attempt-{}", submissions.len()),
            results: AttemptResults {
                score: answered as f64,
                percentage: answered as f64 * 100.0 / submission.responses.len().max(1) as f64,
                passed: answered * 2 >= submission.responses.len(),
                grade: None,
                extra: Default::default(),
            },
        })
    }
}

/// Three single-choice questions `q1`..`q3`, decoded the way the backend
/// payload is. `duration` is in minutes; `None` means untimed.
pub fn three_question_assessment(duration: Option<u64>) -> Assessment {
    let questions: Vec<Value> = ["q1", "q2", "q3"]
        .iter()
        .map(|id| {
            json!({
                "_id": id,
                "questionText": format!("Question {}", id),
                "questionType": "single_choice",
                "options": [
                    { "_id": format!("{}-a", id), "optionText": "A" },
                    { "_id": format!("{}-b", id), "optionText": "B" },
                ],
            })
        })
        .collect();

    let body = json!({
        "_id": "asmt-1",
        "title": "Chapter 1 check",
        "duration": duration,
        "passingScore": 2,
        "questions": questions,
    });

    let dto: AssessmentDto = serde_json::from_value(body).unwrap();
    dto.into_domain(DurationUnit::Minutes).unwrap()
}
