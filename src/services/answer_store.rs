use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::models::domain::AnswerValue;

/// In-memory answers for a single attempt, keyed by question id.
///
/// Writes overwrite; nothing is merged or validated here. Which widget the
/// host renders for a question decides the shape of the value.
#[derive(Debug, Default, Clone)]
pub struct AnswerStore {
    answers: HashMap<String, AnswerValue>,
    visited: HashSet<String>,
    time_spent: HashMap<String, Duration>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `question_id`, returning whatever it replaced.
    pub fn set_answer(
        &mut self,
        question_id: impl Into<String>,
        value: AnswerValue,
    ) -> Option<AnswerValue> {
        self.answers.insert(question_id.into(), value)
    }

    pub fn get_answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers
            .get(question_id)
            .map(|value| !value.is_empty())
            .unwrap_or(false)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|v| !v.is_empty()).count()
    }

    /// Returns true the first time a question is shown.
    pub fn mark_visited(&mut self, question_id: &str) -> bool {
        self.visited.insert(question_id.to_string())
    }

    pub fn is_visited(&self, question_id: &str) -> bool {
        self.visited.contains(question_id)
    }

    pub fn record_time(&mut self, question_id: &str, elapsed: Duration) {
        *self
            .time_spent
            .entry(question_id.to_string())
            .or_insert(Duration::ZERO) += elapsed;
    }

    pub fn time_spent(&self, question_id: &str) -> Duration {
        self.time_spent
            .get(question_id)
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}
