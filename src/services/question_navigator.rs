use crate::errors::{AttemptError, AttemptResult};
use crate::models::domain::Question;
use crate::services::answer_store::AnswerStore;

#[derive(Debug, Clone)]
pub struct QuestionNavigator {
    current: usize,
    last_index: usize,
}

/// Per-question state for the navigator grid. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionStatus {
    pub index: usize,
    pub question_id: String,
    pub answered: bool,
    pub visited: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub unanswered: Vec<usize>,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.unanswered.is_empty()
    }
}

impl QuestionNavigator {
    pub fn new(question_count: usize) -> AttemptResult<Self> {
        if question_count == 0 {
            return Err(AttemptError::ValidationError(
                "Cannot navigate an assessment without questions".to_string(),
            ));
        }

        Ok(Self {
            current: 0,
            last_index: question_count - 1,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.last_index + 1
    }

    /// Always false: a navigator is never built over zero questions.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current == self.last_index
    }

    /// Advances one question; a no-op on the last one.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Steps back one question; a no-op on the first one.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn jump_to(&mut self, index: usize) -> AttemptResult<()> {
        if index > self.last_index {
            return Err(AttemptError::ValidationError(format!(
                "Question index {} is out of range (0..={})",
                index, self.last_index
            )));
        }
        self.current = index;
        Ok(())
    }

    pub fn statuses(&self, questions: &[Question], store: &AnswerStore) -> Vec<QuestionStatus> {
        questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionStatus {
                index,
                question_id: question.id.clone(),
                answered: store.is_answered(&question.id),
                visited: store.is_visited(&question.id),
                current: index == self.current,
            })
            .collect()
    }

    pub fn progress(&self, questions: &[Question], store: &AnswerStore) -> Progress {
        let unanswered: Vec<usize> = questions
            .iter()
            .enumerate()
            .filter(|(_, q)| !store.is_answered(&q.id))
            .map(|(index, _)| index)
            .collect();

        Progress {
            answered: questions.len() - unanswered.len(),
            total: questions.len(),
            unanswered,
        }
    }
}
