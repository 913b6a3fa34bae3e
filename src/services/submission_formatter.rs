use chrono::{DateTime, NaiveDate, Utc};

use crate::models::domain::{AnswerValue, Assessment, QuestionType, SubmitReason, Violation};
use crate::models::dto::{AttemptSubmission, ResponseFragment, WireAnswer};
use crate::services::answer_store::AnswerStore;

/// Maps a raw answer into the wire fields the grading endpoint expects for
/// `question_type`. Unanswered questions still yield their type's field where
/// an empty value exists (`[]` or `""`).
pub fn format_answer(question_type: QuestionType, answer: Option<&AnswerValue>) -> WireAnswer {
    match question_type {
        QuestionType::SingleChoice | QuestionType::TrueFalse => WireAnswer {
            selected_options: Some(single_option(answer)),
            ..Default::default()
        },
        QuestionType::MultiChoice => WireAnswer {
            selected_options: Some(option_list(answer)),
            ..Default::default()
        },
        QuestionType::Numeric => numeric(answer),
        QuestionType::Date => date(answer),
        QuestionType::ShortText | QuestionType::LongText | QuestionType::FillBlank => WireAnswer {
            text_answer: Some(answer.map(text).unwrap_or_default()),
            ..Default::default()
        },
        QuestionType::FileUpload => WireAnswer {
            file_urls: Some(option_list(answer)),
            ..Default::default()
        },
    }
}

/// Builds the full submission body: one fragment per question, in assessment
/// order, answered or not.
pub fn build_submission(
    assessment: &Assessment,
    store: &AnswerStore,
    time_spent_secs: u64,
    started_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
    submit_reason: SubmitReason,
    violations: &[Violation],
) -> AttemptSubmission {
    let responses = assessment
        .questions
        .iter()
        .map(|question| ResponseFragment {
            question_id: question.id.clone(),
            answer: format_answer(question.question_type, store.get_answer(&question.id)),
            time_spent: store.time_spent(&question.id).as_secs(),
        })
        .collect();

    AttemptSubmission {
        assessment_id: assessment.id.clone(),
        responses,
        time_spent: time_spent_secs,
        started_at,
        submitted_at,
        submit_reason,
        violations: violations.to_vec(),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn single_option(answer: Option<&AnswerValue>) -> Vec<String> {
    let selected = match answer {
        Some(AnswerValue::Text(id)) => non_blank(id),
        Some(AnswerValue::List(ids)) => ids.iter().find_map(|id| non_blank(id)),
        Some(AnswerValue::Number(n)) => Some(n.to_string()),
        None => None,
    };
    selected.into_iter().collect()
}

fn option_list(answer: Option<&AnswerValue>) -> Vec<String> {
    match answer {
        Some(AnswerValue::List(ids)) => ids.iter().filter_map(|id| non_blank(id)).collect(),
        Some(AnswerValue::Text(id)) => non_blank(id).into_iter().collect(),
        Some(AnswerValue::Number(n)) => vec![n.to_string()],
        None => Vec::new(),
    }
}

fn text(answer: &AnswerValue) -> String {
    match answer {
        AnswerValue::Text(text) => text.clone(),
        AnswerValue::Number(n) => n.to_string(),
        AnswerValue::List(items) => items.join(", "),
    }
}

fn numeric(answer: Option<&AnswerValue>) -> WireAnswer {
    let raw = match answer {
        Some(AnswerValue::Number(n)) if n.is_finite() => {
            return WireAnswer {
                numeric_answer: Some(*n),
                ..Default::default()
            };
        }
        Some(AnswerValue::Number(_)) | None => return WireAnswer::default(),
        Some(AnswerValue::Text(text)) => text.trim().to_string(),
        Some(AnswerValue::List(items)) => items.first().map(|s| s.trim().to_string()).unwrap_or_default(),
    };

    if raw.is_empty() {
        return WireAnswer::default();
    }

    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => WireAnswer {
            numeric_answer: Some(n),
            ..Default::default()
        },
        _ => WireAnswer {
            text_answer: Some(raw),
            ..Default::default()
        },
    }
}

/// `dateAnswer` only ever carries an ISO day; anything else goes out as
/// `textAnswer` so the input is not lost.
fn date(answer: Option<&AnswerValue>) -> WireAnswer {
    let raw = match answer {
        Some(AnswerValue::Text(text)) => non_blank(text),
        Some(AnswerValue::List(items)) => items.iter().find_map(|s| non_blank(s)),
        Some(AnswerValue::Number(_)) | None => None,
    };
    let Some(raw) = raw else {
        return WireAnswer::default();
    };

    let day = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(&raw)
                .ok()
                .map(|instant| instant.date_naive())
        });

    match day {
        Some(day) => WireAnswer {
            date_answer: Some(day.format("%Y-%m-%d").to_string()),
            ..Default::default()
        },
        None => WireAnswer {
            text_answer: Some(raw),
            ..Default::default()
        },
    }
}
