use crate::models::domain::{Assessment, Question, QuestionOption, QuestionType};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use crate::models::domain::{AttemptResults, SubmissionReceipt};

    /// A question with two options named `<id>-a` and `<id>-b`.
    pub fn question(id: &str, question_type: QuestionType) -> Question {
        let options = if question_type.is_choice() {
            ["a", "b"]
                .iter()
                .map(|suffix| QuestionOption {
                    id: format!("{}-{}", id, suffix),
                    text: format!("Option {}", suffix.to_uppercase()),
                    image_url: None,
                })
                .collect()
        } else {
            Vec::new()
        };

        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            question_type,
            points: 1,
            options,
            image_url: None,
        }
    }

    /// Three single-choice questions `q1`..`q3`.
    pub fn single_choice_assessment(duration_secs: u64) -> Assessment {
        Assessment {
            id: "asmt-1".to_string(),
            title: "Chapter 1 check".to_string(),
            duration_secs,
            total_points: 3,
            passing_score: 2,
            max_attempts: Some(2),
            questions: ["q1", "q2", "q3"]
                .iter()
                .map(|id| question(id, QuestionType::SingleChoice))
                .collect(),
        }
    }

    /// One question of every type, ids prefixed with `m-`.
    pub fn mixed_assessment() -> Assessment {
        let questions = vec![
            question("m-single", QuestionType::SingleChoice),
            question("m-multi", QuestionType::MultiChoice),
            question("m-tf", QuestionType::TrueFalse),
            question("m-short", QuestionType::ShortText),
            question("m-long", QuestionType::LongText),
            question("m-fill", QuestionType::FillBlank),
            question("m-num", QuestionType::Numeric),
            question("m-date", QuestionType::Date),
            question("m-file", QuestionType::FileUpload),
        ];

        Assessment {
            id: "asmt-mixed".to_string(),
            title: "Everything quiz".to_string(),
            duration_secs: 0,
            total_points: questions.len() as u32,
            passing_score: 5,
            max_attempts: None,
            questions,
        }
    }

    pub fn receipt(attempt_id: &str) -> SubmissionReceipt {
        SubmissionReceipt {
            attempt_id: attempt_id.to_string(),
            results: AttemptResults {
                score: 2.0,
                percentage: 66.7,
                passed: true,
                grade: Some("C".to_string()),
                extra: Default::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_single_choice_assessment() {
        let assessment = single_choice_assessment(60);
        assert_eq!(assessment.questions.len(), 3);
        assert_eq!(assessment.questions[0].options[0].id, "q1-a");
        assert!(assessment.is_timed());
    }

    #[test]
    fn test_fixtures_mixed_assessment_has_unique_ids() {
        let assessment = mixed_assessment();
        let mut ids = assessment.question_ids();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), assessment.questions.len());
    }
}
