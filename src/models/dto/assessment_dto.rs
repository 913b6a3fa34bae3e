use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AttemptError, AttemptResult};
use crate::models::domain::{Assessment, DurationUnit, Question, QuestionOption, QuestionType};

/// Assessment as returned by `GET /assessments/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDto {
    #[serde(alias = "_id")]
    #[validate(length(min = 1))]
    pub id: String,

    #[validate(length(min = 1, max = 300))]
    pub title: String,

    // In whatever unit the backend uses; converted in `into_domain`.
    #[serde(default, alias = "timeLimit")]
    pub duration: Option<u64>,

    #[serde(default)]
    pub total_points: Option<u32>,

    #[serde(default)]
    pub passing_score: u32,

    #[serde(default)]
    pub max_attempts: Option<u32>,

    #[validate(length(min = 1, message = "Assessment has no questions"))]
    #[validate(nested)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    #[serde(alias = "_id")]
    #[validate(length(min = 1))]
    pub id: String,

    #[serde(alias = "questionText")]
    pub text: String,

    #[serde(alias = "type")]
    pub question_type: QuestionType,

    #[serde(default = "default_points")]
    pub points: u32,

    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<OptionDto>,

    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    #[serde(alias = "_id")]
    #[validate(length(min = 1))]
    pub id: String,

    #[serde(alias = "optionText")]
    pub text: String,

    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
}

fn default_points() -> u32 {
    1
}

impl AssessmentDto {
    /// Validates the payload and converts it into the attempt's domain model,
    /// normalizing the duration to seconds.
    pub fn into_domain(self, unit: DurationUnit) -> AttemptResult<Assessment> {
        self.validate()?;

        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(AttemptError::ValidationError(format!(
                    "Duplicate question id '{}'",
                    question.id
                )));
            }
        }

        let questions = self
            .questions
            .into_iter()
            .map(Question::try_from)
            .collect::<AttemptResult<Vec<_>>>()?;

        let total_points = self
            .total_points
            .unwrap_or_else(|| questions.iter().map(|q| q.points).sum());

        Ok(Assessment {
            id: self.id,
            title: self.title,
            duration_secs: self.duration.map(|d| unit.to_secs(d)).unwrap_or(0),
            total_points,
            passing_score: self.passing_score,
            max_attempts: self.max_attempts,
            questions,
        })
    }
}

impl TryFrom<QuestionDto> for Question {
    type Error = AttemptError;

    fn try_from(dto: QuestionDto) -> Result<Self, Self::Error> {
        let mut options: Vec<QuestionOption> = dto
            .options
            .into_iter()
            .map(|o| QuestionOption {
                id: o.id,
                text: o.text,
                image_url: o.image_url,
            })
            .collect();

        if options.is_empty() {
            match dto.question_type {
                QuestionType::TrueFalse => {
                    options = vec![
                        QuestionOption {
                            id: "true".to_string(),
                            text: "True".to_string(),
                            image_url: None,
                        },
                        QuestionOption {
                            id: "false".to_string(),
                            text: "False".to_string(),
                            image_url: None,
                        },
                    ];
                }
                QuestionType::SingleChoice | QuestionType::MultiChoice => {
                    return Err(AttemptError::ValidationError(format!(
                        "Choice question '{}' has no options",
                        dto.id
                    )));
                }
                _ => {}
            }
        }

        Ok(Question {
            id: dto.id,
            text: dto.text,
            question_type: dto.question_type,
            points: dto.points,
            options,
            image_url: dto.image_url,
        })
    }
}
