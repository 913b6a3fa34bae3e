use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub question_type: QuestionType,
    pub points: u32,
    pub options: Vec<QuestionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[serde(alias = "multiple_choice")]
    SingleChoice,
    #[serde(alias = "multiple_select", alias = "checkbox")]
    MultiChoice,
    TrueFalse,
    #[serde(alias = "short_answer")]
    ShortText,
    #[serde(alias = "essay")]
    LongText,
    #[serde(alias = "fill_in_blank")]
    FillBlank,
    #[serde(alias = "number")]
    Numeric,
    Date,
    #[serde(alias = "file")]
    FileUpload,
}

impl QuestionType {
    pub const ALL: [QuestionType; 9] = [
        QuestionType::SingleChoice,
        QuestionType::MultiChoice,
        QuestionType::TrueFalse,
        QuestionType::ShortText,
        QuestionType::LongText,
        QuestionType::FillBlank,
        QuestionType::Numeric,
        QuestionType::Date,
        QuestionType::FileUpload,
    ];

    /// Choice types render an option list and answer with option ids.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultiChoice | QuestionType::TrueFalse
        )
    }
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}
