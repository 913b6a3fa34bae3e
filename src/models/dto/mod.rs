pub mod assessment_dto;
pub mod response;
pub mod submission_dto;
pub use assessment_dto::{AssessmentDto, OptionDto, QuestionDto};
pub use response::{ApiBody, ApiResponse};
pub use submission_dto::{AttemptSubmission, ResponseFragment, WireAnswer};
