pub mod answer;
pub mod assessment;
pub mod attempt;
pub mod question;
pub mod violation;
pub use answer::AnswerValue;
pub use assessment::{Assessment, DurationUnit};
pub use attempt::{AttemptPhase, AttemptResults, Route, SubmissionReceipt, SubmitOutcome, SubmitReason};
pub use question::{Question, QuestionOption, QuestionType};
pub use violation::{Detector, Violation, ViolationKind};
