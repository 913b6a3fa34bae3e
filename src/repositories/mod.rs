pub mod assessment_repository;

pub use assessment_repository::{AssessmentRepository, HttpAssessmentRepository};

#[cfg(test)]
pub use assessment_repository::MockAssessmentRepository;
