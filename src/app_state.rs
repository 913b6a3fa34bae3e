use std::sync::Arc;

use crate::{
    config::Config,
    errors::AttemptResult,
    repositories::{AssessmentRepository, HttpAssessmentRepository},
    services::attempt_session::AttemptSession,
};

/// Shared wiring for every attempt a host runs.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repository: Arc<dyn AssessmentRepository>,
}

impl AppState {
    pub fn new(config: Config) -> AttemptResult<Self> {
        config.validate()?;
        let repository = Arc::new(HttpAssessmentRepository::new(&config)?);

        Ok(Self {
            config: Arc::new(config),
            repository,
        })
    }

    pub fn with_repository(config: Config, repository: Arc<dyn AssessmentRepository>) -> Self {
        Self {
            config: Arc::new(config),
            repository,
        }
    }

    /// Loads the assessment and starts a fresh attempt on it.
    pub async fn start_attempt(&self, assessment_id: &str) -> AttemptResult<AttemptSession> {
        let assessment = self.repository.fetch_assessment(assessment_id).await?;
        let session = AttemptSession::new(
            assessment,
            Arc::clone(&self.repository),
            self.config.monitor_config(),
        )?;
        session.start()?;
        Ok(session)
    }
}
