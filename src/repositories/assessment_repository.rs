use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    errors::AttemptResult,
    models::{
        domain::{Assessment, DurationUnit, SubmissionReceipt},
        dto::{ApiBody, AssessmentDto, AttemptSubmission},
    },
    services::http_helpers::{endpoint, error_for_status},
};

/// Remote grading API as seen by one attempt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn fetch_assessment(&self, assessment_id: &str) -> AttemptResult<Assessment>;
    async fn submit_attempt(
        &self,
        assessment_id: &str,
        submission: &AttemptSubmission,
    ) -> AttemptResult<SubmissionReceipt>;
}

pub struct HttpAssessmentRepository {
    client: Client,
    base_url: String,
    api_token: Option<SecretString>,
    duration_unit: DurationUnit,
}

impl HttpAssessmentRepository {
    pub fn new(config: &Config) -> AttemptResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            api_token: config.api_token.clone(),
            duration_unit: config.duration_unit,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn read_body<T: DeserializeOwned>(response: Response) -> AttemptResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body));
        }

        let body: ApiBody<T> = response.json().await?;
        Ok(body.into_inner())
    }
}

#[async_trait]
impl AssessmentRepository for HttpAssessmentRepository {
    async fn fetch_assessment(&self, assessment_id: &str) -> AttemptResult<Assessment> {
        let url = endpoint(&self.base_url, &["assessments", assessment_id])?;
        log::debug!("Fetching assessment from {}", url);

        let response = self.authorize(self.client.get(url)).send().await?;
        let dto: AssessmentDto = Self::read_body(response).await?;
        let assessment = dto.into_domain(self.duration_unit)?;

        log::info!(
            "Fetched assessment {} with {} questions",
            assessment.id,
            assessment.questions.len()
        );
        Ok(assessment)
    }

    async fn submit_attempt(
        &self,
        assessment_id: &str,
        submission: &AttemptSubmission,
    ) -> AttemptResult<SubmissionReceipt> {
        let url = endpoint(&self.base_url, &["assessments", assessment_id, "attempts"])?;
        log::debug!("Posting attempt to {}", url);

        let response = self
            .authorize(self.client.post(url).json(submission))
            .send()
            .await?;
        Self::read_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpAssessmentRepository>();
    }

    #[test]
    fn test_new_uses_config() {
        let config = Config::test_config();
        let repository = HttpAssessmentRepository::new(&config).unwrap();

        assert_eq!(repository.base_url, config.api_base_url);
        assert_eq!(repository.duration_unit, DurationUnit::Minutes);
        assert!(repository.api_token.is_some());
    }

    #[tokio::test]
    async fn test_fetch_fails_fast_on_invalid_base_url() {
        let mut config = Config::test_config();
        config.api_base_url = "not a url".to_string();
        let repository = HttpAssessmentRepository::new(&config).unwrap();

        let err = repository.fetch_assessment("a-1").await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
