use std::collections::HashSet;
use std::env;

use secrecy::SecretString;

use crate::errors::{AttemptError, AttemptResult};
use crate::models::domain::{Detector, DurationUnit};
use crate::services::violation_monitor::MonitorConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<SecretString>,
    pub request_timeout_secs: u64,
    pub duration_unit: DurationUnit,
    pub max_violations: usize,
    pub detectors: HashSet<Detector>,
    pub devtools_threshold_px: u32,
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first if present.
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_base_url: env::var("ASSESSMENT_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            api_token: env::var("ASSESSMENT_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            request_timeout_secs: env::var("ASSESSMENT_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),
            duration_unit: env::var("ASSESSMENT_DURATION_UNIT")
                .ok()
                .and_then(|u| match u.parse() {
                    Ok(unit) => Some(unit),
                    Err(e) => {
                        log::warn!("{}; using minutes", e);
                        None
                    }
                })
                .unwrap_or_default(),
            max_violations: env::var("ASSESSMENT_MAX_VIOLATIONS")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(3),
            detectors: env::var("ASSESSMENT_DETECTORS")
                .ok()
                .map(|list| parse_detectors(&list))
                .unwrap_or_else(|| Detector::ALL.into_iter().collect()),
            devtools_threshold_px: env::var("ASSESSMENT_DEVTOOLS_THRESHOLD_PX")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(160),
        }
    }

    /// Checks values that would make every attempt fail or misbehave.
    pub fn validate(&self) -> AttemptResult<()> {
        reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            AttemptError::ValidationError(format!(
                "ASSESSMENT_API_BASE_URL '{}' is not a valid URL: {}",
                self.api_base_url, e
            ))
        })?;

        if self.max_violations == 0 {
            return Err(AttemptError::ValidationError(
                "ASSESSMENT_MAX_VIOLATIONS must be at least 1".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(AttemptError::ValidationError(
                "ASSESSMENT_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            detectors: self.detectors.clone(),
            max_violations: self.max_violations,
            devtools_threshold_px: self.devtools_threshold_px,
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000/api".to_string(),
            api_token: Some(SecretString::from("test_api_token".to_string())),
            request_timeout_secs: 5,
            duration_unit: DurationUnit::Minutes,
            max_violations: 3,
            detectors: Detector::ALL.into_iter().collect(),
            devtools_threshold_px: 160,
        }
    }
}

fn parse_detectors(list: &str) -> HashSet<Detector> {
    list.split(',')
        .filter(|item| !item.trim().is_empty())
        .filter_map(|item| match item.parse() {
            Ok(detector) => Some(detector),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        })
        .collect()
}
