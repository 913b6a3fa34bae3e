use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AttemptError;
use crate::models::domain::question::Question;

/// An assessment as fetched for one attempt. Durations are always seconds here;
/// the unit the API speaks is converted when the DTO is mapped.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Assessment {
    pub id: String,
    pub title: String,
    pub duration_secs: u64, // 0 means untimed
    pub total_points: u32,
    pub passing_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    pub questions: Vec<Question>,
}

impl Assessment {
    pub fn is_timed(&self) -> bool {
        self.duration_secs > 0
    }

    pub fn question_ids(&self) -> Vec<&str> {
        self.questions.iter().map(|q| q.id.as_str()).collect()
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Minutes,
    Seconds,
}

impl DurationUnit {
    pub fn to_secs(&self, value: u64) -> u64 {
        match self {
            DurationUnit::Minutes => value.saturating_mul(60),
            DurationUnit::Seconds => value,
        }
    }
}

impl FromStr for DurationUnit {
    type Err = AttemptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minutes" | "minute" | "min" | "m" => Ok(DurationUnit::Minutes),
            "seconds" | "second" | "sec" | "s" => Ok(DurationUnit::Seconds),
            other => Err(AttemptError::ValidationError(format!(
                "Unknown duration unit '{}'",
                other
            ))),
        }
    }
}
