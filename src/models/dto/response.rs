use serde::{de::DeserializeOwned, Deserialize};

/// `{ "data": ..., "message": ... }` envelope some backend routes wrap payloads in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

/// A response body that is either enveloped or the bare payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiBody<T> {
    Wrapped(ApiResponse<T>),
    Bare(T),
}

impl<T: DeserializeOwned> ApiBody<T> {
    pub fn into_inner(self) -> T {
        match self {
            ApiBody::Wrapped(response) => response.data,
            ApiBody::Bare(data) => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::SubmissionReceipt;

    #[test]
    fn unwraps_enveloped_payload() {
        let json = r#"{
            "success": true,
            "message": "Assessment submitted",
            "data": {
                "attemptId": "att-1",
                "results": { "score": 3, "percentage": 100, "passed": true }
            }
        }"#;

        let body: ApiBody<SubmissionReceipt> = serde_json::from_str(json).unwrap();
        assert_eq!(body.into_inner().attempt_id, "att-1");
    }

    #[test]
    fn accepts_bare_payload() {
        let json = r#"{
            "attemptId": "att-2",
            "results": { "score": 0, "percentage": 0, "passed": false }
        }"#;

        let body: ApiBody<SubmissionReceipt> = serde_json::from_str(json).unwrap();
        let receipt = body.into_inner();
        assert_eq!(receipt.attempt_id, "att-2");
        assert!(!receipt.results.passed);
    }
}
