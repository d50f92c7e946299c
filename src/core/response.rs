use crate::domain::model::ResultSet;
use crate::utils::error::ResultsError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const FAILURE_MESSAGE: &str = "Failed to fetch lottery results.";

/// HTTP-style envelope returned by the function handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: IndexMap<String, String>,
    pub body: String,
}

#[derive(Debug, Serialize)]
struct FailureBody<'a> {
    error: &'a str,
    details: String,
}

impl HttpResponse {
    /// 200 with a permissive CORS header so any site can read the results.
    pub fn ok(results: &ResultSet) -> Self {
        let body = serde_json::to_string(results).unwrap_or_else(|_| "{}".to_string());
        let mut headers = json_headers();
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        Self {
            status_code: 200,
            headers,
            body,
        }
    }

    pub fn failure(error: &ResultsError) -> Self {
        let body = serde_json::to_string(&FailureBody {
            error: FAILURE_MESSAGE,
            details: error.to_string(),
        })
        .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, FAILURE_MESSAGE));
        Self {
            status_code: 500,
            headers: json_headers(),
            body,
        }
    }
}

fn json_headers() -> IndexMap<String, String> {
    let mut headers = IndexMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CanonicalDate, DrawRecord};
    use crate::core::aggregator::ResultAggregator;

    #[test]
    fn test_ok_envelope() {
        let today = CanonicalDate::from_ymd(2025, 6, 17).unwrap();
        let mut aggregator = ResultAggregator::new();
        aggregator.fold(DrawRecord::new("NUMBERS", "Evening", "4 5 6", today, today).unwrap());

        let response = HttpResponse::ok(&aggregator.finish());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["headers"]["Access-Control-Allow-Origin"], "*");
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        assert_eq!(response.body, r#"{"NUMBERS":{"Evening":"4 5 6"}}"#);
    }

    #[test]
    fn test_failure_envelope_carries_details() {
        let err = ResultsError::MissingConfigError {
            field: "sources".to_string(),
        };
        let response = HttpResponse::failure(&err);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();

        assert_eq!(response.status_code, 500);
        assert_eq!(body["error"], FAILURE_MESSAGE);
        assert_eq!(body["details"], "Missing required configuration: sources");
        assert!(!response.headers.contains_key("Access-Control-Allow-Origin"));
    }
}
