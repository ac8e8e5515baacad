//! Outcome envelopes delivered to the frontend, and the rules that build them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::fetch::FetchedBody;

/// Error text used whenever a structured body fails to decode.
pub const PARSE_FAILURE: &str = "Failed parsing API JSON response";

/// Result of one structured (JSON) relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub url: String,
    pub result: Option<Value>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one raw (holiday) relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayEnvelope {
    pub result: HolidayResult,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayResult {
    pub holiday_body: String,
}

fn status_error(fetched: &FetchedBody) -> Option<String> {
    (!fetched.is_ok()).then(|| format!("HTTP status {}", fetched.status))
}

/// Interpret a fetch outcome in structured mode.
///
/// A body that fails to decode always yields `success: false`, even on 200.
/// An empty or whitespace-only body yields `result: None`.
pub fn api_envelope(url: &str, outcome: Result<FetchedBody, FetchError>) -> ApiEnvelope {
    let fetched = match outcome {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::error!("Failed getting api: {}", e);
            return ApiEnvelope {
                url: url.to_string(),
                result: None,
                success: false,
                error: Some(e.to_string()),
            };
        }
    };

    if fetched.is_ok() {
        tracing::info!("Received successful Weather API data");
    } else {
        // body may still carry error detail from the server
        tracing::error!("Failed getting api: status {}", fetched.status);
    }

    let mut result = None;
    if !fetched.body.trim().is_empty() {
        match serde_json::from_str::<Value>(&fetched.body) {
            Ok(value) => result = Some(value),
            Err(e) => {
                tracing::error!("{}: {}", PARSE_FAILURE, e);
                return ApiEnvelope {
                    url: url.to_string(),
                    result: None,
                    success: false,
                    error: Some(PARSE_FAILURE.to_string()),
                };
            }
        }
    }

    ApiEnvelope {
        url: url.to_string(),
        result,
        success: fetched.is_ok(),
        error: status_error(&fetched),
    }
}

/// Interpret a fetch outcome in raw mode. The body is never inspected.
pub fn holiday_envelope(outcome: Result<FetchedBody, FetchError>) -> HolidayEnvelope {
    match outcome {
        Ok(fetched) => {
            if fetched.is_ok() {
                tracing::info!("Received successful Holiday data");
            } else {
                tracing::error!("Failed getting holidays: status {}", fetched.status);
            }

            let error = status_error(&fetched);
            HolidayEnvelope {
                success: fetched.is_ok(),
                result: HolidayResult {
                    holiday_body: fetched.body,
                },
                error,
            }
        }
        Err(e) => {
            tracing::error!("Failed getting holidays: {}", e);
            HolidayEnvelope {
                result: HolidayResult::default(),
                success: false,
                error: Some(e.to_string()),
            }
        }
    }
}
