//! Messages exchanged with the display frontend.
//!
//! On the wire each message is `{"notification": <name>, "payload": <payload>}`.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::envelope::{ApiEnvelope, HolidayEnvelope};

/// Triggers sent by the frontend.
///
/// Any payload sent with `Holiday-Fetch` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notification", content = "payload")]
pub enum FrontendRequest {
    /// Fetch the given URL and decode the body as JSON.
    #[serde(rename = "API-Fetch")]
    ApiFetch(String),

    /// Fetch the configured holiday page as raw text.
    #[serde(rename = "Holiday-Fetch")]
    HolidayFetch,
}

#[derive(Deserialize)]
struct RawRequest {
    notification: String,
    #[serde(default)]
    payload: Option<Value>,
}

impl TryFrom<RawRequest> for FrontendRequest {
    type Error = String;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        match raw.notification.as_str() {
            "API-Fetch" => match raw.payload {
                Some(Value::String(url)) => Ok(FrontendRequest::ApiFetch(url)),
                Some(other) => Err(format!(
                    "API-Fetch payload must be a URL string, got {}",
                    other
                )),
                None => Err("API-Fetch requires a URL payload".to_string()),
            },
            "Holiday-Fetch" => Ok(FrontendRequest::HolidayFetch),
            other => Err(format!("unknown notification {:?}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for FrontendRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawRequest::deserialize(deserializer)?;
        FrontendRequest::try_from(raw).map_err(de::Error::custom)
    }
}

/// Outcomes sent back to the frontend, one per trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "notification", content = "payload")]
pub enum RelayNotification {
    #[serde(rename = "API-Received")]
    ApiReceived(ApiEnvelope),

    #[serde(rename = "Holiday-Received")]
    HolidayReceived(HolidayEnvelope),
}

impl RelayNotification {
    pub fn name(&self) -> &'static str {
        match self {
            RelayNotification::ApiReceived(_) => "API-Received",
            RelayNotification::HolidayReceived(_) => "Holiday-Received",
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            RelayNotification::ApiReceived(env) => env.success,
            RelayNotification::HolidayReceived(env) => env.success,
        }
    }
}
