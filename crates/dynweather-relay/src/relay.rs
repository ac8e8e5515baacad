//! Fetch relay: one outbound GET per trigger, one notification per GET.
//! Requests run as independent tokio tasks; results are sent via mpsc.

use std::time::Duration;

use dynweather_core::{RelayConfig, ReqwestErrorExt};
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::envelope::{api_envelope, holiday_envelope, ApiEnvelope, HolidayEnvelope};
use crate::error::FetchError;
use crate::fetch::fetch_body;
use crate::notification::{FrontendRequest, RelayNotification};

const API_LABEL: &str = "API";
const HOLIDAY_LABEL: &str = "Holiday";

pub type NotificationSender = mpsc::UnboundedSender<RelayNotification>;
pub type NotificationReceiver = mpsc::UnboundedReceiver<RelayNotification>;

/// Create the channel a `Relay` publishes on.
pub fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}

/// Dispatches frontend triggers to the API and holiday relays.
///
/// Cloning is cheap; every spawned request holds its own clone, so the
/// receiver only sees the channel close once all of them have reported.
#[derive(Debug, Clone)]
pub struct Relay {
    client: Client,
    timeout: Duration,
    holiday_url: String,
    tx: NotificationSender,
}

impl Relay {
    pub fn new(config: &RelayConfig, tx: NotificationSender) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            client,
            timeout: config.request_timeout(),
            holiday_url: config.holiday_url.clone(),
            tx,
        })
    }

    /// Run the structured relay against `url` and return its envelope.
    pub async fn fetch_api(&self, url: &str) -> ApiEnvelope {
        tracing::info!("Getting Weather API data from {}", url);
        let outcome = fetch_body(&self.client, url, self.timeout, API_LABEL).await;
        api_envelope(url, outcome)
    }

    /// Run the raw relay against the holiday endpoint and return its envelope.
    pub async fn fetch_holiday(&self) -> HolidayEnvelope {
        tracing::info!("Getting Holiday data");
        let outcome =
            fetch_body(&self.client, &self.holiday_url, self.timeout, HOLIDAY_LABEL).await;
        holiday_envelope(outcome)
    }

    /// Spawn the structured relay; the envelope arrives as `API-Received`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call_api(&self, url: String) -> JoinHandle<()> {
        let relay = self.clone();
        tokio::spawn(async move {
            let envelope = relay.fetch_api(&url).await;
            relay.publish(RelayNotification::ApiReceived(envelope));
        })
    }

    /// Spawn the raw relay; the envelope arrives as `Holiday-Received`.
    pub fn call_holiday(&self) -> JoinHandle<()> {
        let relay = self.clone();
        tokio::spawn(async move {
            let envelope = relay.fetch_holiday().await;
            relay.publish(RelayNotification::HolidayReceived(envelope));
        })
    }

    /// Route a frontend trigger to the matching relay.
    pub fn handle(&self, request: FrontendRequest) -> JoinHandle<()> {
        match request {
            FrontendRequest::ApiFetch(url) => self.call_api(url),
            FrontendRequest::HolidayFetch => self.call_holiday(),
        }
    }

    fn publish(&self, notification: RelayNotification) {
        let name = notification.name();
        if self.tx.send(notification).is_err() {
            tracing::warn!("Frontend channel closed, dropping {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> RelayConfig {
        RelayConfig {
            request_timeout_ms: 500,
            holiday_url: "not a url".to_string(),
            ..RelayConfig::default()
        }
    }

    #[tokio::test]
    async fn invalid_api_url_still_reports_once() {
        let (tx, mut rx) = notification_channel();
        let relay = Relay::new(&unreachable_config(), tx).unwrap();

        relay.handle(FrontendRequest::ApiFetch("::nope::".into())).await.unwrap();
        drop(relay);

        match rx.recv().await {
            Some(RelayNotification::ApiReceived(env)) => {
                assert!(!env.success);
                assert_eq!(env.url, "::nope::");
                assert!(env.error.unwrap().starts_with("Invalid URL"));
            }
            other => panic!("unexpected notification: {:?}", other),
        }
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn invalid_holiday_url_reports_empty_body() {
        let (tx, mut rx) = notification_channel();
        let relay = Relay::new(&unreachable_config(), tx).unwrap();

        relay.handle(FrontendRequest::HolidayFetch).await.unwrap();

        match rx.recv().await {
            Some(RelayNotification::HolidayReceived(env)) => {
                assert!(!env.success);
                assert_eq!(env.result.holiday_body, "");
            }
            other => panic!("unexpected notification: {:?}", other),
        }
    }

    #[tokio::test]
    async fn closed_channel_does_not_panic() {
        let (tx, rx) = notification_channel();
        drop(rx);
        let relay = Relay::new(&unreachable_config(), tx).unwrap();

        relay.call_api("::nope::".into()).await.unwrap();
    }
}
