//! The single outbound GET primitive shared by both relays.

use std::time::Duration;

use dynweather_core::ReqwestErrorExt;
use reqwest::Client;
use url::Url;

use crate::error::FetchError;

/// A response that streamed to completion, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub status: u16,
    pub body: String,
}

impl FetchedBody {
    /// Only a plain 200 counts as success.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// GET `url` and collect the whole body as UTF-8 text.
///
/// `timeout` bounds everything from connection start to the last body
/// chunk; on expiry the in-flight request is dropped and `TimedOut(label)`
/// is returned. Non-200 responses are not errors here.
pub async fn fetch_body(
    client: &Client,
    url: &str,
    timeout: Duration,
    label: &'static str,
) -> Result<FetchedBody, FetchError> {
    let parsed = parse_target(url)?;

    match tokio::time::timeout(timeout, read_body(client, parsed)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("{} request timed out after {:?}", label, timeout);
            Err(FetchError::TimedOut(label))
        }
    }
}

fn parse_target(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

async fn read_body(client: &Client, url: Url) -> Result<FetchedBody, FetchError> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| e.into_network_error())?;

    let status = response.status().as_u16();
    let mut bytes = Vec::new();

    // Decode once at the end so multi-byte characters split across chunks survive.
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| e.into_network_error())?
    {
        bytes.extend_from_slice(&chunk);
    }

    tracing::debug!("Received {} bytes with status {}", bytes.len(), status);

    Ok(FetchedBody {
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
