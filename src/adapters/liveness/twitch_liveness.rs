use std::time::Duration;

use serde::Deserialize;

use crate::core::errors::{FocusError, Result};
use crate::core::traits::liveness::LivenessOracle;

const HELIX_STREAMS_URL: &str = "https://api.twitch.tv/helix/streams";

/// Timeout for a single live-status request.
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Partial structure of the Helix "Get Streams" response.
///
/// A channel is live when `data` holds at least one stream.
#[derive(Debug, Deserialize)]
struct StreamsResponse {
    data: Vec<serde_json::Value>,
}

/// Asks the Twitch Helix API whether a channel is currently streaming.
pub struct TwitchLiveness {
    channel: String,
    access_token: String,
    client_id: String,
    endpoint: String,
}

impl TwitchLiveness {
    pub fn new(channel: &str, access_token: &str, client_id: &str) -> Self {
        Self {
            channel: channel.to_string(),
            access_token: access_token.to_string(),
            client_id: client_id.to_string(),
            endpoint: HELIX_STREAMS_URL.to_string(),
        }
    }

    fn request(&self, client: &reqwest::Client) -> reqwest::RequestBuilder {
        client
            .get(&self.endpoint)
            .query(&[("user_login", &self.channel)])
            .bearer_auth(&self.access_token)
            .header("Client-Id", &self.client_id)
    }
}

/// Build a reqwest client with the check timeout.
fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(CHECK_TIMEOUT)
        .user_agent(format!("focuslog/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FocusError::LivenessCheckFailed {
            reason: format!("Failed to create HTTP client: {e}"),
        })
}

/// Decide liveness from a raw Helix response body.
pub fn parse_streams_response(body: &str) -> Result<bool> {
    let response: StreamsResponse =
        serde_json::from_str(body).map_err(|e| FocusError::LivenessCheckFailed {
            reason: format!("Unexpected Helix response: {e}"),
        })?;
    Ok(!response.data.is_empty())
}

impl LivenessOracle for TwitchLiveness {
    fn is_source_active(&self) -> Result<bool> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FocusError::LivenessCheckFailed {
                reason: format!("Failed to create async runtime: {e}"),
            })?;

        let body = rt.block_on(async {
            let client = build_client()?;
            let resp = self
                .request(&client)
                .send()
                .await
                .map_err(|e| FocusError::LivenessCheckFailed {
                    reason: format!("Helix request failed: {e}"),
                })?;

            if !resp.status().is_success() {
                return Err(FocusError::LivenessCheckFailed {
                    reason: format!("Helix returned status {}", resp.status()),
                });
            }

            resp.text().await.map_err(|e| FocusError::LivenessCheckFailed {
                reason: format!("Failed to read Helix response: {e}"),
            })
        })?;

        let live = parse_streams_response(&body)?;
        tracing::debug!(channel = %self.channel, live, "checked stream status");
        Ok(live)
    }

    fn name(&self) -> &str {
        "twitch"
    }
}
