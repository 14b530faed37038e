use drip_core::config::TwilioConfig;
use drip_core::gateway::Gateway;
use drip_core::library::Item;
use drip_core::DripError;

/// Twilio Messages API client.
///
/// One `deliver` call maps to one `POST .../Messages.json`. Twilio-side
/// queuing and carrier retries are invisible here; from the engine's
/// accounting perspective a non-2xx response or transport error is one failed
/// attempt.
pub struct TwilioGateway {
    client: reqwest::blocking::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioGateway {
    pub fn new(config: &TwilioConfig) -> Self {
        Self::with_base_url(config, "https://api.twilio.com")
    }

    /// Point the client at a different API host, for tests that stand a mock
    /// server in for api.twilio.com.
    pub fn with_base_url(config: &TwilioConfig, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }
}

impl Gateway for TwilioGateway {
    fn deliver(&self, recipient: &str, item: &Item) -> drip_core::Result<()> {
        let body = format!("{}\n{}", item.text, item.source_url);
        let params = [
            ("To", recipient),
            ("From", self.from_number.as_str()),
            ("Body", body.as_str()),
            ("MediaUrl", item.media_url.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .map_err(|e| DripError::Delivery {
                recipient: recipient.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let payload = response.text().unwrap_or_default();
            let reason = api_error_message(&payload).unwrap_or_else(|| status.to_string());
            return Err(DripError::Delivery {
                recipient: recipient.to_string(),
                reason,
            });
        }

        Ok(())
    }
}

/// Pull the human-readable `message` field out of a Twilio error payload.
fn api_error_message(payload: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
