//! Completion ping through the ntfy.sh push service.
//!
//! Notification is best-effort: the analysis results are already on disk when
//! it runs, so every failure is logged and swallowed.

use reqwest::blocking::Client;
use tracing::{info, warn};

/// Public ntfy.sh server.
pub const NTFY_URL: &str = "https://ntfy.sh";
/// Topic the completion ping is published to.
pub const NTFY_TOPIC: &str = "dsi_c2_brs";

const TITLE: &str = "LUIZ_GUSTAVO - Cohort_2 Assignment Building Software!";
const MESSAGE: &str = "Analysis Done";

#[derive(Debug, Clone)]
pub struct Notifier {
    endpoint: String,
    client: Client,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::with_endpoint(format!("{NTFY_URL}/{NTFY_TOPIC}"))
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish to a full topic URL instead of the default one.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the completion message once. Returns whether it was delivered.
    pub fn notify_done(&self) -> bool {
        match self.send() {
            Ok(()) => {
                info!(endpoint = %self.endpoint, "sent completion notification");
                true
            }
            Err(reason) => {
                warn!(endpoint = %self.endpoint, %reason, "completion notification failed");
                false
            }
        }
    }

    fn send(&self) -> Result<(), String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Title", TITLE)
            .body(MESSAGE.as_bytes())
            .send()
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("push endpoint returned status {}", status.as_u16()))
        }
    }
}
