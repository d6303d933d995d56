//! HTTP transport for the poll loop, backed by `reqwest`.

use std::time::Duration;

use reqwest::StatusCode;

use salesdesk_domain::envelope::Envelope;
use salesdesk_domain::error::{SalesdeskError, TransportError};
use salesdesk_domain::id::UserId;
use salesdesk_domain::notification::Notification;
use salesdesk_domain::time::Timestamp;

use crate::poller::PollTransport;

/// Extra request-timeout slack on top of the requested wait, so a healthy
/// server that holds the connection for the full wait is not misread as a
/// transport failure.
const REQUEST_SLACK: Duration = Duration::from_secs(5);

/// Talks to the server's notification endpoints for one user.
#[derive(Debug, Clone)]
pub struct HttpPollTransport {
    client: reqwest::Client,
    base_url: String,
    user_id: UserId,
}

impl HttpPollTransport {
    /// Create a transport for `user_id` against `base_url`
    /// (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the underlying client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>, user_id: UserId) -> Result<Self, SalesdeskError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| TransportError {
                context: "building http client",
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            user_id,
        })
    }

    /// Notifications visible to the user, optionally only those newer than
    /// `since`. Used to reconcile after a poll gap.
    ///
    /// # Errors
    ///
    /// `SessionExpired` on HTTP 401, [`TransportError`] otherwise.
    pub async fn list_since(
        &self,
        since: Option<Timestamp>,
    ) -> Result<Vec<Notification>, SalesdeskError> {
        let mut request = self
            .client
            .get(format!("{}/api/notifications", self.base_url))
            .query(&[("user_id", self.user_id.to_string())]);
        if let Some(since) = since {
            request = request.query(&[("since", since.to_rfc3339())]);
        }

        let response = request.send().await.map_err(|err| TransportError {
            context: "listing notifications",
            message: err.to_string(),
        })?;
        parse_json(response, "listing notifications").await
    }
}

impl PollTransport for HttpPollTransport {
    async fn wait_for_events(&self, timeout: Duration) -> Result<Vec<Envelope>, SalesdeskError> {
        let response = self
            .client
            .get(format!("{}/api/notifications/wait", self.base_url))
            .query(&[
                ("user_id", self.user_id.to_string()),
                ("timeout_secs", timeout.as_secs().to_string()),
            ])
            .timeout(timeout + REQUEST_SLACK)
            .send()
            .await
            .map_err(|err| TransportError {
                context: "waiting for events",
                message: err.to_string(),
            })?;
        parse_json(response, "waiting for events").await
    }
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    context: &'static str,
) -> Result<T, SalesdeskError> {
    match response.status() {
        StatusCode::UNAUTHORIZED => Err(SalesdeskError::SessionExpired),
        status if status.is_success() => {
            response.json().await.map_err(|err| {
                TransportError {
                    context,
                    message: err.to_string(),
                }
                .into()
            })
        }
        status => Err(TransportError {
            context,
            message: format!("unexpected status {status}"),
        }
        .into()),
    }
}
