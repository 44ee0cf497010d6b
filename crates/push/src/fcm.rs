//! FCM HTTP v1 client.
//!
//! A multicast is one `messages:send` request per token, issued with
//! bounded concurrency and collected back in input order. A failed send
//! becomes a per-token outcome carrying a `messaging/...` error code — the
//! batch call itself never fails on an individual endpoint, so the
//! reconciler always receives one outcome per token.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use herald_common::config::AppConfig;
use herald_common::error::AppError;
use herald_common::types::{
    DeliveryOutcome, Notification, ERR_TOKEN_INVALID, ERR_TOKEN_NOT_REGISTERED,
};
use herald_engine::collaborators::PushTransport;

/// Sends in flight at once within one multicast call.
const SEND_CONCURRENCY: usize = 8;

/// Outcome code when the transport gives us nothing better to report.
const ERR_UNKNOWN: &str = "messaging/unknown-error";

/// FCM HTTP v1 push transport.
pub struct FcmClient {
    http: reqwest::Client,
    send_url: String,
    access_token: String,
}

impl FcmClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            send_url: format!(
                "{}/v1/projects/{}/messages:send",
                config.fcm_endpoint.trim_end_matches('/'),
                config.fcm_project_id
            ),
            access_token: config.fcm_access_token.clone(),
        }
    }

    /// Send to a single token. Any failure — transport-level or an FCM
    /// error response — is folded into the returned outcome.
    async fn send_one(&self, token: &str, notification: &Notification) -> DeliveryOutcome {
        let body = send_request(token, notification);

        let response = match self
            .http
            .post(&self.send_url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "FCM send failed before a response arrived");
                return DeliveryOutcome::failed(ERR_UNKNOWN);
            }
        };

        if response.status().is_success() {
            return DeliveryOutcome::delivered();
        }

        let code = match response.json::<ErrorResponse>().await {
            Ok(parsed) => map_error_code(&parsed.error),
            Err(_) => ERR_UNKNOWN,
        };
        DeliveryOutcome::failed(code)
    }
}

#[async_trait]
impl PushTransport for FcmClient {
    async fn send_multicast(
        &self,
        tokens: &[String],
        notification: &Notification,
    ) -> Result<Vec<DeliveryOutcome>, AppError> {
        let outcomes = stream::iter(tokens.iter().cloned())
            .map(|token| async move { self.send_one(&token, notification).await })
            .buffered(SEND_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;
        Ok(outcomes)
    }
}

// ---- request payload ----

fn send_request<'a>(token: &'a str, notification: &'a Notification) -> SendRequest<'a> {
    SendRequest {
        message: Message {
            token,
            notification: MessageNotification {
                title: &notification.title,
                body: &notification.body,
            },
            data: &notification.data,
            // Immediate delivery; sound presentation is requested on the
            // receiving side by payload convention.
            android: AndroidConfig { priority: "HIGH" },
            apns: ApnsConfig {
                payload: ApnsPayload {
                    aps: Aps { sound: "default" },
                },
            },
        },
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: Message<'a>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    token: &'a str,
    notification: MessageNotification<'a>,
    data: &'a BTreeMap<String, String>,
    android: AndroidConfig,
    apns: ApnsConfig,
}

#[derive(Debug, Serialize)]
struct MessageNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct AndroidConfig {
    priority: &'static str,
}

#[derive(Debug, Serialize)]
struct ApnsConfig {
    payload: ApnsPayload,
}

#[derive(Debug, Serialize)]
struct ApnsPayload {
    aps: Aps,
}

#[derive(Debug, Serialize)]
struct Aps {
    sound: &'static str,
}

// ---- error payload ----

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    status: String,
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ErrorDetail {
    error_code: String,
}

/// Map a v1 error payload onto the `messaging/...` codes the reconciler
/// classifies. The FcmError `errorCode` detail wins; `status` is the
/// fallback when no detail names one.
fn map_error_code(error: &ErrorBody) -> &'static str {
    let code = error
        .details
        .iter()
        .map(|d| d.error_code.as_str())
        .find(|c| !c.is_empty())
        .unwrap_or(error.status.as_str());

    match code {
        "UNREGISTERED" => ERR_TOKEN_NOT_REGISTERED,
        "INVALID_ARGUMENT" => ERR_TOKEN_INVALID,
        "SENDER_ID_MISMATCH" => "messaging/mismatched-credential",
        "QUOTA_EXCEEDED" => "messaging/message-rate-exceeded",
        "UNAVAILABLE" => "messaging/server-unavailable",
        "INTERNAL" => "messaging/internal-error",
        _ => ERR_UNKNOWN,
    }
}
