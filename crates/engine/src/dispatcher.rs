//! Multicast dispatcher — one logical send to a batch of tokens.
//!
//! The caller sees a single atomic operation: a list of tokens in, a list
//! of outcomes out, aligned index-for-index. Internally the token list is
//! split across the transport's per-call maximum and outcomes are
//! concatenated back in input order.

use std::sync::Arc;

use herald_common::error::AppError;
use herald_common::types::{DeliveryOutcome, Notification};

use crate::collaborators::PushTransport;

/// Transport-imposed maximum token count for one multicast call.
pub const MAX_TOKENS_PER_CALL: usize = 500;

/// Dispatches one notification to many endpoints through a `PushTransport`.
pub struct MulticastDispatcher {
    transport: Arc<dyn PushTransport>,
}

impl MulticastDispatcher {
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self { transport }
    }

    /// Send `notification` to every token. `result[i]` describes `tokens[i]`.
    ///
    /// An empty token list is a normal, silent skip: no transport call is
    /// made and an empty outcome list is returned.
    pub async fn send(
        &self,
        tokens: &[String],
        notification: &Notification,
    ) -> Result<Vec<DeliveryOutcome>, AppError> {
        if tokens.is_empty() {
            tracing::debug!("No tokens to dispatch, skipping multicast");
            return Ok(Vec::new());
        }

        let mut outcomes = Vec::with_capacity(tokens.len());
        for chunk in tokens.chunks(MAX_TOKENS_PER_CALL) {
            let batch = self.transport.send_multicast(chunk, notification).await?;
            if batch.len() != chunk.len() {
                return Err(AppError::Transport(format!(
                    "transport returned {} outcomes for {} tokens",
                    batch.len(),
                    chunk.len()
                )));
            }
            outcomes.extend(batch);
        }

        let delivered = outcomes.iter().filter(|o| o.success).count();
        tracing::info!(
            delivered,
            total = outcomes.len(),
            title = %notification.title,
            "Multicast dispatched"
        );

        Ok(outcomes)
    }
}
