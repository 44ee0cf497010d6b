//! Failure reconciler — prunes endpoints the transport reports as dead.
//!
//! Only two error codes mean an endpoint will never work again; everything
//! else (transient network trouble, quota, malformed payload, unknown
//! codes) is left in place and the next natural send acts as the retry.
//! There is no explicit retry loop at this layer.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{join_all, try_join_all};

use herald_common::error::AppError;
use herald_common::types::{
    DeliveryOutcome, EndpointRef, ERR_TOKEN_INVALID, ERR_TOKEN_NOT_REGISTERED,
};

use crate::collaborators::EndpointStore;

/// Deletes endpoint records whose delivery outcome is permanently invalid.
pub struct FailureReconciler {
    endpoints: Arc<dyn EndpointStore>,
}

impl FailureReconciler {
    pub fn new(endpoints: Arc<dyn EndpointStore>) -> Self {
        Self { endpoints }
    }

    /// An outcome warrants endpoint deletion iff it failed with one of the
    /// two codes meaning the token is gone for good.
    pub fn is_permanent_failure(outcome: &DeliveryOutcome) -> bool {
        if outcome.success {
            return false;
        }
        matches!(
            outcome.error_code.as_deref(),
            Some(ERR_TOKEN_NOT_REGISTERED) | Some(ERR_TOKEN_INVALID)
        )
    }

    /// Inspect the per-token outcomes of one multicast and delete every
    /// record of every permanently-invalid token, across all owners.
    ///
    /// Token lookups run concurrently and join all-or-nothing — a failed
    /// lookup is a collaborator failure and surfaces as `Err`. Deletions
    /// also run concurrently, but independently: one failed deletion is
    /// logged and does not stop the others. Returns the records actually
    /// deleted.
    pub async fn reconcile(
        &self,
        tokens: &[String],
        outcomes: &[DeliveryOutcome],
    ) -> Result<Vec<EndpointRef>, AppError> {
        let mut seen = HashSet::new();
        let invalid: Vec<&String> = tokens
            .iter()
            .zip(outcomes)
            .filter(|(_, outcome)| Self::is_permanent_failure(outcome))
            .map(|(token, _)| token)
            .filter(|token| seen.insert(token.as_str()))
            .collect();

        if invalid.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!(count = invalid.len(), "Cleaning invalid tokens");

        let matches = try_join_all(invalid.iter().map(|token| self.endpoints.find_by_token(token)))
            .await?;
        let stale: Vec<EndpointRef> = matches.into_iter().flatten().collect();

        let results = join_all(stale.iter().map(|endpoint| async move {
            self.endpoints.delete(endpoint).await.map(|_| endpoint.clone())
        }))
        .await;

        let mut deleted = Vec::with_capacity(stale.len());
        for result in results {
            match result {
                Ok(endpoint) => deleted.push(endpoint),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to delete stale endpoint record");
                }
            }
        }

        tracing::info!(
            deleted = deleted.len(),
            matched = stale.len(),
            "Stale endpoint cleanup finished"
        );

        Ok(deleted)
    }
}
