//! Collaborator traits for the services the engine calls out to.
//!
//! The engine never touches concrete infrastructure. Handlers are built over
//! these seams so production wiring (HTTP document store, FCM) and test
//! wiring (the [`crate::memory`] implementations) are interchangeable.

use async_trait::async_trait;

use herald_common::error::AppError;
use herald_common::types::{
    DeliveryOutcome, Endpoint, EndpointRef, HouseholdDoc, Notification, ProfileDoc,
};

/// Lookup of household/group records.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Fetch a household by id. `None` means the record does not exist;
    /// callers treat that as a skip, not a failure.
    async fn household(&self, household_id: &str) -> Result<Option<HouseholdDoc>, AppError>;
}

/// Lookup of user profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, user_id: &str) -> Result<Option<ProfileDoc>, AppError>;
}

/// Storage of per-user delivery endpoints.
#[async_trait]
pub trait EndpointStore: Send + Sync {
    /// All active endpoints registered by one user, in registration order.
    async fn endpoints_for_user(&self, user_id: &str) -> Result<Vec<Endpoint>, AppError>;

    /// Every record holding this token value, across ALL users. A token can
    /// end up registered under more than one owner; the search does not
    /// assume single ownership.
    async fn find_by_token(&self, token: &str) -> Result<Vec<EndpointRef>, AppError>;

    /// Delete one endpoint record. Deleting a record that is already gone
    /// is not an error.
    async fn delete(&self, endpoint: &EndpointRef) -> Result<(), AppError>;
}

/// Push delivery transport.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Send one notification to a batch of tokens. Returns one outcome per
    /// input token, in input order — per-endpoint failures are outcomes,
    /// never an `Err` for the batch.
    async fn send_multicast(
        &self,
        tokens: &[String],
        notification: &Notification,
    ) -> Result<Vec<DeliveryOutcome>, AppError>;
}
