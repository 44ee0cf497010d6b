//! In-memory collaborator implementations for tests and development.
//!
//! Not suitable for production: no persistence, single-process only. The
//! endpoint store can be told to fail specific deletions, and the transport
//! can be scripted with per-call outcome batches and records everything it
//! was asked to send.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use herald_common::error::AppError;
use herald_common::types::{
    DeliveryOutcome, Endpoint, EndpointRef, HouseholdDoc, Notification, ProfileDoc,
};

use crate::collaborators::{EndpointStore, GroupDirectory, ProfileStore, PushTransport};

fn poison_err<T>(_: PoisonError<T>) -> AppError {
    AppError::Store("collaborator lock poisoned".to_string())
}

/// In-memory household directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    households: RwLock<HashMap<String, HouseholdDoc>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, household_id: impl Into<String>, household: HouseholdDoc) {
        if let Ok(mut map) = self.households.write() {
            map.insert(household_id.into(), household);
        }
    }
}

#[async_trait]
impl GroupDirectory for InMemoryDirectory {
    async fn household(&self, household_id: &str) -> Result<Option<HouseholdDoc>, AppError> {
        let map = self.households.read().map_err(poison_err)?;
        Ok(map.get(household_id).cloned())
    }
}

/// In-memory user profile store.
#[derive(Debug, Default)]
pub struct InMemoryProfiles {
    profiles: RwLock<HashMap<String, ProfileDoc>>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: impl Into<String>, profile: ProfileDoc) {
        if let Ok(mut map) = self.profiles.write() {
            map.insert(user_id.into(), profile);
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfiles {
    async fn profile(&self, user_id: &str) -> Result<Option<ProfileDoc>, AppError> {
        let map = self.profiles.read().map_err(poison_err)?;
        Ok(map.get(user_id).cloned())
    }
}

/// In-memory endpoint store with injectable deletion failures.
#[derive(Debug, Default)]
pub struct InMemoryEndpoints {
    records: RwLock<Vec<EndpointRef>>,
    failing_deletes: RwLock<HashSet<String>>,
}

impl InMemoryEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token under an owner, in call order.
    pub fn register(&self, owner_id: impl Into<String>, token: impl Into<String>) {
        if let Ok(mut records) = self.records.write() {
            records.push(EndpointRef {
                owner_id: owner_id.into(),
                token: token.into(),
            });
        }
    }

    /// Make every future deletion of this token fail.
    pub fn fail_deletes_for(&self, token: impl Into<String>) {
        if let Ok(mut failing) = self.failing_deletes.write() {
            failing.insert(token.into());
        }
    }

    /// Snapshot of the records still present.
    pub fn remaining(&self) -> Vec<EndpointRef> {
        self.records.read().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EndpointStore for InMemoryEndpoints {
    async fn endpoints_for_user(&self, user_id: &str) -> Result<Vec<Endpoint>, AppError> {
        let records = self.records.read().map_err(poison_err)?;
        Ok(records
            .iter()
            .filter(|r| r.owner_id == user_id)
            .map(|r| Endpoint {
                token: r.token.clone(),
            })
            .collect())
    }

    async fn find_by_token(&self, token: &str) -> Result<Vec<EndpointRef>, AppError> {
        let records = self.records.read().map_err(poison_err)?;
        Ok(records.iter().filter(|r| r.token == token).cloned().collect())
    }

    async fn delete(&self, endpoint: &EndpointRef) -> Result<(), AppError> {
        {
            let failing = self.failing_deletes.read().map_err(poison_err)?;
            if failing.contains(&endpoint.token) {
                return Err(AppError::Store(format!(
                    "injected delete failure for {}",
                    endpoint.token
                )));
            }
        }
        let mut records = self.records.write().map_err(poison_err)?;
        records.retain(|r| r != endpoint);
        Ok(())
    }
}

/// One recorded multicast call.
#[derive(Debug, Clone)]
pub struct RecordedMulticast {
    pub tokens: Vec<String>,
    pub notification: Notification,
}

/// Scriptable push transport that records every call.
///
/// Calls consume scripted outcome batches front-to-back; once the script is
/// exhausted every send succeeds.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: RwLock<VecDeque<Vec<DeliveryOutcome>>>,
    calls: RwLock<Vec<RecordedMulticast>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome batch for the next unscripted call.
    pub fn enqueue_outcomes(&self, outcomes: Vec<DeliveryOutcome>) {
        if let Ok(mut script) = self.script.write() {
            script.push_back(outcomes);
        }
    }

    pub fn calls(&self) -> Vec<RecordedMulticast> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl PushTransport for ScriptedTransport {
    async fn send_multicast(
        &self,
        tokens: &[String],
        notification: &Notification,
    ) -> Result<Vec<DeliveryOutcome>, AppError> {
        self.calls.write().map_err(poison_err)?.push(RecordedMulticast {
            tokens: tokens.to_vec(),
            notification: notification.clone(),
        });

        let scripted = self.script.write().map_err(poison_err)?.pop_front();
        Ok(scripted.unwrap_or_else(|| tokens.iter().map(|_| DeliveryOutcome::delivered()).collect()))
    }
}
