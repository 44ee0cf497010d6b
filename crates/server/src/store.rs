//! HTTP client for the household document API.
//!
//! Implements the engine's directory/profile/endpoint collaborator traits
//! against the app's document service. A 404 on a read means "not found"
//! and a 404 on a delete means "already gone"; both are normal outcomes,
//! not errors.

use async_trait::async_trait;
use reqwest::StatusCode;

use herald_common::error::AppError;
use herald_common::types::{Endpoint, EndpointRef, HouseholdDoc, ProfileDoc};
use herald_engine::collaborators::{EndpointStore, GroupDirectory, ProfileStore};

/// Document store client speaking the household app's HTTP API.
pub struct HttpDocumentStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<Option<T>, AppError> {
        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::Store(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }
        Ok(Some(response.json::<T>().await?))
    }
}

#[async_trait]
impl GroupDirectory for HttpDocumentStore {
    async fn household(&self, household_id: &str) -> Result<Option<HouseholdDoc>, AppError> {
        self.get_optional(format!("{}/households/{}", self.base_url, household_id))
            .await
    }
}

#[async_trait]
impl ProfileStore for HttpDocumentStore {
    async fn profile(&self, user_id: &str) -> Result<Option<ProfileDoc>, AppError> {
        self.get_optional(format!("{}/users/{}", self.base_url, user_id))
            .await
    }
}

#[async_trait]
impl EndpointStore for HttpDocumentStore {
    async fn endpoints_for_user(&self, user_id: &str) -> Result<Vec<Endpoint>, AppError> {
        let url = format!("{}/users/{}/endpoints", self.base_url, user_id);
        Ok(self.get_optional(url).await?.unwrap_or_default())
    }

    async fn find_by_token(&self, token: &str) -> Result<Vec<EndpointRef>, AppError> {
        let url = format!("{}/endpoints", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Store(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    async fn delete(&self, endpoint: &EndpointRef) -> Result<(), AppError> {
        let url = format!(
            "{}/users/{}/endpoints/{}",
            self.base_url, endpoint.owner_id, endpoint.token
        );
        let response = self.http.delete(&url).send().await?;
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(AppError::Store(format!(
            "DELETE {} returned {}",
            url,
            response.status()
        )))
    }
}
