//! Event handlers — one orchestration per trigger kind.
//!
//! Each handler is a pure pipeline over the resolver, composer, dispatcher
//! and reconciler. Every precondition miss (wrong status, missing field,
//! empty recipient or token set) is a logged skip that returns `Ok(())`
//! exactly like a successful dispatch — the trigger infrastructure never
//! sees a distinct "skipped" signal. Only collaborator failures propagate.

use std::sync::Arc;

use futures::future::try_join_all;

use herald_common::error::AppError;
use herald_common::types::{TaskChange, TaskNotice};

use crate::collaborators::{EndpointStore, GroupDirectory, ProfileStore, PushTransport};
use crate::composer;
use crate::dispatcher::MulticastDispatcher;
use crate::reconciler::FailureReconciler;
use crate::resolver::RecipientResolver;

/// Display name used when the claimer has no usable profile.
const FALLBACK_CLAIMER_NAME: &str = "Someone";

/// Orchestrates task-event notifications over injected collaborators.
pub struct TaskEventHandlers {
    groups: Arc<dyn GroupDirectory>,
    profiles: Arc<dyn ProfileStore>,
    endpoints: Arc<dyn EndpointStore>,
    resolver: RecipientResolver,
    dispatcher: MulticastDispatcher,
    reconciler: FailureReconciler,
}

impl TaskEventHandlers {
    pub fn new(
        groups: Arc<dyn GroupDirectory>,
        profiles: Arc<dyn ProfileStore>,
        endpoints: Arc<dyn EndpointStore>,
        transport: Arc<dyn PushTransport>,
    ) -> Self {
        Self {
            groups,
            profiles,
            endpoints: endpoints.clone(),
            resolver: RecipientResolver::new(),
            dispatcher: MulticastDispatcher::new(transport),
            reconciler: FailureReconciler::new(endpoints),
        }
    }

    /// On task creation: notify every household member except the creator,
    /// but only for tasks created with `public` status.
    pub async fn handle_task_created(&self, event: &TaskChange) -> Result<(), AppError> {
        let Some(task) = event.after.as_ref() else {
            tracing::info!(event_id = %event.event_id, "No task data in create event");
            return Ok(());
        };

        if !task.is_public() {
            tracing::info!(task_id = %event.task_id, "Skipping: task not public");
            return Ok(());
        }

        let Some(household_id) = task.household_id() else {
            tracing::info!(task_id = %event.task_id, "Skipping: missing householdId");
            return Ok(());
        };

        let created_by = task.created_by();

        let Some(household) = self.groups.household(household_id).await? else {
            tracing::info!(household_id, "No household record found");
            return Ok(());
        };

        let exclude: Vec<&str> = created_by.into_iter().collect();
        let recipients = self.resolver.resolve(&household, &exclude);
        if recipients.is_empty() {
            tracing::info!(task_id = %event.task_id, "No recipients after excluding creator");
            return Ok(());
        }

        let tokens = self.pooled_tokens(&recipients).await?;
        if tokens.is_empty() {
            tracing::info!(task_id = %event.task_id, "No tokens found for recipients");
            return Ok(());
        }

        let notice = TaskNotice::PublicTaskCreated {
            task_id: event.task_id.clone(),
            household_id: household_id.to_string(),
            created_by: created_by.map(str::to_string),
            title: task.title().map(str::to_string),
        };

        self.dispatch_and_reconcile(&tokens, &notice).await
    }

    /// On task update: notify the creator when someone else claims the task.
    /// Acts only on the unclaimed→claimed transition.
    pub async fn handle_task_claimed(&self, event: &TaskChange) -> Result<(), AppError> {
        let (Some(before), Some(after)) = (event.before.as_ref(), event.after.as_ref()) else {
            tracing::info!(event_id = %event.event_id, "No task data in update event");
            return Ok(());
        };

        let was_unclaimed = before.claimed_by().is_none();
        let now_claimed = after.claimed_by().is_some();
        if !(was_unclaimed && now_claimed) {
            return Ok(());
        }

        let (Some(created_by), Some(claimed_by)) = (after.created_by(), after.claimed_by())
        else {
            tracing::info!(task_id = %event.task_id, "Skipping: missing createdBy or claimedBy");
            return Ok(());
        };

        if created_by == claimed_by {
            tracing::info!(task_id = %event.task_id, "Skipping: creator claimed their own task");
            return Ok(());
        }

        let claimer_name = self.claimer_display_name(claimed_by).await?;

        let tokens = self.user_tokens(created_by).await?;
        if tokens.is_empty() {
            tracing::info!(task_id = %event.task_id, "No tokens found for creator");
            return Ok(());
        }

        let notice = TaskNotice::TaskClaimed {
            task_id: event.task_id.clone(),
            claimed_by: claimed_by.to_string(),
            claimer_name,
            title: after.title().map(str::to_string),
        };

        self.dispatch_and_reconcile(&tokens, &notice).await
    }

    /// On task update: notify the creator when the task reaches `completed`.
    /// Acts only when the before-status was anything else.
    pub async fn handle_task_completed(&self, event: &TaskChange) -> Result<(), AppError> {
        let (Some(before), Some(after)) = (event.before.as_ref(), event.after.as_ref()) else {
            tracing::info!(event_id = %event.event_id, "No task data in update event");
            return Ok(());
        };

        if before.is_completed() || !after.is_completed() {
            return Ok(());
        }

        let Some(created_by) = after.created_by() else {
            tracing::info!(task_id = %event.task_id, "Skipping: no creator to notify");
            return Ok(());
        };

        let tokens = self.user_tokens(created_by).await?;
        if tokens.is_empty() {
            tracing::info!(task_id = %event.task_id, "No tokens found for creator");
            return Ok(());
        }

        let notice = TaskNotice::TaskCompleted {
            task_id: event.task_id.clone(),
            title: after.title().map(str::to_string),
        };

        self.dispatch_and_reconcile(&tokens, &notice).await
    }

    /// Resolve the claimer's display name: profile lookup, then
    /// name → displayName → username, falling back to a generic placeholder.
    async fn claimer_display_name(&self, user_id: &str) -> Result<String, AppError> {
        let profile = self.profiles.profile(user_id).await?;
        Ok(profile
            .as_ref()
            .and_then(|p| p.display_label())
            .unwrap_or(FALLBACK_CLAIMER_NAME)
            .to_string())
    }

    /// One user's tokens, dropping empty values.
    async fn user_tokens(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let endpoints = self.endpoints.endpoints_for_user(user_id).await?;
        Ok(endpoints
            .into_iter()
            .map(|e| e.token)
            .filter(|t| !t.is_empty())
            .collect())
    }

    /// Fan-in across all recipients into one flat token pool. Fetches run
    /// concurrently and join all-or-nothing; per-user grouping ends here.
    async fn pooled_tokens(&self, recipients: &[String]) -> Result<Vec<String>, AppError> {
        let fetched =
            try_join_all(recipients.iter().map(|user_id| self.user_tokens(user_id))).await?;
        Ok(fetched.into_iter().flatten().collect())
    }

    async fn dispatch_and_reconcile(
        &self,
        tokens: &[String],
        notice: &TaskNotice,
    ) -> Result<(), AppError> {
        let notification = composer::compose(notice);
        let outcomes = self.dispatcher.send(tokens, &notification).await?;
        self.reconciler.reconcile(tokens, &outcomes).await?;
        Ok(())
    }
}
