//! Task document event ingestion.
//!
//! The trigger infrastructure POSTs one envelope per document write. A
//! `created` envelope drives the creation handler; an `updated` envelope
//! drives the claim handler and then the completion handler — two logical
//! triggers sharing the same update feed. Skips and successful dispatches
//! alike answer 200; only a collaborator failure surfaces as 5xx so the
//! infrastructure can apply its own retry policy.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use herald_common::error::AppError;
use herald_common::types::{TaskChange, TaskDoc};

use crate::state::AppState;

/// Trigger kinds delivered by the document event feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Created,
    Updated,
}

/// Wire envelope for one task document event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEventEnvelope {
    pub kind: TriggerKind,
    pub task_id: String,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub before: Option<TaskDoc>,
    #[serde(default)]
    pub after: Option<TaskDoc>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/events/tasks", post(ingest_task_event))
}

/// POST /events/tasks — invoked on every create/update of a task document.
async fn ingest_task_event(
    State(state): State<AppState>,
    Json(envelope): Json<TaskEventEnvelope>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind = envelope.kind;
    let event = TaskChange {
        event_id: envelope
            .event_id
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        task_id: envelope.task_id,
        occurred_at: envelope.occurred_at,
        before: envelope.before,
        after: envelope.after,
    };

    tracing::info!(
        event_id = %event.event_id,
        task_id = %event.task_id,
        kind = ?kind,
        "Task event received"
    );

    match kind {
        TriggerKind::Created => {
            state.handlers.handle_task_created(&event).await?;
        }
        TriggerKind::Updated => {
            state.handlers.handle_task_claimed(&event).await?;
            state.handlers.handle_task_completed(&event).await?;
        }
    }

    Ok(Json(serde_json::json!({"status": "ok"})))
}
