use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task lifecycle status. The set is open-ended at the source; anything we
/// don't recognize lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Public,
    Private,
    Completed,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Public => write!(f, "public"),
            TaskStatus::Private => write!(f, "private"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Other => write!(f, "other"),
        }
    }
}

/// A task document snapshot as delivered by the event feed.
///
/// Every field is optional — task documents are loosely typed at the source
/// and may omit anything. The accessor methods treat an empty string the
/// same as an absent field, so that normalization happens exactly once, at
/// this boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDoc {
    pub household_id: Option<String>,
    pub created_by: Option<String>,
    pub claimed_by: Option<String>,
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl TaskDoc {
    pub fn household_id(&self) -> Option<&str> {
        non_empty(self.household_id.as_deref())
    }

    pub fn created_by(&self) -> Option<&str> {
        non_empty(self.created_by.as_deref())
    }

    pub fn claimed_by(&self) -> Option<&str> {
        non_empty(self.claimed_by.as_deref())
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn is_public(&self) -> bool {
        self.status == Some(TaskStatus::Public)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(TaskStatus::Completed)
    }
}

/// Household membership as it appears on the wire.
///
/// Older documents carry `members` either as an id array or as a map whose
/// keys are the ids; newer ones carry a `memberIds` array (possibly with
/// null holes). The resolver normalizes all three shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HouseholdDoc {
    pub member_ids: Option<Vec<Option<String>>>,
    pub members: Option<MemberField>,
}

/// The two legacy shapes of the `members` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberField {
    List(Vec<Option<String>>),
    Map(BTreeMap<String, serde_json::Value>),
}

/// A user profile document. Only the naming fields matter here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDoc {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
}

impl ProfileDoc {
    /// First non-empty of `name` → `displayName` → `username`.
    pub fn display_label(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
            .or_else(|| non_empty(self.display_name.as_deref()))
            .or_else(|| non_empty(self.username.as_deref()))
    }
}

/// A delivery endpoint owned by a user: one device+app installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub token: String,
}

/// A deletable handle to an endpoint record, as returned by the global
/// token search. Ownership is part of the handle because a token may be
/// registered under more than one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRef {
    pub owner_id: String,
    pub token: String,
}

/// Per-endpoint result of a multicast dispatch. `result[i]` describes
/// `tokens[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error_code: None,
        }
    }

    pub fn failed(code: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: Some(code.into()),
        }
    }
}

/// Transport error code for a token the push service no longer knows.
pub const ERR_TOKEN_NOT_REGISTERED: &str = "messaging/registration-token-not-registered";

/// Transport error code for a token the push service rejects as malformed.
pub const ERR_TOKEN_INVALID: &str = "messaging/invalid-registration-token";

/// A composed push notification ready for dispatch.
///
/// `data` is a flat string-valued map — the transport accepts nothing else,
/// so the constraint is enforced by type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

/// A task document change as delivered by the trigger infrastructure.
///
/// Handlers only ever see this before/after snapshot; they never re-read
/// current state, so a handler is deterministic given its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskChange {
    pub event_id: String,
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub before: Option<TaskDoc>,
    #[serde(default)]
    pub after: Option<TaskDoc>,
}

/// Composer input — one variant per notification kind.
#[derive(Debug, Clone)]
pub enum TaskNotice {
    PublicTaskCreated {
        task_id: String,
        household_id: String,
        created_by: Option<String>,
        title: Option<String>,
    },
    TaskClaimed {
        task_id: String,
        claimed_by: String,
        claimer_name: String,
        title: Option<String>,
    },
    TaskCompleted {
        task_id: String,
        title: Option<String>,
    },
}

impl TaskNotice {
    /// The `type` discriminant carried in the notification data map.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskNotice::PublicTaskCreated { .. } => "public_task_created",
            TaskNotice::TaskClaimed { .. } => "task_claimed",
            TaskNotice::TaskCompleted { .. } => "task_completed",
        }
    }
}

impl std::fmt::Display for TaskNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}
