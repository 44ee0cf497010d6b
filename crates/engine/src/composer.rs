//! Notification composer — one fixed template per event kind.
//!
//! Every value in the emitted `data` map is a string; an absent id coerces
//! to the empty string rather than being omitted, because the transport
//! requires a flat string-valued map and clients key off stable fields.

use std::collections::BTreeMap;

use herald_common::types::{Notification, TaskNotice};

/// Title used when a created task carries no usable title.
const FALLBACK_CREATED_TITLE: &str = "New household task";

/// Title used when a claimed/completed task carries no usable title.
const FALLBACK_TASK_TITLE: &str = "A task";

/// Build the push notification for a task notice.
pub fn compose(notice: &TaskNotice) -> Notification {
    let mut data = BTreeMap::new();
    data.insert("type".to_string(), notice.kind().to_string());

    match notice {
        TaskNotice::PublicTaskCreated {
            task_id,
            household_id,
            created_by,
            title,
        } => {
            let title = title.as_deref().unwrap_or(FALLBACK_CREATED_TITLE);
            data.insert("taskId".to_string(), task_id.clone());
            data.insert("householdId".to_string(), household_id.clone());
            data.insert(
                "createdBy".to_string(),
                created_by.clone().unwrap_or_default(),
            );

            Notification {
                title: "New Public Task".to_string(),
                body: format!("\"{}\" was added to your household.", title),
                data,
            }
        }
        TaskNotice::TaskClaimed {
            task_id,
            claimed_by,
            claimer_name,
            title,
        } => {
            let title = title.as_deref().unwrap_or(FALLBACK_TASK_TITLE);
            data.insert("taskId".to_string(), task_id.clone());
            data.insert("claimedBy".to_string(), claimed_by.clone());

            Notification {
                title: "Task Claimed".to_string(),
                body: format!("{} claimed \"{}\"", claimer_name, title),
                data,
            }
        }
        TaskNotice::TaskCompleted { task_id, title } => {
            let title = title.as_deref().unwrap_or(FALLBACK_TASK_TITLE);
            data.insert("taskId".to_string(), task_id.clone());

            Notification {
                title: "Task Completed!".to_string(),
                body: format!("\"{}\" has been completed.", title),
                data,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_task_created_template() {
        let notification = compose(&TaskNotice::PublicTaskCreated {
            task_id: "t1".to_string(),
            household_id: "h1".to_string(),
            created_by: Some("u1".to_string()),
            title: Some("Take out the bins".to_string()),
        });

        assert_eq!(notification.title, "New Public Task");
        assert_eq!(
            notification.body,
            "\"Take out the bins\" was added to your household."
        );
        assert_eq!(
            notification.data.get("type").map(String::as_str),
            Some("public_task_created")
        );
        assert_eq!(notification.data.get("taskId").map(String::as_str), Some("t1"));
        assert_eq!(
            notification.data.get("householdId").map(String::as_str),
            Some("h1")
        );
        assert_eq!(
            notification.data.get("createdBy").map(String::as_str),
            Some("u1")
        );
    }

    #[test]
    fn test_created_by_coerces_to_empty_string() {
        let notification = compose(&TaskNotice::PublicTaskCreated {
            task_id: "t1".to_string(),
            household_id: "h1".to_string(),
            created_by: None,
            title: None,
        });

        // Absent ids become "", never a missing key.
        assert_eq!(notification.data.get("createdBy").map(String::as_str), Some(""));
        assert_eq!(
            notification.body,
            "\"New household task\" was added to your household."
        );
    }

    #[test]
    fn test_task_claimed_template() {
        let notification = compose(&TaskNotice::TaskClaimed {
            task_id: "t2".to_string(),
            claimed_by: "u2".to_string(),
            claimer_name: "Dana".to_string(),
            title: Some("Water the plants".to_string()),
        });

        assert_eq!(notification.title, "Task Claimed");
        assert_eq!(notification.body, "Dana claimed \"Water the plants\"");
        assert_eq!(
            notification.data.get("type").map(String::as_str),
            Some("task_claimed")
        );
        assert_eq!(
            notification.data.get("claimedBy").map(String::as_str),
            Some("u2")
        );
        assert!(!notification.data.contains_key("householdId"));
    }

    #[test]
    fn test_task_completed_template() {
        let notification = compose(&TaskNotice::TaskCompleted {
            task_id: "t3".to_string(),
            title: None,
        });

        assert_eq!(notification.title, "Task Completed!");
        assert_eq!(notification.body, "\"A task\" has been completed.");
        assert_eq!(
            notification.data.get("type").map(String::as_str),
            Some("task_completed")
        );
        assert_eq!(notification.data.get("taskId").map(String::as_str), Some("t3"));
        assert!(!notification.data.contains_key("createdBy"));
    }
}
