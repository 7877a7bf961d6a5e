//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined independently
//! of the mock-server crate; integration tests catch schema drift. IDs and
//! due dates are opaque strings: the client never validates or reparses them,
//! so a `dueDate` comes back exactly as the server sent it.

use serde::{Deserialize, Serialize};

/// The logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// A named collection of tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub name: String,
}

/// Request payload for creating a todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub name: String,
}

/// A single actionable item inside a todo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub completed: bool,
}

/// Request payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub completed: bool,
}

/// Request payload for a partial task update. Only the fields present in the
/// JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialUpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_uses_camel_case_due_date() {
        let task = Task {
            id: "task-1".to_string(),
            name: "Write report".to_string(),
            description: String::new(),
            due_date: "2021-10-10".to_string(),
            completed: false,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2021-10-10");
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn task_ignores_extra_server_fields() {
        let task: Task = serde_json::from_str(
            r#"{"id":"t","name":"n","description":"d","dueDate":"2021-10-10T00:00:00+07:00",
                "completed":true,"sortOrder":3,"createdAt":"2021-10-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.due_date, "2021-10-10T00:00:00+07:00");
        assert!(task.completed);
    }

    #[test]
    fn partial_update_omits_absent_fields() {
        let input = PartialUpdateTaskRequest {
            completed: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"completed":true}"#);
    }

    #[test]
    fn partial_update_all_fields_optional() {
        let input: PartialUpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(input.name.is_none());
        assert!(input.description.is_none());
        assert!(input.due_date.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn create_task_rejects_missing_name() {
        let result: Result<CreateTaskRequest, _> =
            serde_json::from_str(r#"{"description":"","dueDate":"","completed":false}"#);
        assert!(result.is_err());
    }
}
