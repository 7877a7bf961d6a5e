//! `/todos` and `/todos/{id}`.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpMethod, RequestInit};
use crate::transport::Transport;
use crate::types::{CreateTodoRequest, Todo};

pub const GET_TODOS_FAILED: &str = "failed to get todos";
pub const GET_TODO_FAILED: &str = "failed to get todo";
pub const CREATE_TODO_FAILED: &str = "failed to create todo";

pub fn build_get_todos() -> ApiRequest {
    ApiRequest::new("/todos", RequestInit::new(HttpMethod::Get).json_content_type())
}

pub fn build_get_todo(todo_id: &str) -> ApiRequest {
    ApiRequest::new(
        format!("/todos/{todo_id}"),
        RequestInit::new(HttpMethod::Get).json_content_type(),
    )
}

pub fn build_create_todo(input: &CreateTodoRequest) -> Result<ApiRequest, ApiError> {
    let init = RequestInit::new(HttpMethod::Post)
        .json_content_type()
        .json_body(input)?;
    Ok(ApiRequest::new("/todos", init))
}

impl<T: Transport> ApiClient<T> {
    pub fn get_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.call(build_get_todos(), GET_TODOS_FAILED)
    }

    pub fn get_todo(&self, todo_id: &str) -> Result<Todo, ApiError> {
        self.call(build_get_todo(todo_id), GET_TODO_FAILED)
    }

    pub fn create_todo(&self, input: &CreateTodoRequest) -> Result<Todo, ApiError> {
        self.call(build_create_todo(input)?, CREATE_TODO_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_header() -> Vec<(String, String)> {
        vec![("content-type".to_string(), "application/json".to_string())]
    }

    #[test]
    fn build_get_todos_produces_correct_request() {
        let req = build_get_todos();
        assert_eq!(req.path, "/todos");
        assert_eq!(req.init.method, HttpMethod::Get);
        assert_eq!(req.init.headers, json_header());
        assert!(req.init.body.is_none());
    }

    #[test]
    fn build_get_todo_interpolates_id_verbatim() {
        let req = build_get_todo("todo-1");
        assert_eq!(req.path, "/todos/todo-1");
        assert_eq!(req.init.method, HttpMethod::Get);
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodoRequest {
            name: "Groceries".to_string(),
        };
        let req = build_create_todo(&input).unwrap();
        assert_eq!(req.path, "/todos");
        assert_eq!(req.init.method, HttpMethod::Post);
        assert_eq!(req.init.headers, json_header());
        let body: serde_json::Value =
            serde_json::from_str(req.init.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"name": "Groceries"}));
    }
}
