//! Tasks, always scoped under a todo: `/todos/{id}/tasks[/{taskId}]`.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpMethod, RequestInit};
use crate::transport::Transport;
use crate::types::{CreateTaskRequest, PartialUpdateTaskRequest, Task};

pub const GET_TASKS_FAILED: &str = "failed to get tasks";
pub const CREATE_TASK_FAILED: &str = "failed to create task";
pub const PARTIAL_UPDATE_TASK_FAILED: &str = "failed to partial update task";
pub const DELETE_TASK_FAILED: &str = "failed to delete task";

fn tasks_path(todo_id: &str) -> String {
    format!("/todos/{todo_id}/tasks")
}

fn task_path(todo_id: &str, task_id: &str) -> String {
    format!("/todos/{todo_id}/tasks/{task_id}")
}

pub fn build_get_tasks(todo_id: &str) -> ApiRequest {
    ApiRequest::new(
        tasks_path(todo_id),
        RequestInit::new(HttpMethod::Get).json_content_type(),
    )
}

pub fn build_create_task(todo_id: &str, input: &CreateTaskRequest) -> Result<ApiRequest, ApiError> {
    let init = RequestInit::new(HttpMethod::Post)
        .json_content_type()
        .json_body(input)?;
    Ok(ApiRequest::new(tasks_path(todo_id), init))
}

pub fn build_partial_update_task(
    todo_id: &str,
    task_id: &str,
    input: &PartialUpdateTaskRequest,
) -> Result<ApiRequest, ApiError> {
    let init = RequestInit::new(HttpMethod::Patch)
        .json_content_type()
        .json_body(input)?;
    Ok(ApiRequest::new(task_path(todo_id, task_id), init))
}

pub fn build_delete_task(todo_id: &str, task_id: &str) -> ApiRequest {
    ApiRequest::new(
        task_path(todo_id, task_id),
        RequestInit::new(HttpMethod::Delete).json_content_type(),
    )
}

impl<T: Transport> ApiClient<T> {
    pub fn get_tasks(&self, todo_id: &str) -> Result<Vec<Task>, ApiError> {
        self.call(build_get_tasks(todo_id), GET_TASKS_FAILED)
    }

    pub fn create_task(&self, todo_id: &str, input: &CreateTaskRequest) -> Result<Task, ApiError> {
        self.call(build_create_task(todo_id, input)?, CREATE_TASK_FAILED)
    }

    /// Sends only the fields set in `input`; the server merges them and
    /// answers with the full task.
    pub fn partial_update_task(
        &self,
        todo_id: &str,
        task_id: &str,
        input: &PartialUpdateTaskRequest,
    ) -> Result<Task, ApiError> {
        self.call(
            build_partial_update_task(todo_id, task_id, input)?,
            PARTIAL_UPDATE_TASK_FAILED,
        )
    }

    pub fn delete_task(&self, todo_id: &str, task_id: &str) -> Result<(), ApiError> {
        self.call_empty(build_delete_task(todo_id, task_id), DELETE_TASK_FAILED)
    }
}
