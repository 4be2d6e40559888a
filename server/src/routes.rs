//! HTTP handlers.
//!
//! Handlers validate input shape, call into [`TodoService`], and map its
//! errors through [`ApiErrorResponse`]. Everything else about a todo is the
//! service's business.

use axum::{
    extract::{FromRequest, FromRequestParts, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::error::{ApiErrorResponse, FieldError};
use crate::model::{Todo, TodoInput, TodoMetrics, TodoPage, PRIORITY_HIGH};
use crate::query::{Direction, PageRequest, SortKey, TodoFilter, TodoSort};
use crate::service::TodoService;

pub type AppState = TodoService;

/// `Json` body whose rejection renders as an [`ApiErrorResponse`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiErrorResponse))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiErrorResponse))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiErrorResponse))]
pub struct ApiPath<T>(pub T);

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/metrics", get(metrics))
        .route("/todos/{id}", get(get_todo).put(update_todo))
        .route("/todos/{id}/done", post(mark_done))
        .route("/todos/{id}/undone", put(mark_undone))
}

/// Query string of `GET /todos`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
    pub sort_by: Option<String>,
    pub direction_priority: Option<String>,
    pub direction_due_date: Option<String>,
    pub status: Option<bool>,
    pub text: Option<String>,
    pub priority: Option<u8>,
}

fn default_page() -> i64 {
    PageRequest::DEFAULT_PAGE
}

fn default_size() -> i64 {
    PageRequest::DEFAULT_SIZE as i64
}

impl ListParams {
    fn into_parts(self) -> Result<(TodoFilter, TodoSort, PageRequest), ApiErrorResponse> {
        let mut errors = Vec::new();
        let size = usize::try_from(self.size).ok().filter(|size| *size > 0);
        if size.is_none() {
            errors.push(FieldError::new("size", "must be at least 1"));
        }
        if self.priority.is_some_and(|priority| priority > PRIORITY_HIGH) {
            errors.push(FieldError::new("priority", "must be between 0 and 3"));
        }
        let Some(size) = size.filter(|_| errors.is_empty()) else {
            tracing::warn!(?errors, "rejected list query");
            return Err(ApiErrorResponse::validation(errors));
        };

        let filter = TodoFilter {
            status: self.status,
            text: self.text,
            priority: self.priority,
        };
        let sort = TodoSort {
            key: self.sort_by.as_deref().map(SortKey::parse).unwrap_or_default(),
            priority_direction: self
                .direction_priority
                .as_deref()
                .map(Direction::parse)
                .unwrap_or_default(),
            due_date_direction: self
                .direction_due_date
                .as_deref()
                .map(Direction::parse)
                .unwrap_or_default(),
        };
        Ok((filter, sort, PageRequest::new(self.page, size)))
    }
}

fn validate(input: &TodoInput) -> Result<(), ApiErrorResponse> {
    let mut errors = Vec::new();
    if input.text.trim().is_empty() {
        errors.push(FieldError::new("text", "You can't leave the task empty!"));
    }
    if input.priority > PRIORITY_HIGH {
        errors.push(FieldError::new("priority", "must be between 0 and 3"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::warn!(?errors, "rejected todo input");
        Err(ApiErrorResponse::validation(errors))
    }
}

async fn list_todos(
    State(service): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<TodoPage>, ApiErrorResponse> {
    let (filter, sort, page) = params.into_parts()?;
    Ok(Json(service.get_all_todos(&filter, sort, page)))
}

async fn create_todo(
    State(service): State<AppState>,
    ApiJson(input): ApiJson<TodoInput>,
) -> Result<(StatusCode, Json<Todo>), ApiErrorResponse> {
    validate(&input)?;
    Ok((StatusCode::CREATED, Json(service.add_todo(input))))
}

async fn get_todo(
    State(service): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Todo>, ApiErrorResponse> {
    Ok(Json(service.get_todo(id)?))
}

async fn update_todo(
    State(service): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(input): ApiJson<TodoInput>,
) -> Result<Json<Todo>, ApiErrorResponse> {
    validate(&input)?;
    Ok(Json(service.update_todo(id, input)?))
}

async fn mark_done(
    State(service): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Todo>, ApiErrorResponse> {
    Ok(Json(service.mark_done(id)?))
}

async fn mark_undone(
    State(service): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Todo>, ApiErrorResponse> {
    Ok(Json(service.mark_undone(id)?))
}

async fn metrics(State(service): State<AppState>) -> Json<TodoMetrics> {
    Json(service.get_metrics())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_missing_parameters() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        let (filter, sort, page) = params.into_parts().unwrap();
        assert_eq!(filter, TodoFilter::default());
        assert_eq!(sort, TodoSort::default());
        assert_eq!(page, PageRequest::new(1, 10));
    }

    #[test]
    fn sort_parameters_map_onto_todo_sort() {
        let params: ListParams = serde_json::from_str(
            r#"{"sortBy":"priorityDueDate","directionPriority":"desc","directionDueDate":"ASC"}"#,
        )
        .unwrap();
        let (_, sort, _) = params.into_parts().unwrap();
        assert_eq!(sort.key, SortKey::PriorityDueDate);
        assert_eq!(sort.priority_direction, Direction::Desc);
        assert_eq!(sort.due_date_direction, Direction::Asc);
    }

    #[test]
    fn zero_size_is_rejected() {
        let params: ListParams = serde_json::from_str(r#"{"size":0}"#).unwrap();
        let err = params.into_parts().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn out_of_range_priority_filter_is_rejected() {
        let params: ListParams = serde_json::from_str(r#"{"priority":4}"#).unwrap();
        assert!(params.into_parts().is_err());
    }

    #[test]
    fn blank_text_fails_validation() {
        let input = TodoInput {
            text: "   ".to_string(),
            ..TodoInput::default()
        };
        let err = validate(&input).unwrap_err();
        let details = err.error.details.unwrap();
        assert_eq!(details[0].field, "text");
    }

    #[test]
    fn priority_above_high_fails_validation() {
        let input = TodoInput {
            text: "ok".to_string(),
            priority: 4,
            ..TodoInput::default()
        };
        assert!(validate(&input).is_err());
    }
}
