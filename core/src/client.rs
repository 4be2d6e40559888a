//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; the caller runs the round-trip in between.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ListQuery, Todo, TodoInput, TodoMetrics, TodoPage};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self, query: &ListQuery) -> Result<HttpRequest, ApiError> {
        let query = serde_urlencoded::to_string(query).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let path = if query.is_empty() {
            format!("{}/todos", self.base_url)
        } else {
            format!("{}/todos?{query}", self.base_url)
        };
        Ok(self.bodyless(HttpMethod::Get, path))
    }

    pub fn build_get_todo(&self, id: u64) -> HttpRequest {
        self.bodyless(HttpMethod::Get, format!("{}/todos/{id}", self.base_url))
    }

    pub fn build_create_todo(&self, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        self.with_json_body(HttpMethod::Post, format!("{}/todos", self.base_url), input)
    }

    pub fn build_update_todo(&self, id: u64, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        self.with_json_body(HttpMethod::Put, format!("{}/todos/{id}", self.base_url), input)
    }

    pub fn build_mark_done(&self, id: u64) -> HttpRequest {
        self.bodyless(HttpMethod::Post, format!("{}/todos/{id}/done", self.base_url))
    }

    pub fn build_mark_undone(&self, id: u64) -> HttpRequest {
        self.bodyless(HttpMethod::Put, format!("{}/todos/{id}/undone", self.base_url))
    }

    pub fn build_get_metrics(&self) -> HttpRequest {
        self.bodyless(HttpMethod::Get, format!("{}/todos/metrics", self.base_url))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<TodoPage, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_mark_done(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_mark_undone(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_metrics(&self, response: HttpResponse) -> Result<TodoMetrics, ApiError> {
        parse_json(response, 200)
    }

    fn bodyless(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json_body(&self, method: HttpMethod, path: String, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
