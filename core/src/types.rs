//! Wire types for the todo API.
//!
//! # Design
//! These mirror the server's JSON schema but are defined independently so
//! the client never links the server. The integration test and the JSON
//! test vectors catch schema drift between the two.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A todo as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub status: bool,
    pub due_date: Option<NaiveDate>,
    pub priority: u8,
    pub creation_date: NaiveDateTime,
    pub done_date: Option<NaiveDateTime>,
    pub elapsed_time: Option<i64>,
}

/// Payload for creating a todo or replacing one's text, due date, and
/// status. Priority is derived by the server whenever a due date is set.
/// `creation_date` backdates a new todo; the server stamps the current
/// time when it is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    pub text: String,
    #[serde(default)]
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_date: Option<NaiveDateTime>,
}

fn is_zero(priority: &u8) -> bool {
    *priority == 0
}

impl TodoInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn created_at(mut self, creation_date: NaiveDateTime) -> Self {
        self.creation_date = Some(creation_date);
        self
    }
}

/// One page of `GET /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub todos_list: Vec<Todo>,
    pub total: usize,
}

/// Average minutes to completion, overall and per priority tier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoMetrics {
    pub avg_time: f64,
    pub avg_time_low: f64,
    pub avg_time_medium: f64,
    pub avg_time_high: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Priority,
    DueDate,
    PriorityDueDate,
    CreationDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Query parameters for `GET /todos`. Unset fields are left out of the
/// query string and take the server's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_priority: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_due_date: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl ListQuery {
    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }

    /// Sorts by one field. The server reads the creation-date direction
    /// from `directionPriority`, so that is where it goes.
    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_by = Some(field);
        match field {
            SortField::DueDate => self.direction_due_date = Some(direction),
            _ => self.direction_priority = Some(direction),
        }
        self
    }

    /// Sorts by priority, breaking ties by due date.
    pub fn sort_priority_then_due_date(mut self, priority: SortDirection, due_date: SortDirection) -> Self {
        self.sort_by = Some(SortField::PriorityDueDate);
        self.direction_priority = Some(priority);
        self.direction_due_date = Some(due_date);
        self
    }

    pub fn status(mut self, done: bool) -> Self {
        self.status = Some(done);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }
}
