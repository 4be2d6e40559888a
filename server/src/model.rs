//! Todo records and the JSON shapes exchanged with clients.
//!
//! Field names are camelCase on the wire. Optional timestamps serialize as
//! `null` rather than being omitted, so every response carries the full
//! record shape.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// No due date, so no urgency tier.
pub const PRIORITY_NONE: u8 = 0;
pub const PRIORITY_LOW: u8 = 1;
pub const PRIORITY_MEDIUM: u8 = 2;
pub const PRIORITY_HIGH: u8 = 3;

/// A single task record.
///
/// `id` and `creation_date` are `None` only before the record has been
/// saved; everything returned by a store has both populated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Option<u64>,
    pub text: String,
    pub status: bool,
    pub due_date: Option<NaiveDate>,
    pub priority: u8,
    pub creation_date: Option<NaiveDateTime>,
    pub done_date: Option<NaiveDateTime>,
    /// Seconds from creation to completion, present only while done.
    pub elapsed_time: Option<i64>,
}

/// Request body for creating or replacing a todo.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    pub text: String,
    #[serde(default)]
    pub status: bool,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: u8,
    pub creation_date: Option<NaiveDateTime>,
    pub done_date: Option<NaiveDateTime>,
}

impl From<TodoInput> for Todo {
    fn from(input: TodoInput) -> Self {
        Self {
            id: None,
            text: input.text,
            status: input.status,
            due_date: input.due_date,
            priority: input.priority,
            creation_date: input.creation_date,
            done_date: input.done_date,
            elapsed_time: None,
        }
    }
}

/// Average minutes from creation to completion, overall and per priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoMetrics {
    pub avg_time: f64,
    pub avg_time_low: f64,
    pub avg_time_medium: f64,
    pub avg_time_high: f64,
}

/// One page of a filtered, sorted listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub todos_list: Vec<Todo>,
    /// Number of records that matched the filter, before pagination.
    pub total: usize,
}
