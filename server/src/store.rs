//! Todo storage.
//!
//! [`TodoStore`] is the seam between business rules and the collection of
//! records. [`InMemoryTodoStore`] is the only backend: an ordered map behind
//! a read/write lock plus an atomic id counter. Nothing survives a restart.
//!
//! Each call is atomic on its own. There is no version check between a
//! caller's `find_by_id` and its later `save`, so concurrent updates to the
//! same record are last-write-wins.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Local;
use parking_lot::RwLock;

use crate::model::{Todo, TodoMetrics, PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_MEDIUM};
use crate::query::TodoFilter;

/// Elapsed-time sums and the number of completed records behind each sum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElapsedTotals {
    pub total_seconds: f64,
    pub completed: usize,
    pub low_seconds: f64,
    pub low_completed: usize,
    pub medium_seconds: f64,
    pub medium_completed: usize,
    pub high_seconds: f64,
    pub high_completed: usize,
}

impl ElapsedTotals {
    /// Adds one completed record. Priorities outside 1..=3 count only
    /// toward the overall total.
    pub fn record(&mut self, priority: u8, elapsed_seconds: i64) {
        let seconds = elapsed_seconds as f64;
        self.total_seconds += seconds;
        self.completed += 1;
        match priority {
            PRIORITY_LOW => {
                self.low_seconds += seconds;
                self.low_completed += 1;
            }
            PRIORITY_MEDIUM => {
                self.medium_seconds += seconds;
                self.medium_completed += 1;
            }
            PRIORITY_HIGH => {
                self.high_seconds += seconds;
                self.high_completed += 1;
            }
            _ => {}
        }
    }
}

fn average_minutes(total_seconds: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total_seconds / count as f64 / 60.0
    }
}

pub trait TodoStore: Send + Sync {
    /// Snapshot of every record; later writes are not visible through it.
    fn find_all(&self) -> Vec<Todo>;

    fn find_by_id(&self, id: u64) -> Option<Todo>;

    /// Inserts or fully replaces a record.
    ///
    /// A record without an id gets the next unused one. A record with an id
    /// replaces whatever is stored under it. `creation_date` is filled with
    /// the current time when unset and otherwise kept as given.
    fn save(&self, todo: Todo) -> Todo;

    /// Removes the record if present. Unknown ids are ignored.
    fn delete_by_id(&self, id: u64);

    fn find_by_filter(&self, filter: &TodoFilter) -> Vec<Todo>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts elapsed-second totals into average minutes. Empty buckets
    /// average to zero.
    fn get_metrics(&self, totals: &ElapsedTotals) -> TodoMetrics {
        TodoMetrics {
            avg_time: average_minutes(totals.total_seconds, totals.completed),
            avg_time_low: average_minutes(totals.low_seconds, totals.low_completed),
            avg_time_medium: average_minutes(totals.medium_seconds, totals.medium_completed),
            avg_time_high: average_minutes(totals.high_seconds, totals.high_completed),
        }
    }
}

/// Process-lifetime store keyed by id.
///
/// Iteration, and therefore every listing, is in ascending id order.
#[derive(Debug)]
pub struct InMemoryTodoStore {
    todos: RwLock<BTreeMap<u64, Todo>>,
    next_id: AtomicU64,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self {
            todos: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryTodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore for InMemoryTodoStore {
    fn find_all(&self) -> Vec<Todo> {
        self.todos.read().values().cloned().collect()
    }

    fn find_by_id(&self, id: u64) -> Option<Todo> {
        self.todos.read().get(&id).cloned()
    }

    fn save(&self, mut todo: Todo) -> Todo {
        let mut todos = self.todos.write();
        let id = match todo.id {
            Some(id) => {
                todos.remove(&id);
                id
            }
            // Explicit ids may already occupy counter values.
            None => loop {
                let candidate = self.next_id.fetch_add(1, Ordering::Relaxed);
                if !todos.contains_key(&candidate) {
                    break candidate;
                }
            },
        };
        todo.id = Some(id);
        if todo.creation_date.is_none() {
            todo.creation_date = Some(Local::now().naive_local());
        }
        todos.insert(id, todo.clone());
        todo
    }

    fn delete_by_id(&self, id: u64) {
        self.todos.write().remove(&id);
    }

    fn find_by_filter(&self, filter: &TodoFilter) -> Vec<Todo> {
        self.todos
            .read()
            .values()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.todos.read().len()
    }
}
