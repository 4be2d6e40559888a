//! Business rules for todos.
//!
//! [`TodoService`] owns an injected [`TodoStore`] and layers on top of it:
//! creation defaults, due-date priority, the done/undone transitions,
//! listing (filter, sort, paginate), and completion-time metrics.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::error::{Result, TodoError};
use crate::model::{
    Todo, TodoInput, TodoMetrics, TodoPage, PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_MEDIUM,
    PRIORITY_NONE,
};
use crate::query::{PageRequest, TodoFilter, TodoSort};
use crate::store::{ElapsedTotals, InMemoryTodoStore, TodoStore};

/// Priority tier for a due date as seen from `today`.
///
/// Seven days out or less is high, overdue dates included. Up to fourteen
/// days is medium, anything later is low. No due date means no priority.
pub fn priority_for(due_date: Option<NaiveDate>, today: NaiveDate) -> u8 {
    let Some(due_date) = due_date else {
        return PRIORITY_NONE;
    };
    match (due_date - today).num_days() {
        days if days > 14 => PRIORITY_LOW,
        days if days > 7 => PRIORITY_MEDIUM,
        _ => PRIORITY_HIGH,
    }
}

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTodoStore::new()))
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    /// Filters, sorts, and paginates. `total` counts every filtered record.
    pub fn get_all_todos(&self, filter: &TodoFilter, sort: TodoSort, page: PageRequest) -> TodoPage {
        let mut todos = self.store.find_by_filter(filter);
        sort.sort(&mut todos);
        TodoPage {
            todos_list: page.slice(&todos).to_vec(),
            total: todos.len(),
        }
    }

    pub fn get_todo(&self, id: u64) -> Result<Todo> {
        self.store.find_by_id(id).ok_or(TodoError::NotFound(id))
    }

    /// Creates an open todo. A due date overrides any supplied priority.
    pub fn add_todo(&self, input: TodoInput) -> Todo {
        let mut todo = Todo::from(input);
        if todo.due_date.is_some() {
            todo.priority = self.calculate_priority(todo.due_date);
        }
        todo.status = false;
        let saved = self.store.save(todo);
        tracing::debug!(id = ?saved.id, priority = saved.priority, "todo created");
        saved
    }

    /// Replaces text, due date, and status, and recomputes priority.
    ///
    /// Completion bookkeeping (`done_date`, `elapsed_time`) is left as it
    /// was, even when `status` changes here.
    pub fn update_todo(&self, id: u64, input: TodoInput) -> Result<Todo> {
        let mut todo = self.get_todo(id)?;
        todo.text = input.text;
        todo.due_date = input.due_date;
        todo.priority = self.calculate_priority(input.due_date);
        todo.status = input.status;
        let saved = self.store.save(todo);
        tracing::debug!(id, priority = saved.priority, status = saved.status, "todo updated");
        Ok(saved)
    }

    pub fn mark_done(&self, id: u64) -> Result<Todo> {
        let mut todo = self.get_todo(id)?;
        let now = Local::now().naive_local();
        let created = todo.creation_date.unwrap_or(now);
        todo.status = true;
        todo.done_date = Some(now);
        todo.elapsed_time = Some((now - created).num_seconds().max(0));
        let saved = self.store.save(todo);
        tracing::debug!(id, elapsed_time = ?saved.elapsed_time, "todo marked done");
        Ok(saved)
    }

    pub fn mark_undone(&self, id: u64) -> Result<Todo> {
        let mut todo = self.get_todo(id)?;
        todo.status = false;
        todo.done_date = None;
        todo.elapsed_time = None;
        let saved = self.store.save(todo);
        tracing::debug!(id, "todo marked undone");
        Ok(saved)
    }

    pub fn calculate_priority(&self, due_date: Option<NaiveDate>) -> u8 {
        priority_for(due_date, Local::now().date_naive())
    }

    /// Averages completion time over every record that has one.
    pub fn get_metrics(&self) -> TodoMetrics {
        let totals = self
            .store
            .find_all()
            .iter()
            .fold(ElapsedTotals::default(), |mut totals, todo| {
                if let Some(elapsed) = todo.elapsed_time {
                    totals.record(todo.priority, elapsed);
                }
                totals
            });
        self.store.get_metrics(&totals)
    }
}

impl Default for TodoService {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::query::{Direction, SortKey};

    fn service() -> TodoService {
        TodoService::in_memory()
    }

    fn input(text: &str) -> TodoInput {
        TodoInput {
            text: text.to_string(),
            ..TodoInput::default()
        }
    }

    fn days_from_today(days: u64) -> Option<NaiveDate> {
        Local::now().date_naive().checked_add_days(Days::new(days))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn priority_follows_day_thresholds() {
        let today = date(2024, 6, 1);
        assert_eq!(priority_for(None, today), PRIORITY_NONE);
        assert_eq!(priority_for(Some(date(2024, 6, 1)), today), PRIORITY_HIGH);
        assert_eq!(priority_for(Some(date(2024, 6, 8)), today), PRIORITY_HIGH);
        assert_eq!(priority_for(Some(date(2024, 6, 9)), today), PRIORITY_MEDIUM);
        assert_eq!(priority_for(Some(date(2024, 6, 15)), today), PRIORITY_MEDIUM);
        assert_eq!(priority_for(Some(date(2024, 6, 16)), today), PRIORITY_LOW);
        assert_eq!(priority_for(Some(date(2025, 1, 1)), today), PRIORITY_LOW);
    }

    #[test]
    fn overdue_dates_are_high_priority() {
        assert_eq!(priority_for(Some(date(2024, 5, 1)), date(2024, 6, 1)), PRIORITY_HIGH);
    }

    #[test]
    fn add_todo_forces_open_status() {
        let service = service();
        let todo = service.add_todo(TodoInput {
            status: true,
            ..input("Already done?")
        });
        assert!(!todo.status);
        assert_eq!(todo.id, Some(1));
        assert!(todo.creation_date.is_some());
    }

    #[test]
    fn add_todo_derives_priority_from_due_date() {
        let service = service();
        let todo = service.add_todo(TodoInput {
            due_date: days_from_today(30),
            priority: PRIORITY_HIGH,
            ..input("Far away")
        });
        assert_eq!(todo.priority, PRIORITY_LOW);
    }

    #[test]
    fn add_todo_without_due_date_keeps_input_priority() {
        let service = service();
        let todo = service.add_todo(TodoInput {
            priority: PRIORITY_MEDIUM,
            ..input("No date")
        });
        assert_eq!(todo.priority, PRIORITY_MEDIUM);
        assert_eq!(service.add_todo(input("Plain")).priority, PRIORITY_NONE);
    }

    #[test]
    fn update_todo_recomputes_priority_even_without_due_date() {
        let service = service();
        let created = service.add_todo(TodoInput {
            due_date: days_from_today(3),
            ..input("Soon")
        });
        assert_eq!(created.priority, PRIORITY_HIGH);

        let updated = service.update_todo(1, input("Someday")).unwrap();
        assert_eq!(updated.text, "Someday");
        assert_eq!(updated.due_date, None);
        assert_eq!(updated.priority, PRIORITY_NONE);
        assert_eq!(updated.creation_date, created.creation_date);
    }

    #[test]
    fn update_todo_sets_status_without_completion_bookkeeping() {
        let service = service();
        service.add_todo(input("Flip"));
        let updated = service
            .update_todo(
                1,
                TodoInput {
                    status: true,
                    due_date: days_from_today(10),
                    ..input("Flip")
                },
            )
            .unwrap();
        assert!(updated.status);
        assert_eq!(updated.priority, PRIORITY_MEDIUM);
        assert!(updated.done_date.is_none());
        assert!(updated.elapsed_time.is_none());
    }

    #[test]
    fn update_todo_reopening_keeps_completion_bookkeeping() {
        let service = service();
        service.add_todo(input("Reopen"));
        let done = service.mark_done(1).unwrap();

        let updated = service
            .update_todo(
                1,
                TodoInput {
                    status: false,
                    ..input("Reopen")
                },
            )
            .unwrap();
        assert!(!updated.status);
        assert_eq!(updated.done_date, done.done_date);
        assert_eq!(updated.elapsed_time, done.elapsed_time);
        assert!(updated.done_date.is_some());
    }

    #[test]
    fn mark_done_then_undone_clears_completion_fields() {
        let service = service();
        service.add_todo(input("Cycle"));

        let done = service.mark_done(1).unwrap();
        assert!(done.status);
        assert!(done.done_date.is_some());
        assert!(done.elapsed_time.is_some_and(|secs| secs >= 0));

        let undone = service.mark_undone(1).unwrap();
        assert!(!undone.status);
        assert!(undone.done_date.is_none());
        assert!(undone.elapsed_time.is_none());
        assert_eq!(undone.text, "Cycle");
    }

    #[test]
    fn mark_done_measures_from_creation_date() {
        let service = service();
        let created = Local::now().naive_local() - chrono::Duration::seconds(90);
        service.add_todo(TodoInput {
            creation_date: Some(created),
            ..input("Old")
        });
        let done = service.mark_done(1).unwrap();
        assert!(done.elapsed_time.is_some_and(|secs| secs >= 90));
    }

    #[test]
    fn unknown_ids_fail_without_touching_the_store() {
        let service = service();
        service.add_todo(input("Only"));
        let before = service.store().find_all();

        assert_eq!(service.update_todo(99, input("x")), Err(TodoError::NotFound(99)));
        assert_eq!(service.mark_done(99), Err(TodoError::NotFound(99)));
        assert_eq!(service.mark_undone(99), Err(TodoError::NotFound(99)));
        assert_eq!(service.get_todo(99), Err(TodoError::NotFound(99)));
        assert_eq!(service.store().find_all(), before);
    }

    #[test]
    fn get_all_todos_paginates_after_filtering() {
        let service = service();
        for n in 0..25 {
            service.add_todo(input(&format!("task {n}")));
        }
        let page = service.get_all_todos(
            &TodoFilter::default(),
            TodoSort::default(),
            PageRequest::new(2, 10),
        );
        assert_eq!(page.total, 25);
        let ids: Vec<_> = page.todos_list.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, (11..=20).collect::<Vec<_>>());
    }

    #[test]
    fn get_all_todos_reports_filtered_total() {
        let service = service();
        for n in 0..6 {
            service.add_todo(input(&format!("task {n}")));
        }
        service.mark_done(2).unwrap();
        service.mark_done(5).unwrap();

        let page = service.get_all_todos(
            &TodoFilter {
                status: Some(true),
                ..TodoFilter::default()
            },
            TodoSort::default(),
            PageRequest::new(1, 1),
        );
        assert_eq!(page.total, 2);
        assert_eq!(page.todos_list.len(), 1);
    }

    #[test]
    fn get_all_todos_sorts_before_paginating() {
        let service = service();
        for days in [30, 3, 10] {
            service.add_todo(TodoInput {
                due_date: days_from_today(days),
                ..input("dated")
            });
        }
        let page = service.get_all_todos(
            &TodoFilter::default(),
            TodoSort {
                key: SortKey::Priority,
                priority_direction: Direction::Desc,
                due_date_direction: Direction::Asc,
            },
            PageRequest::new(1, 2),
        );
        let priorities: Vec<_> = page.todos_list.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![PRIORITY_HIGH, PRIORITY_MEDIUM]);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn metrics_average_per_priority_bucket() {
        let service = service();
        for (priority, elapsed) in [(PRIORITY_HIGH, 60), (PRIORITY_MEDIUM, 120), (PRIORITY_LOW, 240)] {
            service.store().save(Todo {
                text: "done".to_string(),
                status: true,
                priority,
                elapsed_time: Some(elapsed),
                ..Todo::default()
            });
        }
        service.add_todo(input("still open"));

        let metrics = service.get_metrics();
        assert!((metrics.avg_time - 7.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.avg_time_high, 1.0);
        assert_eq!(metrics.avg_time_medium, 2.0);
        assert_eq!(metrics.avg_time_low, 4.0);
    }

    #[test]
    fn metrics_leave_empty_buckets_at_zero() {
        let service = service();
        service.store().save(Todo {
            text: "quick".to_string(),
            priority: PRIORITY_HIGH,
            elapsed_time: Some(300),
            ..Todo::default()
        });
        let metrics = service.get_metrics();
        assert_eq!(metrics.avg_time, 5.0);
        assert_eq!(metrics.avg_time_high, 5.0);
        assert_eq!(metrics.avg_time_low, 0.0);
        assert_eq!(metrics.avg_time_medium, 0.0);
    }

    #[test]
    fn metrics_with_no_todos_are_zero() {
        assert_eq!(service().get_metrics(), TodoMetrics::default());
    }
}
