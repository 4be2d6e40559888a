//! Filter, sort, and page parameters for listing todos.

use std::cmp::Ordering;

use crate::model::Todo;

/// Predicates applied by [`TodoStore::find_by_filter`](crate::store::TodoStore::find_by_filter).
///
/// Every `None` field matches all records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub status: Option<bool>,
    /// Case-insensitive substring of `text`.
    pub text: Option<String>,
    pub priority: Option<u8>,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        if self.status.is_some_and(|status| todo.status != status) {
            return false;
        }
        if self.priority.is_some_and(|priority| todo.priority != priority) {
            return false;
        }
        match &self.text {
            Some(needle) => todo.text.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

/// Field a listing is ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    Priority,
    DueDate,
    /// Priority first, then due date for equal priorities.
    PriorityDueDate,
    #[default]
    CreationDate,
}

impl SortKey {
    /// Maps the `sortBy` query value; unrecognized names fall back to
    /// [`SortKey::CreationDate`].
    pub fn parse(value: &str) -> Self {
        match value {
            "priority" => Self::Priority,
            "dueDate" => Self::DueDate,
            "priorityDueDate" => Self::PriorityDueDate,
            _ => Self::CreationDate,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// `ASC` in any case is ascending; any other value sorts descending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Sort key plus the two independently chosen directions.
///
/// `CreationDate` ordering follows `priority_direction`; there is no
/// separate direction parameter for it. Records without a due date order
/// before dated ones when ascending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoSort {
    pub key: SortKey,
    pub priority_direction: Direction,
    pub due_date_direction: Direction,
}

impl TodoSort {
    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        let by_priority = || self.priority_direction.apply(a.priority.cmp(&b.priority));
        let by_due_date = || self.due_date_direction.apply(a.due_date.cmp(&b.due_date));
        match self.key {
            SortKey::Priority => by_priority(),
            SortKey::DueDate => by_due_date(),
            SortKey::PriorityDueDate => by_priority().then_with(by_due_date),
            SortKey::CreationDate => self
                .priority_direction
                .apply(a.creation_date.cmp(&b.creation_date)),
        }
    }

    /// Stable in-place sort; equal keys keep their incoming order.
    pub fn sort(&self, todos: &mut [Todo]) {
        todos.sort_by(|a, b| self.compare(a, b));
    }
}

/// A 1-indexed page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: usize,
}

impl PageRequest {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_SIZE: usize = 10;

    pub const fn new(page: i64, size: usize) -> Self {
        Self { page, size }
    }

    /// Zero-based offset of the first record; pages below 1 map to 0.
    pub fn offset(&self) -> usize {
        let index = usize::try_from(self.page.saturating_sub(1)).unwrap_or(0);
        index.saturating_mul(self.size)
    }

    /// The slice of `todos` this page covers, clamped to its length.
    pub fn slice<'a>(&self, todos: &'a [Todo]) -> &'a [Todo] {
        let start = self.offset().min(todos.len());
        let end = start.saturating_add(self.size).min(todos.len());
        &todos[start..end]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_SIZE)
    }
}
