//! Task list view-model.
//!
//! Pure functions that turn the fetched task collection into what a list
//! screen shows. Nothing here is cached: every call recomputes from the
//! input slice, so `view` is idempotent.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};

use crate::domain::{Task, TaskStatus};

/// Sentinel spelling that disables a filter.
pub const ALL: &str = "ALL";

/// Root-locale collator for title ordering, built once from compiled data.
static TITLE_COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
        .inspect_err(|error| tracing::warn!(%error, "Title collator unavailable"))
        .ok()
});

// =============================================================================
// View Parameters
// =============================================================================

/// Status filter: a single status, or every status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Keep every task.
    #[default]
    All,
    /// Keep tasks with exactly this status.
    Only(TaskStatus),
}

impl StatusFilter {
    fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => task.status == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    /// Parses `ALL` (case-insensitive) or a status name.
    ///
    /// # Errors
    ///
    /// Returns an error string if the input names neither.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case(ALL) {
            return Ok(Self::All);
        }
        TaskStatus::from_str(value)
            .map(Self::Only)
            .map_err(|error| error.to_string())
    }
}

/// Category filter: an exact category, or every category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Keep every task.
    #[default]
    All,
    /// Keep tasks whose category equals this one exactly.
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => task.category.as_deref() == Some(category.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    /// Parses `ALL` (exact spelling) as the sentinel; anything else is a
    /// category name.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(if value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        })
    }
}

/// Sort order applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// By status rank: TODO, `IN_PROGRESS`, DONE.
    Status,
    /// By due date ascending; undated tasks last.
    #[default]
    DueDate,
    /// By title in root-locale collation order.
    Title,
}

impl FromStr for SortKey {
    type Err = String;

    /// Parses `status`, `due-date` (or `dueDate`, `due_date`) or `title`,
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error string for any other value.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "status" => Ok(Self::Status),
            "due-date" | "duedate" => Ok(Self::DueDate),
            "title" => Ok(Self::Title),
            other => Err(format!(
                "Invalid sort key '{other}'. Valid values are: status, due-date, title"
            )),
        }
    }
}

/// The four inputs of [`view`], bundled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    /// Free-text query over title and description.
    pub search: String,
    /// Status filter.
    pub status: StatusFilter,
    /// Category filter.
    pub category: CategoryFilter,
    /// Sort order.
    pub sort: SortKey,
}

// =============================================================================
// Derivations
// =============================================================================

/// Searches, filters and sorts `tasks`.
///
/// The sort is stable, so tasks that compare equal keep their input order.
#[must_use]
pub fn view(tasks: &[Task], params: &ViewParams) -> Vec<Task> {
    let query = params.search.trim().to_lowercase();

    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| matches_search(task, &query))
        .filter(|task| params.status.matches(task))
        .filter(|task| params.category.matches(task))
        .cloned()
        .collect();

    match params.sort {
        SortKey::Status => visible.sort_by_key(|task| task.status.rank()),
        SortKey::DueDate => visible.sort_by(compare_due_dates),
        SortKey::Title => visible.sort_by(|left, right| compare_titles(&left.title, &right.title)),
    }

    visible
}

/// `query` must already be trimmed and lowercased.
fn matches_search(task: &Task, query: &str) -> bool {
    query.is_empty()
        || task.title.to_lowercase().contains(query)
        || task
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(query))
}

fn compare_due_dates(left: &Task, right: &Task) -> Ordering {
    match (left.due_date, right.due_date) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Collation order first, code points to break ties.
fn compare_titles(left: &str, right: &str) -> Ordering {
    let collated = match TITLE_COLLATOR.as_ref() {
        Some(collator) => collator.compare(left, right),
        None => left.to_lowercase().cmp(&right.to_lowercase()),
    };
    collated.then_with(|| left.cmp(right))
}

/// Distinct non-empty categories across `tasks`, ascending.
#[must_use]
pub fn distinct_categories(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .filter_map(|task| task.category.as_deref())
        .filter(|category| !category.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Presentation flag: due before `today` and not yet done.
#[must_use]
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.is_overdue_on(today)
}

// =============================================================================
// Tests
// =============================================================================
