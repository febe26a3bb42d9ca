use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Numeric task identifier, written to storage as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TaskId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(TaskId)
            .map_err(|_| anyhow!("Invalid task id '{}': expected a positive number", s))
    }
}

/// Hands out strictly increasing ids seeded from the wall clock.
///
/// Each id is `max(now_millis, last + 1)`, so ids stay close to creation time
/// while never colliding within one store.
#[derive(Debug, Clone, Default)]
pub struct TaskIdGenerator {
    last: u64,
}

impl TaskIdGenerator {
    pub fn starting_after<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a TaskId>,
    {
        let last = ids.into_iter().map(TaskId::get).max().unwrap_or(0);
        Self { last }
    }

    pub fn next_id(&mut self) -> TaskId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last.saturating_add(1));
        TaskId(self.last)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(rename = "dueDate", default)]
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Calendar date of `due_date`, or `None` when empty or malformed.
    pub fn due_on(&self) -> Option<NaiveDate> {
        parse_due_date(&self.due_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub due_date: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new<T: Into<String>, D: Into<String>>(text: T, due_date: D) -> Self {
        Self {
            text: text.into(),
            due_date: due_date.into(),
            completed: false,
        }
    }

    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            text: self.text,
            due_date: self.due_date,
            completed: self.completed,
        }
    }
}

pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT).ok()
}

/// Today's local calendar date in `YYYY-MM-DD` form.
pub fn today_string() -> String {
    Local::now().date_naive().format(DUE_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" | "open" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            other => Err(anyhow!(
                "Unknown filter '{}': expected all|active|completed",
                other
            )),
        }
    }
}

impl ValueEnum for Filter {
    fn value_variants<'a>() -> &'a [Self] {
        const VARIANTS: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// The toolbar buttons; exactly one shows as active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Control {
    #[default]
    ShowAll,
    ShowActive,
    ShowCompleted,
    SortDate,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::ShowAll,
        Control::ShowActive,
        Control::ShowCompleted,
        Control::SortDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::ShowAll => "show-all",
            Control::ShowActive => "show-active",
            Control::ShowCompleted => "show-completed",
            Control::SortDate => "sort-date",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Control::ShowAll => "All",
            Control::ShowActive => "Active",
            Control::ShowCompleted => "Completed",
            Control::SortDate => "Sort by date",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Control::ShowAll => 0,
            Control::ShowActive => 1,
            Control::ShowCompleted => 2,
            Control::SortDate => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab-case")]
pub enum SortKey {
    Id,
    Date,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleResult {
    pub id: TaskId,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub id: TaskId,
    pub deleted: bool,
}
