//! Shared test utilities for Finance Buddy.
//!
//! Helpers for setting up test databases, stores that fail on demand, and goals
//! with sensible defaults.

use crate::{
    core::{
        goal::{Goal, NewGoal},
        storage::KeyValueStore,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Shorthand for a calendar date that is known to be valid.
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Creates a goal request with sensible defaults.
///
/// # Defaults
/// * `target_amount`: 100000
/// * `deadline`: 2030-01-01
/// * `description`: empty
#[allow(clippy::expect_used)]
pub fn sample_new_goal(name: &str) -> NewGoal {
    NewGoal::new(name, 100_000, date(2030, 1, 1), "").expect("valid test goal")
}

/// Builds a stored goal directly, bypassing the store, for progress tests.
#[allow(clippy::expect_used)]
pub fn goal_with_amounts(current_amount: i64, target_amount: i64, deadline: NaiveDate) -> Goal {
    Goal {
        id: 1,
        name: "Test goal".to_string(),
        target_amount,
        deadline,
        description: String::new(),
        current_amount,
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid test timestamp"),
    }
}

/// Store whose reads and writes fail on demand. Writes fail by default.
#[derive(Debug)]
pub struct FailingStore {
    /// Fail every `get`
    pub fail_reads: bool,
    /// Fail every `set`
    pub fail_writes: bool,
}

impl Default for FailingStore {
    fn default() -> Self {
        Self {
            fail_reads: false,
            fail_writes: true,
        }
    }
}

impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(Error::Io(std::io::Error::other("storage unavailable")));
        }
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Io(std::io::Error::other("quota exceeded")));
        }
        Ok(())
    }
}
