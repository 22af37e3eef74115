//! Goal business logic - the savings goal model and the store that owns it.
//!
//! [`GoalStore`] keeps the ordered goal collection in memory and mirrors it to a
//! [`KeyValueStore`] as one JSON array under [`GOALS_STORAGE_KEY`]. The collection
//! is append-only: goals are created and listed, never edited or removed.
//! Every creation is persisted before it is reported as successful.

use crate::{
    core::storage::KeyValueStore,
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Storage key holding the serialized goal collection.
pub const GOALS_STORAGE_KEY: &str = "financeAI_goals";

/// Date format accepted for deadlines (`YYYY-MM-DD`).
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// A savings goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Creation time in milliseconds since the epoch, unique within the collection
    pub id: i64,
    /// Display name
    pub name: String,
    /// Amount to save, in whole currency units
    #[serde(alias = "amount")]
    pub target_amount: i64,
    /// Date the goal should be reached by
    pub deadline: NaiveDate,
    /// Free-text notes, possibly empty
    #[serde(default)]
    pub description: String,
    /// Amount saved so far
    #[serde(default)]
    pub current_amount: i64,
    /// When the goal was created
    pub created_at: DateTime<Utc>,
}

/// A validated request to create a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    name: String,
    target_amount: i64,
    deadline: NaiveDate,
    description: String,
}

impl NewGoal {
    /// Validates typed input. The name must contain something besides whitespace
    /// and the target amount must be positive. Deadlines in the past are accepted.
    /// Name and description are kept exactly as supplied.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGoal`] when a field is rejected.
    pub fn new(
        name: &str,
        target_amount: i64,
        deadline: NaiveDate,
        description: &str,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::InvalidGoal {
                reason: "goal name cannot be empty".to_string(),
            });
        }
        if target_amount <= 0 {
            return Err(Error::InvalidGoal {
                reason: format!("target amount must be positive, got {target_amount}"),
            });
        }

        Ok(Self {
            name: name.to_string(),
            target_amount,
            deadline,
            description: description.to_string(),
        })
    }

    /// Parses raw form input: the amount as a base-10 integer and the deadline
    /// as `YYYY-MM-DD`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGoal`] when a field cannot be parsed or is rejected.
    pub fn from_form(name: &str, amount: &str, deadline: &str, description: &str) -> Result<Self> {
        let target_amount = parse_amount(amount)?;
        let deadline = parse_deadline(deadline)?;
        Self::new(name, target_amount, deadline, description)
    }
}

/// Parses a whole-unit amount such as `"300000"`.
///
/// # Errors
/// Returns [`Error::InvalidGoal`] if the text is not an integer.
pub fn parse_amount(amount: &str) -> Result<i64> {
    amount.trim().parse::<i64>().map_err(|e| Error::InvalidGoal {
        reason: format!("target amount '{amount}' is not a whole number: {e}"),
    })
}

/// Parses a deadline such as `"2025-12-31"`.
///
/// # Errors
/// Returns [`Error::InvalidGoal`] if the text is not a valid calendar date.
pub fn parse_deadline(deadline: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(deadline.trim(), DEADLINE_FORMAT).map_err(|e| Error::InvalidGoal {
        reason: format!("deadline '{deadline}' is not a YYYY-MM-DD date: {e}"),
    })
}

/// Owner of the goal collection.
#[derive(Debug)]
pub struct GoalStore<S> {
    storage: S,
    goals: Vec<Goal>,
}

impl<S: KeyValueStore> GoalStore<S> {
    /// Creates a store with an empty collection. Nothing is read from `storage`
    /// until [`GoalStore::restore`] is called.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            goals: Vec::new(),
        }
    }

    /// Creates a store and restores the collection from `storage`.
    pub async fn load(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.restore().await;
        store
    }

    /// Goals in creation order.
    #[must_use]
    pub fn list_goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Creates a goal stamped with the current time.
    ///
    /// # Errors
    /// Returns [`Error::PersistenceWrite`] if the collection could not be saved;
    /// the goal is then not kept.
    pub async fn create_goal(&mut self, new_goal: NewGoal) -> Result<Goal> {
        self.create_goal_at(new_goal, Utc::now()).await
    }

    /// Creates a goal stamped with `now`.
    ///
    /// The id is `now` in milliseconds, bumped past the newest existing id so
    /// ids stay unique and increasing.
    ///
    /// # Errors
    /// Returns [`Error::InvalidGoal`] if the newest id is already `i64::MAX`, or
    /// [`Error::PersistenceWrite`] if the collection could not be saved; the goal
    /// is then not kept.
    pub async fn create_goal_at(&mut self, new_goal: NewGoal, now: DateTime<Utc>) -> Result<Goal> {
        let id = match self.goals.last() {
            None => now.timestamp_millis(),
            Some(last) => {
                let next = last.id.checked_add(1).ok_or_else(|| Error::InvalidGoal {
                    reason: format!("no goal id left after {}", last.id),
                })?;
                now.timestamp_millis().max(next)
            }
        };

        let goal = Goal {
            id,
            name: new_goal.name,
            target_amount: new_goal.target_amount,
            deadline: new_goal.deadline,
            description: new_goal.description,
            current_amount: 0,
            created_at: now,
        };

        self.goals.push(goal.clone());
        if let Err(e) = self.persist().await {
            self.goals.pop();
            warn!("Goal '{}' was not created: {}", goal.name, e);
            return Err(e);
        }

        info!("Created goal '{}' (id {})", goal.name, goal.id);
        Ok(goal)
    }

    /// Writes the whole collection to storage.
    ///
    /// # Errors
    /// Returns [`Error::PersistenceWrite`] if encoding or the write fails.
    pub async fn persist(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.goals).map_err(|e| Error::PersistenceWrite {
            message: format!("could not encode goals: {e}"),
        })?;

        self.storage
            .set(GOALS_STORAGE_KEY, &payload)
            .await
            .map_err(|e| match e {
                Error::PersistenceWrite { .. } => e,
                other => Error::PersistenceWrite {
                    message: other.to_string(),
                },
            })?;

        debug!("Persisted {} goals", self.goals.len());
        Ok(())
    }

    /// Replaces the collection with the stored one.
    ///
    /// A missing entry yields an empty collection. An unreadable store or a
    /// malformed payload is logged and also yields an empty collection.
    pub async fn restore(&mut self) -> &[Goal] {
        self.goals = match self.read_stored_goals().await {
            Ok(goals) => goals,
            Err(e) => {
                warn!("Starting with no goals: {}", e);
                Vec::new()
            }
        };
        info!("Restored {} goals", self.goals.len());
        &self.goals
    }

    async fn read_stored_goals(&self) -> Result<Vec<Goal>> {
        let payload = self
            .storage
            .get(GOALS_STORAGE_KEY)
            .await
            .map_err(|e| match e {
                Error::PersistenceRead { .. } => e,
                other => Error::PersistenceRead {
                    message: other.to_string(),
                },
            })?;

        let Some(payload) = payload else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&payload).map_err(|e| Error::PersistenceRead {
            message: format!("stored goals are not a valid goal list: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::storage::{DatabaseStore, MemoryStore};
    use crate::test_utils::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_goal_validation() {
        let deadline = date(2025, 12, 31);

        let result = NewGoal::new("", 1000, deadline, "");
        assert!(matches!(result, Err(Error::InvalidGoal { .. })));

        let result = NewGoal::new("   ", 1000, deadline, "");
        assert!(matches!(result, Err(Error::InvalidGoal { .. })));

        let result = NewGoal::new("Car", 0, deadline, "");
        assert!(matches!(result, Err(Error::InvalidGoal { .. })));

        let result = NewGoal::new("Car", -5, deadline, "");
        assert!(matches!(result, Err(Error::InvalidGoal { .. })));

    }

    #[test]
    fn test_new_goal_keeps_supplied_text() {
        let goal = NewGoal::new(" Car ", 1000, date(2025, 12, 31), " note ").unwrap();
        assert_eq!(goal.name, " Car ");
        assert_eq!(goal.description, " note ");
    }

    #[test]
    fn test_new_goal_from_form() {
        let goal = NewGoal::from_form("Vacation", "150000", "2026-06-01", "Sea").unwrap();
        assert_eq!(goal.target_amount, 150_000);
        assert_eq!(goal.deadline, date(2026, 6, 1));
        assert_eq!(goal.description, "Sea");

        let result = NewGoal::from_form("Vacation", "lots", "2026-06-01", "");
        assert!(matches!(result, Err(Error::InvalidGoal { .. })));

        let result = NewGoal::from_form("Vacation", "12.5", "2026-06-01", "");
        assert!(matches!(result, Err(Error::InvalidGoal { .. })));

        let result = NewGoal::from_form("Vacation", "1000", "next summer", "");
        assert!(matches!(result, Err(Error::InvalidGoal { .. })));

        let result = NewGoal::from_form("Vacation", "1000", "2026-02-30", "");
        assert!(matches!(result, Err(Error::InvalidGoal { .. })));
    }

    #[tokio::test]
    async fn test_create_goal_appends_with_zero_progress() -> Result<()> {
        let mut store = GoalStore::new(MemoryStore::new());

        let goal = store
            .create_goal(NewGoal::from_form(
                "Emergency fund",
                "300000",
                "2025-12-31",
                "",
            )?)
            .await?;

        assert!(goal.id > 0);
        assert_eq!(goal.current_amount, 0);

        let last = store.list_goals().last().unwrap();
        assert_eq!(last, &goal);
        assert_eq!(last.name, "Emergency fund");
        assert_eq!(last.target_amount, 300_000);
        assert_eq!(last.deadline, date(2025, 12, 31));
        assert_eq!(last.description, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_goal_preserves_order_and_unique_ids() -> Result<()> {
        let mut store = GoalStore::new(MemoryStore::new());
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        let first = store.create_goal_at(sample_new_goal("First"), now).await?;
        let second = store.create_goal_at(sample_new_goal("Second"), now).await?;
        let third = store.create_goal_at(sample_new_goal("Third"), now).await?;

        assert_eq!(first.id, now.timestamp_millis());
        assert_eq!(second.id, first.id + 1);
        assert_eq!(third.id, second.id + 1);

        let names: Vec<&str> = store.list_goals().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_goal_after_max_id_is_rejected() -> Result<()> {
        let payload = format!(
            r#"[{{"id":{},"name":"X","targetAmount":1000,"deadline":"2030-01-01","createdAt":"2025-01-01T00:00:00Z"}}]"#,
            i64::MAX
        );
        let mut store = GoalStore::load(MemoryStore::with_entry(GOALS_STORAGE_KEY, &payload)).await;
        assert_eq!(store.list_goals().len(), 1);

        let result = store.create_goal(sample_new_goal("Y")).await;

        assert!(matches!(result, Err(Error::InvalidGoal { .. })));
        assert_eq!(store.list_goals().len(), 1);
        assert_eq!(store.list_goals()[0].id, i64::MAX);
        let stored = store.storage.get(GOALS_STORAGE_KEY).await?.unwrap();
        assert_eq!(stored, payload);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_goal_persists_immediately() -> Result<()> {
        let mut store = GoalStore::new(MemoryStore::new());
        store.create_goal(sample_new_goal("Laptop")).await?;

        let stored = store.storage.get(GOALS_STORAGE_KEY).await?.unwrap();
        let decoded: Vec<Goal> = serde_json::from_str(&stored).unwrap();
        assert_eq!(decoded, store.list_goals());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_goal_write_failure_keeps_collection_unchanged() -> Result<()> {
        init_test_tracing();
        let mut store = GoalStore::new(FailingStore::default());

        let result = store.create_goal(sample_new_goal("Laptop")).await;

        assert!(matches!(result, Err(Error::PersistenceWrite { .. })));
        assert!(store.list_goals().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_persist_then_restore_reproduces_collection() -> Result<()> {
        let mut store = GoalStore::new(MemoryStore::new());
        store.create_goal(sample_new_goal("Car")).await?;
        store
            .create_goal(NewGoal::new("House", 5_000_000, date(2030, 1, 1), "Down payment")?)
            .await?;
        let before = store.list_goals().to_vec();

        store.persist().await?;
        store.persist().await?;
        let restored = store.restore().await.to_vec();

        assert_eq!(restored, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_without_entry_is_empty() -> Result<()> {
        let mut store = GoalStore::new(MemoryStore::new());
        assert!(store.restore().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_malformed_payload_falls_back_to_empty() -> Result<()> {
        let mut store = GoalStore::new(MemoryStore::with_entry(GOALS_STORAGE_KEY, "{not json"));
        assert!(store.restore().await.is_empty());

        store.storage.set(GOALS_STORAGE_KEY, "{\"id\": 1}").await?;
        assert!(store.restore().await.is_empty());
        assert!(matches!(
            store.read_stored_goals().await,
            Err(Error::PersistenceRead { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_unreadable_store_falls_back_to_empty() {
        init_test_tracing();
        let store = GoalStore::load(FailingStore {
            fail_reads: true,
            fail_writes: false,
        })
        .await;
        assert!(store.list_goals().is_empty());
    }

    #[tokio::test]
    async fn test_restore_accepts_legacy_payload() {
        let legacy = r#"[{
            "id": 1735689600000,
            "name": "Отпуск",
            "amount": 120000,
            "deadline": "2025-08-01",
            "description": "Море",
            "currentAmount": 0,
            "createdAt": "2025-01-01T00:00:00.000Z"
        }, {
            "id": 1735689600001,
            "name": "Телефон",
            "targetAmount": 60000,
            "deadline": "2025-03-01",
            "createdAt": "2025-01-01T00:00:00.001Z"
        }]"#;

        let store = GoalStore::load(MemoryStore::with_entry(GOALS_STORAGE_KEY, legacy)).await;
        let goals = store.list_goals();

        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].target_amount, 120_000);
        assert_eq!(goals[0].description, "Море");
        assert_eq!(goals[1].target_amount, 60_000);
        assert_eq!(goals[1].description, "");
        assert_eq!(goals[1].current_amount, 0);
    }

    #[tokio::test]
    async fn test_serialized_field_names() -> Result<()> {
        let mut store = GoalStore::new(MemoryStore::new());
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap();
        store
            .create_goal_at(NewGoal::new("Bike", 40_000, date(2025, 5, 1), "")?, now)
            .await?;

        let stored = store.storage.get(GOALS_STORAGE_KEY).await?.unwrap();
        let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
        let goal = &value[0];

        assert_eq!(goal["id"], now.timestamp_millis());
        assert_eq!(goal["targetAmount"], 40_000);
        assert_eq!(goal["deadline"], "2025-05-01");
        assert_eq!(goal["currentAmount"], 0);
        assert_eq!(goal["createdAt"], "2025-01-15T08:30:00Z");
        Ok(())
    }

    #[tokio::test]
    async fn test_goals_survive_reload_from_database() -> Result<()> {
        let db = setup_test_db().await?;

        let mut store = GoalStore::load(DatabaseStore::new(db.clone())).await;
        assert!(store.list_goals().is_empty());
        let created = store.create_goal(sample_new_goal("Car")).await?;

        let reloaded = GoalStore::load(DatabaseStore::new(db)).await;
        assert_eq!(reloaded.list_goals(), &[created]);
        Ok(())
    }
}
