//! In-process store, selected with `--db :memory:`

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::{WorkoutRecord, WorkoutStore};
use crate::workout::Workout;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<WorkoutRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save with an explicit timestamp
    pub fn save_at(&mut self, user_id: &str, workout: &Workout, date: DateTime<Utc>) -> i64 {
        let id = self.records.len() as i64 + 1;
        self.records.push(WorkoutRecord {
            id,
            user_id: user_id.to_string(),
            date,
            workout: workout.clone(),
        });
        id
    }
}

impl WorkoutStore for MemoryStore {
    fn save(&mut self, user_id: &str, workout: &Workout) -> Result<i64> {
        Ok(self.save_at(user_id, workout, Utc::now()))
    }

    fn list(&self, user_id: &str) -> Result<Vec<WorkoutRecord>> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<WorkoutRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }
}
