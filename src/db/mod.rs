//! Database module - workout storage behind the `WorkoutStore` interface

mod memory;

pub use memory::MemoryStore;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::workout::{Exercise, Set, Workout};

/// A stored workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: i64,
    pub user_id: String,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub workout: Workout,
}

/// Persistence capability handed to front-ends
pub trait WorkoutStore {
    /// Store a workout for a user, returning its id
    fn save(&mut self, user_id: &str, workout: &Workout) -> Result<i64>;

    /// All workouts of a user, newest first
    fn list(&self, user_id: &str) -> Result<Vec<WorkoutRecord>>;

    fn get_by_id(&self, id: i64) -> Result<Option<WorkoutRecord>>;
}

/// Store handed to the CLI, dashboard and bot
pub type BoxedStore = Box<dyn WorkoutStore + Send>;

/// `--db` value selecting the in-process store
pub const MEMORY_PATH: &str = ":memory:";

/// SQLite file at `path`, or a [`MemoryStore`] for [`MEMORY_PATH`]
pub fn open_store(path: &str) -> Result<BoxedStore> {
    if path == MEMORY_PATH {
        debug!("Using in-process workout store");
        return Ok(Box::new(MemoryStore::new()));
    }
    Ok(Box::new(Database::open(path)?))
}

/// Validate a structured JSON workout and store it
pub fn save_json<S: WorkoutStore + ?Sized>(store: &mut S, user_id: &str, json: &str) -> Result<i64> {
    let workout = Workout::from_json(json).context("Invalid workout JSON")?;
    store.save(user_id, &workout)
}

/// SQLite-backed store
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path))?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// In-memory database, gone when dropped
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                notes TEXT
            );
            CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                position INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
                weight REAL NOT NULL,
                reps INTEGER NOT NULL,
                rpe REAL
            );
            CREATE INDEX IF NOT EXISTS idx_workouts_user_date ON workouts (user_id, date);",
        )?;
        Ok(())
    }

    /// Save with an explicit timestamp. Dates are stored as fixed-width
    /// RFC 3339 so text order is time order.
    pub fn save_at(&self, user_id: &str, workout: &Workout, date: DateTime<Utc>) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO workouts (user_id, date, notes) VALUES (?1, ?2, ?3)",
            params![user_id, date.to_rfc3339_opts(SecondsFormat::Micros, true), workout.notes()],
        )?;
        let workout_id = tx.last_insert_rowid();

        for (position, exercise) in workout.exercises().iter().enumerate() {
            tx.execute(
                "INSERT INTO exercises (workout_id, name, position) VALUES (?1, ?2, ?3)",
                params![workout_id, exercise.name(), position as i64],
            )?;
            let exercise_id = tx.last_insert_rowid();

            for set in exercise.sets() {
                tx.execute(
                    "INSERT INTO sets (exercise_id, weight, reps, rpe) VALUES (?1, ?2, ?3, ?4)",
                    params![exercise_id, set.weight(), set.reps(), set.effort()],
                )?;
            }
        }

        tx.commit()?;
        debug!(
            "Saved workout {} for {} ({} exercises)",
            workout_id,
            user_id,
            workout.exercises().len()
        );
        Ok(workout_id)
    }

    fn load_workout(&self, workout_id: i64, notes: Option<String>) -> Result<Workout> {
        let mut ex_stmt = self.conn.prepare(
            "SELECT id, name FROM exercises WHERE workout_id = ?1 ORDER BY position, id",
        )?;
        let mut set_stmt = self.conn.prepare(
            "SELECT weight, reps, rpe FROM sets WHERE exercise_id = ?1 ORDER BY id",
        )?;

        let rows = ex_stmt
            .query_map([workout_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut exercises = Vec::with_capacity(rows.len());
        for (exercise_id, name) in rows {
            let raw_sets = set_stmt
                .query_map([exercise_id], |row| {
                    Ok((
                        row.get::<_, f64>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let sets = raw_sets
                .into_iter()
                .map(|(weight, reps, rpe)| Set::new(weight, reps, rpe))
                .collect::<Result<Vec<_>, _>>()?;
            exercises.push(Exercise::new(name, sets)?);
        }

        Workout::new(exercises, notes.unwrap_or_default())
            .with_context(|| format!("Corrupt workout {}", workout_id))
    }

    fn record_from_row(
        &self,
        id: i64,
        user_id: String,
        date: String,
        notes: Option<String>,
    ) -> Result<WorkoutRecord> {
        let date = DateTime::parse_from_rfc3339(&date)
            .map(|d| d.with_timezone(&Utc))
            .with_context(|| format!("Bad date '{}' on workout {}", date, id))?;
        Ok(WorkoutRecord {
            id,
            user_id,
            date,
            workout: self.load_workout(id, notes)?,
        })
    }
}

type WorkoutRow = (i64, String, String, Option<String>);

impl WorkoutStore for Database {
    fn save(&mut self, user_id: &str, workout: &Workout) -> Result<i64> {
        self.save_at(user_id, workout, Utc::now())
    }

    fn list(&self, user_id: &str) -> Result<Vec<WorkoutRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, date, notes FROM workouts WHERE user_id = ?1 ORDER BY date DESC, id DESC",
        )?;

        let rows: Vec<WorkoutRow> = stmt
            .query_map([user_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, user_id, date, notes)| self.record_from_row(id, user_id, date, notes))
            .collect()
    }

    fn get_by_id(&self, id: i64) -> Result<Option<WorkoutRecord>> {
        let row: Option<WorkoutRow> = self
            .conn
            .query_row(
                "SELECT id, user_id, date, notes FROM workouts WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        row.map(|(id, user_id, date, notes)| self.record_from_row(id, user_id, date, notes))
            .transpose()
    }
}
