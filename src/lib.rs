//! repchat - Conversational workout logger
//!
//! Turns "bench press 5×5 at 225lbs" into a structured workout, tags it with a
//! training split and suggests what to train next.

pub mod bot;
pub mod chat;
pub mod db;
pub mod error;
pub mod exercises;
pub mod parser;
pub mod progress;
pub mod split;
pub mod tui;
pub mod workout;

pub use db::{BoxedStore, Database, MemoryStore, WorkoutRecord, WorkoutStore, open_store};
pub use error::ModelError;
pub use exercises::SplitCategory;
pub use parser::interpret;
pub use split::{Planner, classify, suggest_next};
pub use workout::{Exercise, Set, Workout};
