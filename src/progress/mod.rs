//! Progress analytics over stored workouts
//!
//! Features:
//! - Estimated one-rep max (Brzycki) per session
//! - First-vs-latest improvement metrics
//! - 1RM trend via linear regression (linfa)

pub mod predictor;

pub use predictor::OneRepMaxTrend;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::WorkoutRecord;
use crate::workout::Set;

/// Reps are capped here so the Brzycki denominator stays positive
const BRZYCKI_MAX_REPS: u32 = 36;

/// Brzycki estimate: weight * 36 / (37 - reps)
pub fn estimated_one_rep_max(weight: f64, reps: u32) -> f64 {
    let reps = reps.min(BRZYCKI_MAX_REPS) as f64;
    weight * (36.0 / (37.0 - reps))
}

/// One session of a given exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressPoint {
    pub date: DateTime<Utc>,
    pub sets: Vec<Set>,
    /// Best estimated 1RM among the sets
    pub estimated_one_rep_max: f64,
}

impl ProgressPoint {
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(Set::volume).sum()
    }
}

/// Every occurrence of `exercise` (case-insensitive exact name), oldest first
pub fn exercise_progress(records: &[WorkoutRecord], exercise: &str) -> Vec<ProgressPoint> {
    let wanted = exercise.to_lowercase();
    let wanted = wanted.as_str();

    let mut points: Vec<ProgressPoint> = records
        .iter()
        .flat_map(|record| {
            record
                .workout
                .exercises()
                .iter()
                .filter(move |e| e.name().to_lowercase() == wanted)
                .map(move |e| ProgressPoint {
                    date: record.date,
                    sets: e.sets().to_vec(),
                    estimated_one_rep_max: e
                        .sets()
                        .iter()
                        .map(|s| estimated_one_rep_max(s.weight(), s.reps()))
                        .fold(0.0, f64::max),
                })
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}

/// Sorted unique exercise names across history
pub fn exercise_names(records: &[WorkoutRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.workout.exercises().iter().map(|e| e.name().to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Improvement between the first and the latest session
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressMetrics {
    pub one_rm_improvement: f64,
    /// `None` when the first session's 1RM is zero
    pub one_rm_percentage: Option<f64>,
    pub volume_improvement: f64,
    /// `None` when the first session's volume is zero
    pub volume_percentage: Option<f64>,
    pub workout_count: usize,
    /// Whole days between first and latest session, rounded up
    pub time_span_days: i64,
}

impl ProgressMetrics {
    /// Needs at least two points (oldest first)
    pub fn from_points(points: &[ProgressPoint]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let first = points.first()?;
        let latest = points.last()?;

        let one_rm_improvement = latest.estimated_one_rep_max - first.estimated_one_rep_max;
        let volume_improvement = latest.volume() - first.volume();

        let span = latest.date - first.date;
        let mut time_span_days = span.num_days();
        if span > chrono::Duration::days(time_span_days) {
            time_span_days += 1;
        }

        Some(Self {
            one_rm_improvement,
            one_rm_percentage: percentage(one_rm_improvement, first.estimated_one_rep_max),
            volume_improvement,
            volume_percentage: percentage(volume_improvement, first.volume()),
            workout_count: points.len(),
            time_span_days,
        })
    }

    /// Format metrics for display
    pub fn format(&self) -> String {
        let mut lines = vec![format!(
            "Workouts: {} over {} days",
            self.workout_count, self.time_span_days
        )];

        lines.push(format!(
            "Est. 1RM: {:+.1}{}",
            self.one_rm_improvement,
            self.one_rm_percentage
                .map(|p| format!(" ({:+.1}%)", p))
                .unwrap_or_default()
        ));
        lines.push(format!(
            "Volume: {:+.0}{}",
            self.volume_improvement,
            self.volume_percentage
                .map(|p| format!(" ({:+.1}%)", p))
                .unwrap_or_default()
        ));

        lines.join("\n")
    }
}

fn percentage(change: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some(change / base * 100.0)
    }
}
