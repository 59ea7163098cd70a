//! Split detection - which training split a workout belongs to
//!
//! Features:
//! - Per-category keyword counts over exercise names
//! - Tie-breaking into push / pull / legs / upper body
//! - Next-workout planning from recent history

pub mod planner;

pub use planner::{Planner, suggest_from_history, suggest_next};

use std::collections::HashMap;

use tracing::debug;

use crate::exercises::SplitCategory;
use crate::workout::Workout;

/// Per-category hit counts for one workout
#[derive(Debug, Clone, Default)]
pub struct SplitCounts {
    counts: HashMap<SplitCategory, usize>,
}

impl SplitCounts {
    /// Count, for every exercise, each category whose table it matches
    pub fn from_workout(workout: &Workout) -> Self {
        let mut counts: HashMap<SplitCategory, usize> = HashMap::new();

        for exercise in workout.exercises() {
            let name = exercise.name().to_lowercase();
            for category in SplitCategory::tracked() {
                if category.matches(&name) {
                    *counts.entry(*category).or_insert(0) += 1;
                }
            }
        }

        Self { counts }
    }

    pub fn get(&self, category: SplitCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn max(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Categories reaching the maximum count, in table order
    pub fn dominant(&self) -> Vec<SplitCategory> {
        let max = self.max();
        if max == 0 {
            return Vec::new();
        }
        SplitCategory::tracked()
            .iter()
            .copied()
            .filter(|c| self.get(*c) == max)
            .collect()
    }
}

/// Classify a workout into a split. `None` when no exercise is recognized
/// or the tie between categories cannot be broken.
pub fn classify(workout: &Workout) -> Option<SplitCategory> {
    let counts = SplitCounts::from_workout(workout);
    let dominant = counts.dominant();

    if dominant.is_empty() {
        return None;
    }

    let has = |c: SplitCategory| dominant.contains(&c);

    let split = if has(SplitCategory::Push) && has(SplitCategory::Pull) {
        Some(SplitCategory::UpperBody)
    } else if has(SplitCategory::Push) && counts.get(SplitCategory::Push) > 1 {
        Some(SplitCategory::Push)
    } else if has(SplitCategory::Pull) && counts.get(SplitCategory::Pull) > 1 {
        Some(SplitCategory::Pull)
    } else if has(SplitCategory::Legs) && counts.get(SplitCategory::Legs) > 1 {
        Some(SplitCategory::Legs)
    } else if dominant.len() == 1 {
        Some(dominant[0])
    } else {
        None
    };

    debug!("Classified {:?} (dominant {:?}) as {:?}", counts.counts, dominant, split);
    split
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::workout::{Exercise, Set};

    pub(crate) fn workout_of(names: &[&str]) -> Workout {
        let exercises = names
            .iter()
            .map(|n| Exercise::new(*n, vec![Set::new(100.0, 5, None).unwrap()]).unwrap())
            .collect();
        Workout::new(exercises, "").unwrap()
    }

    /// (push, pull, legs, cardio)
    fn counts_of(workout: &Workout) -> (usize, usize, usize, usize) {
        let counts = SplitCounts::from_workout(workout);
        (
            counts.get(SplitCategory::Push),
            counts.get(SplitCategory::Pull),
            counts.get(SplitCategory::Legs),
            counts.get(SplitCategory::Cardio),
        )
    }

    #[test]
    fn test_two_push_exercises() {
        let workout = workout_of(&["Bench Press", "Overhead Press"]);
        assert_eq!(classify(&workout), Some(SplitCategory::Push));
    }

    #[test]
    fn test_push_pull_tie_is_upper_body() {
        let workout = workout_of(&["Bench Press", "Pull Up"]);
        assert_eq!(classify(&workout), Some(SplitCategory::UpperBody));
    }

    #[test]
    fn test_unknown_exercise_is_none() {
        let workout = workout_of(&["Juggling"]);
        assert_eq!(classify(&workout), None);
    }

    #[test]
    fn test_placeholder_is_none() {
        assert_eq!(classify(&Workout::placeholder("")), None);
    }

    #[test]
    fn test_single_exercise_single_category() {
        assert_eq!(classify(&workout_of(&["Squat"])), Some(SplitCategory::Legs));
        assert_eq!(classify(&workout_of(&["Treadmill"])), Some(SplitCategory::Cardio));
        assert_eq!(classify(&workout_of(&["Power Clean"])), Some(SplitCategory::FullBody));
    }

    #[test]
    fn test_two_leg_exercises() {
        let workout = workout_of(&["Squat", "Leg Press"]);
        assert_eq!(classify(&workout), Some(SplitCategory::Legs));
    }

    #[test]
    fn test_majority_wins() {
        let workout = workout_of(&["Deadlift", "Pull Up", "Bench Press"]);
        assert_eq!(classify(&workout), Some(SplitCategory::Pull));
    }

    #[test]
    fn test_legs_wins_tie_with_cardio() {
        let workout = workout_of(&["Squat", "Lunge", "Treadmill", "Bike"]);
        assert_eq!(counts_of(&workout), (0, 0, 2, 2));
        assert_eq!(classify(&workout), Some(SplitCategory::Legs));
    }

    #[test]
    fn test_push_wins_tie_with_legs() {
        let workout = workout_of(&["Bench Press", "Dip", "Squat", "Lunge"]);
        assert_eq!(counts_of(&workout), (2, 0, 2, 0));
        assert_eq!(classify(&workout), Some(SplitCategory::Push));
    }

    #[test]
    fn test_pull_wins_tie_with_cardio() {
        let workout = workout_of(&["Pull Up", "Barbell Row", "Treadmill", "Sprint"]);
        assert_eq!(counts_of(&workout), (0, 2, 0, 2));
        assert_eq!(classify(&workout), Some(SplitCategory::Pull));
    }

    #[test]
    fn test_push_pull_double_tie_is_upper_body() {
        let workout = workout_of(&["Bench Press", "Dip", "Pull Up", "Barbell Row"]);
        assert_eq!(counts_of(&workout), (2, 2, 0, 0));
        assert_eq!(classify(&workout), Some(SplitCategory::UpperBody));
    }

    #[test]
    fn test_single_count_tie_is_none() {
        // legs=1, cardio=1: no push/pull pair and no count above one
        let workout = workout_of(&["Squat", "Treadmill"]);
        assert_eq!(classify(&workout), None);
    }

    #[test]
    fn test_name_can_hit_several_categories() {
        // "Running Row" hits cardio ("run") and pull ("row")
        let counts = SplitCounts::from_workout(&workout_of(&["Running Row"]));
        assert_eq!(counts.get(SplitCategory::Cardio), 1);
        assert_eq!(counts.get(SplitCategory::Pull), 1);
        assert_eq!(counts.dominant(), vec![SplitCategory::Pull, SplitCategory::Cardio]);
    }

    #[test]
    fn test_name_counts_once_per_category() {
        // "Pull Up Row" matches two pull phrases but is one pull exercise
        let counts = SplitCounts::from_workout(&workout_of(&["Pull Up Row"]));
        assert_eq!(counts.get(SplitCategory::Pull), 1);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let workout = workout_of(&["BENCH PRESS", "tricep pushdown"]);
        assert_eq!(classify(&workout), Some(SplitCategory::Push));
    }
}
