//! Next-workout planner based on the split pattern in recent history

use crate::exercises::SplitCategory;
use crate::workout::Workout;

use super::classify;

/// Usable (classifiable) workouts needed before history patterns are trusted
pub const DEFAULT_MIN_HISTORY: usize = 3;

/// How many recent workouts are inspected for a pattern
pub const HISTORY_WINDOW: usize = 5;

const PPL_CYCLE: [SplitCategory; 3] = [
    SplitCategory::Push,
    SplitCategory::Pull,
    SplitCategory::Legs,
];

/// Split pattern detected in recent history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPattern {
    /// Push, pull and legs all seen
    PushPullLegs,
    /// Upper body and legs both seen
    UpperLower,
    /// Nothing recognizable
    Unstructured,
}

/// Suggests the next split in rotation
#[derive(Debug, Clone, Copy)]
pub struct Planner {
    min_history: usize,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_HISTORY)
    }
}

impl Planner {
    pub fn new(min_history: usize) -> Self {
        Self { min_history }
    }

    /// Suggest what to train after `current`, given recent workouts
    /// (most recent first).
    pub fn suggest_next(
        &self,
        current: Option<SplitCategory>,
        recent: &[Workout],
    ) -> Option<SplitCategory> {
        let history = classify_recent(recent);

        let current = current?;
        if history.len() < self.min_history {
            return default_rotation(current);
        }

        match detect_pattern(&history) {
            HistoryPattern::PushPullLegs if PPL_CYCLE.contains(&current) => {
                next_in_cycle(current)
            }
            HistoryPattern::UpperLower => match current {
                SplitCategory::UpperBody => Some(SplitCategory::Legs),
                SplitCategory::Legs => Some(SplitCategory::UpperBody),
                other => default_rotation(other),
            },
            _ => default_rotation(current),
        }
    }
}

/// Classified splits of up to [`HISTORY_WINDOW`] most recent workouts,
/// skipping the ones that cannot be classified
pub fn classify_recent(recent: &[Workout]) -> Vec<SplitCategory> {
    recent
        .iter()
        .take(HISTORY_WINDOW)
        .filter_map(classify)
        .collect()
}

/// PPL takes precedence over upper/lower when both are present
pub fn detect_pattern(history: &[SplitCategory]) -> HistoryPattern {
    if PPL_CYCLE.iter().all(|c| history.contains(c)) {
        HistoryPattern::PushPullLegs
    } else if history.contains(&SplitCategory::UpperBody) && history.contains(&SplitCategory::Legs)
    {
        HistoryPattern::UpperLower
    } else {
        HistoryPattern::Unstructured
    }
}

/// Static rotation used when history is too short or shows no pattern
pub fn default_rotation(current: SplitCategory) -> Option<SplitCategory> {
    match current {
        SplitCategory::Push => Some(SplitCategory::Pull),
        SplitCategory::Pull => Some(SplitCategory::Legs),
        SplitCategory::Legs => Some(SplitCategory::Push),
        SplitCategory::UpperBody => Some(SplitCategory::Legs),
        SplitCategory::Cardio | SplitCategory::FullBody => None,
    }
}

fn next_in_cycle(current: SplitCategory) -> Option<SplitCategory> {
    let idx = PPL_CYCLE.iter().position(|c| *c == current)?;
    Some(PPL_CYCLE[(idx + 1) % PPL_CYCLE.len()])
}

/// [`Planner::suggest_next`] with the default history threshold
pub fn suggest_next(current: Option<SplitCategory>, recent: &[Workout]) -> Option<SplitCategory> {
    Planner::default().suggest_next(current, recent)
}

/// Suggest the next split using the most recent workout as the current one.
/// Needs at least two workouts.
pub fn suggest_from_history(planner: &Planner, recent: &[Workout]) -> Option<SplitCategory> {
    if recent.len() < 2 {
        return None;
    }
    let current = classify(&recent[0]);
    planner.suggest_next(current, recent)
}
