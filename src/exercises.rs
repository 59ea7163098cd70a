//! Exercise keyword tables - the single source of truth for split detection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Training split a workout emphasizes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SplitCategory {
    Push,      // Chest, shoulders, triceps
    Pull,      // Back, biceps
    Legs,      // Quads, hamstrings, glutes
    Cardio,    // Conditioning
    FullBody,  // Olympic lifts, complexes
    UpperBody, // Push + pull in one session
}

impl SplitCategory {
    /// Categories backed by a keyword table, in table order
    pub fn tracked() -> &'static [SplitCategory] {
        &[
            SplitCategory::Push,
            SplitCategory::Pull,
            SplitCategory::Legs,
            SplitCategory::Cardio,
            SplitCategory::FullBody,
        ]
    }

    /// Human label for badges and chat replies
    pub fn label(&self) -> &'static str {
        match self {
            SplitCategory::Push => "push",
            SplitCategory::Pull => "pull",
            SplitCategory::Legs => "legs",
            SplitCategory::Cardio => "cardio",
            SplitCategory::FullBody => "full body",
            SplitCategory::UpperBody => "upper body",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SplitCategory::Push => "💪",
            SplitCategory::Pull => "🏋️",
            SplitCategory::Legs => "🦵",
            SplitCategory::Cardio => "🏃",
            SplitCategory::FullBody => "🔥",
            SplitCategory::UpperBody => "🙌",
        }
    }

    /// Exercise-name substrings that mark this category.
    /// `UpperBody` has no table of its own; it only comes out of tie-breaking.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            SplitCategory::Push => PUSH_PATTERNS,
            SplitCategory::Pull => PULL_PATTERNS,
            SplitCategory::Legs => LEGS_PATTERNS,
            SplitCategory::Cardio => CARDIO_PATTERNS,
            SplitCategory::FullBody => FULL_BODY_PATTERNS,
            SplitCategory::UpperBody => &[],
        }
    }

    /// True if the (lower-cased) text contains any of this category's patterns
    pub fn matches(&self, lowered: &str) -> bool {
        self.patterns().iter().any(|p| lowered.contains(p))
    }
}

impl fmt::Display for SplitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SplitCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match normalized.as_str() {
            "push" => Ok(SplitCategory::Push),
            "pull" => Ok(SplitCategory::Pull),
            "leg" | "legs" => Ok(SplitCategory::Legs),
            "cardio" => Ok(SplitCategory::Cardio),
            "fullbody" => Ok(SplitCategory::FullBody),
            "upperbody" | "upper" => Ok(SplitCategory::UpperBody),
            _ => Err(ModelError::UnknownSplit(s.trim().to_string())),
        }
    }
}

pub const PUSH_PATTERNS: &[&str] = &[
    "bench press",
    "overhead press",
    "shoulder press",
    "tricep",
    "chest fly",
    "push up",
    "dip",
];

pub const PULL_PATTERNS: &[&str] = &[
    "pull up",
    "chin up",
    "row",
    "deadlift",
    "bicep curl",
    "lat pulldown",
    "face pull",
];

pub const LEGS_PATTERNS: &[&str] = &[
    "squat",
    "leg press",
    "lunge",
    "leg extension",
    "leg curl",
    "calf raise",
    "hip thrust",
];

pub const CARDIO_PATTERNS: &[&str] = &[
    "run",
    "jog",
    "sprint",
    "cardio",
    "hiit",
    "cycling",
    "bike",
    "treadmill",
    "elliptical",
];

pub const FULL_BODY_PATTERNS: &[&str] = &[
    "clean",
    "snatch",
    "thruster",
    "burpee",
    "kettlebell swing",
    "turkish get up",
];

/// Words that mean "a workout happened" without naming a movement
pub const GENERIC_KEYWORDS: &[&str] = &["exercise", "workout", "training", "lift", "movement"];

/// Name used when nothing more specific is known
pub const PLACEHOLDER_NAME: &str = "Workout";

/// All (category, phrase) pairs in table order
pub fn all_patterns() -> impl Iterator<Item = (SplitCategory, &'static str)> {
    SplitCategory::tracked()
        .iter()
        .flat_map(|c| c.patterns().iter().map(move |p| (*c, *p)))
}

/// Title-case a matched phrase word by word ("bench press" -> "Bench Press")
pub fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
