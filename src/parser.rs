//! Free-text workout interpreter
//!
//! Turns chat messages like "I did bench press 5×5 at 225lbs today" into a
//! structured [`Workout`]. Keyword matching only: every table phrase found in
//! the message becomes an exercise, and the set/rep/weight numbers are read
//! once from the whole message and shared by all of them.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::exercises::{GENERIC_KEYWORDS, PLACEHOLDER_NAME, all_patterns, title_case};
use crate::workout::{Exercise, Set, Workout};

/// Upper bound on sets produced from one "N x M" / "N sets of M" pattern
pub const MAX_SETS: u32 = 100;

static SETS_X_REPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*[x×]\s*([0-9]+)").expect("valid regex"));

static SETS_OF_REPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*sets?\s+of\s+([0-9]+)").expect("valid regex"));

static WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*(?:lbs?|pounds?|kg|kilos?)").expect("valid regex")
});

/// Set count and reps read from a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScheme {
    pub sets: u32,
    pub reps: u32,
}

/// Interpret a chat message as a workout. Never fails; unrecognized text
/// yields a single zeroed "Workout" exercise.
pub fn interpret(text: &str) -> Workout {
    let lowered = text.to_lowercase();
    let mut exercises = Vec::new();

    for (category, phrase) in all_patterns() {
        if lowered.contains(phrase) {
            debug!("Matched '{}' ({})", phrase, category);
            exercises.push(build_exercise(title_case(phrase), &lowered));
        }
    }

    if exercises.is_empty()
        && let Some(keyword) = GENERIC_KEYWORDS.iter().find(|k| lowered.contains(*k))
    {
        debug!("No exercise phrase, generic keyword '{}'", keyword);
        exercises.push(build_exercise(PLACEHOLDER_NAME.to_string(), &lowered));
    }

    if exercises.is_empty() {
        debug!("Nothing recognized, using placeholder workout");
        return Workout::placeholder(text);
    }

    Workout::new(exercises, text).unwrap_or_else(|_| Workout::placeholder(text))
}

/// True when the message names a known exercise AND carries either a
/// set/rep scheme or a weight. Used to decide whether a chat message is a log.
pub fn detect_workout(text: &str) -> bool {
    let lowered = text.to_lowercase();

    let has_exercise = all_patterns().any(|(_, phrase)| lowered.contains(phrase));
    let has_scheme = SETS_X_REPS.is_match(&lowered) || SETS_OF_REPS.is_match(&lowered);
    let has_weight = WEIGHT.is_match(&lowered);

    has_exercise && (has_scheme || has_weight)
}

/// First "N x M" scheme, else first "N sets of M" scheme
pub fn extract_scheme(lowered: &str) -> Option<SetScheme> {
    [&*SETS_X_REPS, &*SETS_OF_REPS].iter().find_map(|re| {
        let caps = re.captures(lowered)?;
        Some(SetScheme {
            sets: parse_count(&caps[1]).min(MAX_SETS),
            reps: parse_count(&caps[2]),
        })
    })
}

/// First number followed by a weight unit; 0 when absent
pub fn extract_weight(lowered: &str) -> f64 {
    WEIGHT
        .captures(lowered)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Sets for one exercise, all sharing the message-wide weight
pub fn extract_sets(lowered: &str) -> Vec<Set> {
    let weight = extract_weight(lowered);
    let (count, reps) = match extract_scheme(lowered) {
        Some(scheme) => (scheme.sets, scheme.reps),
        None => (1, 0),
    };

    let set = Set::new(weight, reps, None).unwrap_or_else(|_| Set::zero());
    vec![set; count as usize]
}

fn build_exercise(name: String, lowered: &str) -> Exercise {
    let mut sets = extract_sets(lowered);
    // "0x5" would leave the exercise without sets
    if sets.is_empty() {
        sets.push(Set::zero());
    }
    Exercise::new(name, sets).unwrap_or_else(|_| Exercise::placeholder())
}

/// ASCII digit run to a count. Overflow saturates; anything else is 0.
fn parse_count(digits: &str) -> u32 {
    match digits.parse::<u32>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u32::MAX,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(workout: &Workout) -> Vec<&str> {
        workout.exercises().iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_unrecognized_text_gives_placeholder() {
        let workout = interpret("had a nice walk with the dog");
        assert_eq!(names(&workout), vec!["Workout"]);
        let sets = workout.exercises()[0].sets();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].weight(), 0.0);
        assert_eq!(sets[0].reps(), 0);
    }

    #[test]
    fn test_bench_press_sets_x_reps() {
        let workout = interpret("bench press 5×5 at 225lb");
        assert_eq!(names(&workout), vec!["Bench Press"]);
        let sets = workout.exercises()[0].sets();
        assert_eq!(sets.len(), 5);
        for set in sets {
            assert_eq!(set.weight(), 225.0);
            assert_eq!(set.reps(), 5);
            assert_eq!(set.effort(), None);
        }
    }

    #[test]
    fn test_sets_of_reps_in_kg() {
        let workout = interpret("3 sets of 10 squats at 100kg");
        assert_eq!(names(&workout), vec!["Squat"]);
        let sets = workout.exercises()[0].sets();
        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|s| s.weight() == 100.0 && s.reps() == 10));
    }

    #[test]
    fn test_ascii_x_and_uppercase() {
        let workout = interpret("Deadlift 3X5 @ 405 LBS");
        assert_eq!(names(&workout), vec!["Deadlift"]);
        let sets = workout.exercises()[0].sets();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[0].reps(), 5);
        assert_eq!(sets[0].weight(), 405.0);
    }

    #[test]
    fn test_x_pattern_wins_over_sets_of() {
        let scheme = extract_scheme("4x8 then 3 sets of 12");
        assert_eq!(scheme, Some(SetScheme { sets: 4, reps: 8 }));
    }

    #[test]
    fn test_no_scheme_gives_single_zero_rep_set() {
        let workout = interpret("overhead press at 135 pounds");
        let sets = workout.exercises()[0].sets();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].reps(), 0);
        assert_eq!(sets[0].weight(), 135.0);
    }

    #[test]
    fn test_weight_defaults_to_zero() {
        let workout = interpret("pull up 3x10");
        let sets = workout.exercises()[0].sets();
        assert_eq!(sets.len(), 3);
        assert!(sets.iter().all(|s| s.weight() == 0.0));
    }

    #[test]
    fn test_decimal_weight() {
        assert_eq!(extract_weight("bench 102.5kg"), 102.5);
        assert_eq!(extract_weight("2 kilos"), 2.0);
    }

    #[test]
    fn test_multiple_exercises_share_numbers() {
        let workout = interpret("bench press and squat 3x8 at 200lbs");
        assert_eq!(names(&workout), vec!["Bench Press", "Squat"]);
        for exercise in workout.exercises() {
            assert_eq!(exercise.sets().len(), 3);
            assert_eq!(exercise.first_set().weight(), 200.0);
            assert_eq!(exercise.first_set().reps(), 8);
        }
    }

    #[test]
    fn test_overlapping_matches_not_merged() {
        // "dip" also matches inside "dips"; "row" inside "barbell rows"
        let workout = interpret("dips and barbell rows");
        assert_eq!(names(&workout), vec!["Dip", "Row"]);
    }

    #[test]
    fn test_generic_keyword_uses_set_extraction() {
        let workout = interpret("great training session, 4 sets of 12 at 50kg");
        assert_eq!(names(&workout), vec!["Workout"]);
        let sets = workout.exercises()[0].sets();
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[0].reps(), 12);
        assert_eq!(sets[0].weight(), 50.0);
    }

    #[test]
    fn test_notes_keep_original_text() {
        let text = "I did Bench Press 5×5 at 225lbs today";
        assert_eq!(interpret(text).notes(), text);
    }

    #[test]
    fn test_interpret_is_idempotent() {
        let text = "squats 3×10 at 315lb and lunges";
        assert_eq!(interpret(text), interpret(text));
    }

    #[test]
    fn test_zero_sets_still_has_a_set() {
        let workout = interpret("squat 0x5");
        assert_eq!(workout.exercises()[0].sets().len(), 1);
    }

    #[test]
    fn test_set_count_is_capped() {
        let workout = interpret("squat 99999999999x5");
        assert_eq!(workout.exercises()[0].sets().len(), MAX_SETS as usize);
    }

    #[test]
    fn test_non_ascii_digits_are_not_numbers() {
        let workout = interpret("squat ３x５");
        assert_eq!(names(&workout), vec!["Squat"]);
        assert_eq!(workout.exercises()[0].sets(), &[Set::zero()]);

        let workout = interpret("squat ٣x٥ at ١٠٠kg");
        let sets = workout.exercises()[0].sets();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].reps(), 0);
        assert_eq!(sets[0].weight(), 0.0);

        assert!(!detect_workout("squat ３x５"));
        assert!(!detect_workout("squat ٣x٥ at ١٠٠kg"));
    }

    #[test]
    fn test_parse_count_saturates_only_on_overflow() {
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count("99999999999"), u32::MAX);
        assert_eq!(parse_count("５"), 0);
    }

    #[test]
    fn test_detect_workout_needs_numbers() {
        assert!(detect_workout("I did bench press 5×5 at 225lbs today"));
        assert!(detect_workout("squat 315 lbs"));
        assert!(detect_workout("3 sets of 10 lunges"));
        assert!(!detect_workout("bench press was fun"));
        assert!(!detect_workout("5x5 at 225lbs"));
    }
}
