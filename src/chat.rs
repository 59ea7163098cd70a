//! Chat replies - what the assistant answers to a free-text message

use rand::Rng;

use crate::exercises::SplitCategory;
use crate::parser::{detect_workout, interpret};
use crate::split::classify;
use crate::workout::Workout;

pub const GREETING: &str = "I'm here to help track your workouts. Try telling me about your workout, like: 'I did bench press 5×5 at 225lbs today'";

pub const SAVED: &str = "Great! I've saved your workout. You can view it in your workout history.";

/// Typing hints: (keyword, full example)
const COMPLETIONS: &[(&str, &str)] = &[
    ("bench", "bench press 5×5 at 225lb"),
    ("squat", "squats 3×10 at 315lb"),
    ("deadlift", "deadlift 3×5 at 405lb"),
    ("overhead", "overhead press 5×5 at 135lb"),
];

/// Assistant reply to one message
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    /// Parsed workout, present when the message looked like a log
    pub workout: Option<Workout>,
    pub split: Option<SplitCategory>,
    /// Rough estimate for display only
    pub calories: Option<u32>,
}

impl ChatReply {
    pub fn is_workout(&self) -> bool {
        self.workout.is_some()
    }
}

/// Build the reply for a chat message
pub fn respond(message: &str) -> ChatReply {
    if !detect_workout(message) {
        return ChatReply {
            text: GREETING.to_string(),
            workout: None,
            split: None,
            calories: None,
        };
    }

    let workout = interpret(message);
    let split = classify(&workout);

    let mut text = format!(
        "I've detected a workout! Here's what I found:\n\n{}",
        format_workout(&workout)
    );
    if let Some(split) = split {
        text.push_str(&format!("\n\nThis looks like a {} workout.", split));
    }
    text.push_str("\n\nWould you like me to save this workout?");

    ChatReply {
        text,
        workout: Some(workout),
        split,
        calories: Some(estimate_calories()),
    }
}

/// One bullet per exercise, described by its first set
pub fn format_workout(workout: &Workout) -> String {
    workout
        .exercises()
        .iter()
        .map(|exercise| {
            let first = exercise.first_set();
            let mut line = format!("• {}: {} sets", exercise.name(), exercise.sets().len());
            if first.weight() > 0.0 {
                line.push_str(&format!(" at {}lbs", first.weight()));
            }
            if first.reps() > 0 {
                line.push_str(&format!(" for {} reps", first.reps()));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Example completion for a partially typed message
pub fn suggest_completion(partial: &str) -> Option<&'static str> {
    if partial.contains('×') {
        return None;
    }
    let lowered = partial.to_lowercase();
    COMPLETIONS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, example)| *example)
}

/// 250-449 kcal, display only
pub fn estimate_calories() -> u32 {
    rand::thread_rng().gen_range(250..450)
}
