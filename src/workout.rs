//! Workout records - Set, Exercise, Workout
//!
//! Fields are private so the invariants (non-empty sets, non-empty exercises,
//! non-negative weight) hold for every value, including deserialized ones.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::exercises::PLACEHOLDER_NAME;

/// One performed set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSet")]
pub struct Set {
    weight: f64,
    reps: u32,
    #[serde(rename = "rpe", skip_serializing_if = "Option::is_none")]
    effort: Option<f64>,
}

#[derive(Deserialize)]
struct RawSet {
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    reps: u32,
    #[serde(default)]
    rpe: Option<f64>,
}

impl TryFrom<RawSet> for Set {
    type Error = ModelError;

    fn try_from(raw: RawSet) -> Result<Self> {
        Set::new(raw.weight, raw.reps, raw.rpe)
    }
}

impl Set {
    pub fn new(weight: f64, reps: u32, effort: Option<f64>) -> Result<Self> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ModelError::InvalidWeight(weight));
        }
        if let Some(rpe) = effort
            && !(0.0..=10.0).contains(&rpe)
        {
            return Err(ModelError::InvalidEffort(rpe));
        }
        Ok(Self { weight, reps, effort })
    }

    /// Zero-weight, zero-rep set used by placeholder exercises
    pub fn zero() -> Self {
        Self {
            weight: 0.0,
            reps: 0,
            effort: None,
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn effort(&self) -> Option<f64> {
        self.effort
    }

    /// Weight moved in this set (weight * reps)
    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

/// An exercise with its ordered sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExercise")]
pub struct Exercise {
    name: String,
    sets: Vec<Set>,
}

#[derive(Deserialize)]
struct RawExercise {
    name: String,
    sets: Vec<Set>,
}

impl TryFrom<RawExercise> for Exercise {
    type Error = ModelError;

    fn try_from(raw: RawExercise) -> Result<Self> {
        Exercise::new(raw.name, raw.sets)
    }
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: Vec<Set>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if sets.is_empty() {
            return Err(ModelError::NoSets { exercise: name });
        }
        Ok(Self { name, sets })
    }

    /// "Workout" with a single zeroed set
    pub fn placeholder() -> Self {
        Self {
            name: PLACEHOLDER_NAME.to_string(),
            sets: vec![Set::zero()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    /// First set; always present
    pub fn first_set(&self) -> &Set {
        &self.sets[0]
    }

    pub fn volume(&self) -> f64 {
        self.sets.iter().map(Set::volume).sum()
    }
}

/// A logged workout: exercises plus the text it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkout")]
pub struct Workout {
    exercises: Vec<Exercise>,
    notes: String,
}

#[derive(Deserialize)]
struct RawWorkout {
    exercises: Vec<Exercise>,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<RawWorkout> for Workout {
    type Error = ModelError;

    fn try_from(raw: RawWorkout) -> Result<Self> {
        Workout::new(raw.exercises, raw.notes.unwrap_or_default())
    }
}

impl Workout {
    pub fn new(exercises: Vec<Exercise>, notes: impl Into<String>) -> Result<Self> {
        if exercises.is_empty() {
            return Err(ModelError::NoExercises);
        }
        Ok(Self {
            exercises,
            notes: notes.into(),
        })
    }

    /// Single placeholder exercise, used when nothing could be recognized
    pub fn placeholder(notes: impl Into<String>) -> Self {
        Self {
            exercises: vec![Exercise::placeholder()],
            notes: notes.into(),
        }
    }

    /// Parse the JSON shape a workout serializes to. Every set, exercise and
    /// the workout itself go through the validating constructors.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Total weight moved across all sets
    pub fn volume(&self) -> f64 {
        self.exercises.iter().map(Exercise::volume).sum()
    }

    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_negative_weight() {
        assert_eq!(Set::new(-5.0, 5, None), Err(ModelError::InvalidWeight(-5.0)));
    }

    #[test]
    fn test_set_rejects_nan_weight() {
        assert!(Set::new(f64::NAN, 5, None).is_err());
    }

    #[test]
    fn test_set_rejects_effort_out_of_range() {
        assert_eq!(Set::new(100.0, 5, Some(11.0)), Err(ModelError::InvalidEffort(11.0)));
        assert!(Set::new(100.0, 5, Some(8.5)).is_ok());
    }

    #[test]
    fn test_exercise_requires_sets() {
        let err = Exercise::new("Squat", vec![]).unwrap_err();
        assert_eq!(err, ModelError::NoSets { exercise: "Squat".to_string() });
    }

    #[test]
    fn test_exercise_requires_name() {
        assert_eq!(Exercise::new("  ", vec![Set::zero()]), Err(ModelError::EmptyName));
    }

    #[test]
    fn test_workout_requires_exercises() {
        assert_eq!(Workout::new(vec![], "notes"), Err(ModelError::NoExercises));
    }

    #[test]
    fn test_placeholder_shape() {
        let workout = Workout::placeholder("hello");
        assert_eq!(workout.exercises().len(), 1);
        assert_eq!(workout.exercises()[0].name(), "Workout");
        assert_eq!(workout.exercises()[0].sets(), &[Set::zero()]);
        assert_eq!(workout.notes(), "hello");
    }

    #[test]
    fn test_volume() {
        let bench = Exercise::new(
            "Bench Press",
            vec![
                Set::new(100.0, 5, None).unwrap(),
                Set::new(100.0, 3, Some(9.0)).unwrap(),
            ],
        )
        .unwrap();
        let workout = Workout::new(vec![bench], "").unwrap();
        assert_eq!(workout.volume(), 800.0);
        assert_eq!(workout.set_count(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        let set = Set::new(225.0, 5, None).unwrap();
        let workout = Workout::new(
            vec![Exercise::new("Bench Press", vec![set]).unwrap()],
            "bench",
        )
        .unwrap();
        let json = serde_json::to_value(&workout).unwrap();
        assert_eq!(json["exercises"][0]["name"], "Bench Press");
        assert_eq!(json["exercises"][0]["sets"][0]["weight"], 225.0);
        assert_eq!(json["exercises"][0]["sets"][0]["reps"], 5);
        assert!(json["exercises"][0]["sets"][0].get("rpe").is_none());
        assert_eq!(json["notes"], "bench");
    }

    #[test]
    fn test_deserialize_reads_rpe() {
        let json = r#"{"exercises":[{"name":"Squat","sets":[{"weight":275,"reps":5,"rpe":8}]}],"notes":"leg day"}"#;
        let workout: Workout = serde_json::from_str(json).unwrap();
        assert_eq!(workout.exercises()[0].first_set().effort(), Some(8.0));
        assert_eq!(workout.notes(), "leg day");
    }

    #[test]
    fn test_from_json_rejects_bad_rpe() {
        let json = r#"{"exercises":[{"name":"Squat","sets":[{"weight":275,"reps":5,"rpe":12}]}]}"#;
        let err = Workout::from_json(json).unwrap_err();
        assert!(err.to_string().contains("RPE"), "{}", err);
    }

    #[test]
    fn test_deserialize_rejects_empty_exercises() {
        let json = r#"{"exercises":[],"notes":""}"#;
        assert!(serde_json::from_str::<Workout>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_exercise_without_sets() {
        let json = r#"{"exercises":[{"name":"Squat","sets":[]}]}"#;
        assert!(serde_json::from_str::<Workout>(json).is_err());
    }
}
