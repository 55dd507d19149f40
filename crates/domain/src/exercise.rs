use std::{collections::BTreeMap, ops::Mul};

use chrono::{DateTime, FixedOffset};
use derive_more::{Display, Into};
use log::debug;
use strum::{AsRefStr, EnumString};

use crate::Workout;

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub title: String,
    pub sets: Vec<Set>,
    pub notes: Option<String>,
}

impl Exercise {
    /// Notes with surrounding whitespace removed, `None` if there is nothing left.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub index: u32,
    pub set_type: SetType,
    pub weight: Option<Weight>,
    pub reps: Option<Reps>,
}

impl Set {
    /// Weight and reps of a set which counts towards load statistics.
    ///
    /// A set needs both fields populated. Sets lacking either still count as a set, but not
    /// towards reps or weight.
    #[must_use]
    pub fn load(&self) -> Option<(Weight, Reps)> {
        match (self.weight, self.reps) {
            (Some(weight), Some(reps)) => Some((weight, reps)),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SetType {
    Warmup,
    #[default]
    Normal,
    Dropset,
    Failure,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub fn new(value: f64) -> Result<Self, WeightError> {
        if !value.is_finite() {
            return Err(WeightError::NotFinite);
        }

        if value < 0.0 {
            return Err(WeightError::Negative);
        }

        Ok(Self(value))
    }
}

impl Mul<Reps> for Weight {
    type Output = f64;

    fn mul(self, rhs: Reps) -> Self::Output {
        self.0 * f64::from(rhs.0)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must not be negative")]
    Negative,
    #[error("Weight must be a finite number")]
    NotFinite,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Reps {
    type Error = RepsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Reps)
            .map_err(|_| RepsError::OutOfRange(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to {max} ({0})", max = u32::MAX)]
    OutOfRange(i64),
}

/// Collect all occurrences of the exercise with the given title, keyed by the timestamp of the
/// owning workout.
///
/// The title must match exactly. The workout's end time is used as key, its creation time if the
/// end time is missing. Workouts without either are skipped.
///
/// If a workout contains the exercise more than once, the last occurrence wins, as does the
/// later workout if two workouts share a timestamp.
pub fn extract_exercise<'a>(
    title: &str,
    workouts: impl IntoIterator<Item = &'a Workout>,
) -> BTreeMap<DateTime<FixedOffset>, Exercise> {
    let mut result = BTreeMap::new();

    for workout in workouts {
        let Some(timestamp) = workout.end_time.or(workout.created_at) else {
            debug!("skipping workout {} without timestamp", workout.id);
            continue;
        };
        for exercise in workout.exercises.iter().filter(|e| e.title == title) {
            result.insert(timestamp, exercise.clone());
        }
    }

    result
}
