use chrono::{DateTime, FixedOffset};
use derive_more::{AsRef, Display};

use crate::{Exercise, InvalidWorkoutError};

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub title: String,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Start and end time of the workout.
    ///
    /// Both must be present and the end must not precede the start.
    pub fn session(
        &self,
    ) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), InvalidWorkoutError> {
        let start = self.start_time.ok_or(InvalidWorkoutError::MissingStartTime)?;
        let end = self.end_time.ok_or(InvalidWorkoutError::MissingEndTime)?;

        if end < start {
            return Err(InvalidWorkoutError::EndBeforeStart { start, end });
        }

        Ok((start, end))
    }

    /// Title reduced to ASCII characters, as decorations like emojis cannot be rendered in plain
    /// text.
    #[must_use]
    pub fn display_title(&self) -> String {
        self.title
            .chars()
            .filter(char::is_ascii)
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[derive(AsRef, Debug, Display, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkoutID(String);

impl From<&str> for WorkoutID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WorkoutID {
    fn from(value: String) -> Self {
        Self(value)
    }
}
