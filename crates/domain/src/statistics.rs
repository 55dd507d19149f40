use chrono::{DateTime, Duration, FixedOffset};
use log::warn;

use crate::{InvalidWorkoutError, Workout, WorkoutID};

/// Metrics derived from a single workout.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutMetrics {
    pub id: WorkoutID,
    pub display_title: String,
    pub total_exercises: u32,
    pub total_sets: u32,
    pub total_reps: u64,
    pub total_weight: f64,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub duration: Duration,
}

impl WorkoutMetrics {
    /// Window of the session in the form `Mon Jan 01 2024 10:00 -> 11:30`.
    #[must_use]
    pub fn session_window(&self) -> String {
        format!(
            "{} -> {}",
            self.start_time.format("%a %b %d %Y %H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

impl TryFrom<&Workout> for WorkoutMetrics {
    type Error = InvalidWorkoutError;

    fn try_from(workout: &Workout) -> Result<Self, Self::Error> {
        let (start_time, end_time) = workout.session()?;

        let total_exercises = u32::try_from(workout.exercises.len()).unwrap_or(u32::MAX);
        let mut total_sets = 0;
        let mut total_reps = 0;
        let mut total_weight = 0.0;

        for set in workout.exercises.iter().flat_map(|e| &e.sets) {
            total_sets += 1;
            if let Some((weight, reps)) = set.load() {
                total_reps += u64::from(u32::from(reps));
                total_weight += weight * reps;
            }
        }

        Ok(Self {
            id: workout.id.clone(),
            display_title: workout.display_title(),
            total_exercises,
            total_sets,
            total_reps,
            total_weight,
            start_time,
            end_time,
            duration: end_time - start_time,
        })
    }
}

/// Maximum of a metric over all workouts seen so far, with the workout which achieved it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunningBest<T> {
    pub value: T,
    pub workout_id: Option<WorkoutID>,
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl<T: PartialOrd + Copy> RunningBest<T> {
    /// Replace the stored best if `value` is strictly greater. On ties the earlier workout is
    /// kept.
    #[must_use]
    pub fn update(self, value: T, metrics: &WorkoutMetrics) -> Self {
        if value > self.value {
            Self {
                value,
                workout_id: Some(metrics.id.clone()),
                end_time: Some(metrics.end_time),
            }
        } else {
            self
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AllTimeTotals {
    pub weight: f64,
    pub reps: u64,
    pub sets: u64,
    pub workout_count: u64,
    pub time_spent_seconds: i64,
}

impl AllTimeTotals {
    #[must_use]
    pub fn add(self, metrics: &WorkoutMetrics) -> Self {
        Self {
            weight: self.weight + metrics.total_weight,
            reps: self.reps + metrics.total_reps,
            sets: self.sets + u64::from(metrics.total_sets),
            workout_count: self.workout_count + 1,
            time_spent_seconds: self.time_spent_seconds + metrics.duration.num_seconds(),
        }
    }

    #[must_use]
    pub fn time_spent_hours(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.time_spent_seconds as f64;
        seconds / 3600.0
    }
}

/// Accumulated statistics over a sequence of workouts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Statistics {
    pub best_total_weight: RunningBest<f64>,
    pub best_total_reps: RunningBest<u64>,
    pub best_total_sets: RunningBest<u32>,
    pub all_time: AllTimeTotals,
}

impl Statistics {
    /// Fold the metrics of one workout into the statistics.
    #[must_use]
    pub fn step(self, metrics: &WorkoutMetrics) -> Self {
        Self {
            best_total_weight: self
                .best_total_weight
                .update(metrics.total_weight, metrics),
            best_total_reps: self.best_total_reps.update(metrics.total_reps, metrics),
            best_total_sets: self.best_total_sets.update(metrics.total_sets, metrics),
            all_time: self.all_time.add(metrics),
        }
    }
}

/// Row of the workout table.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRow {
    /// 1-based position of the workout in the aggregated sequence.
    pub index: usize,
    pub metrics: WorkoutMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedWorkout {
    pub index: usize,
    pub id: WorkoutID,
    pub error: InvalidWorkoutError,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Aggregation {
    pub rows: Vec<WorkoutRow>,
    pub statistics: Statistics,
    pub rejected: Vec<RejectedWorkout>,
}

impl Aggregation {
    /// Add one workout to the aggregation.
    ///
    /// An invalid workout is recorded as rejected and leaves rows and statistics untouched.
    #[must_use]
    pub fn step(self, workout: &Workout) -> Self {
        let index = self.rows.len() + self.rejected.len() + 1;
        let Self {
            mut rows,
            statistics,
            mut rejected,
        } = self;

        match WorkoutMetrics::try_from(workout) {
            Ok(metrics) => {
                let statistics = statistics.step(&metrics);
                rows.push(WorkoutRow { index, metrics });
                Self {
                    rows,
                    statistics,
                    rejected,
                }
            }
            Err(error) => {
                warn!("skipping workout {} ({}): {error}", workout.id, workout.title);
                rejected.push(RejectedWorkout {
                    index,
                    id: workout.id.clone(),
                    error,
                });
                Self {
                    rows,
                    statistics,
                    rejected,
                }
            }
        }
    }
}

/// Compute rows, running bests and all-time totals in a single pass.
///
/// Rows keep the order of `workouts`. Totals do not depend on the order, the workout referenced
/// by a running best only does if several workouts tie on the maximum.
pub fn aggregate<'a>(workouts: impl IntoIterator<Item = &'a Workout>) -> Aggregation {
    workouts
        .into_iter()
        .fold(Aggregation::default(), Aggregation::step)
}
