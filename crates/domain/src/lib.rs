#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod pagination;
mod service;
mod statistics;
mod workout;

pub use error::{FetchError, InvalidWorkoutError, TransportError};
pub use exercise::{Exercise, Reps, RepsError, Set, SetType, Weight, WeightError, extract_exercise};
pub use pagination::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, PageFetcher, PageParams, PageResult, Pagination,
    ProgressReporter, WorkoutCountRepository,
};
pub use service::{Service, WORKOUTS_ENDPOINT};
pub use statistics::{
    Aggregation, AllTimeTotals, RejectedWorkout, RunningBest, Statistics, WorkoutMetrics,
    WorkoutRow, aggregate,
};
pub use workout::{Workout, WorkoutID};
