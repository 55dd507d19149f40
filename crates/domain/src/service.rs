use log::{debug, error};

use crate::{
    FetchError, PageFetcher, PageParams, Pagination, ProgressReporter, TransportError, Workout,
    WorkoutCountRepository,
};

pub const WORKOUTS_ENDPOINT: &str = "workouts";

pub struct Service<R> {
    repository: R,
}

macro_rules! log_on_error {
    ($result: expr, $action: literal, $entity: literal) => {{
        let result = $result;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                FetchError::Transport(TransportError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: PageFetcher> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Lazy sequence of all workouts, starting at the page given in `params`.
    pub fn workouts<P: ProgressReporter>(
        &self,
        params: PageParams,
        progress: P,
    ) -> Pagination<&R, P> {
        Pagination::with_progress(&self.repository, WORKOUTS_ENDPOINT, params, progress)
    }

    /// All workouts in the order delivered by the server.
    pub fn get_workouts<P: ProgressReporter>(
        &self,
        params: PageParams,
        progress: P,
    ) -> Result<Vec<Workout>, FetchError> {
        log_on_error!(
            self.workouts(params, progress).try_collect(),
            "get",
            "workouts"
        )
    }
}

impl<R: WorkoutCountRepository> Service<R> {
    pub fn get_workout_count(&self) -> Result<u32, FetchError> {
        log_on_error!(
            self.repository.read_workout_count(),
            "get",
            "workout count"
        )
    }
}
