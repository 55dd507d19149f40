use log::debug;

use crate::{FetchError, Workout};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub trait PageFetcher {
    fn fetch_page(&self, endpoint: &str, params: &PageParams) -> Result<PageResult, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch_page(&self, endpoint: &str, params: &PageParams) -> Result<PageResult, FetchError> {
        (**self).fetch_page(endpoint, params)
    }
}

pub trait WorkoutCountRepository {
    fn read_workout_count(&self) -> Result<u32, FetchError>;
}

impl<T: WorkoutCountRepository + ?Sized> WorkoutCountRepository for &T {
    fn read_workout_count(&self) -> Result<u32, FetchError> {
        (**self).read_workout_count()
    }
}

/// Observer of the page-by-page progress of a pagination.
pub trait ProgressReporter {
    /// Called after each page. `page_count` is the total reported by the server.
    fn page_fetched(&mut self, endpoint: &str, page: u32, page_count: u32);

    fn finished(&mut self, _endpoint: &str) {}
}

impl ProgressReporter for () {
    fn page_fetched(&mut self, _endpoint: &str, _page: u32, _page_count: u32) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub page_size: u32,
    /// Additional query parameters, passed through unchanged.
    pub filters: Vec<(String, String)>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            filters: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub workouts: Vec<Workout>,
    pub page_count: u32,
    pub page: u32,
}

/// Lazy sequence of all workouts of a paginated endpoint.
///
/// Pages are requested one at a time when the records of the previous page have been consumed.
/// The page count of the first response bounds the pagination: after the page whose index
/// reaches the page count no further request is made. A failed request is yielded as error and
/// ends the sequence.
pub struct Pagination<F, P = ()> {
    fetcher: F,
    endpoint: String,
    params: PageParams,
    progress: P,
    page_count: Option<u32>,
    buffer: std::vec::IntoIter<Workout>,
    done: bool,
}

impl<F: PageFetcher> Pagination<F> {
    pub fn new(fetcher: F, endpoint: &str, params: PageParams) -> Self {
        Self::with_progress(fetcher, endpoint, params, ())
    }
}

impl<F: PageFetcher, P: ProgressReporter> Pagination<F, P> {
    pub fn with_progress(fetcher: F, endpoint: &str, params: PageParams, progress: P) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.to_string(),
            params,
            progress,
            page_count: None,
            buffer: Vec::new().into_iter(),
            done: false,
        }
    }

    /// Total number of pages, unknown until the first page has been fetched.
    #[must_use]
    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Drive the pagination to completion.
    ///
    /// Fails without returning any workouts if a single page fails.
    pub fn try_collect(self) -> Result<Vec<Workout>, FetchError> {
        self.collect()
    }

    fn fetch_next_page(&mut self) -> Result<(), FetchError> {
        debug!(
            "fetching page {} of {} from {}",
            self.params.page,
            self.page_count
                .map_or_else(|| String::from("?"), |c| c.to_string()),
            self.endpoint
        );

        let result = self.fetcher.fetch_page(&self.endpoint, &self.params)?;
        let page_count = *self.page_count.get_or_insert(result.page_count);

        self.progress
            .page_fetched(&self.endpoint, self.params.page, page_count);

        if self.params.page >= page_count {
            self.done = true;
            self.progress.finished(&self.endpoint);
        } else {
            self.params.page += 1;
        }

        self.buffer = result.workouts.into_iter();

        Ok(())
    }
}

impl<F: PageFetcher, P: ProgressReporter> Iterator for Pagination<F, P> {
    type Item = Result<Workout, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(workout) = self.buffer.next() {
                return Some(Ok(workout));
            }

            if self.done {
                return None;
            }

            if let Err(err) = self.fetch_next_page() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}

impl<F: PageFetcher, P: ProgressReporter> std::iter::FusedIterator for Pagination<F, P> {}
