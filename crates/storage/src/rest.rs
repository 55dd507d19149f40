//! REST
//!
//! Client for the Hevy public API (v1). Workouts are read page by page; the HTTP layer is
//! abstracted by `SendRequest` so that the client can be exercised without a network.

use std::{str::FromStr, time::Duration};

use chrono::{DateTime, FixedOffset};
use hevy_stats_domain as domain;
use log::{debug, warn};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://api.hevyapp.com/v1";
pub const WORKOUT_COUNT_ENDPOINT: &str = "workouts/count";

pub trait SendRequest {
    fn get(&self, url: &str, query: &[(String, String)])
    -> Result<Response, domain::TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct ReqwestSendRequest {
    client: reqwest::blocking::Client,
}

impl ReqwestSendRequest {
    /// Create a sender which authenticates every request with `api_key` and gives up on requests
    /// not completed within `timeout`.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, domain::TransportError> {
        let mut api_key = HeaderValue::from_str(api_key).map_err(|err| {
            domain::TransportError::Other(format!("invalid API key: {err}").into())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static("api-key"), api_key);

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client })
    }
}

impl SendRequest for ReqwestSendRequest {
    fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Response, domain::TransportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().map_err(transport_error)?;

        Ok(Response {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

fn transport_error(err: reqwest::Error) -> domain::TransportError {
    if err.is_timeout() {
        domain::TransportError::Timeout
    } else if err.is_connect() {
        domain::TransportError::NoConnection
    } else {
        domain::TransportError::Other(Box::new(err))
    }
}

pub struct REST<S: SendRequest> {
    base_url: String,
    sender: S,
}

impl<S: SendRequest> REST<S> {
    pub fn new(base_url: &str, sender: S) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sender,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<T, domain::FetchError> {
        let response = self.sender.get(&self.url(endpoint), query)?;

        if !response.ok() {
            return Err(domain::TransportError::Status {
                status: response.status,
                reason: response.reason,
            }
            .into());
        }

        serde_json::from_str(&response.body).map_err(|err| {
            domain::FetchError::MalformedResponse(format!("deserialization failed: {err}"))
        })
    }
}

impl<S: SendRequest> domain::PageFetcher for REST<S> {
    fn fetch_page(
        &self,
        endpoint: &str,
        params: &domain::PageParams,
    ) -> Result<domain::PageResult, domain::FetchError> {
        let mut query = vec![
            (String::from("page"), params.page.to_string()),
            (String::from("pageSize"), params.page_size.to_string()),
        ];
        query.extend(params.filters.iter().cloned());

        let page: Page = self.fetch(endpoint, &query)?;
        debug!(
            "received page {} of {:?} from {endpoint}",
            params.page, page.page_count
        );
        page.into_page_result(params.page)
    }
}

impl<S: SendRequest> domain::WorkoutCountRepository for REST<S> {
    fn read_workout_count(&self) -> Result<u32, domain::FetchError> {
        let count: WorkoutCount = self.fetch(WORKOUT_COUNT_ENDPOINT, &[])?;
        count.workout_count.ok_or_else(|| {
            domain::FetchError::MalformedResponse(String::from("missing field `workout_count`"))
        })
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutCount {
    pub workout_count: Option<u32>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Page {
    pub page: Option<u32>,
    pub page_count: Option<u32>,
    pub workouts: Option<Vec<Workout>>,
}

impl Page {
    /// Convert into a domain page, falling back to `requested_page` if the response does not
    /// state its page index.
    pub fn into_page_result(
        self,
        requested_page: u32,
    ) -> Result<domain::PageResult, domain::FetchError> {
        let page_count = self.page_count.ok_or_else(|| {
            domain::FetchError::MalformedResponse(String::from("missing field `page_count`"))
        })?;
        let workouts = self.workouts.ok_or_else(|| {
            domain::FetchError::MalformedResponse(String::from("missing field `workouts`"))
        })?;

        Ok(domain::PageResult {
            workouts: workouts.into_iter().map(domain::Workout::from).collect(),
            page_count,
            page: self.page.unwrap_or(requested_page),
        })
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl From<Workout> for domain::Workout {
    fn from(value: Workout) -> Self {
        let start_time = parse_timestamp(&value.id, "start_time", value.start_time.as_deref());
        let end_time = parse_timestamp(&value.id, "end_time", value.end_time.as_deref());
        let created_at = parse_timestamp(&value.id, "created_at", value.created_at.as_deref());
        Self {
            exercises: value
                .exercises
                .into_iter()
                .map(|e| e.into_domain(&value.id))
                .collect(),
            id: value.id.into(),
            title: value.title,
            start_time,
            end_time,
            created_at,
        }
    }
}

fn parse_timestamp(
    workout_id: &str,
    field: &str,
    value: Option<&str>,
) -> Option<DateTime<FixedOffset>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => Some(timestamp),
        Err(err) => {
            warn!("workout {workout_id}: ignoring invalid {field} {value:?}: {err}");
            None
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    #[serde(default)]
    pub title: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub sets: Vec<Set>,
}

impl Exercise {
    fn into_domain(self, workout_id: &str) -> domain::Exercise {
        domain::Exercise {
            sets: self
                .sets
                .into_iter()
                .map(|s| s.into_domain(workout_id, &self.title))
                .collect(),
            title: self.title,
            notes: self.notes,
        }
    }
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Set {
    #[serde(default)]
    pub index: u32,
    #[serde(rename = "type")]
    pub set_type: Option<String>,
    pub weight_kg: Option<f64>,
    pub reps: Option<i64>,
}

impl Set {
    fn into_domain(self, workout_id: &str, exercise: &str) -> domain::Set {
        let context = format!("workout {workout_id}, {exercise}, set {}", self.index);
        let set_type = match self.set_type.as_deref() {
            None => domain::SetType::default(),
            Some(value) => domain::SetType::from_str(value).unwrap_or_else(|_| {
                warn!("{context}: unknown set type {value:?}");
                domain::SetType::default()
            }),
        };
        let weight = self.weight_kg.and_then(|w| {
            domain::Weight::new(w)
                .inspect_err(|err| warn!("{context}: ignoring weight {w}: {err}"))
                .ok()
        });
        let reps = self.reps.and_then(|r| {
            domain::Reps::try_from(r)
                .inspect_err(|err| warn!("{context}: ignoring reps: {err}"))
                .ok()
        });

        domain::Set {
            index: self.index,
            set_type,
            weight,
            reps,
        }
    }
}
