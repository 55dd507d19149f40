use chrono::{DateTime, FixedOffset};

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("{status} {reason}")]
    Status { status: u16, reason: String },
    #[error("request timed out")]
    Timeout,
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidWorkoutError {
    #[error("start time is missing")]
    MissingStartTime,
    #[error("end time is missing")]
    MissingEndTime,
    #[error("end time {end} precedes start time {start}")]
    EndBeforeStart {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fetch_error_from_transport_error() {
        assert!(matches!(
            FetchError::from(TransportError::NoConnection),
            FetchError::Transport(TransportError::NoConnection)
        ));
        assert!(matches!(
            FetchError::from(TransportError::Other("foo".into())),
            FetchError::Transport(TransportError::Other(error)) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(
            FetchError::from(TransportError::Status {
                status: 401,
                reason: String::from("Unauthorized")
            })
            .to_string(),
            "401 Unauthorized"
        );
        assert_eq!(
            FetchError::MalformedResponse(String::from("missing field `page_count`")).to_string(),
            "malformed response: missing field `page_count`"
        );
    }

    #[test]
    fn test_invalid_workout_error_display() {
        let start = DateTime::parse_from_rfc3339("2024-01-01T11:00:00+00:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2024-01-01T10:00:00+00:00").unwrap();
        assert_eq!(
            InvalidWorkoutError::EndBeforeStart { start, end }.to_string(),
            "end time 2024-01-01 10:00:00 +00:00 precedes start time 2024-01-01 11:00:00 +00:00"
        );
        assert_eq!(
            InvalidWorkoutError::MissingEndTime.to_string(),
            "end time is missing"
        );
    }
}
