use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use hevy_stats_domain::{self as domain, Service, Workout};
use hevy_stats_storage::{REST, ReqwestSendRequest};
use log::{debug, warn};
use supports_color::Stream;

use crate::{
    config::{Config, FileConfig},
    logging::{self, LogProgress},
    output,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (default: <config dir>/hevy-stats/config.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the Hevy API
    #[arg(long, env = "HEVY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// First page to request
    #[arg(long, global = true)]
    pub initial_page: Option<u32>,

    /// Number of workouts per page
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Hevy API key, read from the API key file if not given
    #[arg(long, env = "HEVY_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show statistics of all workouts
    Workouts {
        /// Show running bests and all-time totals
        #[arg(short, long)]
        accolades: bool,
    },
    /// Show the history of a single exercise
    Exercise {
        /// Exact title of the exercise, e.g. "Bench Press (Barbell)"
        title: String,
    },
}

impl Cli {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            base_url: self.base_url.clone(),
            initial_page: self.initial_page,
            page_size: self.page_size,
            request_timeout: self.timeout,
            api_key_file: None,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("failed to initialize logger: {err}");
    }

    let config = Config::load(cli.config.as_deref(), cli.overrides())?;
    debug!("{config:?}");

    let api_key = config.api_key(cli.api_key.as_deref())?;
    let sender = ReqwestSendRequest::new(&api_key, config.request_timeout)
        .context("failed to create HTTP client")?;
    let service = Service::new(REST::new(&config.base_url, sender));
    let color = supports_color::on(Stream::Stdout).is_some();

    let report = match &cli.command {
        Commands::Workouts { accolades } => workouts_report(&service, &config, *accolades, color)?,
        Commands::Exercise { title } => exercise_report(&service, &config, title, color)?,
    };

    print!("{}", report.output);
    eprint!("{}", report.diagnostics);

    Ok(())
}

/// Text destined for stdout and stderr, produced only once all workouts have been fetched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Report {
    output: String,
    diagnostics: String,
}

fn workouts_report<R: domain::PageFetcher + domain::WorkoutCountRepository>(
    service: &Service<R>,
    config: &Config,
    accolades: bool,
    color: bool,
) -> Result<Report> {
    let workouts = fetch_workouts(service, config)?;
    // Server delivers the newest workout first
    let aggregation = domain::aggregate(workouts.iter().rev());
    let mut text = String::new();

    match service.get_workout_count() {
        Ok(count) => text.push_str(&format!("Workout count is: {count}\n")),
        Err(err) => warn!("workout count unavailable: {err}"),
    }
    text.push_str(&output::workout_table(&aggregation, color));
    if accolades {
        text.push('\n');
        text.push_str(&output::accolades(&aggregation.statistics));
    }

    Ok(Report {
        output: text,
        diagnostics: output::rejected(&aggregation.rejected),
    })
}

fn exercise_report<R: domain::PageFetcher>(
    service: &Service<R>,
    config: &Config,
    title: &str,
    color: bool,
) -> Result<Report> {
    let workouts = fetch_workouts(service, config)?;
    let history = domain::extract_exercise(title, workouts.iter().rev());

    if history.is_empty() {
        Ok(Report {
            output: String::new(),
            diagnostics: format!("No workouts contain the exercise \"{title}\"\n"),
        })
    } else {
        Ok(Report {
            output: output::exercise_history(title, &history, color),
            diagnostics: String::new(),
        })
    }
}

fn fetch_workouts<R: domain::PageFetcher>(
    service: &Service<R>,
    config: &Config,
) -> Result<Vec<Workout>> {
    service
        .get_workouts(config.page_params(), LogProgress)
        .with_context(|| format!("failed to fetch workouts from {}", config.base_url))
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, path::PathBuf, time::Duration};

    use chrono::DateTime;
    use clap::CommandFactory;
    use hevy_stats_domain::{
        Exercise, FetchError, PageParams, PageResult, Reps, Set, SetType, TransportError, Weight,
        WorkoutID,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    struct Repository {
        pages: Vec<Result<Vec<Workout>, FetchError>>,
        workout_count: Option<u32>,
        count_requests: Cell<u32>,
    }

    impl Repository {
        fn new(pages: Vec<Result<Vec<Workout>, FetchError>>, workout_count: Option<u32>) -> Self {
            Self {
                pages,
                workout_count,
                count_requests: Cell::new(0),
            }
        }
    }

    impl domain::PageFetcher for Repository {
        fn fetch_page(
            &self,
            _endpoint: &str,
            params: &PageParams,
        ) -> Result<PageResult, FetchError> {
            let index = usize::try_from(params.page - 1).unwrap();
            match &self.pages[index] {
                Ok(workouts) => Ok(PageResult {
                    workouts: workouts.clone(),
                    page_count: u32::try_from(self.pages.len()).unwrap(),
                    page: params.page,
                }),
                Err(_) => Err(FetchError::Transport(TransportError::Status {
                    status: 500,
                    reason: String::from("Internal Server Error"),
                })),
            }
        }
    }

    impl domain::WorkoutCountRepository for Repository {
        fn read_workout_count(&self) -> Result<u32, FetchError> {
            self.count_requests.set(self.count_requests.get() + 1);
            self.workout_count
                .ok_or(FetchError::Transport(TransportError::NoConnection))
        }
    }

    fn config() -> Config {
        Config {
            base_url: String::from("http://localhost:8080/v1"),
            initial_page: 1,
            page_size: 10,
            request_timeout: Duration::from_secs(30),
            api_key_file: PathBuf::from("/tmp/key"),
        }
    }

    fn workout(id: &str, day: u32) -> Workout {
        Workout {
            id: WorkoutID::from(id),
            title: format!("Workout {id}"),
            start_time: Some(
                DateTime::parse_from_rfc3339(&format!("2024-01-{day:02}T10:00:00+00:00")).unwrap(),
            ),
            end_time: Some(
                DateTime::parse_from_rfc3339(&format!("2024-01-{day:02}T11:00:00+00:00")).unwrap(),
            ),
            created_at: None,
            exercises: vec![Exercise {
                title: String::from("Bench Press (Barbell)"),
                sets: vec![Set {
                    index: 0,
                    set_type: SetType::Normal,
                    weight: Some(Weight::new(100.0).unwrap()),
                    reps: Some(Reps::new(5)),
                }],
                notes: None,
            }],
        }
    }

    fn server_error() -> Result<Vec<Workout>, FetchError> {
        Err(FetchError::MalformedResponse(String::new()))
    }

    #[test]
    fn test_workouts_report() {
        let service = Service::new(Repository::new(
            vec![Ok(vec![workout("b", 2)]), Ok(vec![workout("a", 1)])],
            Some(2),
        ));

        let report = workouts_report(&service, &config(), true, false).unwrap();
        let lines = report.output.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "Workout count is: 2");
        assert_eq!(lines[1], "Workouts");
        assert!(lines[4].contains("Workout a"));
        assert!(lines[5].contains("Workout b"));
        assert!(report.output.contains("Accolades"));
        assert_eq!(report.diagnostics, "");
    }

    #[test]
    fn test_workouts_report_without_workout_count() {
        let service = Service::new(Repository::new(vec![Ok(vec![workout("a", 1)])], None));

        let report = workouts_report(&service, &config(), false, false).unwrap();

        assert!(report.output.starts_with("Workouts\n"));
        assert!(!report.output.contains("Accolades"));
    }

    #[test]
    fn test_workouts_report_fetch_failure_produces_no_output() {
        let repository = Repository::new(vec![Ok(vec![workout("b", 2)]), server_error()], Some(2));
        let service = Service::new(&repository);

        let error = workouts_report(&service, &config(), true, false).unwrap_err();

        assert!(
            error
                .to_string()
                .starts_with("failed to fetch workouts from http://localhost:8080/v1")
        );
        assert_eq!(repository.count_requests.get(), 0);
    }

    #[test]
    fn test_workouts_report_lists_rejected_workouts() {
        let mut invalid = workout("x", 2);
        invalid.end_time = None;
        let service = Service::new(Repository::new(
            vec![Ok(vec![invalid, workout("a", 1)])],
            Some(2),
        ));

        let report = workouts_report(&service, &config(), false, false).unwrap();

        assert!(report.diagnostics.starts_with("Skipped workout #2 (x): "));
    }

    #[test]
    fn test_exercise_report() {
        let service = Service::new(Repository::new(vec![Ok(vec![workout("a", 1)])], None));

        let report =
            exercise_report(&service, &config(), "Bench Press (Barbell)", false).unwrap();

        assert!(
            report
                .output
                .starts_with("History of Bench Press (Barbell)\n\n[January 01 2024]: No Notes\n")
        );
        assert_eq!(report.diagnostics, "");

        let report = exercise_report(&service, &config(), "Squat", false).unwrap();

        assert_eq!(report.output, "");
        assert_eq!(
            report.diagnostics,
            "No workouts contain the exercise \"Squat\"\n"
        );
    }

    #[test]
    fn test_exercise_report_fetch_failure() {
        let service = Service::new(Repository::new(vec![server_error()], None));

        assert!(exercise_report(&service, &config(), "Squat", false).is_err());
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["hevy-stats", "workouts"], Commands::Workouts { accolades: false })]
    #[case(&["hevy-stats", "workouts", "--accolades"], Commands::Workouts { accolades: true })]
    #[case(
        &["hevy-stats", "exercise", "Bench Press (Barbell)"],
        Commands::Exercise { title: String::from("Bench Press (Barbell)") }
    )]
    fn test_cli_commands(#[case] args: &[&str], #[case] expected: Commands) {
        assert_eq!(Cli::try_parse_from(args).unwrap().command, expected);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "hevy-stats",
            "workouts",
            "--base-url",
            "http://localhost:8080/v1",
            "--page-size",
            "5",
            "--timeout",
            "3",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.overrides(),
            FileConfig {
                base_url: Some(String::from("http://localhost:8080/v1")),
                initial_page: None,
                page_size: Some(5),
                request_timeout: Some(3),
                api_key_file: None,
            }
        );
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["hevy-stats"]).is_err());
        assert!(Cli::try_parse_from(["hevy-stats", "exercise"]).is_err());
    }
}
