use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Duration, FixedOffset};
use hevy_stats_domain::{
    Aggregation, Exercise, RejectedWorkout, RunningBest, SetType, Statistics,
};
use num_format::{Locale, ToFormattedString};
use owo_colors::{OwoColorize, Style};

const NOT_AVAILABLE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Colour of a cell, applied only when colour output is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Green,
    Yellow,
    Blue,
    Red,
    BoldGreen,
    DimYellow,
}

impl Paint {
    fn style(self) -> Style {
        match self {
            Paint::Green => Style::new().green(),
            Paint::Yellow => Style::new().yellow(),
            Paint::Blue => Style::new().blue(),
            Paint::Red => Style::new().red(),
            Paint::BoldGreen => Style::new().green().bold(),
            Paint::DimYellow => Style::new().yellow().dimmed(),
        }
    }
}

/// Green from 10 t, yellow from 20 t.
#[must_use]
pub fn weight_paint(kg: f64) -> Option<Paint> {
    if kg >= 20_000.0 {
        Some(Paint::Yellow)
    } else if kg >= 10_000.0 {
        Some(Paint::Green)
    } else {
        None
    }
}

/// Green from one hour, yellow from two hours.
#[must_use]
pub fn duration_paint(duration: Duration) -> Option<Paint> {
    match duration.num_seconds() {
        s if s >= 2 * 3600 => Some(Paint::Yellow),
        s if s >= 3600 => Some(Paint::Green),
        _ => None,
    }
}

#[must_use]
pub fn set_type_paint(set_type: SetType) -> Paint {
    match set_type {
        SetType::Warmup => Paint::DimYellow,
        SetType::Normal => Paint::BoldGreen,
        SetType::Dropset => Paint::Blue,
        SetType::Failure => Paint::Red,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    text: String,
    paint: Option<Paint>,
}

impl Cell {
    #[must_use]
    pub fn painted(text: impl Into<String>, paint: Option<Paint>) -> Self {
        Self {
            text: text.into(),
            paint,
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::painted(text, None)
    }
}

/// Plain text table with column widths fitted to the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    title: Option<String>,
    columns: Vec<(String, Align)>,
    rows: Vec<Vec<Cell>>,
    color: bool,
}

impl Table {
    #[must_use]
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            title: None,
            columns: columns
                .iter()
                .map(|(header, align)| ((*header).to_string(), *align))
                .collect(),
            rows: vec![],
            color: false,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Missing cells are rendered empty, surplus cells are dropped.
    pub fn push_row<T: Into<Cell>>(&mut self, row: Vec<T>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.text.chars().count())
                    .chain([header.chars().count()])
                    .max()
                    .unwrap_or_default()
            })
            .collect()
    }

    fn write_line<'a>(
        &self,
        f: &mut fmt::Formatter<'_>,
        widths: &[usize],
        cells: impl Iterator<Item = (&'a str, Option<Paint>)>,
    ) -> fmt::Result {
        let line = self
            .columns
            .iter()
            .zip(widths.iter().copied())
            .zip(cells.chain(std::iter::repeat(("", None))))
            .map(|(((_, align), width), (text, paint))| {
                let padded = match align {
                    Align::Left => format!("{text:<width$}"),
                    Align::Right => format!("{text:>width$}"),
                };
                match paint {
                    Some(paint) if self.color => padded.style(paint.style()).to_string(),
                    _ => padded,
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(f, "{}", line.trim_end())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();

        if let Some(title) = &self.title {
            writeln!(f, "{title}")?;
        }
        self.write_line(
            f,
            &widths,
            self.columns.iter().map(|(h, _)| (h.as_str(), None)),
        )?;
        let separators = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
        self.write_line(f, &widths, separators.iter().map(|s| (s.as_str(), None)))?;
        for row in &self.rows {
            self.write_line(
                f,
                &widths,
                row.iter().map(|cell| (cell.text.as_str(), cell.paint)),
            )?;
        }

        Ok(())
    }
}

/// Table with one row per accepted workout. Heavy and long sessions are highlighted.
#[must_use]
pub fn workout_table(aggregation: &Aggregation, color: bool) -> String {
    let mut table = Table::new(&[
        ("#", Align::Right),
        ("Title", Align::Left),
        ("# of Exercises", Align::Right),
        ("Total Sets", Align::Right),
        ("Total Reps", Align::Right),
        ("Total Weight (KG)", Align::Right),
        ("Session", Align::Left),
        ("Time Spent", Align::Right),
    ])
    .title("Workouts")
    .color(color);

    for row in &aggregation.rows {
        let metrics = &row.metrics;
        table.push_row(vec![
            Cell::from(row.index.to_string()),
            Cell::from(metrics.display_title.clone()),
            Cell::from(metrics.total_exercises.to_string()),
            Cell::from(thousands(u64::from(metrics.total_sets))),
            Cell::from(thousands(metrics.total_reps)),
            Cell::painted(
                weight(metrics.total_weight),
                weight_paint(metrics.total_weight),
            ),
            Cell::from(metrics.session_window()),
            Cell::painted(duration(metrics.duration), duration_paint(metrics.duration)),
        ]);
    }

    table.to_string()
}

/// Running bests and all-time totals.
#[must_use]
pub fn accolades(statistics: &Statistics) -> String {
    let mut table = Table::new(&[
        ("Accolade", Align::Left),
        ("Value", Align::Right),
        ("Date", Align::Left),
    ])
    .title("Accolades");
    let all_time = &statistics.all_time;

    table.push_row(best("Best Total Reps", &statistics.best_total_reps, |v| {
        thousands(*v)
    }));
    table.push_row(best("Best Total Sets", &statistics.best_total_sets, |v| {
        thousands(u64::from(*v))
    }));
    table.push_row(best(
        "Best Total Weight (KG)",
        &statistics.best_total_weight,
        |v| weight(*v),
    ));
    table.push_row(vec![
        String::from("Number of Workouts"),
        thousands(all_time.workout_count),
    ]);
    table.push_row(vec![
        String::from("Total Time Working Out (Hours)"),
        format!("{:.2}", all_time.time_spent_hours()),
    ]);
    table.push_row(vec![
        String::from("All Time Reps"),
        thousands(all_time.reps),
    ]);
    table.push_row(vec![
        String::from("All Time Sets"),
        thousands(all_time.sets),
    ]);
    table.push_row(vec![
        String::from("All Time Weight (KG)"),
        weight(all_time.weight),
    ]);

    table.to_string()
}

fn best<T>(label: &str, best: &RunningBest<T>, format: impl Fn(&T) -> String) -> Vec<String> {
    match (&best.workout_id, best.end_time) {
        (Some(_), Some(end_time)) => vec![
            label.to_string(),
            format(&best.value),
            end_time.format("%a %b %d %Y").to_string(),
        ],
        _ => vec![
            label.to_string(),
            NOT_AVAILABLE.to_string(),
            NOT_AVAILABLE.to_string(),
        ],
    }
}

/// One block per occurrence of the exercise, oldest first. Sets are coloured by type.
#[must_use]
pub fn exercise_history(
    title: &str,
    history: &BTreeMap<DateTime<FixedOffset>, Exercise>,
    color: bool,
) -> String {
    let mut output = format!("History of {title}\n");

    for (timestamp, exercise) in history {
        let mut table = Table::new(&[
            ("#", Align::Right),
            ("Type", Align::Left),
            ("Weight (KG)", Align::Right),
            ("Reps", Align::Right),
        ])
        .title(format!(
            "[{}]: {}",
            timestamp.format("%B %d %Y"),
            exercise.notes().unwrap_or("No Notes")
        ))
        .color(color);

        for (position, set) in exercise.sets.iter().enumerate() {
            let paint = Some(set_type_paint(set.set_type));
            table.push_row(vec![
                Cell::painted((position + 1).to_string(), paint),
                Cell::painted(set.set_type.to_string(), paint),
                Cell::painted(
                    set.weight
                        .map_or_else(|| NOT_AVAILABLE.to_string(), |w| w.to_string()),
                    paint,
                ),
                Cell::painted(
                    set.reps
                        .map_or_else(|| NOT_AVAILABLE.to_string(), |r| r.to_string()),
                    paint,
                ),
            ]);
        }

        output.push('\n');
        output.push_str(&table.to_string());
    }

    output
}

/// One line per workout which was left out of the aggregation.
#[must_use]
pub fn rejected(rejected: &[RejectedWorkout]) -> String {
    rejected
        .iter()
        .map(|r| format!("Skipped workout #{} ({}): {}\n", r.index, r.id, r.error))
        .collect()
}

fn thousands(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

/// Two decimals with the integer part grouped in thousands.
fn weight(value: f64) -> String {
    let formatted = format!("{value:.2}");
    formatted
        .split_once('.')
        .and_then(|(integer, fraction)| {
            integer
                .parse::<u64>()
                .ok()
                .map(|i| format!("{}.{fraction}", thousands(i)))
        })
        .unwrap_or(formatted)
}

fn duration(duration: Duration) -> String {
    let seconds = duration.num_seconds();
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}
