use crate::catalog::{Department, Step};
use crate::lead_times::LeadTimes;
use crate::process::ProcessType;
use crate::schedule::{Schedule, ScheduleError, date_from_days, date_to_days};
use crate::style::{Style, StyleError};
use chrono::NaiveDate;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("dataframe error: {0}")]
    Frame(#[from] PolarsError),
    #[error("invalid timeline row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// One dated step of one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub style_number: String,
    pub process_type: ProcessType,
    pub department: Department,
    pub step: Step,
    pub date: NaiveDate,
}

impl TimelineRow {
    pub fn from_schedule(style_number: &str, schedule: &Schedule) -> Vec<TimelineRow> {
        schedule
            .iter()
            .map(|(department, step, date)| TimelineRow {
                style_number: style_number.to_string(),
                process_type: schedule.process_type(),
                department,
                step,
                date,
            })
            .collect()
    }
}

/// Schedules every style in parallel and flattens the result, keeping the
/// input order of styles.
pub fn timeline_rows(
    styles: &[Style],
    lead_times: &LeadTimes,
) -> Result<Vec<TimelineRow>, ScheduleError> {
    let per_style = styles
        .par_iter()
        .map(|style| {
            let schedule = style.schedule_with(lead_times)?;
            Ok(TimelineRow::from_schedule(&style.style_number, &schedule))
        })
        .collect::<Result<Vec<_>, ScheduleError>>()?;
    Ok(per_style.into_iter().flatten().collect())
}

pub fn rows_to_frame(rows: &[TimelineRow]) -> PolarsResult<DataFrame> {
    let style_numbers: Vec<&str> = rows.iter().map(|row| row.style_number.as_str()).collect();
    let process_types: Vec<&str> = rows.iter().map(|row| row.process_type.as_str()).collect();
    let departments: Vec<&str> = rows.iter().map(|row| row.department.as_str()).collect();
    let steps: Vec<&str> = rows.iter().map(|row| row.step.as_str()).collect();
    let dates: Vec<i32> = rows.iter().map(|row| date_to_days(row.date)).collect();

    let date_series = Series::new(PlSmallStr::from_static("date"), dates).cast(&DataType::Date)?;
    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("style_number"), style_numbers).into_column(),
        Series::new(PlSmallStr::from_static("process_type"), process_types).into_column(),
        Series::new(PlSmallStr::from_static("department"), departments).into_column(),
        Series::new(PlSmallStr::from_static("step"), steps).into_column(),
        date_series.into_column(),
    ])
}

/// Long table `style_number, process_type, department, step, date` covering
/// every style.
pub fn style_timeline(
    styles: &[Style],
    lead_times: &LeadTimes,
) -> Result<DataFrame, TimelineError> {
    let rows = timeline_rows(styles, lead_times)?;
    Ok(rows_to_frame(&rows)?)
}

/// Rows of one department, latest date first; ties keep style numbers
/// ascending.
pub fn department_timeline(frame: &DataFrame, department: Department) -> PolarsResult<DataFrame> {
    frame
        .clone()
        .lazy()
        .filter(col("department").eq(lit(department.as_str())))
        .sort_by_exprs(
            [col("date"), col("style_number")],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_maintain_order(true),
        )
        .collect()
}

pub fn rows_from_frame(frame: &DataFrame) -> Result<Vec<TimelineRow>, TimelineError> {
    let style_numbers = frame.column("style_number")?.str()?;
    let process_types = frame.column("process_type")?.str()?;
    let departments = frame.column("department")?.str()?;
    let steps = frame.column("step")?.str()?;
    let dates = frame.column("date")?.date()?;

    let mut rows = Vec::with_capacity(frame.height());
    for idx in 0..frame.height() {
        let invalid = |message: String| TimelineError::InvalidRow { row: idx, message };
        let (Some(style_number), Some(process_type), Some(department), Some(step), Some(days)) = (
            style_numbers.get(idx),
            process_types.get(idx),
            departments.get(idx),
            steps.get(idx),
            dates.get(idx),
        ) else {
            return Err(invalid("null value".into()));
        };
        rows.push(TimelineRow {
            style_number: style_number.to_string(),
            process_type: process_type
                .parse()
                .map_err(|err: StyleError| invalid(err.to_string()))?,
            department: department
                .parse()
                .map_err(|err: StyleError| invalid(err.to_string()))?,
            step: step
                .parse()
                .map_err(|err: StyleError| invalid(err.to_string()))?,
            date: date_from_days(days).ok_or_else(|| invalid(format!("day {days} out of range")))?,
        });
    }
    Ok(rows)
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Date(days) => date_from_days(*days)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Boxed plain-text rendering of a frame for terminals.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.chars().count())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}
