use crate::calculations::calculator::{calculate_schedule, calculate_schedule_with};
use crate::lead_times::LeadTimes;
use crate::process::{ConfirmationPeriod, ProcessType};
use crate::schedule::{Schedule, ScheduleError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("unknown process type '{0}'")]
    UnknownProcessType(String),
    #[error("confirmation period must be 7, 14 or 20 days, got {0}")]
    InvalidConfirmationPeriod(i64),
    #[error("invalid confirmation cycle '{0}'")]
    InvalidCycle(String),
    #[error("unknown department '{0}'")]
    UnknownDepartment(String),
    #[error("unknown step '{0}'")]
    UnknownStep(String),
    #[error("style number must not be empty")]
    EmptyStyleNumber,
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// One garment style as entered by a planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub style_number: String,
    pub sewing_start_date: NaiveDate,
    pub process_type: ProcessType,
    pub cycle: ConfirmationPeriod,
}

impl Style {
    pub fn new(
        style_number: impl Into<String>,
        sewing_start_date: NaiveDate,
        process_type: ProcessType,
        cycle: ConfirmationPeriod,
    ) -> Result<Self, StyleError> {
        let style = Self {
            style_number: style_number.into().trim().to_string(),
            sewing_start_date,
            process_type,
            cycle,
        };
        style.validate()?;
        Ok(style)
    }

    /// Builds a style from raw text fields, accepting either label set.
    pub fn parse(
        style_number: &str,
        sewing_start_date: &str,
        process_type: &str,
        cycle: &str,
    ) -> Result<Self, StyleError> {
        Self::new(
            style_number,
            parse_date(sewing_start_date)?,
            process_type.parse()?,
            cycle.parse()?,
        )
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if self.style_number.trim().is_empty() {
            return Err(StyleError::EmptyStyleNumber);
        }
        Ok(())
    }

    pub fn schedule(&self) -> Result<Schedule, ScheduleError> {
        calculate_schedule(self.sewing_start_date, self.process_type, self.cycle)
    }

    pub fn schedule_with(&self, lead_times: &LeadTimes) -> Result<Schedule, ScheduleError> {
        calculate_schedule_with(self.sewing_start_date, self.process_type, self.cycle, lead_times)
    }
}

/// Splits a pasted block of style numbers, one per line, dropping blanks.
pub fn parse_style_numbers(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_date(input: &str) -> Result<NaiveDate, StyleError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .map_err(|_| StyleError::InvalidDate(trimmed.to_string()))
}
