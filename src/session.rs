use crate::calculations::adjuster::Adjustment;
use crate::catalog::{Department, Step};
use crate::lead_times::LeadTimes;
use crate::persistence::{PersistenceError, StyleStore, validate_user_id};
use crate::process::{ConfirmationPeriod, ProcessType};
use crate::schedule::{Schedule, ScheduleError};
use crate::style::{Style, StyleError, parse_style_numbers};
use crate::timeline::{self, TimelineError, TimelineRow};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("style {index} does not exist ({len} styles)")]
    NoSuchStyle { index: usize, len: usize },
    #[error("no schedule is selected")]
    NoSchedule,
    #[error("no style numbers were given")]
    NoStyleNumbers,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

/// The schedule a planner is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentSchedule {
    pub style_number: String,
    pub schedule: Schedule,
}

/// One logged-in planner's working state. Styles are loaded from and saved to
/// a [`StyleStore`]; the selected schedule lives only in memory.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: String,
    styles: Vec<Style>,
    current: Option<CurrentSchedule>,
    lead_times: LeadTimes,
}

impl Session {
    pub fn open(
        store: &dyn StyleStore,
        user_id: &str,
        lead_times: LeadTimes,
    ) -> Result<Self, SessionError> {
        validate_user_id(user_id)?;
        let styles = store.load_styles(user_id)?;
        info!(user_id, styles = styles.len(), "session opened");
        Ok(Self {
            user_id: user_id.to_string(),
            styles,
            current: None,
            lead_times,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn lead_times(&self) -> &LeadTimes {
        &self.lead_times
    }

    pub fn current(&self) -> Option<&CurrentSchedule> {
        self.current.as_ref()
    }

    pub fn save(&self, store: &dyn StyleStore) -> Result<(), SessionError> {
        store.save_styles(&self.user_id, &self.styles)?;
        Ok(())
    }

    /// Saves the style list and ends the session.
    pub fn close(self, store: &dyn StyleStore) -> Result<(), SessionError> {
        self.save(store)?;
        info!(user_id = %self.user_id, "session closed");
        Ok(())
    }

    pub fn add_style(&mut self, style: Style) -> Result<(), SessionError> {
        style.validate()?;
        self.styles.push(style);
        Ok(())
    }

    /// Appends all styles, or none if any is invalid.
    pub fn add_styles(&mut self, styles: Vec<Style>) -> Result<usize, SessionError> {
        for style in &styles {
            style.validate()?;
        }
        let added = styles.len();
        self.styles.extend(styles);
        Ok(added)
    }

    /// Adds one style per non-blank line of `style_numbers`, all sharing the
    /// same start date, process type and cycle.
    pub fn add_batch(
        &mut self,
        style_numbers: &str,
        sewing_start_date: NaiveDate,
        process_type: ProcessType,
        cycle: ConfirmationPeriod,
    ) -> Result<usize, SessionError> {
        let numbers = parse_style_numbers(style_numbers);
        if numbers.is_empty() {
            return Err(SessionError::NoStyleNumbers);
        }
        let styles = numbers
            .into_iter()
            .map(|number| Style::new(number, sewing_start_date, process_type, cycle))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_styles(styles)
    }

    pub fn remove_style(&mut self, index: usize) -> Result<Style, SessionError> {
        if index >= self.styles.len() {
            return Err(SessionError::NoSuchStyle {
                index,
                len: self.styles.len(),
            });
        }
        Ok(self.styles.remove(index))
    }

    pub fn clear(&mut self) {
        self.styles.clear();
        self.current = None;
    }

    /// Computes the schedule of the style at `index` and makes it current.
    pub fn select(&mut self, index: usize) -> Result<&Schedule, SessionError> {
        let style = self.styles.get(index).ok_or(SessionError::NoSuchStyle {
            index,
            len: self.styles.len(),
        })?;
        let schedule = style.schedule_with(&self.lead_times)?;
        let current = self.current.insert(CurrentSchedule {
            style_number: style.style_number.clone(),
            schedule,
        });
        Ok(&current.schedule)
    }

    pub fn set_current(&mut self, style_number: impl Into<String>, schedule: Schedule) {
        self.current = Some(CurrentSchedule {
            style_number: style_number.into(),
            schedule,
        });
    }

    pub fn adjust_current(
        &mut self,
        department: Department,
        step: Step,
        new_date: NaiveDate,
    ) -> Result<Adjustment, SessionError> {
        let current = self.current.as_mut().ok_or(SessionError::NoSchedule)?;
        Ok(current.schedule.adjust(department, step, new_date))
    }

    pub fn timeline_rows(&self) -> Result<Vec<TimelineRow>, SessionError> {
        Ok(timeline::timeline_rows(&self.styles, &self.lead_times)?)
    }

    pub fn timeline(&self) -> Result<DataFrame, SessionError> {
        Ok(timeline::style_timeline(&self.styles, &self.lead_times)?)
    }

    pub fn department_timeline(&self, department: Department) -> Result<DataFrame, SessionError> {
        let frame = self.timeline()?;
        timeline::department_timeline(&frame, department)
            .map_err(|err| SessionError::Timeline(err.into()))
    }
}
