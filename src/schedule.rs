use crate::calculations::adjuster::{Adjustment, adjust_schedule};
use crate::catalog::{Department, Step, schedule_layout};
use crate::process::{ConfirmationPeriod, ProcessType};
use chrono::{Datelike, Days, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date written to both sewing steps when the cutting and trims branches
/// never meet.
pub const SENTINEL_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2099, 1, 1) {
    Some(date) => date,
    None => panic!("sentinel date out of range"),
};

// Day 0 of polars' Date dtype, counted from 0001-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("date for {department} / {step} is outside the supported calendar range")]
    DateOutOfRange { department: Department, step: Step },
    #[error("{department} / {step} is dated from {requires}, which has no rule")]
    MissingDependency {
        department: Department,
        step: Step,
        requires: String,
    },
    #[error("more than one rule dates {department} / {step}")]
    DuplicateRule { department: Department, step: Step },
    #[error("dependency cycle through {department} / {step}")]
    DependencyCycle { department: Department, step: Step },
    #[error("no date was computed for {department} / {step}")]
    MissingRule { department: Department, step: Step },
    #[error("schedule does not match the {process_type} catalog: {detail}")]
    CatalogMismatch {
        process_type: ProcessType,
        detail: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDate {
    pub step: Step,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentSchedule {
    pub department: Department,
    pub steps: Vec<StepDate>,
}

impl DepartmentSchedule {
    pub fn date(&self, step: Step) -> Option<NaiveDate> {
        self.steps
            .iter()
            .find(|entry| entry.step == step)
            .map(|entry| entry.date)
    }
}

/// Whether sewing can start on a real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "snake_case")]
pub enum Feasibility {
    Feasible(NaiveDate),
    Infeasible,
}

/// Dated production plan for one style. Departments are kept in catalog
/// order and their steps in [`Department::schedule_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    anchor: NaiveDate,
    process_type: ProcessType,
    confirmation_period: ConfirmationPeriod,
    departments: Vec<DepartmentSchedule>,
}

impl Schedule {
    pub(crate) fn from_parts(
        anchor: NaiveDate,
        process_type: ProcessType,
        confirmation_period: ConfirmationPeriod,
        departments: Vec<DepartmentSchedule>,
    ) -> Self {
        Self {
            anchor,
            process_type,
            confirmation_period,
            departments,
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn process_type(&self) -> ProcessType {
        self.process_type
    }

    pub fn confirmation_period(&self) -> ConfirmationPeriod {
        self.confirmation_period
    }

    pub fn departments(&self) -> &[DepartmentSchedule] {
        &self.departments
    }

    pub fn department(&self, department: Department) -> Option<&DepartmentSchedule> {
        self.departments
            .iter()
            .find(|entry| entry.department == department)
    }

    pub(crate) fn department_mut(
        &mut self,
        department: Department,
    ) -> Option<&mut DepartmentSchedule> {
        self.departments
            .iter_mut()
            .find(|entry| entry.department == department)
    }

    pub fn date(&self, department: Department, step: Step) -> Option<NaiveDate> {
        self.department(department)
            .and_then(|entry| entry.date(step))
    }

    /// Every (department, step, date) in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (Department, Step, NaiveDate)> + '_ {
        self.departments.iter().flat_map(|entry| {
            entry
                .steps
                .iter()
                .map(move |step| (entry.department, step.step, step.date))
        })
    }

    pub fn len(&self) -> usize {
        self.departments.iter().map(|entry| entry.steps.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sewing_feasibility(&self) -> Feasibility {
        match self.date(Department::Sewing, Step::SewingStart) {
            Some(date) if date != SENTINEL_DATE => Feasibility::Feasible(date),
            _ => Feasibility::Infeasible,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self.sewing_feasibility(), Feasibility::Feasible(_))
    }

    pub fn adjust(
        &mut self,
        department: Department,
        step: Step,
        new_date: NaiveDate,
    ) -> Adjustment {
        adjust_schedule(self, department, step, new_date)
    }

    /// Checks that departments and steps are exactly the catalog for the
    /// schedule's process type, each department in schedule order.
    pub fn check_catalog(&self) -> Result<(), ScheduleError> {
        let expected = schedule_layout(self.process_type);
        let mismatch = |detail: String| ScheduleError::CatalogMismatch {
            process_type: self.process_type,
            detail,
        };
        if expected.len() != self.departments.len() {
            return Err(mismatch(format!(
                "expected {} departments, found {}",
                expected.len(),
                self.departments.len()
            )));
        }
        for ((department, steps), actual) in expected.iter().zip(&self.departments) {
            if *department != actual.department {
                return Err(mismatch(format!(
                    "expected department {department}, found {}",
                    actual.department
                )));
            }
            let actual_steps: Vec<Step> = actual.steps.iter().map(|entry| entry.step).collect();
            if actual_steps.as_slice() != *steps {
                return Err(mismatch(format!(
                    "steps of {department} do not match the catalog or are out of order"
                )));
            }
        }
        Ok(())
    }

    /// Long-format frame with one row per step: `department, step, date`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut departments = Vec::with_capacity(self.len());
        let mut steps = Vec::with_capacity(self.len());
        let mut dates = Vec::with_capacity(self.len());
        for (department, step, date) in self.iter() {
            departments.push(department.as_str());
            steps.push(step.as_str());
            dates.push(date_to_days(date));
        }
        let date_series =
            Series::new(PlSmallStr::from_static("date"), dates).cast(&DataType::Date)?;
        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("department"), departments).into_column(),
            Series::new(PlSmallStr::from_static("step"), steps).into_column(),
            date_series.into_column(),
        ])
    }
}

/// Moves `date` by a signed number of days, `None` past the calendar range.
pub(crate) fn shift_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

pub(crate) fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub(crate) fn date_from_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_date_handles_both_directions() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(shift_date(date, -1), NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(shift_date(date, 31), NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(shift_date(date, 0), Some(date));
        assert_eq!(shift_date(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn polars_day_numbers_start_at_unix_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(epoch), 0);
        assert_eq!(date_from_days(0), Some(epoch));
        assert_eq!(date_from_days(date_to_days(SENTINEL_DATE)), Some(SENTINEL_DATE));
    }
}
