use crate::catalog::{Department, Step};
use crate::schedule::{Schedule, shift_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    UnknownDepartment,
    UnknownStep,
    DateOutOfRange,
}

/// Outcome of a manual date edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Adjustment {
    /// The target took the new date and `moved` later steps of the same
    /// department shifted by `delta_days`.
    Shifted { delta_days: i64, moved: usize },
    /// Nothing changed.
    Ignored { reason: IgnoreReason },
}

impl Adjustment {
    pub fn is_shifted(&self) -> bool {
        matches!(self, Adjustment::Shifted { .. })
    }
}

/// Moves `step` of `department` to `new_date` and every later step of that
/// department by the same delta. Other departments keep their dates.
pub fn adjust_schedule(
    schedule: &mut Schedule,
    department: Department,
    step: Step,
    new_date: NaiveDate,
) -> Adjustment {
    let Some(entry) = schedule.department_mut(department) else {
        debug!(%department, %step, "adjustment ignored: department not scheduled");
        return Adjustment::Ignored {
            reason: IgnoreReason::UnknownDepartment,
        };
    };
    let Some(position) = entry.steps.iter().position(|dated| dated.step == step) else {
        debug!(%department, %step, "adjustment ignored: step not in department");
        return Adjustment::Ignored {
            reason: IgnoreReason::UnknownStep,
        };
    };

    let delta_days = (new_date - entry.steps[position].date).num_days();
    let mut shifted = Vec::with_capacity(entry.steps.len() - position - 1);
    for later in &entry.steps[position + 1..] {
        match shift_date(later.date, delta_days) {
            Some(date) => shifted.push(date),
            None => {
                debug!(%department, %step, delta_days, "adjustment ignored: date out of range");
                return Adjustment::Ignored {
                    reason: IgnoreReason::DateOutOfRange,
                };
            }
        }
    }

    entry.steps[position].date = new_date;
    let moved = shifted.len();
    for (later, date) in entry.steps[position + 1..].iter_mut().zip(shifted) {
        later.date = date;
    }
    debug!(%department, %step, %new_date, delta_days, moved, "adjusted schedule");
    Adjustment::Shifted { delta_days, moved }
}

/// Same as [`adjust_schedule`] for free-text department and step names in
/// either label set. Unparseable names are ignored like unknown ones.
pub fn adjust_schedule_by_name(
    schedule: &mut Schedule,
    department: &str,
    step: &str,
    new_date: NaiveDate,
) -> Adjustment {
    let Ok(department) = department.parse::<Department>() else {
        return Adjustment::Ignored {
            reason: IgnoreReason::UnknownDepartment,
        };
    };
    let Ok(step) = step.parse::<Step>() else {
        return Adjustment::Ignored {
            reason: IgnoreReason::UnknownStep,
        };
    };
    adjust_schedule(schedule, department, step, new_date)
}
