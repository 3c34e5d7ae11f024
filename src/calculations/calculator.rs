use super::rules::date_rules;
use crate::catalog::schedule_layout;
use crate::graph::{Basis, DateRule, DependencyDag, StepKey};
use crate::lead_times::LeadTimes;
use crate::process::{ConfirmationPeriod, ProcessType};
use crate::schedule::{
    DepartmentSchedule, SENTINEL_DATE, Schedule, ScheduleError, StepDate, shift_date,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Milestone {
    Date(NaiveDate),
    Infeasible,
}

impl Milestone {
    fn into_date(self) -> NaiveDate {
        match self {
            Milestone::Date(date) => date,
            Milestone::Infeasible => SENTINEL_DATE,
        }
    }
}

/// Schedule for one style using the standard lead times.
pub fn calculate_schedule(
    anchor: NaiveDate,
    process_type: ProcessType,
    confirmation_period: ConfirmationPeriod,
) -> Result<Schedule, ScheduleError> {
    calculate_schedule_with(anchor, process_type, confirmation_period, &LeadTimes::default())
}

pub fn calculate_schedule_with(
    anchor: NaiveDate,
    process_type: ProcessType,
    confirmation_period: ConfirmationPeriod,
    lead_times: &LeadTimes,
) -> Result<Schedule, ScheduleError> {
    let rules = date_rules(process_type, confirmation_period, lead_times);
    let dag = DependencyDag::build(&rules)?;
    let rules_by_key: HashMap<StepKey, &DateRule> =
        rules.iter().map(|rule| (rule.key(), rule)).collect();

    let mut resolved: HashMap<StepKey, Milestone> = HashMap::with_capacity(rules.len());
    for key in dag.evaluation_order()? {
        let Some(rule) = rules_by_key.get(&key) else {
            continue;
        };
        let milestone = evaluate(rule, anchor, &resolved)?;
        resolved.insert(key, milestone);
    }

    let mut departments = Vec::new();
    for (department, steps) in schedule_layout(process_type) {
        let mut dated = Vec::with_capacity(steps.len());
        for &step in steps {
            let milestone = resolved
                .get(&(department, step))
                .ok_or(ScheduleError::MissingRule { department, step })?;
            dated.push(StepDate {
                step,
                date: milestone.into_date(),
            });
        }
        departments.push(DepartmentSchedule {
            department,
            steps: dated,
        });
    }

    let schedule = Schedule::from_parts(anchor, process_type, confirmation_period, departments);
    debug!(
        %anchor,
        %process_type,
        period = confirmation_period.days(),
        steps = schedule.len(),
        feasible = schedule.is_feasible(),
        "calculated schedule"
    );
    Ok(schedule)
}

fn evaluate(
    rule: &DateRule,
    anchor: NaiveDate,
    resolved: &HashMap<StepKey, Milestone>,
) -> Result<Milestone, ScheduleError> {
    let lookup = |key: StepKey| {
        resolved
            .get(&key)
            .copied()
            .ok_or_else(|| ScheduleError::MissingDependency {
                department: rule.department,
                step: rule.step,
                requires: format!("{} / {}", key.0, key.1),
            })
    };
    let base = match rule.basis {
        Basis::Anchor => Milestone::Date(anchor),
        Basis::After(key) => lookup(key)?,
        Basis::Synchronized(left, right) => match (lookup(left)?, lookup(right)?) {
            (Milestone::Date(a), Milestone::Date(b)) if a == b => Milestone::Date(a),
            _ => Milestone::Infeasible,
        },
    };
    match base {
        Milestone::Date(date) => shift_date(date, rule.offset)
            .map(Milestone::Date)
            .ok_or(ScheduleError::DateOutOfRange {
                department: rule.department,
                step: rule.step,
            }),
        Milestone::Infeasible => Ok(Milestone::Infeasible),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Department, Step};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn misaligned_branches_produce_the_sentinel() {
        let lead_times = LeadTimes {
            trims_delivery: 16,
            ..LeadTimes::default()
        };
        let schedule = calculate_schedule_with(
            d(2025, 6, 1),
            ProcessType::FullPrintLocalPrint,
            ConfirmationPeriod::TwoWeeks,
            &lead_times,
        )
        .unwrap();
        assert_eq!(
            schedule.date(Department::Trims, Step::PhysicalTest),
            Some(d(2025, 5, 25))
        );
        assert_eq!(schedule.date(Department::Sewing, Step::SewingProcess), Some(SENTINEL_DATE));
        assert_eq!(schedule.date(Department::Sewing, Step::SewingStart), Some(SENTINEL_DATE));
    }

    #[test]
    fn overflow_near_calendar_start_is_an_error() {
        let result = calculate_schedule(
            NaiveDate::MIN,
            ProcessType::FullPrintEmbroidery,
            ConfirmationPeriod::OneWeek,
        );
        assert!(matches!(result, Err(ScheduleError::DateOutOfRange { .. })));
    }
}
