use crate::catalog::{Department, Step};

pub mod dependency_dag;

pub use dependency_dag::DependencyDag;

/// Identifies one dated node of a schedule.
pub type StepKey = (Department, Step);

/// What a step's date is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// The style's sewing start date.
    Anchor,
    After(StepKey),
    /// Both steps must land on the same day; otherwise the rule has no
    /// feasible date.
    Synchronized(StepKey, StepKey),
}

/// `date(department, step) = date(basis) + offset` in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRule {
    pub department: Department,
    pub step: Step,
    pub basis: Basis,
    pub offset: i64,
}

impl DateRule {
    pub fn new(department: Department, step: Step, basis: Basis, offset: i64) -> Self {
        Self {
            department,
            step,
            basis,
            offset,
        }
    }

    pub fn key(&self) -> StepKey {
        (self.department, self.step)
    }

    pub fn dependencies(&self) -> Vec<StepKey> {
        match self.basis {
            Basis::Anchor => Vec::new(),
            Basis::After(key) => vec![key],
            Basis::Synchronized(left, right) => vec![left, right],
        }
    }
}
