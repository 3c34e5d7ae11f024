pub mod adjuster;
pub mod calculator;
pub mod rules;

pub use adjuster::{Adjustment, IgnoreReason, adjust_schedule, adjust_schedule_by_name};
pub use calculator::{calculate_schedule, calculate_schedule_with};
pub use rules::date_rules;
