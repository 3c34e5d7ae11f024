pub mod calculations;
pub mod catalog;
pub mod config;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod lead_times;
pub mod logging;
pub mod persistence;
pub mod process;
pub mod schedule;
pub mod session;
pub mod style;
pub mod timeline;

pub use calculations::{
    Adjustment, IgnoreReason, adjust_schedule, adjust_schedule_by_name, calculate_schedule,
    calculate_schedule_with,
};
pub use catalog::{CONFIRMATION_PAIRS, Department, Step, department_steps, schedule_layout};
pub use config::{ConfigError, LoadOptions, PlannerConfig};
pub use lead_times::{LayoutLeadDays, LeadTimes};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteStyleStore;
pub use persistence::{
    JsonStyleStore, PersistenceError, StyleStore, import_styles_from_csv,
    import_styles_from_reader, load_schedule_from_csv, load_schedule_from_json,
    save_schedule_to_csv, save_schedule_to_json, save_timeline_to_csv,
};
pub use process::{ConfirmationPeriod, ProcessType};
pub use schedule::{
    DepartmentSchedule, Feasibility, SENTINEL_DATE, Schedule, ScheduleError, StepDate,
};
pub use session::{CurrentSchedule, Session, SessionError};
pub use style::{Style, StyleError, parse_date, parse_style_numbers};
pub use timeline::{
    TimelineError, TimelineRow, department_timeline, render_text_table, rows_from_frame,
    rows_to_frame, style_timeline, timeline_rows,
};
