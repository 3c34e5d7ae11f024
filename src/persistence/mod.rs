use crate::schedule::ScheduleError;
use crate::style::{Style, StyleError};
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("invalid user id '{0}': use letters, digits, '-' or '_'")]
    InvalidUserId(String),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("invalid process types: {}", .0.join(", "))]
    InvalidProcessTypes(Vec<String>),
    #[error("row {row}: {source}")]
    InvalidRow { row: usize, source: StyleError },
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Per-user storage of style lists.
pub trait StyleStore: Send + Sync {
    fn save_styles(&self, user_id: &str, styles: &[Style]) -> PersistenceResult<()>;
    /// Styles saved for `user_id`; an unknown user has none.
    fn load_styles(&self, user_id: &str) -> PersistenceResult<Vec<Style>>;
}

pub fn validate_user_id(user_id: &str) -> PersistenceResult<()> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidUserId(user_id.to_string()))
    }
}

pub fn validate_styles(styles: &[Style]) -> PersistenceResult<()> {
    for (idx, style) in styles.iter().enumerate() {
        style
            .validate()
            .map_err(|source| PersistenceError::InvalidRow { row: idx + 1, source })?;
    }
    Ok(())
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonStyleStore, import_styles_from_csv, import_styles_from_reader, load_schedule_from_csv,
    load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json, save_timeline_to_csv,
};
