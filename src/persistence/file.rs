use super::{PersistenceError, PersistenceResult, StyleStore, validate_styles, validate_user_id};
use crate::catalog::{Department, Step};
use crate::process::{ConfirmationPeriod, ProcessType};
use crate::schedule::{DepartmentSchedule, Schedule, StepDate};
use crate::style::Style;
use crate::timeline::TimelineRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Keeps each user's styles in `<data_dir>/<user_id>.json`.
pub struct JsonStyleStore {
    data_dir: PathBuf,
}

#[derive(Default, Serialize, Deserialize)]
struct UserStyles {
    #[serde(default)]
    all_styles: Vec<Style>,
}

impl JsonStyleStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> PersistenceResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn user_path(&self, user_id: &str) -> PersistenceResult<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.data_dir.join(format!("{user_id}.json")))
    }
}

impl StyleStore for JsonStyleStore {
    fn save_styles(&self, user_id: &str, styles: &[Style]) -> PersistenceResult<()> {
        let path = self.user_path(user_id)?;
        validate_styles(styles)?;
        let snapshot = UserStyles {
            all_styles: styles.to_vec(),
        };
        // Replace the file in one rename; a failed write leaves the old list.
        let mut staged = NamedTempFile::new_in(&self.data_dir)?;
        serde_json::to_writer_pretty(&mut staged, &snapshot)?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|err| err.error)?;
        info!(user_id, styles = styles.len(), path = %path.display(), "saved styles");
        Ok(())
    }

    fn load_styles(&self, user_id: &str) -> PersistenceResult<Vec<Style>> {
        let path = self.user_path(user_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&path)?;
        let snapshot: UserStyles = serde_json::from_reader(BufReader::new(file))?;
        validate_styles(&snapshot.all_styles)?;
        info!(user_id, styles = snapshot.all_styles.len(), "loaded styles");
        Ok(snapshot.all_styles)
    }
}

const STYLE_NUMBER_COLUMN: (&str, &str) = ("款号", "style_number");
const SEWING_START_COLUMN: (&str, &str) = ("缝纫开始时间", "sewing_start_date");
const PROCESS_TYPE_COLUMN: (&str, &str) = ("工序", "process_type");
const CYCLE_COLUMN: (&str, &str) = ("确认周转周期", "cycle");

/// Reads styles from a spreadsheet export with the columns
/// 款号, 缝纫开始时间, 工序, 确认周转周期 (or their English field names).
pub fn import_styles_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Style>> {
    let file = File::open(path)?;
    import_styles_from_reader(file)
}

pub fn import_styles_from_reader<R: Read>(reader: R) -> PersistenceResult<Vec<Style>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let locate = |(label, alias): (&str, &str)| {
        headers.iter().position(|header| {
            let header = header.trim_start_matches('\u{feff}').trim();
            header == label || header.eq_ignore_ascii_case(alias)
        })
    };

    let columns = [
        STYLE_NUMBER_COLUMN,
        SEWING_START_COLUMN,
        PROCESS_TYPE_COLUMN,
        CYCLE_COLUMN,
    ];
    let positions: Vec<Option<usize>> = columns.iter().map(|column| locate(*column)).collect();
    let missing: Vec<String> = columns
        .iter()
        .zip(&positions)
        .filter(|(_, position)| position.is_none())
        .map(|((label, _), _)| label.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PersistenceError::MissingColumns(missing));
    }
    let [style_col, date_col, process_col, cycle_col] =
        [positions[0], positions[1], positions[2], positions[3]].map(|p| p.unwrap_or_default());

    let records = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;
    let field = |record: &csv::StringRecord, idx: usize| record.get(idx).unwrap_or("").to_string();

    let mut invalid_process_types: Vec<String> = Vec::new();
    for record in &records {
        let value = field(record, process_col);
        if value.parse::<ProcessType>().is_err() && !invalid_process_types.contains(&value) {
            invalid_process_types.push(value);
        }
    }
    if !invalid_process_types.is_empty() {
        return Err(PersistenceError::InvalidProcessTypes(invalid_process_types));
    }

    let mut styles = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let style = Style::parse(
            &field(record, style_col),
            &field(record, date_col),
            &field(record, process_col),
            &field(record, cycle_col),
        )
        .map_err(|source| PersistenceError::InvalidRow { row: idx + 1, source })?;
        styles.push(style);
    }
    info!(styles = styles.len(), "imported styles from csv");
    Ok(styles)
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    schedule.check_catalog()?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let schedule: Schedule = serde_json::from_reader(BufReader::new(file))?;
    schedule.check_catalog()?;
    Ok(schedule)
}

#[derive(Serialize, Deserialize)]
struct ScheduleHeader {
    anchor: NaiveDate,
    process_type: ProcessType,
    confirmation_period: ConfirmationPeriod,
}

#[derive(Default, Serialize, Deserialize)]
struct StepCsvRecord {
    department: String,
    step: String,
    date: String,
    #[serde(default)]
    metadata_json: String,
}

const METADATA_ROW: &str = "__metadata__";

impl StepCsvRecord {
    fn metadata_row(schedule: &Schedule) -> PersistenceResult<Self> {
        let header = ScheduleHeader {
            anchor: schedule.anchor(),
            process_type: schedule.process_type(),
            confirmation_period: schedule.confirmation_period(),
        };
        Ok(StepCsvRecord {
            department: METADATA_ROW.to_string(),
            metadata_json: serde_json::to_string(&header)?,
            ..StepCsvRecord::default()
        })
    }

    fn is_metadata_row(&self) -> bool {
        self.department == METADATA_ROW
    }

    fn into_step(self) -> PersistenceResult<(Department, StepDate)> {
        let department: Department = self.department.parse()?;
        let step: Step = self.step.parse()?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|e| {
            PersistenceError::InvalidData(format!("invalid date '{}': {e}", self.date))
        })?;
        Ok((department, StepDate { step, date }))
    }
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    schedule.check_catalog()?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(StepCsvRecord::metadata_row(schedule)?)?;
    for (department, step, date) in schedule.iter() {
        writer.serialize(StepCsvRecord {
            department: department.as_str().to_string(),
            step: step.as_str().to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            metadata_json: String::new(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut header: Option<ScheduleHeader> = None;
    let mut departments: Vec<DepartmentSchedule> = Vec::new();
    for record in reader.deserialize::<StepCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if header.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            header = Some(serde_json::from_str(&record.metadata_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid metadata json: {err}"))
            })?);
            continue;
        }
        let (department, step) = record.into_step()?;
        match departments.last_mut() {
            Some(current) if current.department == department => current.steps.push(step),
            _ => departments.push(DepartmentSchedule {
                department,
                steps: vec![step],
            }),
        }
    }

    let Some(header) = header else {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no metadata row".into(),
        ));
    };
    let schedule = Schedule::from_parts(
        header.anchor,
        header.process_type,
        header.confirmation_period,
        departments,
    );
    schedule.check_catalog()?;
    Ok(schedule)
}

/// Writes timeline rows with columns `style_number, process_type, department,
/// step, date`.
pub fn save_timeline_to_csv<P: AsRef<Path>>(
    rows: &[TimelineRow],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
