#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use garment_schedule::{
    ConfirmationPeriod, LeadTimes, PersistenceError, ProcessType, Session, SqliteStyleStore,
    Style, StyleStore,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn style(number: &str, process_type: ProcessType) -> Style {
    Style::new(number, d(2025, 6, 1), process_type, ConfirmationPeriod::TwoWeeks).unwrap()
}

#[test]
fn sqlite_store_round_trips_styles_in_order() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteStyleStore::new(file.path()).unwrap();
    let styles = vec![
        style("Z-9", ProcessType::FullPrintLocalPrint),
        style("A-1", ProcessType::LocalPrintEmbroidery),
        style("M-5", ProcessType::FullPrintEmbroidery),
    ];
    store.save_styles("planner", &styles).unwrap();

    let reopened = SqliteStyleStore::new(file.path()).unwrap();
    assert_eq!(reopened.load_styles("planner").unwrap(), styles);
}

#[test]
fn saving_replaces_the_previous_list() {
    let store = SqliteStyleStore::in_memory().unwrap();
    store
        .save_styles("u1", &[style("A", ProcessType::FullPrintLocalPrint), style("B", ProcessType::FullPrintLocalPrint)])
        .unwrap();
    store.save_styles("u1", &[style("C", ProcessType::FullPrintEmbroidery)]).unwrap();

    let loaded = store.load_styles("u1").unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].style_number, "C");

    store.save_styles("u1", &[]).unwrap();
    assert!(store.load_styles("u1").unwrap().is_empty());
}

#[test]
fn users_are_isolated() {
    let store = SqliteStyleStore::in_memory().unwrap();
    store.save_styles("beta", &[style("B", ProcessType::FullPrintLocalPrint)]).unwrap();
    store.save_styles("alpha", &[style("A", ProcessType::LocalPrintEmbroidery)]).unwrap();

    assert_eq!(store.users().unwrap(), vec!["alpha".to_string(), "beta".to_string()]);
    assert_eq!(store.load_styles("alpha").unwrap()[0].style_number, "A");
    assert!(store.load_styles("gamma").unwrap().is_empty());
}

#[test]
fn invalid_user_ids_are_rejected() {
    let store = SqliteStyleStore::in_memory().unwrap();
    let err = store.save_styles("no spaces", &[]).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidUserId(_)));
}

#[test]
fn sessions_work_against_sqlite() {
    let store = SqliteStyleStore::in_memory().unwrap();
    let mut session = Session::open(&store, "planner", LeadTimes::default()).unwrap();
    session
        .add_batch("S1\nS2\n", d(2025, 6, 1), ProcessType::FullPrintLocalPrintEmbroidery, ConfirmationPeriod::OneWeek)
        .unwrap();
    session.close(&store).unwrap();

    let session = Session::open(&store, "planner", LeadTimes::default()).unwrap();
    let numbers: Vec<&str> = session.styles().iter().map(|s| s.style_number.as_str()).collect();
    assert_eq!(numbers, vec!["S1", "S2"]);
}
