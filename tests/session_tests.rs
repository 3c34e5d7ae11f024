use chrono::NaiveDate;
use garment_schedule::{
    Adjustment, ConfirmationPeriod, Department, JsonStyleStore, LeadTimes, ProcessType, Session,
    SessionError, Step, Style, StyleError, StyleStore,
};
use tempfile::tempdir;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open(store: &JsonStyleStore) -> Session {
    Session::open(store, "planner", LeadTimes::default()).unwrap()
}

#[test]
fn batch_add_skips_blank_lines_and_persists_on_close() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let mut session = open(&store);
    let added = session
        .add_batch(
            " S-1 \n\n  \nS-2\r\nS-3",
            d(2025, 6, 1),
            ProcessType::FullPrintLocalPrint,
            ConfirmationPeriod::TwoWeeks,
        )
        .unwrap();
    assert_eq!(added, 3);
    session.close(&store).unwrap();

    let styles = store.load_styles("planner").unwrap();
    let numbers: Vec<&str> = styles.iter().map(|s| s.style_number.as_str()).collect();
    assert_eq!(numbers, vec!["S-1", "S-2", "S-3"]);
    assert!(styles.iter().all(|s| s.process_type == ProcessType::FullPrintLocalPrint));
}

#[test]
fn blank_batches_are_rejected() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let mut session = open(&store);
    let err = session
        .add_batch("\n  \n", d(2025, 6, 1), ProcessType::FullPrintLocalPrint, ConfirmationPeriod::OneWeek)
        .unwrap_err();
    assert!(matches!(err, SessionError::NoStyleNumbers));
    assert!(session.styles().is_empty());
}

#[test]
fn add_styles_is_all_or_nothing() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let mut session = open(&store);
    let good = Style::new("OK", d(2025, 6, 1), ProcessType::FullPrintEmbroidery, ConfirmationPeriod::OneWeek)
        .unwrap();
    let mut bad = good.clone();
    bad.style_number = "   ".into();

    let err = session.add_styles(vec![good.clone(), bad]).unwrap_err();
    assert!(matches!(err, SessionError::Style(StyleError::EmptyStyleNumber)));
    assert!(session.styles().is_empty());

    assert_eq!(session.add_styles(vec![good]).unwrap(), 1);
}

#[test]
fn remove_and_clear() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let mut session = open(&store);
    session
        .add_batch("A\nB\nC", d(2025, 6, 1), ProcessType::LocalPrintEmbroidery, ConfirmationPeriod::TwoWeeks)
        .unwrap();

    let removed = session.remove_style(1).unwrap();
    assert_eq!(removed.style_number, "B");
    assert!(matches!(
        session.remove_style(2),
        Err(SessionError::NoSuchStyle { index: 2, len: 2 })
    ));

    session.select(0).unwrap();
    assert!(session.current().is_some());
    session.clear();
    assert!(session.styles().is_empty());
    assert!(session.current().is_none());
}

#[test]
fn selecting_a_style_makes_its_schedule_current() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let mut session = open(&store);
    session
        .add_batch("A\nB", d(2025, 6, 1), ProcessType::FullPrintLocalPrintEmbroidery, ConfirmationPeriod::TwoWeeks)
        .unwrap();

    let schedule = session.select(1).unwrap();
    assert_eq!(schedule.date(Department::Fabric, Step::Layout), Some(d(2025, 4, 21)));
    let current = session.current().unwrap();
    assert_eq!(current.style_number, "B");
    assert!(matches!(session.select(5), Err(SessionError::NoSuchStyle { index: 5, len: 2 })));
}

#[test]
fn adjustments_apply_to_the_current_schedule_only() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let mut session = open(&store);
    assert!(matches!(
        session.adjust_current(Department::Fabric, Step::Layout, d(2025, 4, 1)),
        Err(SessionError::NoSchedule)
    ));

    session
        .add_batch("A", d(2025, 6, 1), ProcessType::FullPrintLocalPrintEmbroidery, ConfirmationPeriod::TwoWeeks)
        .unwrap();
    session.select(0).unwrap();
    let adjustment = session
        .adjust_current(Department::Fabric, Step::Layout, d(2025, 4, 20))
        .unwrap();
    assert_eq!(adjustment, Adjustment::Shifted { delta_days: -1, moved: 7 });
    let current = session.current().unwrap();
    assert_eq!(
        current.schedule.date(Department::Fabric, Step::PhysicalTestFabricInspect),
        Some(d(2025, 5, 3))
    );

    // Reselecting recomputes from the stored style.
    let fresh = session.select(0).unwrap();
    assert_eq!(fresh.date(Department::Fabric, Step::Layout), Some(d(2025, 4, 21)));
}

#[test]
fn sessions_use_their_lead_times() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let lead_times = LeadTimes {
        sewing_start: 2,
        ..LeadTimes::default()
    };
    let mut session = Session::open(&store, "planner", lead_times).unwrap();
    session
        .add_batch("A", d(2025, 6, 1), ProcessType::FullPrintLocalPrint, ConfirmationPeriod::TwoWeeks)
        .unwrap();
    let schedule = session.select(0).unwrap();
    assert_eq!(schedule.date(Department::Sewing, Step::SewingStart), Some(d(2025, 6, 2)));
}

#[test]
fn department_timeline_covers_all_styles() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let mut session = open(&store);
    session
        .add_batch("A\nB", d(2025, 6, 1), ProcessType::FullPrintLocalPrint, ConfirmationPeriod::TwoWeeks)
        .unwrap();
    session
        .add_batch("C", d(2025, 6, 8), ProcessType::LocalPrintEmbroidery, ConfirmationPeriod::OneWeek)
        .unwrap();

    assert_eq!(session.timeline_rows().unwrap().len(), 32 * 3);
    let sewing = session.department_timeline(Department::Sewing).unwrap();
    assert_eq!(sewing.height(), 6);
    let printed = session.department_timeline(Department::PrintedCloth).unwrap();
    assert_eq!(printed.height(), 6 * 2);
}

#[test]
fn invalid_user_ids_cannot_open_sessions() {
    let dir = tempdir().unwrap();
    let store = JsonStyleStore::new(dir.path()).unwrap();
    let err = Session::open(&store, "../x", LeadTimes::default()).unwrap_err();
    assert!(matches!(err, SessionError::Persistence(_)));
}
