use chrono::NaiveDate;
use garment_schedule::{
    ConfirmationPeriod, Department, LeadTimes, ProcessType, Step, Style, department_timeline,
    render_text_table, rows_from_frame, rows_to_frame, style_timeline, timeline_rows,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn styles() -> Vec<Style> {
    vec![
        Style::new("B-2", d(2025, 6, 1), ProcessType::FullPrintLocalPrint, ConfirmationPeriod::TwoWeeks)
            .unwrap(),
        Style::new("A-1", d(2025, 6, 1), ProcessType::LocalPrintEmbroidery, ConfirmationPeriod::OneWeek)
            .unwrap(),
        Style::new(
            "C-3",
            d(2025, 7, 1),
            ProcessType::FullPrintEmbroidery,
            ConfirmationPeriod::TwentyDays,
        )
        .unwrap(),
    ]
}

#[test]
fn timeline_rows_follow_style_order() {
    let rows = timeline_rows(&styles(), &LeadTimes::default()).unwrap();
    assert_eq!(rows.len(), 32 * 3);
    assert!(rows[..32].iter().all(|row| row.style_number == "B-2"));
    assert!(rows[32..64].iter().all(|row| row.style_number == "A-1"));
    assert!(rows[64..].iter().all(|row| row.style_number == "C-3"));
    assert_eq!(rows[0].department, Department::Fabric);
    assert_eq!(rows[0].step, Step::Layout);
    assert_eq!(rows[0].date, d(2025, 4, 27));
    assert_eq!(rows[0].process_type, ProcessType::FullPrintLocalPrint);
}

#[test]
fn empty_style_list_gives_an_empty_frame() {
    let frame = style_timeline(&[], &LeadTimes::default()).unwrap();
    assert_eq!(frame.height(), 0);
    assert_eq!(frame.width(), 5);
}

#[test]
fn frame_round_trips_rows() {
    let rows = timeline_rows(&styles(), &LeadTimes::default()).unwrap();
    let frame = rows_to_frame(&rows).unwrap();
    assert_eq!(
        frame.get_column_names_str(),
        vec!["style_number", "process_type", "department", "step", "date"]
    );
    assert_eq!(rows_from_frame(&frame).unwrap(), rows);
}

#[test]
fn department_view_sorts_latest_first_then_by_style_number() {
    let frame = style_timeline(&styles(), &LeadTimes::default()).unwrap();
    let cutting2 = department_timeline(&frame, Department::Cutting2).unwrap();
    let rows = rows_from_frame(&cutting2).unwrap();
    let view: Vec<(&str, NaiveDate)> = rows
        .iter()
        .map(|row| (row.style_number.as_str(), row.date))
        .collect();
    assert_eq!(
        view,
        vec![
            ("C-3", d(2025, 6, 23)),
            ("A-1", d(2025, 5, 24)),
            ("B-2", d(2025, 5, 24)),
        ]
    );
}

#[test]
fn department_view_skips_styles_without_that_department() {
    let frame = style_timeline(&styles(), &LeadTimes::default()).unwrap();
    let embroidery = department_timeline(&frame, Department::Embroidery).unwrap();
    let rows = rows_from_frame(&embroidery).unwrap();
    assert_eq!(rows.len(), 2 * 5);
    assert!(rows.iter().all(|row| row.style_number != "B-2"));
    assert!(rows.windows(2).all(|pair| pair[0].date >= pair[1].date));
}

#[test]
fn text_table_renders_dates_and_labels() {
    let rows = timeline_rows(&styles()[..1], &LeadTimes::default()).unwrap();
    let frame = rows_to_frame(&rows).unwrap();
    let table = render_text_table(&frame);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 32 + 4);
    assert!(lines[0].starts_with("+-"));
    assert!(lines[1].contains("style_number"));
    assert!(lines[3].contains("2025-04-27"));
    assert!(lines[3].contains("FullPrint+LocalPrint"));
    let width = lines[0].chars().count();
    assert!(lines.iter().all(|line| line.chars().count() == width));
}
