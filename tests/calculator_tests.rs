use chrono::NaiveDate;
use garment_schedule::{
    CONFIRMATION_PAIRS, ConfirmationPeriod, Department, Feasibility, LeadTimes, ProcessType,
    SENTINEL_DATE, Schedule, Step, calculate_schedule, calculate_schedule_with, schedule_layout,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn schedule(process_type: ProcessType) -> Schedule {
    calculate_schedule(d(2025, 6, 1), process_type, ConfirmationPeriod::TwoWeeks).unwrap()
}

fn assert_dates(schedule: &Schedule, expected: &[(Department, Step, NaiveDate)]) {
    for (department, step, date) in expected {
        assert_eq!(
            schedule.date(*department, *step),
            Some(*date),
            "{department} / {step}"
        );
    }
}

#[test]
fn four_way_schedule_matches_reference_dates() {
    use Department as D;
    use Step as S;
    let schedule = schedule(ProcessType::FullPrintLocalPrintEmbroidery);
    assert_dates(
        &schedule,
        &[
            (D::Fabric, S::Layout, d(2025, 4, 21)),
            (D::Fabric, S::MaterialUsage, d(2025, 4, 21)),
            (D::Fabric, S::CottonYarn, d(2025, 4, 24)),
            (D::Fabric, S::Greige, d(2025, 4, 28)),
            (D::Fabric, S::ColorSampleSend, d(2025, 4, 14)),
            (D::Fabric, S::ColorSampleConfirm, d(2025, 4, 28)),
            (D::Fabric, S::Bleached, d(2025, 5, 3)),
            (D::Fabric, S::PhysicalTestFabricInspect, d(2025, 5, 4)),
            (D::PrintedCloth, S::PrintedClothSampleSend, d(2025, 4, 20)),
            (D::PrintedCloth, S::PrintedClothConfirm, d(2025, 5, 4)),
            (D::PrintedCloth, S::PrintedClothProcess, d(2025, 5, 5)),
            (D::PrintedCloth, S::PrintedCloth, d(2025, 5, 8)),
            (D::PrintedCloth, S::PrintedClothFinishing, d(2025, 5, 9)),
            (D::PrintedCloth, S::PhysicalTest, d(2025, 5, 10)),
            (D::Cutting1, S::PreProductionSampleSend, d(2025, 4, 25)),
            (D::Cutting1, S::PreProductionSampleConfirm, d(2025, 5, 9)),
            (D::Cutting1, S::PatternMaking, d(2025, 5, 10)),
            (D::Cutting1, S::Cutting, d(2025, 5, 13)),
            (D::Printing, S::PrintSampleConfirm, d(2025, 4, 28)),
            (D::Printing, S::PrintConfirm, d(2025, 5, 12)),
            (D::Printing, S::PrintProcess, d(2025, 5, 13)),
            (D::Printing, S::Print, d(2025, 5, 16)),
            (D::Printing, S::PhysicalTest, d(2025, 5, 17)),
            (D::Embroidery, S::EmbroiderySampleConfirm, d(2025, 5, 2)),
            (D::Embroidery, S::EmbroideryConfirm, d(2025, 5, 16)),
            (D::Embroidery, S::EmbroideryProcess, d(2025, 5, 17)),
            (D::Embroidery, S::Embroidery, d(2025, 5, 22)),
            (D::Embroidery, S::PhysicalTest, d(2025, 5, 23)),
            (D::Cutting2, S::PieceMatching, d(2025, 5, 24)),
            (D::CutPieceWarehouse, S::CollarBinding, d(2025, 5, 24)),
            (D::Trims, S::TrimsSampleSend, d(2025, 4, 23)),
            (D::Trims, S::TrimsConfirm, d(2025, 5, 7)),
            (D::Trims, S::TrimsLimit, d(2025, 5, 8)),
            (D::Trims, S::Trims, d(2025, 5, 23)),
            (D::Trims, S::PhysicalTest, d(2025, 5, 24)),
            (D::Sewing, S::SewingProcess, d(2025, 5, 31)),
            (D::Sewing, S::SewingStart, d(2025, 6, 1)),
        ],
    );
    assert_eq!(schedule.len(), 37);
    assert_eq!(schedule.sewing_feasibility(), Feasibility::Feasible(d(2025, 6, 1)));
}

#[test]
fn full_print_local_print_dates_piece_matching_from_printing() {
    use Department as D;
    use Step as S;
    let schedule = schedule(ProcessType::FullPrintLocalPrint);
    assert_dates(
        &schedule,
        &[
            (D::Fabric, S::Layout, d(2025, 4, 27)),
            (D::Fabric, S::CottonYarn, d(2025, 4, 30)),
            (D::Fabric, S::Greige, d(2025, 5, 4)),
            (D::Fabric, S::ColorSampleSend, d(2025, 4, 20)),
            (D::Fabric, S::Bleached, d(2025, 5, 9)),
            (D::Fabric, S::PhysicalTestFabricInspect, d(2025, 5, 10)),
            (D::PrintedCloth, S::PrintedClothConfirm, d(2025, 5, 10)),
            (D::PrintedCloth, S::PrintedClothFinishing, d(2025, 5, 15)),
            (D::PrintedCloth, S::PhysicalTest, d(2025, 5, 16)),
            (D::Cutting1, S::PreProductionSampleSend, d(2025, 5, 1)),
            (D::Cutting1, S::PreProductionSampleConfirm, d(2025, 5, 15)),
            (D::Cutting1, S::Cutting, d(2025, 5, 19)),
            (D::Printing, S::PrintSampleConfirm, d(2025, 5, 4)),
            (D::Printing, S::PrintConfirm, d(2025, 5, 18)),
            (D::Printing, S::Print, d(2025, 5, 22)),
            (D::Printing, S::PhysicalTest, d(2025, 5, 23)),
            (D::Cutting2, S::PieceMatching, d(2025, 5, 24)),
            (D::Sewing, S::SewingProcess, d(2025, 5, 31)),
            (D::Sewing, S::SewingStart, d(2025, 6, 1)),
        ],
    );
    assert!(schedule.department(D::Embroidery).is_none());
}

#[test]
fn full_print_embroidery_confirms_embroidery_before_cutting() {
    use Department as D;
    use Step as S;
    let schedule = schedule(ProcessType::FullPrintEmbroidery);
    assert_dates(
        &schedule,
        &[
            (D::Fabric, S::Layout, d(2025, 4, 25)),
            (D::Fabric, S::Greige, d(2025, 5, 2)),
            (D::Fabric, S::Bleached, d(2025, 5, 7)),
            (D::Fabric, S::PhysicalTestFabricInspect, d(2025, 5, 8)),
            (D::PrintedCloth, S::PrintedClothFinishing, d(2025, 5, 13)),
            (D::Cutting1, S::Cutting, d(2025, 5, 17)),
            (D::Embroidery, S::EmbroideryConfirm, d(2025, 5, 16)),
            (D::Embroidery, S::PhysicalTest, d(2025, 5, 23)),
            (D::Cutting2, S::PieceMatching, d(2025, 5, 24)),
            (D::Sewing, S::SewingStart, d(2025, 6, 1)),
        ],
    );
    assert!(schedule.department(D::Printing).is_none());
}

#[test]
fn local_print_embroidery_confirms_preproduction_sample_at_bleaching() {
    use Department as D;
    use Step as S;
    let schedule = schedule(ProcessType::LocalPrintEmbroidery);
    assert_dates(
        &schedule,
        &[
            (D::Fabric, S::Bleached, d(2025, 5, 9)),
            (D::Cutting1, S::PreProductionSampleConfirm, d(2025, 5, 9)),
            (D::Cutting1, S::Cutting, d(2025, 5, 13)),
            (D::Printing, S::Print, d(2025, 5, 16)),
            (D::Embroidery, S::EmbroideryConfirm, d(2025, 5, 16)),
            (D::Embroidery, S::PhysicalTest, d(2025, 5, 23)),
            (D::Cutting2, S::PieceMatching, d(2025, 5, 24)),
            (D::Sewing, S::SewingStart, d(2025, 6, 1)),
        ],
    );
    assert!(schedule.department(D::PrintedCloth).is_none());
}

#[test]
fn schedule_keys_match_the_filtered_catalog() {
    for process_type in ProcessType::ALL {
        for period in ConfirmationPeriod::ALL {
            let schedule = calculate_schedule(d(2024, 2, 29), process_type, period).unwrap();
            let actual: Vec<(Department, Vec<Step>)> = schedule
                .departments()
                .iter()
                .map(|entry| (entry.department, entry.steps.iter().map(|s| s.step).collect::<Vec<_>>()))
                .collect();
            let expected: Vec<(Department, Vec<Step>)> = schedule_layout(process_type)
                .into_iter()
                .map(|(department, steps)| (department, steps.to_vec()))
                .collect();
            assert_eq!(actual, expected, "{process_type} / {period}");
            assert!(schedule.check_catalog().is_ok());
        }
    }
}

#[test]
fn calculation_is_deterministic() {
    for process_type in ProcessType::ALL {
        let first = calculate_schedule(d(2025, 9, 15), process_type, ConfirmationPeriod::OneWeek);
        let second = calculate_schedule(d(2025, 9, 15), process_type, ConfirmationPeriod::OneWeek);
        assert_eq!(first.unwrap(), second.unwrap());
    }
}

#[test]
fn every_send_precedes_its_confirmation_by_one_period() {
    for process_type in ProcessType::ALL {
        for period in ConfirmationPeriod::ALL {
            let schedule = calculate_schedule(d(2025, 12, 31), process_type, period).unwrap();
            for (department, confirm, send) in CONFIRMATION_PAIRS {
                if !process_type.includes(department) {
                    continue;
                }
                let confirm_date = schedule.date(department, confirm).unwrap();
                let send_date = schedule.date(department, send).unwrap();
                assert_eq!(
                    (confirm_date - send_date).num_days(),
                    period.days(),
                    "{process_type} {department}"
                );
            }
        }
    }
}

#[test]
fn sewing_follows_collar_binding_when_trims_align() {
    for process_type in ProcessType::ALL {
        let schedule = calculate_schedule(d(2026, 1, 10), process_type, ConfirmationPeriod::TwentyDays)
            .unwrap();
        let collar = schedule
            .date(Department::CutPieceWarehouse, Step::CollarBinding)
            .unwrap();
        let trims_test = schedule.date(Department::Trims, Step::PhysicalTest).unwrap();
        assert_eq!(collar, trims_test);
        let sewing_process = schedule.date(Department::Sewing, Step::SewingProcess).unwrap();
        assert_eq!((sewing_process - collar).num_days(), 7);
        assert_eq!(
            schedule.date(Department::Sewing, Step::SewingStart),
            Some(d(2026, 1, 10))
        );
        assert!(schedule.is_feasible());
    }
}

#[test]
fn misaligned_trims_mark_sewing_infeasible() {
    let lead_times = LeadTimes {
        trims_delivery: 16,
        ..LeadTimes::default()
    };
    for process_type in ProcessType::ALL {
        let schedule = calculate_schedule_with(
            d(2025, 6, 1),
            process_type,
            ConfirmationPeriod::TwoWeeks,
            &lead_times,
        )
        .unwrap();
        assert_eq!(
            schedule.date(Department::Sewing, Step::SewingProcess),
            Some(SENTINEL_DATE)
        );
        assert_eq!(
            schedule.date(Department::Sewing, Step::SewingStart),
            Some(SENTINEL_DATE)
        );
        assert_eq!(SENTINEL_DATE, d(2099, 1, 1));
        assert_eq!(schedule.sewing_feasibility(), Feasibility::Infeasible);
        assert_eq!(
            schedule.date(Department::Trims, Step::PhysicalTest),
            Some(d(2025, 5, 25))
        );
    }
}

#[test]
fn custom_layout_lead_days_move_the_whole_fabric_branch() {
    let mut lead_times = LeadTimes::default();
    lead_times.layout.full_print_embroidery = 38;
    let schedule = calculate_schedule_with(
        d(2025, 6, 1),
        ProcessType::FullPrintEmbroidery,
        ConfirmationPeriod::TwoWeeks,
        &lead_times,
    )
    .unwrap();
    assert_eq!(schedule.date(Department::Fabric, Step::Layout), Some(d(2025, 4, 24)));
    // Cutting moves one day earlier, so collar binding misses the trims test.
    assert_eq!(
        schedule.date(Department::CutPieceWarehouse, Step::CollarBinding),
        Some(d(2025, 5, 23))
    );
    assert!(!schedule.is_feasible());
}
