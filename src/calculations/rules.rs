use crate::catalog::{Department, Step};
use crate::graph::{Basis, DateRule};
use crate::lead_times::LeadTimes;
use crate::process::{ConfirmationPeriod, ProcessType};

use Department as D;
use Step as S;

struct RuleAt {
    department: Department,
    step: Step,
}

struct RuleFrom {
    at: RuleAt,
    basis: Basis,
}

fn at(department: Department, step: Step) -> RuleAt {
    RuleAt { department, step }
}

fn after(department: Department, step: Step) -> Basis {
    Basis::After((department, step))
}

impl RuleAt {
    fn from(self, basis: Basis) -> RuleFrom {
        RuleFrom { at: self, basis }
    }

    fn after(self, department: Department, step: Step) -> RuleFrom {
        self.from(after(department, step))
    }
}

impl RuleFrom {
    fn days(self, offset: i64) -> DateRule {
        DateRule::new(self.at.department, self.at.step, self.basis, offset)
    }
}

/// Dating rules for every step of the departments active under
/// `process_type`.
pub fn date_rules(
    process_type: ProcessType,
    confirmation_period: ConfirmationPeriod,
    lead_times: &LeadTimes,
) -> Vec<DateRule> {
    let period = confirmation_period.days();
    let lt = lead_times;

    let cutting1_confirm_from = match process_type {
        ProcessType::LocalPrintEmbroidery => after(D::Fabric, S::Bleached),
        _ => after(D::PrintedCloth, S::PrintedClothFinishing),
    };
    let (embroidery_confirm_from, embroidery_confirm_offset) = match process_type {
        ProcessType::FullPrintEmbroidery => (
            after(D::Cutting1, S::Cutting),
            -lt.embroidery_confirm_before_cutting,
        ),
        _ => (after(D::Printing, S::Print), 0),
    };
    let piece_matching_from = match process_type {
        ProcessType::FullPrintLocalPrint => after(D::Printing, S::PhysicalTest),
        _ => after(D::Embroidery, S::PhysicalTest),
    };
    // Sewing waits for cut pieces and trims on the same day.
    let sewing_gate = Basis::Synchronized(
        (D::CutPieceWarehouse, S::CollarBinding),
        (D::Trims, S::PhysicalTest),
    );

    let rules = [
        // Fabric
        at(D::Fabric, S::Layout)
            .from(Basis::Anchor)
            .days(-lt.layout.for_process(process_type)),
        at(D::Fabric, S::MaterialUsage)
            .after(D::Fabric, S::Layout)
            .days(0),
        at(D::Fabric, S::CottonYarn)
            .after(D::Fabric, S::Layout)
            .days(lt.cotton_yarn_after_layout),
        at(D::Fabric, S::Greige)
            .after(D::Fabric, S::Layout)
            .days(lt.greige_after_layout),
        at(D::Fabric, S::ColorSampleConfirm)
            .after(D::Fabric, S::Greige)
            .days(0),
        at(D::Fabric, S::ColorSampleSend)
            .after(D::Fabric, S::ColorSampleConfirm)
            .days(-period),
        at(D::Fabric, S::Bleached)
            .after(D::Fabric, S::ColorSampleConfirm)
            .days(lt.bleaching),
        at(D::Fabric, S::PhysicalTestFabricInspect)
            .after(D::Fabric, S::Bleached)
            .days(lt.fabric_inspection),
        // Printed cloth
        at(D::PrintedCloth, S::PrintedClothConfirm)
            .after(D::Fabric, S::PhysicalTestFabricInspect)
            .days(0),
        at(D::PrintedCloth, S::PrintedClothSampleSend)
            .after(D::PrintedCloth, S::PrintedClothConfirm)
            .days(-period),
        at(D::PrintedCloth, S::PrintedClothProcess)
            .after(D::PrintedCloth, S::PrintedClothConfirm)
            .days(lt.printed_cloth_process),
        at(D::PrintedCloth, S::PrintedCloth)
            .after(D::PrintedCloth, S::PrintedClothProcess)
            .days(lt.printed_cloth_printing),
        at(D::PrintedCloth, S::PrintedClothFinishing)
            .after(D::PrintedCloth, S::PrintedCloth)
            .days(lt.printed_cloth_finishing),
        at(D::PrintedCloth, S::PhysicalTest)
            .after(D::PrintedCloth, S::PrintedClothFinishing)
            .days(lt.printed_cloth_inspection),
        // Cutting 1
        at(D::Cutting1, S::PreProductionSampleConfirm)
            .from(cutting1_confirm_from)
            .days(0),
        at(D::Cutting1, S::PreProductionSampleSend)
            .after(D::Cutting1, S::PreProductionSampleConfirm)
            .days(-period),
        at(D::Cutting1, S::PatternMaking)
            .after(D::Cutting1, S::PreProductionSampleConfirm)
            .days(lt.pattern_making),
        at(D::Cutting1, S::Cutting)
            .after(D::Cutting1, S::PatternMaking)
            .days(lt.cutting),
        // Printing
        at(D::Printing, S::PrintConfirm)
            .after(D::Cutting1, S::Cutting)
            .days(-lt.print_confirm_before_cutting),
        at(D::Printing, S::PrintSampleConfirm)
            .after(D::Printing, S::PrintConfirm)
            .days(-period),
        at(D::Printing, S::PrintProcess)
            .after(D::Cutting1, S::Cutting)
            .days(0),
        at(D::Printing, S::Print)
            .after(D::Printing, S::PrintProcess)
            .days(lt.printing),
        at(D::Printing, S::PhysicalTest)
            .after(D::Printing, S::Print)
            .days(lt.print_inspection),
        // Embroidery
        at(D::Embroidery, S::EmbroideryConfirm)
            .from(embroidery_confirm_from)
            .days(embroidery_confirm_offset),
        at(D::Embroidery, S::EmbroiderySampleConfirm)
            .after(D::Embroidery, S::EmbroideryConfirm)
            .days(-period),
        at(D::Embroidery, S::EmbroideryProcess)
            .after(D::Embroidery, S::EmbroideryConfirm)
            .days(lt.embroidery_process),
        at(D::Embroidery, S::Embroidery)
            .after(D::Embroidery, S::EmbroideryProcess)
            .days(lt.embroidery),
        at(D::Embroidery, S::PhysicalTest)
            .after(D::Embroidery, S::Embroidery)
            .days(lt.embroidery_inspection),
        // Cutting 2 and cut-piece warehouse
        at(D::Cutting2, S::PieceMatching)
            .from(piece_matching_from)
            .days(lt.piece_matching),
        at(D::CutPieceWarehouse, S::CollarBinding)
            .after(D::Cutting2, S::PieceMatching)
            .days(0),
        // Trims run in parallel from the anchor
        at(D::Trims, S::TrimsConfirm)
            .from(Basis::Anchor)
            .days(-lt.trims_confirm_before_sewing),
        at(D::Trims, S::TrimsSampleSend)
            .after(D::Trims, S::TrimsConfirm)
            .days(-period),
        at(D::Trims, S::TrimsLimit)
            .after(D::Trims, S::TrimsConfirm)
            .days(lt.trims_limit),
        at(D::Trims, S::Trims)
            .after(D::Trims, S::TrimsLimit)
            .days(lt.trims_delivery),
        at(D::Trims, S::PhysicalTest)
            .after(D::Trims, S::Trims)
            .days(lt.trims_inspection),
        // Sewing
        at(D::Sewing, S::SewingProcess)
            .from(sewing_gate)
            .days(lt.sewing_process),
        at(D::Sewing, S::SewingStart)
            .after(D::Sewing, S::SewingProcess)
            .days(lt.sewing_start),
    ];

    rules
        .into_iter()
        .filter(|rule| process_type.includes(rule.department))
        .collect()
}
