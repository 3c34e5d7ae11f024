use crate::process::ProcessType;
use serde::{Deserialize, Serialize};

/// Days between sewing start and fabric layout, per process type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutLeadDays {
    pub full_print_local_print_embroidery: i64,
    pub full_print_local_print: i64,
    pub full_print_embroidery: i64,
    pub local_print_embroidery: i64,
}

impl Default for LayoutLeadDays {
    fn default() -> Self {
        Self {
            full_print_local_print_embroidery: 41,
            full_print_local_print: 35,
            full_print_embroidery: 37,
            local_print_embroidery: 35,
        }
    }
}

impl LayoutLeadDays {
    pub fn for_process(&self, process_type: ProcessType) -> i64 {
        match process_type {
            ProcessType::FullPrintLocalPrintEmbroidery => self.full_print_local_print_embroidery,
            ProcessType::FullPrintLocalPrint => self.full_print_local_print,
            ProcessType::FullPrintEmbroidery => self.full_print_embroidery,
            ProcessType::LocalPrintEmbroidery => self.local_print_embroidery,
        }
    }
}

/// Fixed day offsets between production steps. Every field is a whole number
/// of calendar days; the defaults are the factory's standard lead times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadTimes {
    pub layout: LayoutLeadDays,
    pub cotton_yarn_after_layout: i64,
    pub greige_after_layout: i64,
    pub bleaching: i64,
    pub fabric_inspection: i64,
    pub printed_cloth_process: i64,
    pub printed_cloth_printing: i64,
    pub printed_cloth_finishing: i64,
    pub printed_cloth_inspection: i64,
    pub pattern_making: i64,
    pub cutting: i64,
    pub print_confirm_before_cutting: i64,
    pub printing: i64,
    pub print_inspection: i64,
    pub embroidery_confirm_before_cutting: i64,
    pub embroidery_process: i64,
    pub embroidery: i64,
    pub embroidery_inspection: i64,
    pub piece_matching: i64,
    pub trims_confirm_before_sewing: i64,
    pub trims_limit: i64,
    pub trims_delivery: i64,
    pub trims_inspection: i64,
    pub sewing_process: i64,
    pub sewing_start: i64,
}

impl Default for LeadTimes {
    fn default() -> Self {
        Self {
            layout: LayoutLeadDays::default(),
            cotton_yarn_after_layout: 3,
            greige_after_layout: 7,
            bleaching: 5,
            fabric_inspection: 1,
            printed_cloth_process: 1,
            printed_cloth_printing: 3,
            printed_cloth_finishing: 1,
            printed_cloth_inspection: 1,
            pattern_making: 1,
            cutting: 3,
            print_confirm_before_cutting: 1,
            printing: 3,
            print_inspection: 1,
            embroidery_confirm_before_cutting: 1,
            embroidery_process: 1,
            embroidery: 5,
            embroidery_inspection: 1,
            piece_matching: 1,
            trims_confirm_before_sewing: 25,
            trims_limit: 1,
            trims_delivery: 15,
            trims_inspection: 1,
            sewing_process: 7,
            sewing_start: 1,
        }
    }
}

impl LeadTimes {
    fn named_fields(&self) -> [(&'static str, i64); 28] {
        [
            (
                "layout.full_print_local_print_embroidery",
                self.layout.full_print_local_print_embroidery,
            ),
            ("layout.full_print_local_print", self.layout.full_print_local_print),
            ("layout.full_print_embroidery", self.layout.full_print_embroidery),
            ("layout.local_print_embroidery", self.layout.local_print_embroidery),
            ("cotton_yarn_after_layout", self.cotton_yarn_after_layout),
            ("greige_after_layout", self.greige_after_layout),
            ("bleaching", self.bleaching),
            ("fabric_inspection", self.fabric_inspection),
            ("printed_cloth_process", self.printed_cloth_process),
            ("printed_cloth_printing", self.printed_cloth_printing),
            ("printed_cloth_finishing", self.printed_cloth_finishing),
            ("printed_cloth_inspection", self.printed_cloth_inspection),
            ("pattern_making", self.pattern_making),
            ("cutting", self.cutting),
            ("print_confirm_before_cutting", self.print_confirm_before_cutting),
            ("printing", self.printing),
            ("print_inspection", self.print_inspection),
            ("embroidery_confirm_before_cutting", self.embroidery_confirm_before_cutting),
            ("embroidery_process", self.embroidery_process),
            ("embroidery", self.embroidery),
            ("embroidery_inspection", self.embroidery_inspection),
            ("piece_matching", self.piece_matching),
            ("trims_confirm_before_sewing", self.trims_confirm_before_sewing),
            ("trims_limit", self.trims_limit),
            ("trims_delivery", self.trims_delivery),
            ("trims_inspection", self.trims_inspection),
            ("sewing_process", self.sewing_process),
            ("sewing_start", self.sewing_start),
        ]
    }

    /// Names of the fields holding negative offsets.
    pub fn negative_fields(&self) -> Vec<&'static str> {
        self.named_fields()
            .into_iter()
            .filter(|(_, days)| *days < 0)
            .map(|(name, _)| name)
            .collect()
    }
}
