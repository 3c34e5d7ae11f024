use crate::process::ProcessType;
use crate::style::StyleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Department {
    Fabric,
    PrintedCloth,
    Cutting1,
    Printing,
    Embroidery,
    Cutting2,
    CutPieceWarehouse,
    Trims,
    Sewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Step {
    Layout,
    MaterialUsage,
    CottonYarn,
    Greige,
    ColorSampleSend,
    ColorSampleConfirm,
    Bleached,
    PhysicalTestFabricInspect,
    PrintedClothSampleSend,
    PrintedClothConfirm,
    PrintedClothProcess,
    PrintedCloth,
    PrintedClothFinishing,
    PhysicalTest,
    PreProductionSampleSend,
    PreProductionSampleConfirm,
    PatternMaking,
    Cutting,
    PrintSampleConfirm,
    PrintConfirm,
    PrintProcess,
    Print,
    EmbroiderySampleConfirm,
    EmbroideryConfirm,
    EmbroideryProcess,
    Embroidery,
    PieceMatching,
    CollarBinding,
    TrimsSampleSend,
    TrimsConfirm,
    TrimsLimit,
    Trims,
    SewingProcess,
    SewingStart,
}

const FABRIC_STEPS: [Step; 8] = [
    Step::Layout,
    Step::MaterialUsage,
    Step::CottonYarn,
    Step::Greige,
    Step::ColorSampleSend,
    Step::ColorSampleConfirm,
    Step::Bleached,
    Step::PhysicalTestFabricInspect,
];

const PRINTED_CLOTH_STEPS: [Step; 6] = [
    Step::PrintedClothSampleSend,
    Step::PrintedClothConfirm,
    Step::PrintedClothProcess,
    Step::PrintedCloth,
    Step::PrintedClothFinishing,
    Step::PhysicalTest,
];

const CUTTING1_STEPS: [Step; 4] = [
    Step::PreProductionSampleSend,
    Step::PreProductionSampleConfirm,
    Step::PatternMaking,
    Step::Cutting,
];

const PRINTING_STEPS: [Step; 5] = [
    Step::PrintSampleConfirm,
    Step::PrintConfirm,
    Step::PrintProcess,
    Step::Print,
    Step::PhysicalTest,
];

const EMBROIDERY_STEPS: [Step; 5] = [
    Step::EmbroiderySampleConfirm,
    Step::EmbroideryConfirm,
    Step::EmbroideryProcess,
    Step::Embroidery,
    Step::PhysicalTest,
];

const CUTTING2_STEPS: [Step; 1] = [Step::PieceMatching];

const CUT_PIECE_WAREHOUSE_STEPS: [Step; 1] = [Step::CollarBinding];

const TRIMS_STEPS: [Step; 5] = [
    Step::TrimsSampleSend,
    Step::TrimsConfirm,
    Step::TrimsLimit,
    Step::Trims,
    Step::PhysicalTest,
];

const SEWING_STEPS: [Step; 2] = [Step::SewingProcess, Step::SewingStart];

// Order in which a schedule stores each department's dates. Each confirm
// step comes directly before its send or sample step.
const FABRIC_SCHEDULE: [Step; 8] = [
    Step::Layout,
    Step::MaterialUsage,
    Step::CottonYarn,
    Step::Greige,
    Step::ColorSampleConfirm,
    Step::ColorSampleSend,
    Step::Bleached,
    Step::PhysicalTestFabricInspect,
];

const PRINTED_CLOTH_SCHEDULE: [Step; 6] = [
    Step::PrintedClothConfirm,
    Step::PrintedClothSampleSend,
    Step::PrintedClothProcess,
    Step::PrintedCloth,
    Step::PrintedClothFinishing,
    Step::PhysicalTest,
];

const CUTTING1_SCHEDULE: [Step; 4] = [
    Step::PreProductionSampleConfirm,
    Step::PreProductionSampleSend,
    Step::PatternMaking,
    Step::Cutting,
];

const PRINTING_SCHEDULE: [Step; 5] = [
    Step::PrintConfirm,
    Step::PrintSampleConfirm,
    Step::PrintProcess,
    Step::Print,
    Step::PhysicalTest,
];

const EMBROIDERY_SCHEDULE: [Step; 5] = [
    Step::EmbroideryConfirm,
    Step::EmbroiderySampleConfirm,
    Step::EmbroideryProcess,
    Step::Embroidery,
    Step::PhysicalTest,
];

const TRIMS_SCHEDULE: [Step; 5] = [
    Step::TrimsConfirm,
    Step::TrimsSampleSend,
    Step::TrimsLimit,
    Step::Trims,
    Step::PhysicalTest,
];

/// Every (department, confirm step, send step) pair separated by exactly one
/// confirmation period.
pub const CONFIRMATION_PAIRS: [(Department, Step, Step); 6] = [
    (Department::Fabric, Step::ColorSampleConfirm, Step::ColorSampleSend),
    (Department::PrintedCloth, Step::PrintedClothConfirm, Step::PrintedClothSampleSend),
    (Department::Cutting1, Step::PreProductionSampleConfirm, Step::PreProductionSampleSend),
    (Department::Printing, Step::PrintConfirm, Step::PrintSampleConfirm),
    (Department::Embroidery, Step::EmbroideryConfirm, Step::EmbroiderySampleConfirm),
    (Department::Trims, Step::TrimsConfirm, Step::TrimsSampleSend),
];

impl Department {
    pub const ALL: [Department; 9] = [
        Department::Fabric,
        Department::PrintedCloth,
        Department::Cutting1,
        Department::Printing,
        Department::Embroidery,
        Department::Cutting2,
        Department::CutPieceWarehouse,
        Department::Trims,
        Department::Sewing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Fabric => "Fabric",
            Department::PrintedCloth => "PrintedCloth",
            Department::Cutting1 => "Cutting1",
            Department::Printing => "Printing",
            Department::Embroidery => "Embroidery",
            Department::Cutting2 => "Cutting2",
            Department::CutPieceWarehouse => "CutPieceWarehouse",
            Department::Trims => "Trims",
            Department::Sewing => "Sewing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Department::Fabric => "面料",
            Department::PrintedCloth => "印布",
            Department::Cutting1 => "裁剪1",
            Department::Printing => "印花",
            Department::Embroidery => "绣花",
            Department::Cutting2 => "裁剪2",
            Department::CutPieceWarehouse => "裁片库",
            Department::Trims => "辅料",
            Department::Sewing => "缝纫",
        }
    }

    /// Ordered steps of the department, earliest first.
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Department::Fabric => &FABRIC_STEPS,
            Department::PrintedCloth => &PRINTED_CLOTH_STEPS,
            Department::Cutting1 => &CUTTING1_STEPS,
            Department::Printing => &PRINTING_STEPS,
            Department::Embroidery => &EMBROIDERY_STEPS,
            Department::Cutting2 => &CUTTING2_STEPS,
            Department::CutPieceWarehouse => &CUT_PIECE_WAREHOUSE_STEPS,
            Department::Trims => &TRIMS_STEPS,
            Department::Sewing => &SEWING_STEPS,
        }
    }

    /// Steps in the order a schedule stores them. Same set as
    /// [`Department::steps`]; the adjuster shifts everything after its target
    /// in this order.
    pub fn schedule_order(&self) -> &'static [Step] {
        match self {
            Department::Fabric => &FABRIC_SCHEDULE,
            Department::PrintedCloth => &PRINTED_CLOTH_SCHEDULE,
            Department::Cutting1 => &CUTTING1_SCHEDULE,
            Department::Printing => &PRINTING_SCHEDULE,
            Department::Embroidery => &EMBROIDERY_SCHEDULE,
            Department::Trims => &TRIMS_SCHEDULE,
            Department::Cutting2 | Department::CutPieceWarehouse | Department::Sewing => {
                self.steps()
            }
        }
    }
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Layout => "Layout",
            Step::MaterialUsage => "MaterialUsage",
            Step::CottonYarn => "CottonYarn",
            Step::Greige => "Greige",
            Step::ColorSampleSend => "ColorSampleSend",
            Step::ColorSampleConfirm => "ColorSampleConfirm",
            Step::Bleached => "Bleached",
            Step::PhysicalTestFabricInspect => "PhysicalTest+FabricInspect",
            Step::PrintedClothSampleSend => "PrintedClothSampleSend",
            Step::PrintedClothConfirm => "PrintedClothConfirm",
            Step::PrintedClothProcess => "PrintedClothProcess",
            Step::PrintedCloth => "PrintedCloth",
            Step::PrintedClothFinishing => "PrintedClothFinishing",
            Step::PhysicalTest => "PhysicalTest",
            Step::PreProductionSampleSend => "PreProductionSampleSend",
            Step::PreProductionSampleConfirm => "PreProductionSampleConfirm",
            Step::PatternMaking => "PatternMaking",
            Step::Cutting => "Cutting",
            Step::PrintSampleConfirm => "PrintSampleConfirm",
            Step::PrintConfirm => "PrintConfirm",
            Step::PrintProcess => "PrintProcess",
            Step::Print => "Print",
            Step::EmbroiderySampleConfirm => "EmbroiderySampleConfirm",
            Step::EmbroideryConfirm => "EmbroideryConfirm",
            Step::EmbroideryProcess => "EmbroideryProcess",
            Step::Embroidery => "Embroidery",
            Step::PieceMatching => "PieceMatching",
            Step::CollarBinding => "CollarBinding",
            Step::TrimsSampleSend => "TrimsSampleSend",
            Step::TrimsConfirm => "TrimsConfirm",
            Step::TrimsLimit => "TrimsLimit",
            Step::Trims => "Trims",
            Step::SewingProcess => "SewingProcess",
            Step::SewingStart => "SewingStart",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Step::Layout => "排版",
            Step::MaterialUsage => "用料",
            Step::CottonYarn => "棉纱",
            Step::Greige => "毛坯",
            Step::ColorSampleSend => "色样发送",
            Step::ColorSampleConfirm => "色样确认",
            Step::Bleached => "光坯",
            Step::PhysicalTestFabricInspect => "物理检测+验布",
            Step::PrintedClothSampleSend => "印布样品发送",
            Step::PrintedClothConfirm => "印布确认",
            Step::PrintedClothProcess => "印布工艺",
            Step::PrintedCloth => "印布",
            Step::PrintedClothFinishing => "印布后整",
            Step::PhysicalTest => "物理检测",
            Step::PreProductionSampleSend => "产前样发送",
            Step::PreProductionSampleConfirm => "产前样确认",
            Step::PatternMaking => "工艺样版",
            Step::Cutting => "裁剪",
            Step::PrintSampleConfirm => "印花样品确认",
            Step::PrintConfirm => "印花确认",
            Step::PrintProcess => "印花工艺",
            Step::Print => "印花",
            Step::EmbroiderySampleConfirm => "绣花样品确认",
            Step::EmbroideryConfirm => "绣花确认",
            Step::EmbroideryProcess => "绣花工艺",
            Step::Embroidery => "绣花",
            Step::PieceMatching => "配片",
            Step::CollarBinding => "滚领布",
            Step::TrimsSampleSend => "辅料样发送",
            Step::TrimsConfirm => "辅料确认",
            Step::TrimsLimit => "辅料限额",
            Step::Trims => "辅料",
            Step::SewingProcess => "缝纫工艺",
            Step::SewingStart => "缝纫开始",
        }
    }
}

/// Departments taking part in a style with their ordered steps, in catalog
/// order. `None` yields the unfiltered base catalog.
pub fn department_steps(process_type: Option<ProcessType>) -> Vec<(Department, &'static [Step])> {
    active_departments(process_type)
        .map(|department| (department, department.steps()))
        .collect()
}

/// Like [`department_steps`] with each department's steps in schedule order.
pub fn schedule_layout(process_type: ProcessType) -> Vec<(Department, &'static [Step])> {
    active_departments(Some(process_type))
        .map(|department| (department, department.schedule_order()))
        .collect()
}

fn active_departments(process_type: Option<ProcessType>) -> impl Iterator<Item = Department> {
    Department::ALL
        .into_iter()
        .filter(move |department| process_type.is_none_or(|process| process.includes(*department)))
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = StyleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Department::ALL
            .into_iter()
            .find(|department| {
                department.label() == trimmed || department.as_str().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| StyleError::UnknownDepartment(trimmed.to_string()))
    }
}

impl FromStr for Step {
    type Err = StyleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Department::ALL
            .iter()
            .flat_map(|department| department.steps().iter().copied())
            .find(|step| step.label() == trimmed || step.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StyleError::UnknownStep(trimmed.to_string()))
    }
}

impl TryFrom<String> for Department {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for Step {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Step> for String {
    fn from(value: Step) -> Self {
        value.as_str().to_string()
    }
}
