use crate::catalog::Department;
use crate::style::StyleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decoration combination of a style. Determines which departments take part
/// and how far ahead of sewing the fabric layout starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProcessType {
    FullPrintLocalPrintEmbroidery,
    FullPrintLocalPrint,
    FullPrintEmbroidery,
    LocalPrintEmbroidery,
}

impl ProcessType {
    pub const ALL: [ProcessType; 4] = [
        ProcessType::FullPrintLocalPrintEmbroidery,
        ProcessType::FullPrintLocalPrint,
        ProcessType::FullPrintEmbroidery,
        ProcessType::LocalPrintEmbroidery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessType::FullPrintLocalPrintEmbroidery => "FullPrint+LocalPrint+Embroidery",
            ProcessType::FullPrintLocalPrint => "FullPrint+LocalPrint",
            ProcessType::FullPrintEmbroidery => "FullPrint+Embroidery",
            ProcessType::LocalPrintEmbroidery => "LocalPrint+Embroidery",
        }
    }

    /// Label used on the factory floor and in imported spreadsheets.
    pub fn label(&self) -> &'static str {
        match self {
            ProcessType::FullPrintLocalPrintEmbroidery => "满花+局花+绣花",
            ProcessType::FullPrintLocalPrint => "满花+局花",
            ProcessType::FullPrintEmbroidery => "满花+绣花",
            ProcessType::LocalPrintEmbroidery => "局花+绣花",
        }
    }

    /// The department this combination skips, if any.
    pub fn excluded_department(&self) -> Option<Department> {
        match self {
            ProcessType::FullPrintLocalPrintEmbroidery => None,
            ProcessType::FullPrintLocalPrint => Some(Department::Embroidery),
            ProcessType::FullPrintEmbroidery => Some(Department::Printing),
            ProcessType::LocalPrintEmbroidery => Some(Department::PrintedCloth),
        }
    }

    pub fn includes(&self, department: Department) -> bool {
        self.excluded_department() != Some(department)
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessType {
    type Err = StyleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ProcessType::ALL
            .into_iter()
            .find(|process| {
                process.label() == trimmed || process.as_str().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| StyleError::UnknownProcessType(trimmed.to_string()))
    }
}

impl TryFrom<String> for ProcessType {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProcessType> for String {
    fn from(value: ProcessType) -> Self {
        value.as_str().to_string()
    }
}

/// Lead time between a sample being sent and being confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ConfirmationPeriod {
    OneWeek,
    TwoWeeks,
    TwentyDays,
}

impl ConfirmationPeriod {
    pub const ALL: [ConfirmationPeriod; 3] = [
        ConfirmationPeriod::OneWeek,
        ConfirmationPeriod::TwoWeeks,
        ConfirmationPeriod::TwentyDays,
    ];

    pub fn days(&self) -> i64 {
        match self {
            ConfirmationPeriod::OneWeek => 7,
            ConfirmationPeriod::TwoWeeks => 14,
            ConfirmationPeriod::TwentyDays => 20,
        }
    }
}

impl fmt::Display for ConfirmationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

impl TryFrom<i64> for ConfirmationPeriod {
    type Error = StyleError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        ConfirmationPeriod::ALL
            .into_iter()
            .find(|period| period.days() == days)
            .ok_or(StyleError::InvalidConfirmationPeriod(days))
    }
}

impl From<ConfirmationPeriod> for i64 {
    fn from(value: ConfirmationPeriod) -> Self {
        value.days()
    }
}

impl FromStr for ConfirmationPeriod {
    type Err = StyleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let days = match trimmed.parse::<i64>() {
            Ok(days) => days,
            // Spreadsheet exports often render whole numbers as "14.0".
            Err(_) => match trimmed.parse::<f64>() {
                Ok(days) if days.fract() == 0.0 && days.is_finite() => days as i64,
                _ => return Err(StyleError::InvalidCycle(trimmed.to_string())),
            },
        };
        ConfirmationPeriod::try_from(days)
    }
}
