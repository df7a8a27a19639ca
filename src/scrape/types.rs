//! Exam record types produced by the scrape pipeline.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One exam row taken from a timetable table.
///
/// Every field is the trimmed cell text; `students` stays textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub course: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub students: String,
    pub date: String,
}

impl ExamRecord {
    /// Builds a record from a row's cells by fixed position:
    /// course, name, type, students, date. Missing cells become empty strings.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        Self {
            course: cell(0),
            name: cell(1),
            kind: cell(2),
            students: cell(3),
            date: cell(4),
        }
    }
}

/// Heading-labelled cluster of exam rows, one per source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamGroup {
    pub heading: String,
    pub tests: Vec<ExamRecord>,
}

/// Everything scraped for one department, in table order.
pub type ScrapeResult = Vec<ExamGroup>;

/// Aggregate statistics over every exam row of every department.
///
/// Non-finite numbers (a non-numeric students cell poisons the sum) are
/// written as JSON `null` and read back as NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    #[serde(with = "nullable_f64")]
    pub min: f64,
    #[serde(with = "nullable_f64")]
    pub max: f64,
    pub num_tests: usize,
    #[serde(with = "nullable_f64")]
    pub num_students: f64,
    /// Average with two decimals, `"NaN"` when the sum is not a number
    pub average_students: String,
}

mod nullable_f64 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
