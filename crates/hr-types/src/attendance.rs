use serde::{Deserialize, Serialize};

use crate::macros::string_status;

string_status! {
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
        Late => "late",
    }
}

impl AttendanceStatus {
    /// Status written by the attendance switch: present flips to absent,
    /// anything else (absent, late, unknown) flips to present.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Present => Self::Absent,
            _ => Self::Present,
        }
    }

    /// Badge text.
    pub fn label(&self) -> &str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub date: String,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total_employees: u64,
    pub present: u64,
    pub absent: u64,
    pub late: u64,
    /// Percentage of employees present.
    pub rate: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Body of `PUT /attendance/:id`.
pub struct AttendanceUpdate {
    pub status: AttendanceStatus,
}
