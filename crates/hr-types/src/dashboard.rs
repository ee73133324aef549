use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
/// `GET /dashboard/summary`
pub struct DashboardSummary {
    pub total_employees: u64,
    pub active_employees: u64,
    pub total_payroll: f64,
    #[serde(rename = "averageKPI")]
    pub average_kpi: f64,
    pub attendance_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One point of `GET /dashboard/payroll-trend`.
pub struct PayrollTrendPoint {
    pub month: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
/// `GET /dashboard/attendance-today`
pub struct AttendanceToday {
    pub present: u64,
    pub absent: u64,
    pub total: u64,
}
