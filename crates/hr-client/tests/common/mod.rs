#![allow(dead_code)]

use std::{
    collections::HashMap, sync::{Arc, Mutex, MutexGuard}
};

use async_trait::async_trait;
use chrono::NaiveDate;
use hr_client::{ClientError, ClientResult, HrApi, PageContext, ToastQueue};
use hr_types::{
    Approval, ApprovalReview, ApprovalStatus, AttendanceRecord, AttendanceStatus, AttendanceSummary, AttendanceToday, AttendanceUpdate, BulkGenerateRequest, DashboardSummary, Employee, EmployeePayload, EmployeeStatus, KpiRecord, KpiScoreUpdate, PayrollPayload, PayrollRecord, PayrollStatus, PayrollStatusUpdate, PayrollTrendPoint
};

/// In-memory backend that records every call and request body.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
pub struct FakeState {
    pub summary: DashboardSummary,
    pub trend: Vec<PayrollTrendPoint>,
    pub today: AttendanceToday,
    pub employees: Vec<Employee>,
    pub attendance: Vec<AttendanceRecord>,
    pub approvals: Vec<Approval>,
    pub payroll: Vec<PayrollRecord>,
    pub kpis: Vec<KpiRecord>,
    pub export: Vec<u8>,

    /// Endpoint name -> (status, server message) to fail with.
    pub failing: HashMap<&'static str, (u16, Option<String>)>,
    pub calls: Vec<&'static str>,
    pub employee_filters: Vec<Option<String>>,
    pub attendance_dates: Vec<NaiveDate>,
    pub created_employees: Vec<EmployeePayload>,
    pub updated_employees: Vec<(String, EmployeePayload)>,
    pub attendance_updates: Vec<(String, AttendanceUpdate)>,
    pub reviews: Vec<(String, ApprovalReview)>,
    pub created_payroll: Vec<PayrollPayload>,
    pub bulk_requests: Vec<BulkGenerateRequest>,
    pub kpi_updates: Vec<(String, KpiScoreUpdate)>,
}

impl FakeApi {
    pub fn with(setup: impl FnOnce(&mut FakeState)) -> Arc<Self> {
        let api = Self::default();
        setup(&mut api.state());
        Arc::new(api)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail(&self, call: &'static str, status: u16, message: Option<&str>) {
        self.state().failing.insert(call, (status, message.map(str::to_string)));
    }

    pub fn recover(&self, call: &'static str) {
        self.state().failing.remove(call);
    }

    pub fn calls(&self, call: &str) -> usize {
        self.state().calls.iter().filter(|c| **c == call).count()
    }

    fn enter(&self, call: &'static str) -> ClientResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(call);
        if let Some((status, message)) = state.failing.get(call).cloned() {
            return Err(ClientError::Request { status, message });
        }
        Ok(state)
    }
}

fn not_found() -> ClientError {
    ClientError::Request {
        status: 404,
        message: Some("Not found".to_string()),
    }
}

#[async_trait]
impl HrApi for FakeApi {
    async fn dashboard_summary(&self) -> ClientResult<DashboardSummary> {
        Ok(self.enter("dashboard_summary")?.summary.clone())
    }

    async fn payroll_trend(&self) -> ClientResult<Vec<PayrollTrendPoint>> {
        Ok(self.enter("payroll_trend")?.trend.clone())
    }

    async fn attendance_today(&self) -> ClientResult<AttendanceToday> {
        Ok(self.enter("attendance_today")?.today.clone())
    }

    async fn list_employees(&self, status: Option<&EmployeeStatus>) -> ClientResult<Vec<Employee>> {
        let mut state = self.enter("list_employees")?;
        state.employee_filters.push(status.map(|s| s.as_str().to_string()));
        Ok(state
            .employees
            .iter()
            .filter(|e| status.is_none_or(|s| e.status == *s))
            .cloned()
            .collect())
    }

    async fn get_employee(&self, id: &str) -> ClientResult<Employee> {
        let state = self.enter("get_employee")?;
        state.employees.iter().find(|e| e.id == id).cloned().ok_or_else(not_found)
    }

    async fn create_employee(&self, payload: &EmployeePayload) -> ClientResult<()> {
        self.enter("create_employee")?.created_employees.push(payload.clone());
        Ok(())
    }

    async fn update_employee(&self, id: &str, payload: &EmployeePayload) -> ClientResult<()> {
        self.enter("update_employee")?
            .updated_employees
            .push((id.to_string(), payload.clone()));
        Ok(())
    }

    async fn delete_employee(&self, id: &str) -> ClientResult<()> {
        self.enter("delete_employee")?.employees.retain(|e| e.id != id);
        Ok(())
    }

    async fn list_attendance(&self, date: NaiveDate) -> ClientResult<Vec<AttendanceRecord>> {
        let mut state = self.enter("list_attendance")?;
        state.attendance_dates.push(date);
        let day = date.to_string();
        Ok(state.attendance.iter().filter(|a| a.date == day).cloned().collect())
    }

    async fn attendance_summary(&self, date: NaiveDate) -> ClientResult<AttendanceSummary> {
        let state = self.enter("attendance_summary")?;
        let day = date.to_string();
        let records: Vec<_> = state.attendance.iter().filter(|a| a.date == day).collect();
        let count = |status: AttendanceStatus| records.iter().filter(|a| a.status == status).count() as u64;
        let total = records.len() as u64;
        let present = count(AttendanceStatus::Present);
        Ok(AttendanceSummary {
            total_employees: total,
            present,
            absent: count(AttendanceStatus::Absent),
            late: count(AttendanceStatus::Late),
            rate: if total == 0 { 0.0 } else { present as f64 * 100.0 / total as f64 },
        })
    }

    async fn update_attendance(&self, id: &str, update: &AttendanceUpdate) -> ClientResult<()> {
        let mut state = self.enter("update_attendance")?;
        state.attendance_updates.push((id.to_string(), update.clone()));
        if let Some(record) = state.attendance.iter_mut().find(|a| a.id == id) {
            record.status = update.status.clone();
        }
        Ok(())
    }

    async fn list_approvals(&self) -> ClientResult<Vec<Approval>> {
        Ok(self.enter("list_approvals")?.approvals.clone())
    }

    async fn review_approval(&self, id: &str, review: &ApprovalReview) -> ClientResult<()> {
        let mut state = self.enter("review_approval")?;
        state.reviews.push((id.to_string(), review.clone()));
        if let Some(approval) = state.approvals.iter_mut().find(|a| a.id == id) {
            approval.status = review.status.clone();
            approval.reviewer_notes = Some(review.reviewer_notes.clone());
        }
        Ok(())
    }

    async fn list_payroll(&self) -> ClientResult<Vec<PayrollRecord>> {
        Ok(self.enter("list_payroll")?.payroll.clone())
    }

    async fn get_payroll(&self, id: &str) -> ClientResult<PayrollRecord> {
        let state = self.enter("get_payroll")?;
        state.payroll.iter().find(|p| p.id == id).cloned().ok_or_else(not_found)
    }

    async fn create_payroll(&self, payload: &PayrollPayload) -> ClientResult<()> {
        self.enter("create_payroll")?.created_payroll.push(payload.clone());
        Ok(())
    }

    async fn update_payroll_status(&self, id: &str, update: &PayrollStatusUpdate) -> ClientResult<()> {
        let mut state = self.enter("update_payroll_status")?;
        let record = state.payroll.iter_mut().find(|p| p.id == id).ok_or_else(not_found)?;
        record.status = update.status.clone();
        Ok(())
    }

    async fn bulk_generate_payroll(&self, request: &BulkGenerateRequest) -> ClientResult<()> {
        self.enter("bulk_generate_payroll")?.bulk_requests.push(request.clone());
        Ok(())
    }

    async fn export_payroll(&self) -> ClientResult<Vec<u8>> {
        Ok(self.enter("export_payroll")?.export.clone())
    }

    async fn payroll_slip(&self, id: &str) -> ClientResult<Vec<u8>> {
        self.enter("payroll_slip")?;
        Ok(format!("%PDF slip {}", id).into_bytes())
    }

    async fn list_kpis(&self) -> ClientResult<Vec<KpiRecord>> {
        Ok(self.enter("list_kpis")?.kpis.clone())
    }

    async fn update_kpi(&self, id: &str, update: &KpiScoreUpdate) -> ClientResult<()> {
        let mut state = self.enter("update_kpi")?;
        state.kpi_updates.push((id.to_string(), update.clone()));
        if let Some(kpi) = state.kpis.iter_mut().find(|k| k.id == id) {
            kpi.score = update.score;
        }
        Ok(())
    }
}

pub fn context(api: &Arc<FakeApi>) -> (PageContext, Arc<ToastQueue>) {
    let toasts = Arc::new(ToastQueue::default());
    (PageContext::new(api.clone(), toasts.clone()), toasts)
}

pub fn employee(id: &str, name: &str, email: &str, position: &str, status: EmployeeStatus) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        position: position.to_string(),
        department: "Engineering".to_string(),
        status,
        salary: Some(5000.0),
        join_date: Some("2023-04-05T10:00:00.000Z".to_string()),
    }
}

pub fn attendance(id: &str, date: &str, status: AttendanceStatus) -> AttendanceRecord {
    AttendanceRecord {
        id: id.to_string(),
        employee_id: format!("e-{}", id),
        employee_name: format!("Employee {}", id),
        date: date.to_string(),
        status,
        check_in: None,
        check_out: None,
    }
}

pub fn approval(id: &str, status: ApprovalStatus) -> Approval {
    Approval {
        id: id.to_string(),
        employee_id: "e-1".to_string(),
        employee_name: "Ada Lovelace".to_string(),
        kind: "leave".to_string(),
        reason: "Family visit".to_string(),
        start_date: "2024-05-01".to_string(),
        end_date: "2024-05-03".to_string(),
        status,
        submitted_at: "2024-04-20T08:00:00Z".to_string(),
        reviewed_at: None,
        reviewer_notes: None,
    }
}

pub fn payroll(id: &str, status: PayrollStatus) -> PayrollRecord {
    PayrollRecord {
        id: id.to_string(),
        employee_id: "e-1".to_string(),
        employee_name: "Ada Lovelace".to_string(),
        employee_email: None,
        period: "2024-05".to_string(),
        basic_salary: 5000.0,
        bonuses: 200.0,
        deductions: 150.0,
        net_salary: 5050.0,
        status,
        payment_date: None,
        created_at: None,
    }
}

pub fn kpi(id: &str, score: f64, target: f64) -> KpiRecord {
    KpiRecord {
        id: id.to_string(),
        employee_id: "e-1".to_string(),
        employee_name: "Ada Lovelace".to_string(),
        score,
        target,
        period: "2024-Q2".to_string(),
        last_updated: "2024-06-30".to_string(),
    }
}
