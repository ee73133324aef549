use std::{
    collections::BTreeSet, sync::{
        Mutex, atomic::{AtomicBool, Ordering}
    }
};

use chrono::Utc;
use hr_types::{BulkGenerateRequest, Employee, EmployeeStatus, FieldErrors, PayrollDraft, PayrollFilter, PayrollRecord, PayrollStatus, PayrollStatusUpdate, ValidationError};

use super::Download;
use crate::{LoadOutcome, PageContext, Resource, Toast, lock};

pub const LIST_FAILED: &str = "Failed to load payroll records";
pub const MARKED_PAID: &str = "Payroll marked as paid";
pub const MARK_PAID_FAILED: &str = "Failed to update payroll status";
pub const EXPORTED: &str = "Payroll exported successfully";
pub const EXPORT_FAILED: &str = "Failed to export payroll";
pub const DETAIL_FAILED: &str = "Failed to load payroll details";
pub const SLIP_DOWNLOADED: &str = "Payslip downloaded successfully";
pub const SLIP_FAILED: &str = "Failed to download payslip";
pub const EMPLOYEES_FAILED: &str = "Failed to load employees";
pub const CREATED: &str = "Payroll created successfully";
pub const CREATE_FAILED: &str = "Failed to create payroll";
pub const GENERATE_FAILED: &str = "Failed to generate payroll";
pub const NOTHING_SELECTED: &str = "Please select at least one employee";

pub const PAYROLL_ROUTE: &str = "/payroll";

/// Payroll list with a status filter, mark-as-paid and CSV export.
pub struct PayrollPage {
    ctx: PageContext,
    records: Resource<Vec<PayrollRecord>>,
    filter: Mutex<PayrollFilter>,
}

impl PayrollPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            records: Resource::new(),
            filter: Mutex::new(PayrollFilter::default()),
        }
    }

    pub async fn load(&self) -> LoadOutcome {
        self.ctx.load(&self.records, self.ctx.api.list_payroll(), LIST_FAILED).await
    }

    pub fn is_loading(&self) -> bool {
        self.records.is_loading()
    }

    pub fn filter(&self) -> PayrollFilter {
        *lock(&self.filter)
    }

    pub fn set_filter(&self, filter: PayrollFilter) {
        *lock(&self.filter) = filter;
    }

    pub fn visible(&self) -> Vec<PayrollRecord> {
        let filter = self.filter();
        self.records
            .with(|list| filter.filter(list.map(Vec::as_slice).unwrap_or_default()).into_iter().cloned().collect())
    }

    pub async fn mark_paid(&self, id: &str) -> bool {
        let update = PayrollStatusUpdate {
            status: PayrollStatus::Paid,
        };
        match self.ctx.api.update_payroll_status(id, &update).await {
            Ok(()) => {
                self.ctx.success(MARKED_PAID);
                self.load().await;
                true
            }
            Err(e) => {
                self.ctx.failure(MARK_PAID_FAILED, &e);
                false
            }
        }
    }

    /// Fetch the CSV export, named `payroll_export_<unix millis>.csv`.
    pub async fn export(&self) -> Option<Download> {
        match self.ctx.api.export_payroll().await {
            Ok(bytes) => {
                self.ctx.success(EXPORTED);
                Some(Download {
                    file_name: format!("payroll_export_{}.csv", Utc::now().timestamp_millis()),
                    bytes,
                })
            }
            Err(e) => {
                self.ctx.failure(EXPORT_FAILED, &e);
                None
            }
        }
    }
}

/// One payroll record and its payslip.
pub struct PayrollDetailPage {
    ctx: PageContext,
    id: String,
    record: Resource<PayrollRecord>,
}

impl PayrollDetailPage {
    pub fn new(ctx: PageContext, id: impl Into<String>) -> Self {
        Self {
            ctx,
            id: id.into(),
            record: Resource::new(),
        }
    }

    pub async fn load(&self) -> LoadOutcome {
        self.ctx
            .load(&self.record, self.ctx.api.get_payroll(&self.id), DETAIL_FAILED)
            .await
    }

    pub fn is_loading(&self) -> bool {
        self.record.is_loading()
    }

    pub fn record(&self) -> Option<PayrollRecord> {
        self.record.get()
    }

    /// Fetch the PDF payslip, named `payslip_<id>.pdf`.
    pub async fn download_slip(&self) -> Option<Download> {
        match self.ctx.api.payroll_slip(&self.id).await {
            Ok(bytes) => {
                self.ctx.success(SLIP_DOWNLOADED);
                Some(Download {
                    file_name: format!("payslip_{}.pdf", self.id),
                    bytes,
                })
            }
            Err(e) => {
                self.ctx.failure(SLIP_FAILED, &e);
                None
            }
        }
    }
}

/// Single payroll entry with a live net salary preview.
pub struct PayrollCreatePage {
    ctx: PageContext,
    employees: Resource<Vec<Employee>>,
    draft: Mutex<PayrollDraft>,
    errors: Mutex<FieldErrors>,
    saving: AtomicBool,
}

impl PayrollCreatePage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            employees: Resource::new(),
            draft: Mutex::new(PayrollDraft::default()),
            errors: Mutex::new(FieldErrors::new()),
            saving: AtomicBool::new(false),
        }
    }

    /// Employees offered in the picker.
    pub async fn load(&self) -> LoadOutcome {
        self.ctx
            .load(&self.employees, self.ctx.api.list_employees(None), EMPLOYEES_FAILED)
            .await
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.employees.get().unwrap_or_default()
    }

    pub fn draft(&self) -> PayrollDraft {
        lock(&self.draft).clone()
    }

    pub fn edit_draft(&self, change: impl FnOnce(&mut PayrollDraft)) {
        change(&mut lock(&self.draft));
    }

    /// Net salary of the form as typed; blank amounts count as zero.
    pub fn net_salary_preview(&self) -> String {
        lock(&self.draft).net_salary_display()
    }

    pub fn errors(&self) -> FieldErrors {
        lock(&self.errors).clone()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Returns the route to navigate to on success.
    pub async fn submit(&self) -> Option<String> {
        let payload = match self.draft().to_payload() {
            Ok(payload) => payload,
            Err(errors) => {
                self.ctx.invalid(&errors);
                *lock(&self.errors) = errors;
                return None;
            }
        };
        lock(&self.errors).clear();

        self.saving.store(true, Ordering::SeqCst);
        let result = self.ctx.api.create_payroll(&payload).await;
        self.saving.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => {
                self.ctx.success(CREATED);
                Some(PAYROLL_ROUTE.to_string())
            }
            Err(e) => {
                self.ctx.failure(e.user_message(CREATE_FAILED), &e);
                None
            }
        }
    }
}

/// Generate one period's payroll for a selection of active employees.
pub struct BulkGeneratePage {
    ctx: PageContext,
    employees: Resource<Vec<Employee>>,
    selected: Mutex<BTreeSet<String>>,
    period: Mutex<String>,
    saving: AtomicBool,
}

impl BulkGeneratePage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            employees: Resource::new(),
            selected: Mutex::new(BTreeSet::new()),
            period: Mutex::new(String::new()),
            saving: AtomicBool::new(false),
        }
    }

    pub async fn load(&self) -> LoadOutcome {
        self.ctx
            .load(
                &self.employees,
                self.ctx.api.list_employees(Some(&EmployeeStatus::Active)),
                EMPLOYEES_FAILED,
            )
            .await
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.employees.get().unwrap_or_default()
    }

    pub fn toggle(&self, id: &str) {
        let mut selected = lock(&self.selected);
        if !selected.remove(id) {
            selected.insert(id.to_string());
        }
    }

    /// Select everyone, or clear the selection when everyone is already selected.
    pub fn toggle_all(&self) {
        let ids: BTreeSet<String> = self
            .employees
            .with(|list| list.into_iter().flatten().map(|e| e.id.clone()).collect());
        let mut selected = lock(&self.selected);
        if selected.len() == ids.len() {
            selected.clear();
        } else {
            *selected = ids;
        }
    }

    pub fn selected(&self) -> Vec<String> {
        lock(&self.selected).iter().cloned().collect()
    }

    pub fn set_period(&self, period: &str) {
        *lock(&self.period) = period.to_string();
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Returns the route to navigate to on success.
    pub async fn submit(&self) -> Option<String> {
        let employee_ids = self.selected();
        if employee_ids.is_empty() {
            self.ctx.notifier.notify(Toast::validation(NOTHING_SELECTED));
            return None;
        }
        let period = lock(&self.period).trim().to_string();
        if period.is_empty() {
            let mut errors = FieldErrors::new();
            errors.insert("period".to_string(), ValidationError::Required);
            self.ctx.invalid(&errors);
            return None;
        }
        let count = employee_ids.len();
        let request = BulkGenerateRequest { employee_ids, period };

        self.saving.store(true, Ordering::SeqCst);
        let result = self.ctx.api.bulk_generate_payroll(&request).await;
        self.saving.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => {
                self.ctx.success(format!("Generated payroll for {} employees", count));
                Some(PAYROLL_ROUTE.to_string())
            }
            Err(e) => {
                self.ctx.failure(e.user_message(GENERATE_FAILED), &e);
                None
            }
        }
    }
}
