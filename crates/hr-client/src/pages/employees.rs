use std::sync::{
    Mutex, atomic::{AtomicBool, Ordering}
};

use hr_types::{Employee, EmployeeDraft, FieldErrors, employees::filter_employees};

use crate::{LoadOutcome, PageContext, Resource, lock};

pub const LIST_FAILED: &str = "Failed to load employees";
pub const DETAIL_FAILED: &str = "Failed to load employee details";
pub const DELETED: &str = "Employee deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete employee";
pub const CREATED: &str = "Employee created successfully";
pub const CREATE_FAILED: &str = "Failed to create employee";
pub const UPDATED: &str = "Employee updated successfully";
pub const UPDATE_FAILED: &str = "Failed to update employee";

pub const EMPLOYEES_ROUTE: &str = "/employees";

pub fn employee_route(id: &str) -> String {
    format!("{}/{}", EMPLOYEES_ROUTE, id)
}

/// Employee list with search and a delete confirmation dialog.
pub struct EmployeesPage {
    ctx: PageContext,
    employees: Resource<Vec<Employee>>,
    search: Mutex<String>,
    delete_target: Mutex<Option<String>>,
}

impl EmployeesPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            employees: Resource::new(),
            search: Mutex::new(String::new()),
            delete_target: Mutex::new(None),
        }
    }

    pub async fn load(&self) -> LoadOutcome {
        self.ctx
            .load(&self.employees, self.ctx.api.list_employees(None), LIST_FAILED)
            .await
    }

    pub fn is_loading(&self) -> bool {
        self.employees.is_loading()
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.employees.get().unwrap_or_default()
    }

    pub fn set_search(&self, query: &str) {
        *lock(&self.search) = query.to_string();
    }

    /// Employees whose name, email or position contains the search text.
    pub fn visible(&self) -> Vec<Employee> {
        let query = lock(&self.search).clone();
        self.employees
            .with(|list| filter_employees(list.map(Vec::as_slice).unwrap_or_default(), &query).into_iter().cloned().collect())
    }

    pub fn request_delete(&self, id: &str) {
        *lock(&self.delete_target) = Some(id.to_string());
    }

    pub fn cancel_delete(&self) {
        lock(&self.delete_target).take();
    }

    pub fn delete_target(&self) -> Option<String> {
        lock(&self.delete_target).clone()
    }

    /// Delete the pending target. The dialog closes whatever the outcome.
    pub async fn confirm_delete(&self) -> bool {
        let Some(id) = self.delete_target() else {
            return false;
        };
        let deleted = match self.ctx.api.delete_employee(&id).await {
            Ok(()) => {
                self.ctx.success(DELETED);
                self.load().await;
                true
            }
            Err(e) => {
                self.ctx.failure(DELETE_FAILED, &e);
                false
            }
        };
        self.cancel_delete();
        deleted
    }
}

/// One employee, read-only.
pub struct EmployeeDetailPage {
    ctx: PageContext,
    id: String,
    employee: Resource<Employee>,
}

impl EmployeeDetailPage {
    pub fn new(ctx: PageContext, id: impl Into<String>) -> Self {
        Self {
            ctx,
            id: id.into(),
            employee: Resource::new(),
        }
    }

    pub async fn load(&self) -> LoadOutcome {
        self.ctx
            .load(&self.employee, self.ctx.api.get_employee(&self.id), DETAIL_FAILED)
            .await
    }

    pub fn employee(&self) -> Option<Employee> {
        self.employee.get()
    }

    pub fn is_loading(&self) -> bool {
        self.employee.is_loading()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

/// Create and edit forms share one controller.
pub struct EmployeeFormPage {
    ctx: PageContext,
    mode: FormMode,
    original: Resource<Employee>,
    draft: Mutex<EmployeeDraft>,
    errors: Mutex<FieldErrors>,
    saving: AtomicBool,
}

impl EmployeeFormPage {
    pub fn create(ctx: PageContext) -> Self {
        Self::with_mode(ctx, FormMode::Create)
    }

    pub fn edit(ctx: PageContext, id: impl Into<String>) -> Self {
        Self::with_mode(ctx, FormMode::Edit(id.into()))
    }

    fn with_mode(ctx: PageContext, mode: FormMode) -> Self {
        Self {
            ctx,
            mode,
            original: Resource::new(),
            draft: Mutex::new(EmployeeDraft::default()),
            errors: Mutex::new(FieldErrors::new()),
            saving: AtomicBool::new(false),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// In edit mode, fetch the record and prefill the form from it.
    pub async fn load(&self) -> LoadOutcome {
        let FormMode::Edit(id) = &self.mode else {
            return LoadOutcome::Applied;
        };
        let outcome = self
            .ctx
            .load(&self.original, self.ctx.api.get_employee(id), DETAIL_FAILED)
            .await;
        if let (true, Some(employee)) = (outcome.is_applied(), self.original.get()) {
            *lock(&self.draft) = EmployeeDraft::from_employee(&employee);
        }
        outcome
    }

    pub fn is_loading(&self) -> bool {
        self.original.is_loading()
    }

    pub fn draft(&self) -> EmployeeDraft {
        lock(&self.draft).clone()
    }

    pub fn edit_draft(&self, change: impl FnOnce(&mut EmployeeDraft)) {
        change(&mut lock(&self.draft));
    }

    pub fn errors(&self) -> FieldErrors {
        lock(&self.errors).clone()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Validate and send the form. Returns the route to navigate to on success.
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
        let result = match &self.mode {
            FormMode::Create => self.ctx.api.create_employee(&payload).await,
            FormMode::Edit(id) => self.ctx.api.update_employee(id, &payload).await,
        };
        self.saving.store(false, Ordering::SeqCst);

        match (&self.mode, result) {
            (FormMode::Create, Ok(())) => {
                self.ctx.success(CREATED);
                Some(EMPLOYEES_ROUTE.to_string())
            }
            (FormMode::Edit(id), Ok(())) => {
                self.ctx.success(UPDATED);
                Some(employee_route(id))
            }
            (FormMode::Create, Err(e)) => {
                self.ctx.failure(e.user_message(CREATE_FAILED), &e);
                None
            }
            (FormMode::Edit(_), Err(e)) => {
                self.ctx.failure(e.user_message(UPDATE_FAILED), &e);
                None
            }
        }
    }
}
