//! Controllers for the dashboard pages.

pub mod approvals;
pub mod attendance;
pub mod dashboard;
pub mod employees;
pub mod kpi;
pub mod payroll;

use std::{future::Future, sync::Arc};

use hr_types::validation::{FieldErrors, format_errors};
use tracing::warn;

use crate::{ClientError, ClientResult, HrApi, LoadOutcome, Notifier, Resource, Toast};

pub use approvals::{ApprovalsPage, ReviewDialog};
pub use attendance::{AttendanceDay, AttendancePage};
pub use dashboard::{DashboardData, DashboardPage};
pub use employees::{EmployeeDetailPage, EmployeeFormPage, EmployeesPage, FormMode};
pub use kpi::{KpiPage, ScoreDialog};
pub use payroll::{BulkGeneratePage, PayrollCreatePage, PayrollDetailPage, PayrollPage};

/// A file produced by an export or download action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What every page controller needs: the backend and somewhere to send toasts.
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<dyn HrApi>,
    pub notifier: Arc<dyn Notifier>,
}

impl PageContext {
    pub fn new(api: Arc<dyn HrApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    pub(crate) fn success(&self, message: impl Into<String>) {
        self.notifier.notify(Toast::success(message));
    }

    pub(crate) fn failure(&self, message: impl Into<String>, error: &ClientError) {
        let message = message.into();
        warn!(error = %error, "{}", message);
        self.notifier.notify(Toast::error(message));
    }

    pub(crate) fn invalid(&self, errors: &FieldErrors) {
        self.notifier.notify(Toast::validation(format_errors(errors)));
    }

    /// Load `resource`, toasting `failure` if the fetch fails.
    pub(crate) async fn load<T, F>(&self, resource: &Resource<T>, fetch: F, failure: &str) -> LoadOutcome
    where
        F: Future<Output = ClientResult<T>>,
    {
        let outcome = resource.load(fetch).await;
        if let LoadOutcome::Failed(e) = &outcome {
            self.failure(failure, e);
        }
        outcome
    }
}
