//! Shared type definitions for HR Desk
//!
//! This crate contains the wire records exchanged with the HR backend, the
//! session claims carried by the auth token, and the small calculations the
//! dashboard pages perform locally (net salary, KPI labels, status toggles).
//! It has no I/O and is used by the store, the client and the web gateway.

mod macros;

pub mod approvals;
pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod kpi;
pub mod money;
pub mod payroll;
pub mod validation;

pub use approvals::{Approval, ApprovalDecision, ApprovalReview, ApprovalStatus, ApprovalTab};
pub use attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary, AttendanceUpdate};
pub use auth::{SessionClaims, UserProfile};
pub use dashboard::{AttendanceToday, DashboardSummary, PayrollTrendPoint};
pub use employees::{Employee, EmployeeDraft, EmployeePayload, EmployeeStatus};
pub use kpi::{KpiRecord, KpiScoreUpdate, PerformanceLabel};
pub use payroll::{BulkGenerateRequest, PayrollDraft, PayrollFilter, PayrollPayload, PayrollRecord, PayrollStatus, PayrollStatusUpdate};
pub use validation::{FieldErrors, ValidationError};
