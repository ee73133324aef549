use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    macros::string_status, money::{amount_or_zero, format_amount, parse_amount}, validation::{FieldErrors, ValidationError, require}
};

string_status! {
    pub enum PayrollStatus {
        Pending => "pending",
        Paid => "paid",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    /// Only returned by the detail endpoint.
    #[serde(default)]
    pub employee_email: Option<String>,
    pub period: String,
    pub basic_salary: f64,
    pub bonuses: f64,
    pub deductions: f64,
    pub net_salary: f64,
    pub status: PayrollStatus,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// basic + bonuses - deductions.
pub fn net_salary(basic_salary: f64, bonuses: f64, deductions: f64) -> f64 {
    basic_salary + bonuses - deductions
}

/// Status filter on the payroll list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PayrollFilter {
    #[default]
    All,
    Pending,
    Paid,
}

impl PayrollFilter {
    pub fn includes(self, status: &PayrollStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => *status == PayrollStatus::Pending,
            Self::Paid => *status == PayrollStatus::Paid,
        }
    }

    pub fn filter(self, records: &[PayrollRecord]) -> Vec<&PayrollRecord> {
        records.iter().filter(|r| self.includes(&r.status)).collect()
    }
}

impl FromStr for PayrollFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(format!("unknown payroll status filter '{}'", other)),
        }
    }
}

/// Payroll create form, fields kept as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayrollDraft {
    pub employee_id: String,
    pub period: String,
    pub basic_salary: String,
    pub bonuses: String,
    pub deductions: String,
}

impl PayrollDraft {
    /// Live preview of the net salary; blank or non-numeric fields count as 0.
    pub fn net_salary(&self) -> f64 {
        net_salary(
            amount_or_zero(&self.basic_salary),
            amount_or_zero(&self.bonuses),
            amount_or_zero(&self.deductions),
        )
    }

    pub fn net_salary_display(&self) -> String {
        format_amount(self.net_salary())
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "employeeId", &self.employee_id);
        require(&mut errors, "period", &self.period);
        require(&mut errors, "basicSalary", &self.basic_salary);
        if !self.basic_salary.trim().is_empty() && parse_amount(&self.basic_salary).is_none() {
            errors.insert("basicSalary".to_string(), ValidationError::InvalidFormat("not a number".to_string()));
        }
        errors
    }

    /// Validate and build the `POST /payroll` body. Optional amounts default to 0.
    pub fn to_payload(&self) -> Result<PayrollPayload, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(PayrollPayload {
            employee_id: self.employee_id.clone(),
            period: self.period.clone(),
            basic_salary: amount_or_zero(&self.basic_salary),
            bonuses: amount_or_zero(&self.bonuses),
            deductions: amount_or_zero(&self.deductions),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPayload {
    pub employee_id: String,
    pub period: String,
    pub basic_salary: f64,
    pub bonuses: f64,
    pub deductions: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Body of `PUT /payroll/:id`.
pub struct PayrollStatusUpdate {
    pub status: PayrollStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /payroll/bulk-generate`.
pub struct BulkGenerateRequest {
    pub employee_ids: Vec<String>,
    pub period: String,
}

#[cfg(test)]
#[path = "payroll_tests.rs"]
mod tests;
