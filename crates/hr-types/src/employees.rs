use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    macros::string_status, money::parse_amount, validation::{FieldErrors, ValidationError, require}
};

string_status! {
    /// Employment status; the list endpoint filters on it.
    pub enum EmployeeStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub status: EmployeeStatus,
    /// Present on detail responses; the list and bulk views may omit it.
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub join_date: Option<String>,
}

impl Employee {
    /// Case-insensitive match of `query` against name, email or position.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [&self.name, &self.email, &self.position]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Employees matching the search box; an empty query keeps everyone.
pub fn filter_employees<'a>(employees: &'a [Employee], query: &str) -> Vec<&'a Employee> {
    if query.is_empty() {
        return employees.iter().collect();
    }
    employees.iter().filter(|e| e.matches_query(query)).collect()
}

/// Normalise a backend date or timestamp to `YYYY-MM-DD` (UTC) for date inputs.
/// Unparseable values are returned unchanged.
pub fn date_input_value(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc).date_naive().format("%Y-%m-%d").to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Editable employee form; every field is kept as typed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: String,
    pub join_date: String,
    pub status: EmployeeStatus,
}

impl EmployeeDraft {
    /// Prefill the edit form from a loaded record.
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            position: employee.position.clone(),
            department: employee.department.clone(),
            salary: employee.salary.map(|s| s.to_string()).unwrap_or_default(),
            join_date: employee.join_date.as_deref().map(date_input_value).unwrap_or_default(),
            status: employee.status.clone(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "email", &self.email);
        require(&mut errors, "position", &self.position);
        require(&mut errors, "department", &self.department);
        require(&mut errors, "salary", &self.salary);
        require(&mut errors, "joinDate", &self.join_date);

        if !self.email.trim().is_empty() && !self.email.contains('@') {
            errors.insert("email".to_string(), ValidationError::InvalidFormat("missing '@'".to_string()));
        }
        if !self.salary.trim().is_empty() && parse_amount(&self.salary).is_none() {
            errors.insert("salary".to_string(), ValidationError::InvalidFormat("not a number".to_string()));
        }
        errors
    }

    /// Validate and convert into the request body for create/update.
    pub fn to_payload(&self) -> Result<EmployeePayload, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(EmployeePayload {
            name: self.name.clone(),
            email: self.email.clone(),
            position: self.position.clone(),
            department: self.department.clone(),
            salary: parse_amount(&self.salary).unwrap_or_default(),
            join_date: self.join_date.clone(),
            status: self.status.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /employees` and `PUT /employees/:id`.
pub struct EmployeePayload {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: f64,
    pub join_date: String,
    pub status: EmployeeStatus,
}
