//! Unit tests for payroll form handling.

use super::*;

fn draft(basic: &str, bonuses: &str, deductions: &str) -> PayrollDraft {
    PayrollDraft {
        employee_id: "e-7".to_string(),
        period: "2024-05".to_string(),
        basic_salary: basic.to_string(),
        bonuses: bonuses.to_string(),
        deductions: deductions.to_string(),
    }
}

#[test]
fn create_form_example() {
    let form = draft("5000", "200", "150");
    assert_eq!(form.net_salary_display(), "5050");

    let payload = form.to_payload().unwrap();
    assert_eq!(payload.basic_salary, 5000.0);
    assert_eq!(payload.bonuses, 200.0);
    assert_eq!(payload.deductions, 150.0);
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        serde_json::json!({
            "employeeId": "e-7",
            "period": "2024-05",
            "basicSalary": 5000.0,
            "bonuses": 200.0,
            "deductions": 150.0,
        })
    );
}

#[test]
fn blank_adjustments_default_to_zero() {
    let form = draft("3100.5", "", "  ");
    assert_eq!(form.net_salary(), 3100.5);
    let payload = form.to_payload().unwrap();
    assert_eq!(payload.bonuses, 0.0);
    assert_eq!(payload.deductions, 0.0);
}

#[test]
fn net_salary_identity_over_grid() {
    let amounts = [0.0, 1.0, 150.0, 999.99, 5000.0, 12345.5];
    for basic in amounts {
        for bonuses in amounts {
            for deductions in amounts {
                let form = draft(&basic.to_string(), &bonuses.to_string(), &deductions.to_string());
                assert_eq!(form.net_salary(), basic + bonuses - deductions);
            }
        }
    }
}

#[test]
fn preview_counts_blank_basic_as_zero_but_submit_rejects_it() {
    let form = draft("", "100", "");
    assert_eq!(form.net_salary_display(), "100");
    let errors = form.to_payload().unwrap_err();
    assert_eq!(errors.get("basicSalary"), Some(&ValidationError::Required));

    let errors = draft("salary", "", "").to_payload().unwrap_err();
    assert!(matches!(errors.get("basicSalary"), Some(ValidationError::InvalidFormat(_))));
}

#[test]
fn status_filter_and_bodies() {
    let record = |id: &str, status: PayrollStatus| PayrollRecord {
        id: id.to_string(),
        employee_id: "e".to_string(),
        employee_name: "E".to_string(),
        employee_email: None,
        period: "2024-05".to_string(),
        basic_salary: 1.0,
        bonuses: 0.0,
        deductions: 0.0,
        net_salary: 1.0,
        status,
        payment_date: None,
        created_at: None,
    };
    let records = vec![record("a", PayrollStatus::Pending), record("b", PayrollStatus::Paid)];
    assert_eq!(PayrollFilter::default().filter(&records).len(), 2);
    assert_eq!(PayrollFilter::Paid.filter(&records)[0].id, "b");
    assert_eq!("pending".parse::<PayrollFilter>().unwrap().filter(&records)[0].id, "a");

    let update = PayrollStatusUpdate {
        status: PayrollStatus::Paid,
    };
    assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"status":"paid"}"#);

    let bulk = BulkGenerateRequest {
        employee_ids: vec!["e1".to_string(), "e2".to_string()],
        period: "2024-06".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&bulk).unwrap(),
        serde_json::json!({"employeeIds": ["e1", "e2"], "period": "2024-06"})
    );
}
