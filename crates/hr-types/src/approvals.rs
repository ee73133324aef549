use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::macros::string_status;

string_status! {
    pub enum ApprovalStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A leave (or other) request awaiting or past review.
pub struct Approval {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub reason: String,
    pub start_date: String,
    pub end_date: String,
    pub status: ApprovalStatus,
    pub submitted_at: String,
    #[serde(default)]
    pub reviewed_at: Option<String>,
    #[serde(default)]
    pub reviewer_notes: Option<String>,
}

/// Reviewer action chosen in the approval dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

impl ApprovalDecision {
    pub fn status(self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
        }
    }

    /// Past tense used in the confirmation toast.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::Reject => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `PUT /approval/:id`.
pub struct ApprovalReview {
    pub status: ApprovalStatus,
    /// Empty when the reviewer left no notes.
    pub reviewer_notes: String,
}

impl ApprovalReview {
    pub fn new(decision: ApprovalDecision, notes: impl Into<String>) -> Self {
        Self {
            status: decision.status(),
            reviewer_notes: notes.into(),
        }
    }
}

/// Tabs on the approvals page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApprovalTab {
    #[default]
    Pending,
    Approved,
    Rejected,
    All,
}

impl ApprovalTab {
    pub fn includes(self, status: &ApprovalStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => *status == ApprovalStatus::Pending,
            Self::Approved => *status == ApprovalStatus::Approved,
            Self::Rejected => *status == ApprovalStatus::Rejected,
        }
    }

    pub fn filter(self, approvals: &[Approval]) -> Vec<&Approval> {
        approvals.iter().filter(|a| self.includes(&a.status)).collect()
    }
}

impl FromStr for ApprovalTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "all" => Ok(Self::All),
            other => Err(format!("unknown approval tab '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approval(id: &str, status: ApprovalStatus) -> Approval {
        Approval {
            id: id.to_string(),
            employee_id: "e1".to_string(),
            employee_name: "Ada".to_string(),
            kind: "leave".to_string(),
            reason: "holiday".to_string(),
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-05".to_string(),
            status,
            submitted_at: "2024-05-20T10:00:00Z".to_string(),
            reviewed_at: None,
            reviewer_notes: None,
        }
    }

    #[test]
    fn tabs_filter_by_status() {
        let all = vec![
            approval("1", ApprovalStatus::Pending),
            approval("2", ApprovalStatus::Approved),
            approval("3", ApprovalStatus::Rejected),
            approval("4", ApprovalStatus::Pending),
        ];
        let ids = |tab: ApprovalTab| tab.filter(&all).iter().map(|a| a.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(ApprovalTab::default()), ["1", "4"]);
        assert_eq!(ids(ApprovalTab::Approved), ["2"]);
        assert_eq!(ids(ApprovalTab::Rejected), ["3"]);
        assert_eq!(ids(ApprovalTab::All).len(), 4);
    }

    #[test]
    fn review_body_matches_backend_contract() {
        let body = ApprovalReview::new(ApprovalDecision::Approve, "");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": "approved", "reviewerNotes": ""})
        );
        let body = ApprovalReview::new(ApprovalDecision::Reject, "overlaps release");
        assert_eq!(body.status, ApprovalStatus::Rejected);
        assert_eq!(ApprovalDecision::Reject.past_tense(), "rejected");
    }

    #[test]
    fn kind_maps_to_type_field() {
        let json = serde_json::to_value(approval("9", ApprovalStatus::Pending)).unwrap();
        assert_eq!(json["type"], "leave");
        assert!(json.get("kind").is_none());
        assert_eq!("all".parse::<ApprovalTab>(), Ok(ApprovalTab::All));
        assert!("archived".parse::<ApprovalTab>().is_err());
    }
}
