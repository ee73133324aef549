use std::sync::Mutex;

use hr_types::{Approval, ApprovalDecision, ApprovalReview, ApprovalTab};

use crate::{LoadOutcome, PageContext, Resource, lock};

pub const LOAD_FAILED: &str = "Failed to load approval requests";
pub const REVIEW_FAILED: &str = "Failed to process approval request";

/// The approve/reject dialog with its notes field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewDialog {
    pub approval: Approval,
    pub decision: ApprovalDecision,
    pub notes: String,
}

pub struct ApprovalsPage {
    ctx: PageContext,
    approvals: Resource<Vec<Approval>>,
    tab: Mutex<ApprovalTab>,
    dialog: Mutex<Option<ReviewDialog>>,
}

impl ApprovalsPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            approvals: Resource::new(),
            tab: Mutex::new(ApprovalTab::default()),
            dialog: Mutex::new(None),
        }
    }

    pub async fn load(&self) -> LoadOutcome {
        self.ctx
            .load(&self.approvals, self.ctx.api.list_approvals(), LOAD_FAILED)
            .await
    }

    pub fn is_loading(&self) -> bool {
        self.approvals.is_loading()
    }

    pub fn tab(&self) -> ApprovalTab {
        *lock(&self.tab)
    }

    pub fn set_tab(&self, tab: ApprovalTab) {
        *lock(&self.tab) = tab;
    }

    /// Requests shown under the active tab.
    pub fn visible(&self) -> Vec<Approval> {
        let tab = self.tab();
        self.approvals
            .with(|list| tab.filter(list.map(Vec::as_slice).unwrap_or_default()).into_iter().cloned().collect())
    }

    /// Open the dialog with empty notes.
    pub fn open_review(&self, approval: Approval, decision: ApprovalDecision) {
        *lock(&self.dialog) = Some(ReviewDialog {
            approval,
            decision,
            notes: String::new(),
        });
    }

    pub fn set_notes(&self, notes: &str) {
        if let Some(dialog) = lock(&self.dialog).as_mut() {
            dialog.notes = notes.to_string();
        }
    }

    pub fn dialog(&self) -> Option<ReviewDialog> {
        lock(&self.dialog).clone()
    }

    pub fn close_review(&self) {
        lock(&self.dialog).take();
    }

    /// Send the open review. On success the list reloads and the dialog
    /// closes; on failure the dialog stays open with its notes.
    pub async fn submit_review(&self) -> bool {
        let Some(dialog) = self.dialog() else {
            return false;
        };
        let review = ApprovalReview::new(dialog.decision, dialog.notes.clone());
        match self.ctx.api.review_approval(&dialog.approval.id, &review).await {
            Ok(()) => {
                self.ctx
                    .success(format!("Request {} successfully", dialog.decision.past_tense()));
                self.load().await;
                self.close_review();
                true
            }
            Err(e) => {
                self.ctx.failure(REVIEW_FAILED, &e);
                false
            }
        }
    }
}
