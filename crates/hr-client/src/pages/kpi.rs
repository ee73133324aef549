use std::sync::Mutex;

use hr_types::{KpiRecord, KpiScoreUpdate, kpi::parse_score};

use crate::{LoadOutcome, PageContext, Resource, Toast, lock};

pub const LOAD_FAILED: &str = "Failed to load KPI data";
pub const UPDATED: &str = "KPI score updated successfully";
pub const UPDATE_FAILED: &str = "Failed to update KPI score";

/// Score edit dialog; `score` is the text as typed.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreDialog {
    pub kpi: KpiRecord,
    pub score: String,
}

pub struct KpiPage {
    ctx: PageContext,
    kpis: Resource<Vec<KpiRecord>>,
    dialog: Mutex<Option<ScoreDialog>>,
}

impl KpiPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            kpis: Resource::new(),
            dialog: Mutex::new(None),
        }
    }

    pub async fn load(&self) -> LoadOutcome {
        self.ctx.load(&self.kpis, self.ctx.api.list_kpis(), LOAD_FAILED).await
    }

    pub fn is_loading(&self) -> bool {
        self.kpis.is_loading()
    }

    pub fn kpis(&self) -> Vec<KpiRecord> {
        self.kpis.get().unwrap_or_default()
    }

    /// Open the dialog prefilled with the current score.
    pub fn open_edit(&self, kpi: KpiRecord) {
        let score = kpi.score.to_string();
        *lock(&self.dialog) = Some(ScoreDialog { kpi, score });
    }

    pub fn set_score(&self, score: &str) {
        if let Some(dialog) = lock(&self.dialog).as_mut() {
            dialog.score = score.to_string();
        }
    }

    pub fn dialog(&self) -> Option<ScoreDialog> {
        lock(&self.dialog).clone()
    }

    pub fn close_edit(&self) {
        lock(&self.dialog).take();
    }

    /// Send the typed score. A non-numeric score is rejected locally and
    /// leaves the dialog open.
    pub async fn submit_score(&self) -> bool {
        let Some(dialog) = self.dialog() else {
            return false;
        };
        let score = match parse_score(&dialog.score) {
            Ok(score) => score,
            Err(e) => {
                self.ctx.notifier.notify(Toast::validation(format!("score: {}", e)));
                return false;
            }
        };
        match self.ctx.api.update_kpi(&dialog.kpi.id, &KpiScoreUpdate { score }).await {
            Ok(()) => {
                self.ctx.success(UPDATED);
                self.load().await;
                self.close_edit();
                true
            }
            Err(e) => {
                self.ctx.failure(UPDATE_FAILED, &e);
                false
            }
        }
    }
}
