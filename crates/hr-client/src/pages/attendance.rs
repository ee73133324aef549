use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use hr_types::{AttendanceRecord, AttendanceSummary, AttendanceUpdate};
use tracing::debug;

use crate::{ClientError, LoadOutcome, PageContext, Resource, lock};

pub const LOAD_FAILED: &str = "Failed to load attendance data";
pub const UPDATED: &str = "Attendance updated successfully";
pub const UPDATE_FAILED: &str = "Failed to update attendance";

#[derive(Clone, Debug, PartialEq)]
pub struct AttendanceDay {
    pub records: Vec<AttendanceRecord>,
    pub summary: AttendanceSummary,
}

/// Attendance for one selected day.
pub struct AttendancePage {
    ctx: PageContext,
    date: Mutex<NaiveDate>,
    day: Resource<AttendanceDay>,
}

impl AttendancePage {
    /// Starts on today's UTC date.
    pub fn new(ctx: PageContext) -> Self {
        Self::for_date(ctx, Utc::now().date_naive())
    }

    pub fn for_date(ctx: PageContext, date: NaiveDate) -> Self {
        Self {
            ctx,
            date: Mutex::new(date),
            day: Resource::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        *lock(&self.date)
    }

    /// Changing the date reloads; a response for a previous date is dropped.
    pub async fn select_date(&self, date: NaiveDate) -> LoadOutcome {
        *lock(&self.date) = date;
        debug!(%date, "attendance date selected");
        self.load().await
    }

    pub async fn load(&self) -> LoadOutcome {
        let date = self.date();
        let api = &self.ctx.api;
        let fetch = async {
            let (records, summary) = futures::try_join!(api.list_attendance(date), api.attendance_summary(date))?;
            Ok::<_, ClientError>(AttendanceDay { records, summary })
        };
        self.ctx.load(&self.day, fetch, LOAD_FAILED).await
    }

    pub fn is_loading(&self) -> bool {
        self.day.is_loading()
    }

    pub fn day(&self) -> Option<AttendanceDay> {
        self.day.get()
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.day.with(|day| day.map(|d| d.records.clone()).unwrap_or_default())
    }

    pub fn summary(&self) -> Option<AttendanceSummary> {
        self.day.with(|day| day.map(|d| d.summary.clone()))
    }

    /// Flip `record` between present and absent, then reload the day.
    pub async fn toggle(&self, record: &AttendanceRecord) -> bool {
        let update = AttendanceUpdate {
            status: record.status.toggled(),
        };
        match self.ctx.api.update_attendance(&record.id, &update).await {
            Ok(()) => {
                self.ctx.success(UPDATED);
                self.load().await;
                true
            }
            Err(e) => {
                self.ctx.failure(UPDATE_FAILED, &e);
                false
            }
        }
    }
}
