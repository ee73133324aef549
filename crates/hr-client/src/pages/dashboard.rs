use hr_types::{AttendanceToday, DashboardSummary, PayrollTrendPoint};

use crate::{ClientError, LoadOutcome, PageContext, Resource};

pub const LOAD_FAILED: &str = "Failed to load dashboard data";

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardData {
    pub summary: DashboardSummary,
    pub trend: Vec<PayrollTrendPoint>,
    pub today: AttendanceToday,
}

/// Summary cards, payroll trend and today's attendance, loaded together.
pub struct DashboardPage {
    ctx: PageContext,
    data: Resource<DashboardData>,
}

impl DashboardPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            data: Resource::new(),
        }
    }

    /// Fetch all three parts concurrently; one failure fails the whole load.
    pub async fn load(&self) -> LoadOutcome {
        let api = &self.ctx.api;
        let fetch = async {
            let (summary, trend, today) = futures::try_join!(api.dashboard_summary(), api.payroll_trend(), api.attendance_today())?;
            Ok::<_, ClientError>(DashboardData { summary, trend, today })
        };
        self.ctx.load(&self.data, fetch, LOAD_FAILED).await
    }

    pub fn data(&self) -> Option<DashboardData> {
        self.data.get()
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_loading()
    }
}
