use async_trait::async_trait;
use chrono::NaiveDate;
use hr_types::{
    Approval, ApprovalReview, AttendanceRecord, AttendanceSummary, AttendanceToday, AttendanceUpdate, BulkGenerateRequest, DashboardSummary, Employee, EmployeePayload, EmployeeStatus, KpiRecord, KpiScoreUpdate, PayrollPayload, PayrollRecord, PayrollStatusUpdate, PayrollTrendPoint
};
use reqwest::{Method, redirect::Policy};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use session_store::SessionStore;
use tracing::{debug, warn};
use url::Url;

use crate::{ClientError, ClientResult, ClientSettings, RetryPolicy};

/// Every backend endpoint the dashboard pages use.
#[async_trait]
pub trait HrApi: Send + Sync {
    async fn dashboard_summary(&self) -> ClientResult<DashboardSummary>;
    async fn payroll_trend(&self) -> ClientResult<Vec<PayrollTrendPoint>>;
    async fn attendance_today(&self) -> ClientResult<AttendanceToday>;

    /// `status` narrows the list server-side (`?status=active`).
    async fn list_employees(&self, status: Option<&EmployeeStatus>) -> ClientResult<Vec<Employee>>;
    async fn get_employee(&self, id: &str) -> ClientResult<Employee>;
    async fn create_employee(&self, payload: &EmployeePayload) -> ClientResult<()>;
    async fn update_employee(&self, id: &str, payload: &EmployeePayload) -> ClientResult<()>;
    async fn delete_employee(&self, id: &str) -> ClientResult<()>;

    async fn list_attendance(&self, date: NaiveDate) -> ClientResult<Vec<AttendanceRecord>>;
    async fn attendance_summary(&self, date: NaiveDate) -> ClientResult<AttendanceSummary>;
    async fn update_attendance(&self, id: &str, update: &AttendanceUpdate) -> ClientResult<()>;

    async fn list_approvals(&self) -> ClientResult<Vec<Approval>>;
    async fn review_approval(&self, id: &str, review: &ApprovalReview) -> ClientResult<()>;

    async fn list_payroll(&self) -> ClientResult<Vec<PayrollRecord>>;
    async fn get_payroll(&self, id: &str) -> ClientResult<PayrollRecord>;
    async fn create_payroll(&self, payload: &PayrollPayload) -> ClientResult<()>;
    async fn update_payroll_status(&self, id: &str, update: &PayrollStatusUpdate) -> ClientResult<()>;
    async fn bulk_generate_payroll(&self, request: &BulkGenerateRequest) -> ClientResult<()>;
    /// CSV export of every payroll record.
    async fn export_payroll(&self) -> ClientResult<Vec<u8>>;
    /// PDF payslip for one record.
    async fn payroll_slip(&self, id: &str) -> ClientResult<Vec<u8>>;

    async fn list_kpis(&self) -> ClientResult<Vec<KpiRecord>>;
    async fn update_kpi(&self, id: &str, update: &KpiScoreUpdate) -> ClientResult<()>;
}

/// HTTP implementation of [`HrApi`].
///
/// Attaches `Authorization: Bearer <token>` whenever the session store holds
/// a token. Non-2xx answers become [`ClientError::Request`] carrying the
/// `message` field of the error body. GET requests follow the configured
/// [`RetryPolicy`]; everything else is sent once.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    store: SessionStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish()
    }
}

impl ApiClient {
    pub fn new(settings: &ClientSettings, store: SessionStore) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            retry: settings.retry.clone(),
            store,
        })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` with `segments` appended, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Other(format!("'{}' cannot be used as a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(&self, method: Method, url: Url, body: Option<Value>) -> ClientResult<reqwest::Response> {
        let policy = if method == Method::GET { self.retry.clone() } else { RetryPolicy::default() };
        policy
            .run(|| self.send_once(method.clone(), url.clone(), body.as_ref()))
            .await
    }

    async fn send_once(&self, method: Method, url: Url, body: Option<&Value>) -> ClientResult<reqwest::Response> {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.store.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, %url, "sending request");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string));
        warn!(%method, %url, status = status.as_u16(), "backend rejected request");
        Err(ClientError::Request {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        let response = self.execute(Method::GET, url, None).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get_bytes(&self, url: Url) -> ClientResult<Vec<u8>> {
        let response = self.execute(Method::GET, url, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send_json<B: Serialize + Sync + ?Sized>(&self, method: Method, url: Url, body: &B) -> ClientResult<()> {
        let body = serde_json::to_value(body).map_err(|e| ClientError::Other(format!("failed to encode request body: {}", e)))?;
        self.execute(method, url, Some(body)).await?;
        Ok(())
    }
}

fn with_query(mut url: Url, key: &str, value: &str) -> Url {
    url.query_pairs_mut().append_pair(key, value);
    url
}

#[async_trait]
impl HrApi for ApiClient {
    async fn dashboard_summary(&self) -> ClientResult<DashboardSummary> {
        self.get_json(self.endpoint(&["dashboard", "summary"])?).await
    }

    async fn payroll_trend(&self) -> ClientResult<Vec<PayrollTrendPoint>> {
        self.get_json(self.endpoint(&["dashboard", "payroll-trend"])?).await
    }

    async fn attendance_today(&self) -> ClientResult<AttendanceToday> {
        self.get_json(self.endpoint(&["dashboard", "attendance-today"])?).await
    }

    async fn list_employees(&self, status: Option<&EmployeeStatus>) -> ClientResult<Vec<Employee>> {
        let url = self.endpoint(&["employees"])?;
        let url = match status {
            Some(status) => with_query(url, "status", status.as_str()),
            None => url,
        };
        self.get_json(url).await
    }

    async fn get_employee(&self, id: &str) -> ClientResult<Employee> {
        self.get_json(self.endpoint(&["employees", id])?).await
    }

    async fn create_employee(&self, payload: &EmployeePayload) -> ClientResult<()> {
        self.send_json(Method::POST, self.endpoint(&["employees"])?, payload).await
    }

    async fn update_employee(&self, id: &str, payload: &EmployeePayload) -> ClientResult<()> {
        self.send_json(Method::PUT, self.endpoint(&["employees", id])?, payload).await
    }

    async fn delete_employee(&self, id: &str) -> ClientResult<()> {
        self.execute(Method::DELETE, self.endpoint(&["employees", id])?, None).await?;
        Ok(())
    }

    async fn list_attendance(&self, date: NaiveDate) -> ClientResult<Vec<AttendanceRecord>> {
        let url = with_query(self.endpoint(&["attendance"])?, "date", &date.to_string());
        self.get_json(url).await
    }

    async fn attendance_summary(&self, date: NaiveDate) -> ClientResult<AttendanceSummary> {
        let url = with_query(self.endpoint(&["attendance", "summary"])?, "date", &date.to_string());
        self.get_json(url).await
    }

    async fn update_attendance(&self, id: &str, update: &AttendanceUpdate) -> ClientResult<()> {
        self.send_json(Method::PUT, self.endpoint(&["attendance", id])?, update).await
    }

    async fn list_approvals(&self) -> ClientResult<Vec<Approval>> {
        self.get_json(self.endpoint(&["approval"])?).await
    }

    async fn review_approval(&self, id: &str, review: &ApprovalReview) -> ClientResult<()> {
        self.send_json(Method::PUT, self.endpoint(&["approval", id])?, review).await
    }

    async fn list_payroll(&self) -> ClientResult<Vec<PayrollRecord>> {
        self.get_json(self.endpoint(&["payroll"])?).await
    }

    async fn get_payroll(&self, id: &str) -> ClientResult<PayrollRecord> {
        self.get_json(self.endpoint(&["payroll", id])?).await
    }

    async fn create_payroll(&self, payload: &PayrollPayload) -> ClientResult<()> {
        self.send_json(Method::POST, self.endpoint(&["payroll"])?, payload).await
    }

    async fn update_payroll_status(&self, id: &str, update: &PayrollStatusUpdate) -> ClientResult<()> {
        self.send_json(Method::PUT, self.endpoint(&["payroll", id])?, update).await
    }

    async fn bulk_generate_payroll(&self, request: &BulkGenerateRequest) -> ClientResult<()> {
        self.send_json(Method::POST, self.endpoint(&["payroll", "bulk-generate"])?, request).await
    }

    async fn export_payroll(&self) -> ClientResult<Vec<u8>> {
        self.get_bytes(self.endpoint(&["payroll", "export"])?).await
    }

    async fn payroll_slip(&self, id: &str) -> ClientResult<Vec<u8>> {
        self.get_bytes(self.endpoint(&["payroll", id, "slip"])?).await
    }

    async fn list_kpis(&self) -> ClientResult<Vec<KpiRecord>> {
        self.get_json(self.endpoint(&["kpi"])?).await
    }

    async fn update_kpi(&self, id: &str, update: &KpiScoreUpdate) -> ClientResult<()> {
        self.send_json(Method::PUT, self.endpoint(&["kpi", id])?, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ClientSettings::new(base).unwrap(), SessionStore::in_memory()).unwrap()
    }

    #[test]
    fn endpoints_extend_base_path() {
        let api = client("http://hr.local/api");
        assert_eq!(api.endpoint(&["employees", "42"]).unwrap().as_str(), "http://hr.local/api/employees/42");

        let api = client("http://hr.local/api/");
        assert_eq!(api.endpoint(&["payroll", "export"]).unwrap().as_str(), "http://hr.local/api/payroll/export");
    }

    #[test]
    fn ids_are_percent_encoded() {
        let api = client("http://hr.local");
        assert_eq!(api.endpoint(&["employees", "a/b c"]).unwrap().as_str(), "http://hr.local/employees/a%2Fb%20c");
    }
}
