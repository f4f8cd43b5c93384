//! Attendance API HTTP client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{AttendanceRecord, CreateStaff, MarkAttendance, StaffMember};

/// Operations the attendance view needs from the backend.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// List all staff members.
    async fn fetch_staff_list(&self) -> Result<Vec<StaffMember>>;

    /// List attendance records for today.
    async fn fetch_today_attendance(&self) -> Result<Vec<AttendanceRecord>>;

    /// Create a staff member.
    async fn create_staff(&self, payload: &CreateStaff) -> Result<StaffMember>;

    /// Record an attendance entry.
    async fn mark_attendance(&self, body: &MarkAttendance) -> Result<()>;
}

/// REST client for the attendance server.
///
/// Every call goes through [`ApiClient::check`], so a non-success status is
/// reported the same way no matter which endpoint produced it.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client instance from API settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.root().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{base}/api/{path}", base = self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Turn a non-success response into [`AppError::Status`].
    ///
    /// The message is taken from a JSON `message` or `error` field when the
    /// body has one, else from the status reason.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                ["message", "error"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        Err(AppError::status(status, message))
    }
}

#[async_trait]
impl AttendanceApi for ApiClient {
    async fn fetch_staff_list(&self) -> Result<Vec<StaffMember>> {
        self.get_json("staff").await
    }

    async fn fetch_today_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        self.get_json("attendance/today").await
    }

    async fn create_staff(&self, payload: &CreateStaff) -> Result<StaffMember> {
        let url = self.url("staff");
        debug!("POST {url}");
        let response = self.client.post(&url).json(payload).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn mark_attendance(&self, body: &MarkAttendance) -> Result<()> {
        let url = self.url("attendance");
        debug!("POST {url} staff_id={}", body.staff_id);
        let response = self.client.post(&url).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
