//! Async orchestration for the attendance view.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::state::{LoadKind, ViewMessage, ViewState};
use crate::client::AttendanceApi;
use crate::error::Result;
use crate::models::{CreateStaff, DisplayRow, MarkAttendance, check_in, merge_attendance};

/// Fetch staff and today's attendance concurrently and join them.
pub async fn load_rows(api: &dyn AttendanceApi) -> Result<Vec<DisplayRow>> {
    let (staff, attendance) = tokio::try_join!(api.fetch_staff_list(), api.fetch_today_attendance())?;
    Ok(merge_attendance(staff, &attendance))
}

/// Owns the view state and runs its network work on a tokio runtime.
///
/// Results come back over a channel and are applied in [`AttendanceView::poll`]
/// on the UI thread. Dropping the view aborts whatever is still in flight.
pub struct AttendanceView {
    api: Arc<dyn AttendanceApi>,
    rt: Handle,
    tx: mpsc::UnboundedSender<ViewMessage>,
    rx: mpsc::UnboundedReceiver<ViewMessage>,
    state: ViewState,
    tasks: Vec<JoinHandle<()>>,
}

impl AttendanceView {
    /// Create the view and start the initial load.
    pub fn new(api: Arc<dyn AttendanceApi>, rt: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut view = Self {
            api,
            rt,
            tx,
            rx,
            state: ViewState::new(),
            tasks: Vec::new(),
        };
        view.spawn_load(LoadKind::Initial);
        view
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    /// Apply finished task results. Returns true if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            self.state.apply(msg);
            changed = true;
        }
        self.tasks.retain(|task| !task.is_finished());
        changed
    }

    /// Reload staff and attendance, keeping the current rows until it lands.
    pub fn refresh(&mut self) {
        info!("Refreshing attendance");
        self.spawn_load(LoadKind::Refresh);
    }

    /// Create a staff member, then reload the whole list.
    pub fn add_staff(&mut self, payload: CreateStaff) {
        let generation = self.state.begin_load(LoadKind::AfterAdd);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        info!("Adding staff member '{}'", payload.name);
        let task = self.rt.spawn(async move {
            let msg = match api.create_staff(&payload).await {
                Err(e) => {
                    error!("Failed to add staff: {e}");
                    ViewMessage::AddFailed {
                        generation,
                        message: e.user_message(),
                    }
                }
                Ok(created) => match load_rows(api.as_ref()).await {
                    Ok(rows) => ViewMessage::Loaded {
                        generation,
                        kind: LoadKind::AfterAdd,
                        rows,
                    },
                    Err(e) => {
                        error!("Added staff {} but reload failed: {e}", created.id);
                        ViewMessage::LoadFailed {
                            generation,
                            kind: LoadKind::AfterAdd,
                            message: e.user_message(),
                        }
                    }
                },
            };
            let _ = tx.send(msg);
        });
        self.tasks.push(task);
    }

    /// Mark a staff member present for today.
    ///
    /// Ignored for unknown or already present staff, and while a request for
    /// the same staff member is still in flight.
    pub fn mark_present(&mut self, staff_id: &str) {
        if !self.state.begin_mark(staff_id) {
            warn!("Ignoring mark present for staff {staff_id}");
            return;
        }

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let body = MarkAttendance::present(staff_id, check_in::server_now());

        let task = self.rt.spawn(async move {
            let staff_id = body.staff_id.clone();
            let msg = match api.mark_attendance(&body).await {
                Ok(()) => {
                    info!("Marked staff {staff_id} present");
                    ViewMessage::MarkedPresent {
                        staff_id,
                        check_in: check_in::display_now(),
                    }
                }
                Err(e) => {
                    error!("Failed to mark staff {staff_id} present: {e}");
                    ViewMessage::MarkFailed {
                        staff_id,
                        message: e.user_message(),
                    }
                }
            };
            let _ = tx.send(msg);
        });
        self.tasks.push(task);
    }

    fn spawn_load(&mut self, kind: LoadKind) {
        let generation = self.state.begin_load(kind);
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        let task = self.rt.spawn(async move {
            let msg = match load_rows(api.as_ref()).await {
                Ok(rows) => {
                    info!("Loaded {} staff rows", rows.len());
                    ViewMessage::Loaded { generation, kind, rows }
                }
                Err(e) => {
                    error!("Failed to load attendance: {e}");
                    ViewMessage::LoadFailed {
                        generation,
                        kind,
                        message: e.user_message(),
                    }
                }
            };
            let _ = tx.send(msg);
        });
        self.tasks.push(task);
    }

    /// Wait for every spawned task, then apply their results.
    #[cfg(test)]
    pub(crate) async fn settle(&mut self) {
        while !self.tasks.is_empty() {
            for task in std::mem::take(&mut self.tasks) {
                let _ = task.await;
            }
            self.poll();
        }
    }
}

impl Drop for AttendanceView {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{AttendanceRecord, AttendanceStatus, StaffMember};
    use crate::view::state::{Notice, RenderBranch};
    use crate::client::ApiClient;
    use crate::config::ApiConfig;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct FakeApi {
        staff: Mutex<Vec<StaffMember>>,
        attendance: Mutex<Vec<AttendanceRecord>>,
        fail_load: Option<String>,
        fail_writes: bool,
        /// Reloads fail while creates still succeed.
        fail_reload: bool,
        delay: Option<Duration>,
        marks: Mutex<Vec<MarkAttendance>>,
        loads: AtomicUsize,
        finished_loads: AtomicUsize,
    }

    impl FakeApi {
        fn with_staff(staff: Vec<StaffMember>) -> Self {
            Self {
                staff: Mutex::new(staff),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl AttendanceApi for FakeApi {
        async fn fetch_staff_list(&self) -> Result<Vec<StaffMember>> {
            let call = self.loads.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.finished_loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_reload && call > 0 {
                return Err(AppError::status(StatusCode::BAD_GATEWAY, "Bad gateway"));
            }
            match &self.fail_load {
                Some(message) => Err(AppError::status(StatusCode::SERVICE_UNAVAILABLE, message.clone())),
                None => Ok(self.staff.lock().unwrap().clone()),
            }
        }

        async fn fetch_today_attendance(&self) -> Result<Vec<AttendanceRecord>> {
            Ok(self.attendance.lock().unwrap().clone())
        }

        async fn create_staff(&self, payload: &CreateStaff) -> Result<StaffMember> {
            if self.fail_writes {
                return Err(AppError::status(StatusCode::INTERNAL_SERVER_ERROR, "db down"));
            }
            let mut staff = self.staff.lock().unwrap();
            let member = StaffMember {
                id: (staff.len() + 1).to_string(),
                name: payload.name.clone(),
                department: payload.department.clone(),
            };
            staff.push(member.clone());
            Ok(member)
        }

        async fn mark_attendance(&self, body: &MarkAttendance) -> Result<()> {
            self.marks.lock().unwrap().push(body.clone());
            if self.fail_writes {
                return Err(AppError::status(StatusCode::BAD_REQUEST, "Failed to mark attendance"));
            }
            Ok(())
        }
    }

    fn alice() -> StaffMember {
        StaffMember {
            id: "1".to_string(),
            name: "Alice".to_string(),
            department: "Eng".to_string(),
        }
    }

    fn http_client(server: &MockServer, timeout_secs: u64) -> Arc<dyn AttendanceApi> {
        let config = ApiConfig {
            base_url: server.base_url(),
            timeout_secs,
        };
        Arc::new(ApiClient::new(&config).unwrap())
    }

    async fn settled_view(api: Arc<FakeApi>) -> AttendanceView {
        let mut view = AttendanceView::new(api, Handle::current());
        view.settle().await;
        view
    }

    #[tokio::test]
    async fn test_initial_load_absent_row() {
        let api = Arc::new(FakeApi::with_staff(vec![alice()]));
        let view = settled_view(api).await;

        let state = view.state();
        assert!(!state.loading);
        match state.branch() {
            RenderBranch::Table(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].name, "Alice");
                assert_eq!(rows[0].department, "Eng");
                assert_eq!(rows[0].status, AttendanceStatus::Absent);
                assert_eq!(rows[0].check_in, "-");
                assert!(rows[0].can_mark_present());
            }
            other => panic!("unexpected branch: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_initial_load_present_row() {
        let api = Arc::new(FakeApi::with_staff(vec![alice()]));
        api.attendance.lock().unwrap().push(AttendanceRecord {
            staff_id: "1".to_string(),
            status: AttendanceStatus::Present,
            check_in: "09:00".to_string(),
        });
        let view = settled_view(api).await;

        let row = &view.state().staff_list[0];
        assert_eq!(row.status, AttendanceStatus::Present);
        assert_eq!(row.check_in, "09:00");
        assert!(!row.can_mark_present());
    }

    #[tokio::test]
    async fn test_initial_load_failure_shows_error() {
        let api = Arc::new(FakeApi {
            fail_load: Some("Network error".to_string()),
            ..Default::default()
        });
        let view = settled_view(api).await;

        assert!(!view.state().loading);
        assert_eq!(view.state().branch(), RenderBranch::Error("Network error"));
    }

    #[tokio::test]
    async fn test_server_error_message_shown_without_status() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/staff");
            then.status(503).json_body(json!({"message": "Network error"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/attendance/today");
            then.status(200).json_body(json!([]));
        });

        let mut view = AttendanceView::new(http_client(&server, 5), Handle::current());
        view.settle().await;

        assert_eq!(view.state().branch(), RenderBranch::Error("Network error"));
    }

    #[tokio::test]
    async fn test_slow_server_times_out_to_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/staff");
            then.status(200).json_body(json!([])).delay(Duration::from_secs(3));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/attendance/today");
            then.status(200).json_body(json!([])).delay(Duration::from_secs(3));
        });

        let mut view = AttendanceView::new(http_client(&server, 1), Handle::current());
        view.settle().await;

        assert!(!view.state().loading);
        assert_eq!(view.state().branch(), RenderBranch::Error("Request timed out"));
    }

    #[tokio::test]
    async fn test_drop_aborts_in_flight_load() {
        let api = Arc::new(FakeApi {
            delay: Some(Duration::from_millis(200)),
            ..FakeApi::with_staff(vec![alice()])
        });

        let view = AttendanceView::new(Arc::clone(&api) as Arc<dyn AttendanceApi>, Handle::current());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(api.loads.load(Ordering::SeqCst), 1);
        drop(view);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(api.finished_loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mark_present_success() {
        let api = Arc::new(FakeApi::with_staff(vec![alice()]));
        let mut view = settled_view(Arc::clone(&api)).await;

        view.mark_present("1");
        view.mark_present("1");
        view.settle().await;

        let marks = api.marks.lock().unwrap();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].staff_id, "1");
        assert_eq!(marks[0].status, AttendanceStatus::Present);

        let row = &view.state().staff_list[0];
        assert_eq!(row.status, AttendanceStatus::Present);
        assert_ne!(row.check_in, "-");
        assert!(!row.can_mark_present());
        assert_eq!(api.loads.load(Ordering::SeqCst), 1, "no refetch after marking");
    }

    #[tokio::test]
    async fn test_mark_present_failure_leaves_row() {
        let api = Arc::new(FakeApi {
            fail_writes: true,
            ..FakeApi::with_staff(vec![alice()])
        });
        let mut view = settled_view(Arc::clone(&api)).await;

        view.mark_present("1");
        view.settle().await;

        assert_eq!(api.marks.lock().unwrap().len(), 1);
        let row = &view.state().staff_list[0];
        assert_eq!(row.status, AttendanceStatus::Absent);
        assert_eq!(row.check_in, "-");
        assert!(view.state().notice.is_some());
    }

    #[tokio::test]
    async fn test_add_staff_reloads_list() {
        let api = Arc::new(FakeApi::with_staff(vec![alice()]));
        let mut view = settled_view(Arc::clone(&api)).await;

        view.add_staff(CreateStaff::from_input("Bob", "Ops").unwrap());
        view.settle().await;

        let rows = &view.state().staff_list;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "Bob");
        assert_eq!(rows[1].status, AttendanceStatus::Absent);
        assert_eq!(rows[1].check_in, "-");
        assert_eq!(api.loads.load(Ordering::SeqCst), 2);
        assert!(!view.state().refreshing);
    }

    #[tokio::test]
    async fn test_add_staff_failure_sets_notice() {
        let api = Arc::new(FakeApi {
            fail_writes: true,
            ..FakeApi::with_staff(vec![alice()])
        });
        let mut view = settled_view(api).await;

        view.add_staff(CreateStaff::from_input("Bob", "Ops").unwrap());
        view.settle().await;

        assert_eq!(view.state().staff_list.len(), 1);
        assert!(view.state().error.is_none());
        assert_eq!(
            view.state().notice,
            Some(Notice::new("Failed to add staff: db down"))
        );
        assert!(!view.state().refreshing);
    }

    #[tokio::test]
    async fn test_add_staff_reload_failure_says_staff_added() {
        let api = Arc::new(FakeApi {
            fail_reload: true,
            ..FakeApi::with_staff(vec![alice()])
        });
        let mut view = settled_view(Arc::clone(&api)).await;

        view.add_staff(CreateStaff::from_input("Bob", "Ops").unwrap());
        view.settle().await;

        assert_eq!(api.staff.lock().unwrap().len(), 2);
        assert_eq!(view.state().staff_list.len(), 1);
        assert_eq!(
            view.state().notice,
            Some(Notice::new("Staff added, but reloading the list failed: Bad gateway"))
        );
    }

    #[tokio::test]
    async fn test_mark_survives_slower_refresh() {
        let api = Arc::new(FakeApi::with_staff(vec![alice()]));
        let mut view = settled_view(Arc::clone(&api)).await;

        // Refresh result issued before the mark, applied after it
        let generation = view.state_mut().begin_load(LoadKind::Refresh);
        let stale_rows = load_rows(api.as_ref()).await.unwrap();
        view.mark_present("1");
        view.settle().await;
        view.state_mut().apply(ViewMessage::Loaded {
            generation,
            kind: LoadKind::Refresh,
            rows: stale_rows,
        });

        let row = &view.state().staff_list[0];
        assert_eq!(row.status, AttendanceStatus::Present);
        assert_ne!(row.check_in, "-");
    }

    #[tokio::test]
    async fn test_refresh_picks_up_new_attendance() {
        let api = Arc::new(FakeApi::with_staff(vec![alice()]));
        let mut view = settled_view(Arc::clone(&api)).await;

        api.attendance.lock().unwrap().push(AttendanceRecord {
            staff_id: "1".to_string(),
            status: AttendanceStatus::Present,
            check_in: "08:30".to_string(),
        });
        view.refresh();
        view.settle().await;

        assert_eq!(view.state().staff_list[0].check_in, "08:30");
    }
}
