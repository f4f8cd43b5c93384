//! View state for today's attendance table.
//!
//! Everything here is plain data mutated on the UI thread. Async work lives
//! in [`super::controller`] and reports back through [`ViewMessage`].

use std::collections::{HashMap, HashSet};

use crate::models::{AttendanceStatus, DisplayRow};

/// Why a load was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// First load when the view is created.
    Initial,
    /// Toolbar refresh.
    Refresh,
    /// Reload after a staff member was created.
    AfterAdd,
}

/// Dismissible message for a failed write or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Messages from async tasks to the view.
#[derive(Debug)]
pub enum ViewMessage {
    Loaded {
        generation: u64,
        kind: LoadKind,
        rows: Vec<DisplayRow>,
    },
    LoadFailed {
        generation: u64,
        kind: LoadKind,
        message: String,
    },
    /// `create_staff` itself failed; the reload never ran.
    AddFailed {
        generation: u64,
        message: String,
    },
    MarkedPresent {
        staff_id: String,
        check_in: String,
    },
    MarkFailed {
        staff_id: String,
        message: String,
    },
}

/// Which of the three mutually exclusive views to draw.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderBranch<'a> {
    Loading,
    Error(&'a str),
    Table(&'a [DisplayRow]),
}

/// What a click on a table row resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    OpenQr(DisplayRow),
    MarkPresent(String),
}

/// Resolve a row interaction.
///
/// The action button consumes the click, so a row click in the same frame
/// does not also open the QR window.
pub fn resolve_row_click(row: &DisplayRow, button_clicked: bool, row_clicked: bool) -> Option<RowAction> {
    if button_clicked && row.can_mark_present() {
        Some(RowAction::MarkPresent(row.id.clone()))
    } else if row_clicked && !button_clicked {
        Some(RowAction::OpenQr(row.clone()))
    } else {
        None
    }
}

/// UI state of the attendance view.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub staff_list: Vec<DisplayRow>,
    /// True until the initial load settles.
    pub loading: bool,
    /// Initial load failure; hides the table once set.
    pub error: Option<String>,
    /// Row whose QR window is open.
    pub selected_staff: Option<DisplayRow>,
    pub add_modal_open: bool,
    pub notice: Option<Notice>,
    /// A refresh or post-add reload is in flight.
    pub refreshing: bool,
    pending_marks: HashSet<String>,
    /// Marks applied locally, keyed by staff id, with the generation that
    /// was current when they landed.
    local_marks: HashMap<String, (u64, String)>,
    issued_generation: u64,
    applied_generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            staff_list: Vec::new(),
            loading: true,
            error: None,
            selected_staff: None,
            add_modal_open: false,
            notice: None,
            refreshing: false,
            pending_marks: HashSet::new(),
            local_marks: HashMap::new(),
            issued_generation: 0,
            applied_generation: 0,
        }
    }

    /// Select the render branch. Loading wins, then error, then the table.
    pub fn branch(&self) -> RenderBranch<'_> {
        if self.loading {
            RenderBranch::Loading
        } else if let Some(error) = &self.error {
            RenderBranch::Error(error)
        } else {
            RenderBranch::Table(&self.staff_list)
        }
    }

    /// Register a new load and return its generation.
    pub fn begin_load(&mut self, kind: LoadKind) -> u64 {
        self.issued_generation += 1;
        if kind != LoadKind::Initial {
            self.refreshing = true;
        }
        self.issued_generation
    }

    /// Register a mark-present request.
    ///
    /// Returns false when the row is unknown, already present, or has a
    /// request in flight; no request should be sent in that case.
    pub fn begin_mark(&mut self, staff_id: &str) -> bool {
        let markable = self
            .row(staff_id)
            .is_some_and(|row| row.can_mark_present());
        markable && self.pending_marks.insert(staff_id.to_string())
    }

    pub fn is_mark_pending(&self, staff_id: &str) -> bool {
        self.pending_marks.contains(staff_id)
    }

    pub fn row(&self, staff_id: &str) -> Option<&DisplayRow> {
        self.staff_list.iter().find(|r| r.id == staff_id)
    }

    /// Whether any async work is outstanding.
    pub fn is_busy(&self) -> bool {
        self.loading || self.refreshing || !self.pending_marks.is_empty()
    }

    /// Apply a message from an async task.
    pub fn apply(&mut self, msg: ViewMessage) {
        match msg {
            ViewMessage::Loaded { generation, kind, rows } => {
                if self.settle_load(generation, kind) {
                    self.staff_list = rows;
                    self.reapply_local_marks(generation);
                }
            }
            ViewMessage::LoadFailed {
                generation,
                kind,
                message,
            } => {
                if self.settle_load(generation, kind) {
                    match kind {
                        LoadKind::Initial => self.error = Some(message),
                        LoadKind::Refresh => self.notice = Some(Notice::new(format!("Failed to refresh: {message}"))),
                        LoadKind::AfterAdd => {
                            self.notice = Some(Notice::new(format!(
                                "Staff added, but reloading the list failed: {message}"
                            )))
                        }
                    }
                }
            }
            ViewMessage::AddFailed { generation, message } => {
                if self.settle_load(generation, LoadKind::AfterAdd) {
                    self.notice = Some(Notice::new(format!("Failed to add staff: {message}")));
                }
            }
            ViewMessage::MarkedPresent { staff_id, check_in } => {
                self.pending_marks.remove(&staff_id);
                if let Some(row) = self.staff_list.iter_mut().find(|r| r.id == staff_id) {
                    row.status = AttendanceStatus::Present;
                    row.check_in = check_in.clone();
                }
                self.local_marks.insert(staff_id, (self.issued_generation, check_in));
            }
            ViewMessage::MarkFailed { staff_id, message } => {
                self.pending_marks.remove(&staff_id);
                let name = self.row(&staff_id).map(|r| r.name.as_str()).unwrap_or(staff_id.as_str());
                self.notice = Some(Notice::new(format!("Failed to mark {name} present: {message}")));
            }
        }
    }

    /// Keep marks that landed while load `generation` was in flight.
    ///
    /// Marks made before the load was issued are already in the server data
    /// and are forgotten.
    fn reapply_local_marks(&mut self, generation: u64) {
        self.local_marks.retain(|_, (marked_at, _)| *marked_at >= generation);
        for row in &mut self.staff_list {
            if row.status.is_present() {
                continue;
            }
            if let Some((_, check_in)) = self.local_marks.get(&row.id) {
                row.status = AttendanceStatus::Present;
                row.check_in = check_in.clone();
            }
        }
    }

    /// Settle a load. Returns false for results older than one already applied.
    fn settle_load(&mut self, generation: u64, kind: LoadKind) -> bool {
        if kind == LoadKind::Initial {
            self.loading = false;
        }
        if generation == self.issued_generation {
            self.refreshing = false;
        }
        if generation <= self.applied_generation {
            return false;
        }
        self.applied_generation = generation;
        true
    }

    pub fn select(&mut self, row: DisplayRow) {
        self.selected_staff = Some(row);
    }

    pub fn close_qr(&mut self) {
        self.selected_staff = None;
    }

    pub fn open_add_modal(&mut self) {
        self.add_modal_open = true;
    }

    pub fn close_add_modal(&mut self) {
        self.add_modal_open = false;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
