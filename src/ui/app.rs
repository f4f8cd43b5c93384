//! Main application UI.

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::client::AttendanceApi;
use crate::view::AttendanceView;

use super::add_staff_modal::{self, AddStaffEvent, AddStaffForm};
use super::components::install_icon_font;
use super::{qr_modal, staff_table};

/// Repaint interval while requests are in flight.
const BUSY_REPAINT: Duration = Duration::from_millis(100);

/// Main application state.
pub struct App {
    // Declared before `_rt` so its in-flight tasks are aborted first.
    view: AttendanceView,
    add_form: AddStaffForm,
    /// Only held so the view's spawned tasks have a runtime to run on.
    _rt: tokio::runtime::Runtime,
}

impl App {
    pub fn new(ctx: &egui::Context, api: Arc<dyn AttendanceApi>, rt: tokio::runtime::Runtime) -> Self {
        install_icon_font(ctx);
        let view = AttendanceView::new(api, rt.handle().clone());

        Self {
            view,
            add_form: AddStaffForm::default(),
            _rt: rt,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.view.poll();

        if self.view.state().is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            staff_table::show(&mut self.view, ui);
        });

        let state = self.view.state();
        if qr_modal::show(ctx, state.selected_staff.is_some(), state.selected_staff.as_ref()) {
            self.view.state_mut().close_qr();
        }

        match add_staff_modal::show(ctx, self.view.state().add_modal_open, &mut self.add_form) {
            Some(AddStaffEvent::Add(payload)) => {
                self.view.add_staff(payload);
                self.view.state_mut().close_add_modal();
            }
            Some(AddStaffEvent::Close) => self.view.state_mut().close_add_modal(),
            None => {}
        }
    }
}
