//! Staff list with today's attendance and per-row actions.

use eframe::egui::{self, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHECK, PLUS, WARNING, X};

use super::components::{
    action_button, colors, panel_header, primary_button_with_icon, status_badge, styled_button_with_icon,
};
use crate::models::DisplayRow;
use crate::view::{AttendanceView, RenderBranch, RowAction, ViewState, resolve_row_click};

/// Show the staff table, or the loading or error view in its place.
pub fn show(view: &mut AttendanceView, ui: &mut Ui) {
    let actions = match view.state().branch() {
        RenderBranch::Loading => {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.spinner();
                ui.label("Loading...");
            });
            return;
        }
        RenderBranch::Error(message) => {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.colored_label(colors::ERROR, message);
            });
            return;
        }
        RenderBranch::Table(_) => show_loaded(view, ui),
    };

    for action in actions {
        match action {
            RowAction::OpenQr(row) => view.state_mut().select(row),
            RowAction::MarkPresent(staff_id) => view.mark_present(&staff_id),
        }
    }
}

fn show_loaded(view: &mut AttendanceView, ui: &mut Ui) -> Vec<RowAction> {
    panel_header(ui, "Staff List");

    // Toolbar
    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Staff").clicked() {
            view.state_mut().open_add_modal();
        }

        ui.add_space(10.0);

        let refreshing = view.state().refreshing;
        if ui
            .add_enabled_ui(!refreshing, |ui| styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh"))
            .inner
            .clicked()
        {
            view.refresh();
        }
        if refreshing {
            ui.spinner();
        }
    });

    ui.add_space(15.0);

    show_notice(view.state_mut(), ui);

    let state = view.state();
    ui.label(format!("{} staff members", state.staff_list.len()));
    ui.add_space(10.0);

    show_table(state, ui)
}

fn show_notice(state: &mut ViewState, ui: &mut Ui) {
    let Some(notice) = &state.notice else {
        return;
    };

    let mut dismiss = false;
    egui::Frame::new()
        .fill(colors::WARNING.gamma_multiply(0.15))
        .inner_margin(egui::Margin::same(8))
        .corner_radius(egui::CornerRadius::same(6))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(colors::WARNING, WARNING);
                ui.label(&notice.message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    dismiss = ui.small_button(X).on_hover_text("Dismiss").clicked();
                });
            });
        });
    ui.add_space(10.0);

    if dismiss {
        state.dismiss_notice();
    }
}

fn show_table(state: &ViewState, ui: &mut Ui) -> Vec<RowAction> {
    let mut actions = Vec::new();

    TableBuilder::new(ui)
        .striped(true)
        .sense(Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(180.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder().at_least(130.0))
        .header(28.0, |mut header| {
            for title in ["Name", "Department", "Status", "Check In", "Actions"] {
                header.col(|ui| {
                    ui.strong(title.to_uppercase());
                });
            }
        })
        .body(|mut body| {
            for person in &state.staff_list {
                body.row(34.0, |mut row| {
                    row.col(|ui| {
                        ui.label(RichText::new(&person.name).strong());
                    });
                    row.col(|ui| {
                        ui.label(&person.department);
                    });
                    row.col(|ui| {
                        status_badge(ui, person.status);
                    });
                    row.col(|ui| {
                        ui.label(&person.check_in);
                    });

                    let mut button_clicked = false;
                    row.col(|ui| {
                        button_clicked = show_row_action(state, person, ui);
                    });

                    let row_clicked = row.response().clicked();
                    if let Some(action) = resolve_row_click(person, button_clicked, row_clicked) {
                        actions.push(action);
                    }
                });
            }
        });

    actions
}

/// Draw the "Mark Present" button while the row is still absent.
fn show_row_action(state: &ViewState, person: &DisplayRow, ui: &mut Ui) -> bool {
    if !person.can_mark_present() {
        return false;
    }

    let pending = state.is_mark_pending(&person.id);
    let clicked = action_button(ui, CHECK, "Mark Present", !pending).clicked();
    if pending {
        ui.spinner();
    }
    clicked
}
