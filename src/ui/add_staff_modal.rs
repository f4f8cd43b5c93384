//! Add-staff form window.

use eframe::egui::{self, Align, Layout};
use egui_phosphor::regular::PLUS;

use super::components::{colors, primary_button_with_icon};
use crate::models::CreateStaff;

/// What the user did in the add-staff window this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddStaffEvent {
    Close,
    /// Valid payload submitted. The form has already reset itself.
    Add(CreateStaff),
}

/// Form state for the add-staff window.
#[derive(Debug, Default, Clone)]
pub struct AddStaffForm {
    pub name: String,
    pub department: String,
    pub error: Option<String>,
}

impl AddStaffForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate and take the payload, resetting the form on success.
    pub fn submit(&mut self) -> Option<CreateStaff> {
        match CreateStaff::from_input(&self.name, &self.department) {
            Ok(payload) => {
                self.reset();
                Some(payload)
            }
            Err(e) => {
                self.error = Some(e.user_message());
                None
            }
        }
    }
}

/// Show the add-staff window.
pub fn show(ctx: &egui::Context, is_open: bool, form: &mut AddStaffForm) -> Option<AddStaffEvent> {
    if !is_open {
        return None;
    }

    let mut event = None;
    let mut open = true;

    egui::Window::new("Add Staff")
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.add_space(10.0);

            egui::Grid::new("add_staff_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(220.0));
                    ui.end_row();

                    ui.label("Department:");
                    ui.add(egui::TextEdit::singleline(&mut form.department).desired_width(220.0));
                    ui.end_row();
                });

            if let Some(error) = &form.error {
                ui.add_space(8.0);
                ui.colored_label(colors::ERROR, error);
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    form.reset();
                    event = Some(AddStaffEvent::Close);
                }

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if primary_button_with_icon(ui, PLUS, "Add").clicked()
                        && let Some(payload) = form.submit()
                    {
                        event = Some(AddStaffEvent::Add(payload));
                    }
                });
            });
        });

    if !open {
        form.reset();
        event = Some(AddStaffEvent::Close);
    }

    event
}
