//! Shared UI components.

use eframe::egui::{self, Color32, CornerRadius, Margin, Response, RichText, Ui};

use crate::models::AttendanceStatus;

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const PRIMARY: Color32 = Color32::from_rgb(37, 99, 235);
    pub const PRESENT_BUTTON: Color32 = Color32::from_rgb(22, 163, 74);
}

/// Register the phosphor icon font.
pub fn install_icon_font(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Filled button for the main action of a panel.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, label: &str) -> Response {
    ui.add(
        egui::Button::new(RichText::new(format!("{icon} {label}")).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(110.0, 30.0)),
    )
}

/// Plain button with a leading icon.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, label: &str) -> Response {
    ui.add(egui::Button::new(format!("{icon} {label}")).min_size(egui::vec2(90.0, 30.0)))
}

/// Small filled button used inside table rows.
pub fn action_button(ui: &mut Ui, icon: &str, label: &str, enabled: bool) -> Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(format!("{icon} {label}")).size(12.0).color(Color32::WHITE))
            .fill(colors::PRESENT_BUTTON),
    )
}

/// Rounded status pill.
pub fn status_badge(ui: &mut Ui, status: AttendanceStatus) {
    let color = match status {
        AttendanceStatus::Present => colors::SUCCESS,
        AttendanceStatus::Absent => colors::ERROR,
    };

    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .inner_margin(Margin::symmetric(8, 2))
        .corner_radius(CornerRadius::same(10))
        .show(ui, |ui| {
            ui.label(RichText::new(status.as_str()).size(12.0).color(color));
        });
}
