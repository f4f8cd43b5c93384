//! Check-in QR window for a single staff member.

use eframe::egui::{self, Color32, RichText, Sense, Ui};
use qrcode::{Color, QrCode};

use super::components::{colors, status_badge};
use crate::models::DisplayRow;

/// Modules of white border drawn around the code.
const QUIET_ZONE: usize = 2;
const CODE_SIDE: f32 = 220.0;

/// Text encoded in a staff member's QR code.
pub fn qr_payload(staff: &DisplayRow) -> String {
    serde_json::json!({ "staffId": staff.id }).to_string()
}

/// Show the QR window.
///
/// Returns `true` when the user asked to close it.
pub fn show(ctx: &egui::Context, is_open: bool, staff: Option<&DisplayRow>) -> bool {
    let Some(staff) = staff.filter(|_| is_open) else {
        return false;
    };

    let mut open = true;
    let mut close_clicked = false;

    egui::Window::new(format!("{} - Check-in QR", staff.name))
        .id(egui::Id::new("qr_modal"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                ui.label(RichText::new(&staff.name).size(20.0).strong());
                ui.label(RichText::new(&staff.department).weak());
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    status_badge(ui, staff.status);
                    ui.label(format!("Check in: {}", staff.check_in));
                });
                ui.add_space(12.0);

                match QrCode::new(qr_payload(staff).as_bytes()) {
                    Ok(code) => paint_code(ui, &code),
                    Err(e) => {
                        tracing::warn!("Failed to encode QR for staff {}: {e}", staff.id);
                        ui.colored_label(colors::ERROR, format!("Cannot build QR code: {e}"));
                    }
                }

                ui.add_space(12.0);
                close_clicked = ui.button("Close").clicked();
            });
        });

    !open || close_clicked
}

fn paint_code(ui: &mut Ui, code: &QrCode) {
    let width = code.width();
    let modules = width + QUIET_ZONE * 2;
    let cell = CODE_SIDE / modules as f32;

    let (rect, _) = ui.allocate_exact_size(egui::vec2(CODE_SIDE, CODE_SIDE), Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }

    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, Color32::WHITE);

    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let x = (i % width + QUIET_ZONE) as f32;
        let y = (i / width + QUIET_ZONE) as f32;
        let min = rect.min + egui::vec2(x * cell, y * cell);
        painter.rect_filled(egui::Rect::from_min_size(min, egui::vec2(cell, cell)), 0.0, Color32::BLACK);
    }
}
