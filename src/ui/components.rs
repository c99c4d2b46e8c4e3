//! Reusable UI components
//!
//! Standalone widgets shared between the list view and the modals.

use crate::theme;
use eframe::egui;

/// Labeled single-line text field for the modal form
pub fn form_field(
    ui: &mut egui::Ui,
    label: &str,
    hint: &str,
    value: &mut String,
) -> egui::Response {
    ui.label(
        egui::RichText::new(label)
            .size(theme::FONT_LABEL)
            .color(theme::TEXT_MUTED),
    );
    ui.add_space(2.0);
    let response = egui::Frame::new()
        .fill(theme::BG_INPUT)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(8, 6))
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::singleline(value)
                    .hint_text(egui::RichText::new(hint).color(theme::TEXT_DIM))
                    .frame(false)
                    .desired_width(ui.available_width()),
            )
        })
        .inner;
    ui.add_space(theme::SPACING_MD);
    response
}

/// Inline error banner inside a modal
pub fn inline_error(ui: &mut egui::Ui, message: &str) {
    egui::Frame::new()
        .fill(egui::Color32::from_rgb(0x2d, 0x0a, 0x0a))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(10))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x7f, 0x1d, 0x1d)))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let text = format!("{}  {}", egui_phosphor::regular::WARNING, message);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(text).color(egui::Color32::from_rgb(0xfc, 0xa5, 0xa5)),
                )
                .wrap(),
            );
        });
}

/// Rounded square with the first letter of the name, shown while the
/// category image is missing or still loading
pub fn letter_avatar(ui: &mut egui::Ui, name: &str, size: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }
    let letter = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string());
    let painter = ui.painter();
    painter.rect_filled(rect, theme::RADIUS_DEFAULT, avatar_color(name));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        letter,
        egui::FontId::proportional(size * 0.55),
        egui::Color32::WHITE,
    );
}

/// Stable per-name background color so avatars don't shuffle between frames
fn avatar_color(name: &str) -> egui::Color32 {
    const PALETTE: [egui::Color32; 6] = [
        egui::Color32::from_rgb(0x1d, 0x4e, 0xd8), // blue-700
        egui::Color32::from_rgb(0x0f, 0x76, 0x6e), // teal-700
        egui::Color32::from_rgb(0x6d, 0x28, 0xd9), // violet-700
        egui::Color32::from_rgb(0xb4, 0x53, 0x09), // amber-700
        egui::Color32::from_rgb(0xbe, 0x18, 0x5d), // pink-700
        egui::Color32::from_rgb(0x15, 0x80, 0x3d), // green-700
    ];
    let hash: usize = name.bytes().fold(0usize, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(b as usize)
    });
    PALETTE[hash % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_color_is_stable_per_name() {
        assert_eq!(avatar_color("Clothes"), avatar_color("Clothes"));
    }
}
