// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AR overlay panel.
//!
//! Draws the page-turner over a stand-in camera frame. Turned pages lie to
//! the left of the spine, unturned ones to the right. Marker events are
//! simulated with buttons.

use super::{paint_fitted, PageTextures};
use crate::session::Navigation;
use crate::viewer::{ArAnchors, ArBook, Axis, PageSurface};

/// Screen points per unit of content offset.
const OFFSET_SCALE: f32 = 400.0;

/// Number of printed markers the scene knows about.
const TARGETS: usize = 2;

pub enum ArAction {
    None,
    Navigate(Navigation),
    TargetFound(usize),
    TargetLost(usize),
    ToggleAdjust,
    Nudge(Axis, i8),
    ResetOffset,
}

pub fn show(ui: &mut egui::Ui, ar: &ArBook, anchors: &ArAnchors, textures: &PageTextures) -> ArAction {
    let mut action = ArAction::None;

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(anchors.status()).strong());
        ui.separator();
        for target in 0..TARGETS {
            if ui.small_button(format!("Show marker {}", target + 1)).clicked() {
                action = ArAction::TargetFound(target);
            }
            if ui.small_button(format!("Hide marker {}", target + 1)).clicked() {
                action = ArAction::TargetLost(target);
            }
        }
    });
    ui.separator();

    let available = ui.available_size() - egui::vec2(0.0, 70.0);
    let (rect, _) = ui.allocate_exact_size(available, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(25));

    if anchors.active_target().is_none() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Point the camera at a marker",
            egui::FontId::proportional(18.0),
            egui::Color32::from_gray(150),
        );
    } else {
        let [x, y, z] = anchors.offset();
        // Positive z brings the content towards the viewer.
        let scale = (1.0 + z * 2.0).clamp(0.5, 2.0);
        let page_height = rect.height() * 0.7 * scale;
        let page_size = egui::vec2(page_height / 1.4142, page_height);
        let spine = rect.center() + egui::vec2(x, -y) * OFFSET_SCALE;

        let book = ar.book();
        for (index, transform) in ar.transforms().iter().enumerate() {
            if !transform.visible {
                continue;
            }
            let min = if transform.rotation_y < -90.0 {
                spine - egui::vec2(page_size.x, page_size.y / 2.0)
            } else {
                spine - egui::vec2(0.0, page_size.y / 2.0)
            };
            let page_rect = egui::Rect::from_min_size(min, page_size);
            painter.rect_filled(page_rect, 2.0, egui::Color32::from_rgb(245, 240, 228));
            painter.rect_stroke(page_rect, 2.0, egui::Stroke::new(1.0, egui::Color32::from_gray(90)));

            let Some(page) = book.page(index) else { continue };
            match textures.get(&page.image_path) {
                Some(texture) => paint_fitted(&painter, texture, page_rect.shrink(6.0)),
                None => {
                    painter.text(
                        page_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        page.plain_text(),
                        egui::FontId::proportional(14.0),
                        egui::Color32::from_gray(50),
                    );
                }
            }
        }
    }

    ui.horizontal(|ui| {
        if ui.add_enabled(ar.current_page() > 0, egui::Button::new("◀ Previous")).clicked() {
            action = ArAction::Navigate(Navigation::Prev);
        }
        ui.label(format!("Page {} of {}", ar.current_page() + 1, ar.total_pages()));
        if ui
            .add_enabled(ar.current_page() + 1 < ar.total_pages(), egui::Button::new("Next ▶"))
            .clicked()
        {
            action = ArAction::Navigate(Navigation::Next);
        }

        ui.separator();

        if ui.selectable_label(anchors.adjust_mode(), "Adjust position").clicked() {
            action = ArAction::ToggleAdjust;
        }
        if ui.button("Reset position").clicked() {
            action = ArAction::ResetOffset;
        }
    });

    if anchors.adjust_mode() {
        ui.horizontal(|ui| {
            for (axis, label) in [(Axis::X, "X"), (Axis::Y, "Y"), (Axis::Z, "Z")] {
                if ui.small_button(format!("{}-", label)).clicked() {
                    action = ArAction::Nudge(axis, -1);
                }
                if ui.small_button(format!("{}+", label)).clicked() {
                    action = ArAction::Nudge(axis, 1);
                }
            }
            let [x, y, z] = anchors.offset();
            ui.label(
                egui::RichText::new(format!("offset x:{:.3} y:{:.3} z:{:.3}", x, y, z))
                    .monospace()
                    .weak(),
            );
        });
    }

    action
}
