// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI panels for the AR Book application.
//!
//! Panels draw from borrowed state and report what the user did as an
//! action value; the app turns actions into session events.

use std::collections::HashMap;

pub mod ar_view;
pub mod book_view;
pub mod debug_panel;
pub mod gesture_pad;
pub mod scanner_view;
pub mod toolbar;

/// Uploaded page images, keyed by the page's `imagePath`.
pub type PageTextures = HashMap<String, egui::TextureHandle>;

/// Draw `texture` scaled to fit inside `rect`, keeping its aspect ratio.
pub(crate) fn paint_fitted(painter: &egui::Painter, texture: &egui::TextureHandle, rect: egui::Rect) {
    let [w, h] = texture.size();
    if w == 0 || h == 0 {
        return;
    }
    let img_aspect = w as f32 / h as f32;
    let rect_aspect = rect.width() / rect.height();
    let size = if img_aspect > rect_aspect {
        egui::vec2(rect.width(), rect.width() / img_aspect)
    } else {
        egui::vec2(rect.height() * img_aspect, rect.height())
    };
    painter.image(
        texture.id(),
        egui::Rect::from_center_size(rect.center(), size),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}
