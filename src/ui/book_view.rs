// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Flip book panel.

use super::{paint_fitted, PageTextures};
use crate::session::Navigation;
use crate::viewer::{FlipBook, PageStyle, PageSurface};

/// Horizontal drag, in points, that counts as a page swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

pub enum BookAction {
    None,
    Navigate(Navigation),
}

/// Page turn for a horizontal drag of `dx` points. Dragging left turns
/// forward.
pub fn swipe_navigation(dx: f32) -> Option<Navigation> {
    if dx < -SWIPE_THRESHOLD {
        Some(Navigation::Next)
    } else if dx > SWIPE_THRESHOLD {
        Some(Navigation::Prev)
    } else {
        None
    }
}

fn page_fill(style: PageStyle) -> egui::Color32 {
    match style {
        PageStyle::HardCover | PageStyle::HardBackCover => egui::Color32::from_rgb(110, 60, 40),
        PageStyle::HardBlank => egui::Color32::from_rgb(225, 220, 205),
        PageStyle::Soft => egui::Color32::from_rgb(250, 246, 235),
    }
}

pub fn show(ui: &mut egui::Ui, flip: &FlipBook, textures: &PageTextures) -> BookAction {
    let mut action = BookAction::None;
    let book = flip.book();

    ui.horizontal(|ui| {
        ui.heading(&book.title);
        ui.label(egui::RichText::new(format!("by {}", book.author)).weak());
    });
    ui.separator();

    let available = ui.available_size() - egui::vec2(0.0, 40.0);
    let (rect, response) = ui.allocate_exact_size(available, egui::Sense::drag());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(40));

    let page_height = (rect.height() - 20.0).min((rect.width() / 2.0 - 20.0) * 1.4142);
    let page_size = egui::vec2(page_height / 1.4142, page_height);
    let spine = rect.center();
    let (left, right) = flip.spread();

    let slots = [
        (left, egui::Rect::from_min_size(spine - egui::vec2(page_size.x, page_size.y / 2.0), page_size)),
        (right, egui::Rect::from_min_size(spine - egui::vec2(0.0, page_size.y / 2.0), page_size)),
    ];

    for (index, page_rect) in slots {
        let Some(index) = index else { continue };
        let (Some(page), Some(style)) = (book.page(index), flip.style(index)) else {
            continue;
        };

        painter.rect_filled(page_rect, 2.0, page_fill(style));
        if style.is_hard() {
            painter.rect_stroke(page_rect, 2.0, egui::Stroke::new(2.0, egui::Color32::from_rgb(70, 40, 25)));
        }

        let textured = textures.get(&page.image_path);
        match (style, textured) {
            (PageStyle::HardCover | PageStyle::HardBackCover, Some(texture)) => {
                paint_fitted(&painter, texture, page_rect.shrink(4.0));
            }
            (_, Some(texture)) if flip.shows_image(index) => {
                paint_fitted(&painter, texture, page_rect.shrink(12.0));
            }
            _ => {}
        }

        let text = match style {
            PageStyle::HardCover => book.title.clone(),
            PageStyle::HardBackCover => book.author.clone(),
            _ => page.plain_text(),
        };
        let text_color = if matches!(style, PageStyle::HardCover | PageStyle::HardBackCover) {
            egui::Color32::from_rgb(240, 220, 180)
        } else {
            egui::Color32::from_gray(40)
        };
        painter.text(
            page_rect.center_top() + egui::vec2(0.0, 30.0),
            egui::Align2::CENTER_TOP,
            text,
            egui::FontId::proportional(16.0),
            text_color,
        );

        if let Some(number) = flip.page_number(index) {
            painter.text(
                page_rect.center_bottom() - egui::vec2(0.0, 10.0),
                egui::Align2::CENTER_BOTTOM,
                number.to_string(),
                egui::FontId::proportional(12.0),
                egui::Color32::from_gray(110),
            );
        }
    }

    if response.drag_stopped() {
        let dx = ui.input(|i| match (i.pointer.press_origin(), i.pointer.latest_pos()) {
            (Some(start), Some(end)) => end.x - start.x,
            _ => 0.0,
        });
        if let Some(nav) = swipe_navigation(dx) {
            action = BookAction::Navigate(nav);
        }
    }

    ui.horizontal(|ui| {
        if ui.add_enabled(flip.current_page() > 0, egui::Button::new("◀ Previous")).clicked() {
            action = BookAction::Navigate(Navigation::Prev);
        }
        ui.label(format!("Page {} of {}", flip.current_page() + 1, flip.total_pages()));
        if ui
            .add_enabled(flip.current_page() + 1 < flip.total_pages(), egui::Button::new("Next ▶"))
            .clicked()
        {
            action = BookAction::Navigate(Navigation::Next);
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_directions() {
        assert_eq!(swipe_navigation(-80.0), Some(Navigation::Next));
        assert_eq!(swipe_navigation(80.0), Some(Navigation::Prev));
        assert_eq!(swipe_navigation(-50.0), None);
        assert_eq!(swipe_navigation(10.0), None);
    }
}
