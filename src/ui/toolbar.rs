// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! View switching toolbar.

use crate::session::ViewState;

pub enum ToolbarAction {
    None,
    SwitchView(ViewState),
    ToggleMode,
}

/// Display the toolbar with one button per view.
pub fn show(ui: &mut egui::Ui, view: ViewState, has_book: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("View:");

        ui.separator();

        if ui.selectable_label(view == ViewState::Scanner, "⌖ Scanner").clicked() && view != ViewState::Scanner {
            action = ToolbarAction::SwitchView(ViewState::Scanner);
        }

        let ar = ui.add_enabled(has_book, egui::SelectableLabel::new(view == ViewState::Ar, "◈ AR"));
        if ar.clicked() {
            action = ToolbarAction::SwitchView(ViewState::Ar);
        }

        let book = ui.add_enabled(has_book, egui::SelectableLabel::new(view == ViewState::Book, "📖 Book"));
        if book.clicked() {
            action = ToolbarAction::SwitchView(ViewState::Book);
        }

        ui.separator();

        if ui
            .add_enabled(has_book && view != ViewState::Scanner, egui::Button::new("Toggle mode"))
            .clicked()
        {
            action = ToolbarAction::ToggleMode;
        }

        let hint = match view {
            ViewState::Scanner => "Scan a book code to load a book",
            ViewState::Ar => "Point the camera at the marker, use arrows or swipes to turn pages",
            ViewState::Book => "Drag or swipe across the pages to turn them",
        };

        ui.separator();
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
