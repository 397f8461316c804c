// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scanner panel.
//!
//! Stands in for the code reader: the payload field takes whatever the
//! decoder would have produced.

use crate::camera::CameraStream;
use crate::error::ScanError;

pub enum ScannerAction {
    None,
    Decode(String),
    RetryCamera,
}

/// Text typed into the payload field.
#[derive(Debug, Default)]
pub struct ScannerState {
    pub payload: String,
}

const SAMPLE_CODES: [&str; 3] = ["book:book1", "book:book2", "movie:abc-123"];

pub fn show(
    ui: &mut egui::Ui,
    state: &mut ScannerState,
    stream: Option<&CameraStream>,
    camera_failed: bool,
    last_error: Option<&ScanError>,
) -> ScannerAction {
    let mut action = ScannerAction::None;

    ui.vertical_centered(|ui| {
        ui.add_space(20.0);
        ui.heading(egui::RichText::new("Scan a book code").size(28.0).color(egui::Color32::from_gray(200)));
        ui.add_space(10.0);

        match stream {
            Some(stream) => {
                ui.label(egui::RichText::new(format!("📷 {}", stream.label)).color(egui::Color32::from_gray(170)));
            }
            None if camera_failed => {
                ui.label(egui::RichText::new("Camera unavailable").color(egui::Color32::LIGHT_RED));
                if ui.button("Retry camera").clicked() {
                    action = ScannerAction::RetryCamera;
                }
            }
            None => {
                ui.spinner();
            }
        }

        ui.add_space(20.0);

        ui.horizontal(|ui| {
            ui.label("Decoded payload:");
            let response = ui.add(egui::TextEdit::singleline(&mut state.payload).hint_text("book:<id>"));
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Scan").clicked() || submitted) && !state.payload.is_empty() {
                action = ScannerAction::Decode(state.payload.clone());
            }
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Samples:").weak());
            for code in SAMPLE_CODES {
                if ui.small_button(code).clicked() {
                    state.payload = code.to_string();
                    action = ScannerAction::Decode(code.to_string());
                }
            }
        });

        if let Some(error) = last_error {
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new(format!("Invalid QR code format: {}", error))
                    .color(egui::Color32::YELLOW),
            );
        }
    });

    action
}
