// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! On-screen debug log.
//!
//! Keeps the most recent messages only; older lines are dropped as new
//! ones arrive.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugLine {
    pub level: log::Level,
    pub message: String,
}

#[derive(Debug)]
pub struct DebugLog {
    lines: VecDeque<DebugLine>,
    capacity: usize,
}

impl DebugLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line, also forwarding it to the `log` facade.
    pub fn push(&mut self, level: log::Level, message: impl Into<String>) {
        let message = message.into();
        log::log!(level, "{}", message);
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(DebugLine { level, message });
    }

    pub fn lines(&self) -> impl Iterator<Item = &DebugLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn color(level: log::Level) -> egui::Color32 {
    match level {
        log::Level::Error => egui::Color32::from_rgb(255, 90, 90),
        log::Level::Warn => egui::Color32::YELLOW,
        log::Level::Info => egui::Color32::from_rgb(120, 230, 120),
        log::Level::Debug | log::Level::Trace => egui::Color32::from_rgb(120, 220, 230),
    }
}

pub fn show(ui: &mut egui::Ui, debug_log: &DebugLog) {
    ui.heading("Debug");
    ui.separator();
    egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
        for line in debug_log.lines() {
            ui.label(
                egui::RichText::new(&line.message)
                    .monospace()
                    .size(11.0)
                    .color(color(line.level)),
            );
        }
    });
}
