// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Gesture pad.
//!
//! Replaces the hand-landmark detector with the mouse: hovering the pad
//! places a synthetic hand under the pointer, and leaving it reports a
//! frame with no hands. Scrolling over the pad opens or closes the pinch,
//! and shift+scroll rolls the hand.

use crate::gesture::synthetic::{hand, Placement, Pose};
use crate::gesture::Gesture;
use crate::models::landmark::HAND_CONNECTIONS;
use crate::models::{HandFrame, Handedness};
use crate::util::geometry::{denormalize_in_rect, normalize_in_rect, wrap_deg};

const SPREAD_PER_POINT: f32 = 0.001;
const ROLL_PER_POINT: f32 = 0.5;
const MAX_SPREAD: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoseKind {
    OpenPalm,
    Fist,
    Point,
    Peace,
    ThumbsUp,
    Pinch,
}

/// Pose controls for the synthetic hand.
#[derive(Debug)]
pub struct GesturePad {
    pub enabled: bool,
    kind: PoseKind,
    /// Thumb to index spread while pinching.
    spread: f32,
    size: f32,
    roll_deg: f32,
    handedness: Handedness,
    /// Second hand mirrored across the pad, for the two-hand spread.
    two_hands: bool,
}

impl Default for GesturePad {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: PoseKind::OpenPalm,
            spread: 0.02,
            size: 0.2,
            roll_deg: 0.0,
            handedness: Handedness::Right,
            two_hands: false,
        }
    }
}

impl GesturePad {
    fn pose(&self) -> Pose {
        match self.kind {
            PoseKind::OpenPalm => Pose::OpenPalm,
            PoseKind::Fist => Pose::Fist,
            PoseKind::Point => Pose::Point,
            PoseKind::Peace => Pose::Peace,
            PoseKind::ThumbsUp => Pose::ThumbsUp,
            PoseKind::Pinch => Pose::Pinch { spread: self.spread },
        }
    }

    /// Apply a scroll of `delta` points made while hovering the pad.
    /// Rolls the hand when `roll` is set, otherwise changes the pinch spread.
    pub fn apply_scroll(&mut self, delta: f32, roll: bool) {
        if delta == 0.0 {
            return;
        }
        if roll {
            self.roll_deg = wrap_deg(self.roll_deg + delta * ROLL_PER_POINT);
        } else {
            self.kind = PoseKind::Pinch;
            self.spread = (self.spread + delta * SPREAD_PER_POINT).clamp(0.0, MAX_SPREAD);
        }
    }

    /// Frame for a wrist at normalized `(x, y)`.
    pub fn frame_at(&self, x: f32, y: f32) -> HandFrame {
        let placement = Placement {
            wrist: (x, y),
            size: self.size,
            roll_deg: self.roll_deg,
        };
        let mut hands = vec![hand(self.pose(), placement, self.handedness)];
        if self.two_hands {
            let mirrored = Placement {
                wrist: (1.0 - x, y),
                ..placement
            };
            hands.push(hand(self.pose(), mirrored, Handedness::Left));
        }
        HandFrame { hands }
    }
}

fn controls(ui: &mut egui::Ui, pad: &mut GesturePad) {
    ui.checkbox(&mut pad.enabled, "Track hands");
    ui.horizontal_wrapped(|ui| {
        for (kind, pose) in [
            (PoseKind::OpenPalm, Pose::OpenPalm),
            (PoseKind::Fist, Pose::Fist),
            (PoseKind::Point, Pose::Point),
            (PoseKind::Peace, Pose::Peace),
            (PoseKind::ThumbsUp, Pose::ThumbsUp),
            (PoseKind::Pinch, Pose::Pinch { spread: pad.spread }),
        ] {
            ui.radio_value(&mut pad.kind, kind, pose.label());
        }
    });
    ui.add_enabled(
        pad.kind == PoseKind::Pinch,
        egui::Slider::new(&mut pad.spread, 0.0..=MAX_SPREAD).text("Pinch spread"),
    );
    ui.add(egui::Slider::new(&mut pad.size, 0.1..=0.4).text("Hand size"));
    ui.add(egui::Slider::new(&mut pad.roll_deg, -180.0..=180.0).text("Roll°"));
    ui.horizontal(|ui| {
        ui.radio_value(&mut pad.handedness, Handedness::Right, "Right");
        ui.radio_value(&mut pad.handedness, Handedness::Left, "Left");
        ui.checkbox(&mut pad.two_hands, "Two hands");
    });
}

/// Show the pad. Returns the frame to feed the recognizer, if tracking.
pub fn show(ui: &mut egui::Ui, pad: &mut GesturePad, shown: Option<Gesture>) -> Option<HandFrame> {
    ui.heading("Hand tracking");
    controls(ui, pad);

    let side = ui.available_width();
    let (rect, response) = ui.allocate_exact_size(egui::vec2(side, side * 0.75), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::from_gray(30));

    let label = shown.map(|g| g.as_str()).unwrap_or("no gesture");
    ui.weak("Scroll: pinch spread. Shift+scroll: roll.");
    ui.label(egui::RichText::new(label).size(18.0).strong().color(egui::Color32::from_rgb(0, 255, 0)));

    if !pad.enabled {
        return None;
    }

    let Some(pos) = response.hover_pos() else {
        return Some(HandFrame::empty());
    };
    let (scroll, shift) = ui.input(|i| (i.raw_scroll_delta, i.modifiers.shift));
    // Some platforms turn shift+wheel into a horizontal scroll.
    pad.apply_scroll(scroll.y + scroll.x, shift || scroll.x != 0.0);
    let (x, y) = normalize_in_rect(pos, rect);
    let frame = pad.frame_at(x, y);

    for h in &frame.hands {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            let (ax, ay) = h.point(a);
            let (bx, by) = h.point(b);
            painter.line_segment(
                [denormalize_in_rect(ax, ay, rect), denormalize_in_rect(bx, by, rect)],
                egui::Stroke::new(2.0, egui::Color32::from_rgb(0, 255, 0)),
            );
        }
        for landmark in h.landmarks.iter() {
            painter.circle_filled(denormalize_in_rect(landmark.x, landmark.y, rect), 3.0, egui::Color32::RED);
        }
    }

    Some(frame)
}
