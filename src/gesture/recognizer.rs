// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-frame gesture recognition with de-duplication.

use std::time::{Duration, Instant};

use super::{
    classify_dynamic, classify_static, classify_two_hands, Gesture, GestureThresholds,
    MotionSample, MotionWindow,
};
use crate::models::HandFrame;

/// How long the last gesture stays up after the hands leave the frame.
const HIDE_AFTER: Duration = Duration::from_millis(1000);

/// Change to the displayed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureUpdate {
    Show(Gesture),
    Hide,
}

/// What one frame produced.
///
/// `motion` is reported on every dynamic hit, even when the label on screen
/// does not change. `update` is the de-duplicated display change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recognition {
    pub motion: Option<Gesture>,
    pub update: Option<GestureUpdate>,
}

/// Feeds frames through the static and dynamic classifiers.
///
/// Dynamic gestures win over static ones on the same frame, and a dynamic
/// hit empties the window so the same motion cannot fire twice.
pub struct GestureRecognizer {
    thresholds: GestureThresholds,
    window: MotionWindow,
    last_shown: Option<Gesture>,
    /// Set when hands disappear while a gesture is displayed.
    hide_at: Option<Instant>,
}

impl GestureRecognizer {
    pub fn new(thresholds: GestureThresholds) -> Self {
        let window = MotionWindow::new(thresholds.window_capacity, thresholds.window_ready_fraction);
        Self {
            thresholds,
            window,
            last_shown: None,
            hide_at: None,
        }
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    pub fn window(&self) -> &MotionWindow {
        &self.window
    }

    pub fn last_shown(&self) -> Option<Gesture> {
        self.last_shown
    }

    /// Process one frame. Frames must arrive in capture order.
    pub fn process(&mut self, frame: &HandFrame, now: Instant) -> Recognition {
        let Some(primary) = frame.primary() else {
            self.window.clear();
            if self.last_shown.is_some() && self.hide_at.is_none() {
                self.hide_at = Some(now + HIDE_AFTER);
            }
            return Recognition {
                motion: None,
                update: self.poll(now),
            };
        };
        self.hide_at = None;

        self.window.push(MotionSample::from_hand(primary));

        let motion = classify_dynamic(&self.window, &self.thresholds);
        if let Some(gesture) = motion {
            log::debug!("Dynamic gesture {} after {} samples", gesture, self.window.len());
            self.window.clear();
        }
        let detected = motion.or_else(|| {
            classify_two_hands(&frame.hands, &self.thresholds)
                .or_else(|| classify_static(primary, &self.thresholds))
        });

        let update = match detected {
            Some(gesture) if self.last_shown != Some(gesture) => {
                log::info!("Gesture detected: {}", gesture);
                self.last_shown = Some(gesture);
                Some(GestureUpdate::Show(gesture))
            }
            _ => None,
        };
        Recognition { motion, update }
    }

    /// Fire the pending hide once its deadline passes.
    pub fn poll(&mut self, now: Instant) -> Option<GestureUpdate> {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.hide_at = None;
                self.last_shown = None;
                Some(GestureUpdate::Hide)
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.last_shown = None;
        self.hide_at = None;
    }
}
