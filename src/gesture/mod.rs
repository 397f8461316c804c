// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hand gesture recognition.
//!
//! Static gestures are read from a single frame's landmarks; dynamic
//! gestures from a short window of recent wrist positions, pinch distances
//! and hand angles. [`GestureRecognizer`] combines both per frame.

mod dynamic_rules;
mod recognizer;
mod static_rules;
pub mod synthetic;
mod window;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use dynamic_rules::classify_dynamic;
pub use recognizer::{GestureRecognizer, GestureUpdate, Recognition};
pub use static_rules::{classify_static, classify_two_hands};
pub use window::{MotionSample, MotionWindow};

/// Every gesture the recognizer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Pinch,
    Peace,
    ThumbsUp,
    OpenPalm,
    Fist,
    Point,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    Circle,
    Wave,
    ZoomIn,
    ZoomOut,
    RotateCw,
    RotateCcw,
    HandsWide,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Pinch => "pinch",
            Gesture::Peace => "peace",
            Gesture::ThumbsUp => "thumbs_up",
            Gesture::OpenPalm => "open_palm",
            Gesture::Fist => "fist",
            Gesture::Point => "point",
            Gesture::SwipeLeft => "swipe_left",
            Gesture::SwipeRight => "swipe_right",
            Gesture::SwipeUp => "swipe_up",
            Gesture::SwipeDown => "swipe_down",
            Gesture::Circle => "circle",
            Gesture::Wave => "wave",
            Gesture::ZoomIn => "zoom_in",
            Gesture::ZoomOut => "zoom_out",
            Gesture::RotateCw => "rotate_cw",
            Gesture::RotateCcw => "rotate_ccw",
            Gesture::HandsWide => "hands_wide",
        }
    }

    /// True for gestures read from the motion window.
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            Gesture::SwipeLeft
                | Gesture::SwipeRight
                | Gesture::SwipeUp
                | Gesture::SwipeDown
                | Gesture::Circle
                | Gesture::Wave
                | Gesture::ZoomIn
                | Gesture::ZoomOut
                | Gesture::RotateCw
                | Gesture::RotateCcw
        )
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning constants for both classifiers. Distances are in normalized
/// image units, angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Thumb tip to index tip distance below which the hand pinches.
    pub pinch_distance: f32,
    /// Net travel along one axis for a swipe.
    pub swipe_distance: f32,
    /// Net travel allowed on the other axis during a swipe.
    pub swipe_max_orthogonal: f32,
    /// Allowed deviation of each sample from the mean circle radius.
    pub circle_radius_tolerance: f32,
    /// Mean radius below which motion is treated as jitter, not a circle.
    pub circle_min_radius: f32,
    pub circle_min_coverage_deg: f32,
    /// Direction reversals of horizontal motion that make a wave.
    pub wave_min_reversals: usize,
    /// Horizontal steps smaller than this are ignored when counting reversals.
    pub wave_jitter: f32,
    pub zoom_delta: f32,
    pub rotation_deg: f32,
    /// Wrist-to-wrist distance for the two-hand spread gesture.
    pub hands_wide_distance: f32,
    pub window_capacity: usize,
    /// Fraction of the window that must be filled before dynamic detection runs.
    pub window_ready_fraction: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            pinch_distance: 0.05,
            swipe_distance: 0.15,
            swipe_max_orthogonal: 0.05,
            circle_radius_tolerance: 0.05,
            circle_min_radius: 0.03,
            circle_min_coverage_deg: 270.0,
            wave_min_reversals: 3,
            wave_jitter: 0.005,
            zoom_delta: 0.1,
            rotation_deg: 90.0,
            hands_wide_distance: 0.5,
            window_capacity: 10,
            window_ready_fraction: 0.75,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde_names() {
        for gesture in [Gesture::ThumbsUp, Gesture::SwipeLeft, Gesture::RotateCcw, Gesture::HandsWide] {
            let json = serde_json::to_string(&gesture).unwrap();
            assert_eq!(json, format!("\"{}\"", gesture.as_str()));
        }
    }

    #[test]
    fn test_thresholds_fill_missing_fields() {
        let t: GestureThresholds = serde_yaml::from_str("pinch_distance: 0.04\n").unwrap();
        assert_eq!(t.pinch_distance, 0.04);
        assert_eq!(t.swipe_distance, 0.15);
        assert_eq!(t.window_capacity, 10);
    }
}
