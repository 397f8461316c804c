// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Synthetic hands.
//!
//! Builds plausible 21-point hands for a handful of poses so the gesture
//! pad can drive the recognizer with the mouse, and so tests have stable
//! fixtures. Offsets are in hand units (wrist at the origin, fingers
//! pointing up) and scaled by `size` into image space.

use serde::{Deserialize, Serialize};

use crate::models::landmark::*;

/// Hand pose for a synthetic hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pose {
    OpenPalm,
    Fist,
    Point,
    Peace,
    ThumbsUp,
    /// Open hand with the thumb tip `spread` image units from the index tip.
    Pinch { spread: f32 },
}

impl Pose {
    pub fn label(&self) -> &'static str {
        match self {
            Pose::OpenPalm => "Open palm",
            Pose::Fist => "Fist",
            Pose::Point => "Point",
            Pose::Peace => "Peace",
            Pose::ThumbsUp => "Thumbs up",
            Pose::Pinch { .. } => "Pinch",
        }
    }
}

/// Placement of a synthetic hand in the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub wrist: (f32, f32),
    /// Wrist to middle tip length is roughly this, in image units.
    pub size: f32,
    /// Rotation about the wrist in degrees; positive turns clockwise on screen.
    pub roll_deg: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            wrist: (0.5, 0.7),
            size: 0.2,
            roll_deg: 0.0,
        }
    }
}

impl Placement {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            wrist: (x, y),
            ..Self::default()
        }
    }
}

const MCP_Y: f32 = -0.5;
const FINGER_X: [f32; 4] = [-0.15, 0.0, 0.15, 0.28];

// (pip, dip, tip) y offsets
const EXTENDED: [f32; 3] = [-0.75, -0.9, -1.05];
const CURLED: [f32; 3] = [-0.7, -0.55, -0.4];

const THUMB_EXTENDED: [(f32, f32); 4] = [(-0.2, -0.1), (-0.35, -0.2), (-0.45, -0.3), (-0.55, -0.4)];
const THUMB_CURLED: [(f32, f32); 4] = [(-0.2, -0.1), (-0.35, -0.2), (-0.2, -0.15), (0.0, -0.1)];

/// Build a hand in the given pose.
pub fn hand(pose: Pose, placement: Placement, handedness: Handedness) -> HandLandmarks {
    let (thumb_up, fingers_up) = match pose {
        Pose::OpenPalm | Pose::Pinch { .. } => (true, [true; 4]),
        Pose::Fist => (false, [false; 4]),
        Pose::Point => (false, [true, false, false, false]),
        Pose::Peace => (false, [true, true, false, false]),
        Pose::ThumbsUp => (true, [false; 4]),
    };

    let mut local = [(0.0f32, 0.0f32); LANDMARK_COUNT];
    let thumb = if thumb_up { THUMB_EXTENDED } else { THUMB_CURLED };
    for (i, p) in thumb.iter().enumerate() {
        local[THUMB_CMC + i] = *p;
    }
    for (finger, &up) in fingers_up.iter().enumerate() {
        let base = INDEX_MCP + finger * 4;
        let x = FINGER_X[finger];
        let joints = if up { EXTENDED } else { CURLED };
        local[base] = (x, MCP_Y);
        for (j, y) in joints.iter().enumerate() {
            local[base + 1 + j] = (x, *y);
        }
    }

    let (sin, cos) = placement.roll_deg.to_radians().sin_cos();
    let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
    for (lm, (lx, ly)) in landmarks.iter_mut().zip(local.iter()) {
        let (sx, sy) = (lx * placement.size, ly * placement.size);
        *lm = Landmark::new(
            placement.wrist.0 + sx * cos - sy * sin,
            placement.wrist.1 + sx * sin + sy * cos,
        );
    }

    if let Pose::Pinch { spread } = pose {
        let tip = landmarks[INDEX_TIP];
        landmarks[THUMB_TIP] = Landmark::new(tip.x - spread, tip.y);
    }

    HandLandmarks::new(handedness, landmarks)
}

/// Convenience: an upright right hand at `placement`.
pub fn right_hand(pose: Pose, placement: Placement) -> HandLandmarks {
    hand(pose, placement, Handedness::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::{bearing_deg, distance};

    #[test]
    fn test_wrist_is_placed() {
        let h = right_hand(Pose::Fist, Placement::at(0.3, 0.6));
        assert_eq!(h.wrist(), (0.3, 0.6));
    }

    #[test]
    fn test_pinch_spread_is_exact() {
        let h = right_hand(Pose::Pinch { spread: 0.02 }, Placement::default());
        let d = distance(h.point(THUMB_TIP), h.point(INDEX_TIP));
        assert!((d - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_roll_turns_index_bearing() {
        let upright = right_hand(Pose::Point, Placement::default());
        let rolled = right_hand(Pose::Point, Placement { roll_deg: 30.0, ..Placement::default() });
        let a0 = bearing_deg(upright.wrist(), upright.point(INDEX_TIP));
        let a1 = bearing_deg(rolled.wrist(), rolled.point(INDEX_TIP));
        assert!(((a1 - a0) - 30.0).abs() < 1e-3);
    }
}
