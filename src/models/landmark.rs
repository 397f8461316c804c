// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hand landmark data delivered by the hand tracker.
//!
//! Coordinates are normalized to the camera image (0.0 to 1.0, y grows
//! downward). Indices follow the 21-point hand model.

use serde::{Deserialize, Serialize};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Hand skeleton connections for rendering.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

/// One detected hand: exactly 21 landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    #[serde(default)]
    pub handedness: Handedness,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(handedness: Handedness, landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { handedness, landmarks }
    }

    /// Build from a flat `[x0, y0, z0, x1, ...]` buffer as produced by the
    /// tracker bindings. Returns `None` when the buffer is short.
    pub fn from_flat(handedness: Handedness, flat: &[f32]) -> Option<Self> {
        if flat.len() < LANDMARK_COUNT * 3 {
            return None;
        }
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            let base = i * 3;
            *lm = Landmark {
                x: flat[base],
                y: flat[base + 1],
                z: flat[base + 2],
            };
        }
        Some(Self { handedness, landmarks })
    }

    pub fn point(&self, index: usize) -> (f32, f32) {
        self.landmarks[index].xy()
    }

    pub fn wrist(&self) -> (f32, f32) {
        self.point(WRIST)
    }
}

/// All hands the tracker reported for one camera frame, in tracker order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    pub hands: Vec<HandLandmarks>,
}

impl HandFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(hand: HandLandmarks) -> Self {
        Self { hands: vec![hand] }
    }

    pub fn primary(&self) -> Option<&HandLandmarks> {
        self.hands.first()
    }
}
