// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Single-frame gesture rules.
//!
//! "Up" means the fingertip has a smaller y than the reference joint
//! (image y grows downward). Rules run in a fixed priority order and the
//! first match wins.

use super::{Gesture, GestureThresholds};
use crate::models::landmark::*;
use crate::util::geometry::distance;

/// (tip, pip, mcp) for index, middle, ring and pinky.
const FINGERS: [(usize, usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP, INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP),
    (RING_TIP, RING_PIP, RING_MCP),
    (PINKY_TIP, PINKY_PIP, PINKY_MCP),
];

fn above(hand: &HandLandmarks, tip: usize, joint: usize) -> bool {
    hand.landmarks[tip].y < hand.landmarks[joint].y
}

fn below(hand: &HandLandmarks, tip: usize, joint: usize) -> bool {
    hand.landmarks[tip].y > hand.landmarks[joint].y
}

/// Classify one hand's pose.
pub fn classify_static(hand: &HandLandmarks, thresholds: &GestureThresholds) -> Option<Gesture> {
    if distance(hand.point(THUMB_TIP), hand.point(INDEX_TIP)) < thresholds.pinch_distance {
        return Some(Gesture::Pinch);
    }

    let up: [bool; 4] = FINGERS.map(|(tip, _, mcp)| above(hand, tip, mcp));
    let down: [bool; 4] = FINGERS.map(|(tip, _, mcp)| below(hand, tip, mcp));
    let [index_up, middle_up, _, _] = up;
    let [_, middle_down, ring_down, pinky_down] = down;

    if index_up && middle_up && ring_down && pinky_down {
        return Some(Gesture::Peace);
    }

    let thumb_up = above(hand, THUMB_TIP, THUMB_MCP);
    let fingers_closed = below(hand, INDEX_TIP, INDEX_PIP)
        && below(hand, MIDDLE_TIP, MIDDLE_PIP)
        && ring_down
        && pinky_down;
    if thumb_up && fingers_closed {
        return Some(Gesture::ThumbsUp);
    }

    if up.iter().all(|&u| u) {
        return Some(Gesture::OpenPalm);
    }

    if down.iter().all(|&d| d) {
        return Some(Gesture::Fist);
    }

    if index_up && middle_down && ring_down && pinky_down {
        return Some(Gesture::Point);
    }

    None
}

/// Gestures that need both hands. Only the first two hands are considered.
pub fn classify_two_hands(hands: &[HandLandmarks], thresholds: &GestureThresholds) -> Option<Gesture> {
    match hands {
        [first, second, ..] => {
            (distance(first.wrist(), second.wrist()) > thresholds.hands_wide_distance)
                .then_some(Gesture::HandsWide)
        }
        _ => None,
    }
}
