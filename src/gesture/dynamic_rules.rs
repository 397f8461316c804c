// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Motion gesture rules over the sample window.
//!
//! Evaluated in order: swipe, circle, wave, zoom, rotation. Nothing is
//! reported until the window is ready.

use super::{Gesture, GestureThresholds, MotionSample, MotionWindow};
use crate::util::geometry::{bearing_deg, centroid, distance, wrap_deg};

/// Classify the motion currently held in `window`.
pub fn classify_dynamic(window: &MotionWindow, thresholds: &GestureThresholds) -> Option<Gesture> {
    if !window.is_ready() {
        return None;
    }

    detect_swipe(window, thresholds)
        .or_else(|| detect_circle(window, thresholds))
        .or_else(|| detect_wave(window, thresholds))
        .or_else(|| detect_zoom(window, thresholds))
        .or_else(|| detect_rotation(window, thresholds))
}

/// Consecutive (previous, current) pairs, oldest first.
fn steps(window: &MotionWindow) -> impl Iterator<Item = (&MotionSample, &MotionSample)> + '_ {
    window.iter().zip(window.iter().skip(1))
}

fn detect_swipe(window: &MotionWindow, t: &GestureThresholds) -> Option<Gesture> {
    let (total_dx, total_dy) = steps(window).fold((0.0f32, 0.0f32), |(dx, dy), (a, b)| {
        (dx + (b.x - a.x), dy + (b.y - a.y))
    });

    if total_dx.abs() > t.swipe_distance && total_dy.abs() < t.swipe_max_orthogonal {
        return Some(if total_dx > 0.0 { Gesture::SwipeRight } else { Gesture::SwipeLeft });
    }
    if total_dy.abs() > t.swipe_distance && total_dx.abs() < t.swipe_max_orthogonal {
        return Some(if total_dy > 0.0 { Gesture::SwipeDown } else { Gesture::SwipeUp });
    }
    None
}

fn detect_circle(window: &MotionWindow, t: &GestureThresholds) -> Option<Gesture> {
    let center = centroid(window.iter().map(|s| (s.x, s.y)))?;
    let radii: Vec<f32> = window.iter().map(|s| distance(center, (s.x, s.y))).collect();
    let mean_radius = radii.iter().sum::<f32>() / radii.len() as f32;

    if mean_radius < t.circle_min_radius {
        return None;
    }
    if radii.iter().any(|r| (r - mean_radius).abs() > t.circle_radius_tolerance) {
        return None;
    }

    let mut bearings: Vec<f32> = window
        .iter()
        .map(|s| bearing_deg(center, (s.x, s.y)).rem_euclid(360.0))
        .collect();
    bearings.sort_by(|a, b| a.total_cmp(b));

    // Coverage is what remains after removing the widest empty sector.
    let wrap_gap = bearings.first()? + 360.0 - bearings.last()?;
    let largest_gap = bearings
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold(wrap_gap, f32::max);
    let coverage = 360.0 - largest_gap;

    (coverage >= t.circle_min_coverage_deg).then_some(Gesture::Circle)
}

fn detect_wave(window: &MotionWindow, t: &GestureThresholds) -> Option<Gesture> {
    let mut reversals = 0usize;
    let mut last_sign = 0.0f32;
    for (a, b) in steps(window) {
        let dx = b.x - a.x;
        if dx.abs() < t.wave_jitter {
            continue;
        }
        let sign = dx.signum();
        if last_sign != 0.0 && sign != last_sign {
            reversals += 1;
        }
        last_sign = sign;
    }
    (reversals >= t.wave_min_reversals).then_some(Gesture::Wave)
}

fn detect_zoom(window: &MotionWindow, t: &GestureThresholds) -> Option<Gesture> {
    let delta = window.last()?.pinch - window.first()?.pinch;
    if delta > t.zoom_delta {
        Some(Gesture::ZoomIn)
    } else if delta < -t.zoom_delta {
        Some(Gesture::ZoomOut)
    } else {
        None
    }
}

fn detect_rotation(window: &MotionWindow, t: &GestureThresholds) -> Option<Gesture> {
    let total: f32 = steps(window).map(|(a, b)| wrap_deg(b.angle_deg - a.angle_deg)).sum();
    if total > t.rotation_deg {
        Some(Gesture::RotateCw)
    } else if total < -t.rotation_deg {
        Some(Gesture::RotateCcw)
    } else {
        None
    }
}
