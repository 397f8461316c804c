// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Distances and bearings in normalized image space (0.0 to 1.0, y grows
//! downward), plus conversions between pixel and normalized coordinates.

/// Euclidean distance between two points.
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Bearing of the vector `from -> to` in degrees, in (-180, 180].
pub fn bearing_deg(from: (f32, f32), to: (f32, f32)) -> f32 {
    (to.1 - from.1).atan2(to.0 - from.0).to_degrees()
}

/// Wrap an angle difference into [-180, 180). Non-finite input gives NaN.
pub fn wrap_deg(delta: f32) -> f32 {
    (delta + 180.0).rem_euclid(360.0) - 180.0
}

/// Arithmetic mean of a set of points. `None` for an empty set.
pub fn centroid<I>(points: I) -> Option<(f32, f32)>
where
    I: IntoIterator<Item = (f32, f32)>,
{
    let mut sum = (0.0, 0.0);
    let mut count = 0usize;
    for (x, y) in points {
        sum.0 += x;
        sum.1 += y;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some((sum.0 / count as f32, sum.1 / count as f32))
}

/// Convert a position inside `rect` to normalized coordinates (0.0 to 1.0).
pub fn normalize_in_rect(pos: egui::Pos2, rect: egui::Rect) -> (f32, f32) {
    (
        ((pos.x - rect.min.x) / rect.width()).clamp(0.0, 1.0),
        ((pos.y - rect.min.y) / rect.height()).clamp(0.0, 1.0),
    )
}

/// Convert normalized coordinates to a screen position inside `rect`.
pub fn denormalize_in_rect(x: f32, y: f32, rect: egui::Rect) -> egui::Pos2 {
    egui::pos2(rect.min.x + x * rect.width(), rect.min.y + y * rect.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(1920.0, 1080.0));
        let pos = egui::pos2(1060.0, 590.0);

        let (x, y) = normalize_in_rect(pos, rect);
        let back = denormalize_in_rect(x, y, rect);

        assert!((back.x - pos.x).abs() < 0.001);
        assert!((back.y - pos.y).abs() < 0.001);
    }

    #[test]
    fn test_normalize_clamps_outside_points() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        assert_eq!(normalize_in_rect(egui::pos2(-20.0, 250.0), rect), (0.0, 1.0));
    }

    #[test]
    fn test_wrap_deg() {
        assert_eq!(wrap_deg(190.0), -170.0);
        assert_eq!(wrap_deg(-200.0), 160.0);
        assert_eq!(wrap_deg(45.0), 45.0);
        assert_eq!(wrap_deg(180.0), -180.0);
        assert_eq!(wrap_deg(-180.0), -180.0);
    }

    #[test]
    fn test_wrap_deg_extreme_input() {
        assert!(wrap_deg(f32::INFINITY).is_nan());
        assert!(wrap_deg(f32::NEG_INFINITY).is_nan());
        let big = wrap_deg(1.0e9);
        assert!((-180.0..=180.0).contains(&big));
    }

    #[test]
    fn test_bearing_follows_image_axes() {
        assert!((bearing_deg((0.5, 0.5), (0.6, 0.5)) - 0.0).abs() < 1e-4);
        // y grows downward, so a point below has a positive bearing
        assert!((bearing_deg((0.5, 0.5), (0.5, 0.6)) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_centroid() {
        assert_eq!(centroid(Vec::<(f32, f32)>::new()), None);
        let c = centroid(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap();
        assert!((c.0 - 0.5).abs() < 1e-6 && (c.1 - 0.5).abs() < 1e-6);
    }
}
