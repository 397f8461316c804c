// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sliding window of recent hand motion samples.

use std::collections::VecDeque;

use crate::models::landmark::{HandLandmarks, INDEX_TIP, THUMB_TIP, WRIST};
use crate::util::geometry::{bearing_deg, distance};

/// What the dynamic classifier needs from one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    /// Thumb tip to index tip distance.
    pub pinch: f32,
    /// Bearing of the wrist to index tip vector, in degrees.
    pub angle_deg: f32,
}

impl MotionSample {
    pub fn from_hand(hand: &HandLandmarks) -> Self {
        let (x, y) = hand.point(WRIST);
        Self {
            x,
            y,
            pinch: distance(hand.point(THUMB_TIP), hand.point(INDEX_TIP)),
            angle_deg: bearing_deg(hand.point(WRIST), hand.point(INDEX_TIP)),
        }
    }
}

/// Fixed-capacity FIFO; the oldest sample is evicted first.
#[derive(Debug, Clone)]
pub struct MotionWindow {
    samples: VecDeque<MotionSample>,
    capacity: usize,
    ready_len: usize,
}

impl MotionWindow {
    /// `ready_fraction` of `capacity` (rounded up, at least 2) must be
    /// filled before [`is_ready`](Self::is_ready) reports true.
    pub fn new(capacity: usize, ready_fraction: f32) -> Self {
        let capacity = capacity.max(2);
        let ready_len = ((capacity as f32 * ready_fraction.clamp(0.0, 1.0)).ceil() as usize)
            .clamp(2, capacity);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            ready_len,
        }
    }

    pub fn push(&mut self, sample: MotionSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn is_ready(&self) -> bool {
        self.samples.len() >= self.ready_len
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &MotionSample> + '_ {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&MotionSample> {
        self.samples.front()
    }

    pub fn last(&self) -> Option<&MotionSample> {
        self.samples.back()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32) -> MotionSample {
        MotionSample { x, y: 0.5, pinch: 0.1, angle_deg: -90.0 }
    }

    #[test]
    fn test_evicts_oldest_first() {
        let mut window = MotionWindow::new(3, 0.75);
        for i in 0..5 {
            window.push(sample(i as f32));
        }
        let xs: Vec<f32> = window.iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_ready_at_three_quarters() {
        let mut window = MotionWindow::new(10, 0.75);
        for i in 0..7 {
            window.push(sample(i as f32));
        }
        assert!(!window.is_ready());
        window.push(sample(7.0));
        assert!(window.is_ready());

        window.clear();
        assert!(window.is_empty());
        assert!(!window.is_ready());
    }

    #[test]
    fn test_ready_needs_two_samples() {
        let mut window = MotionWindow::new(4, 0.0);
        window.push(sample(0.0));
        assert!(!window.is_ready());
        window.push(sample(1.0));
        assert!(window.is_ready());
    }
}
