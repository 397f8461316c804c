// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AR overlay surface and marker anchoring.

use std::collections::HashMap;

use super::PageSurface;
use crate::models::Book;

/// Per-target offset adjustment step.
pub const ADJUST_STEP: f32 = 0.01;

/// Depth between stacked page planes.
const PAGE_SPACING: f32 = 0.005;

/// Placement of one page plane in the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransform {
    pub visible: bool,
    /// Rotation about the spine, in degrees.
    pub rotation_y: f32,
    pub z: f32,
}

/// Page-turner shown on top of a tracked marker.
#[derive(Debug, Clone)]
pub struct ArBook {
    book: Book,
    current: usize,
}

impl ArBook {
    pub fn new(book: Book) -> Self {
        Self { book, current: 0 }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Page `index` is shown while it or its facing page is current; pages
    /// up to the current one are turned over.
    pub fn page_transform(&self, index: usize) -> PageTransform {
        PageTransform {
            visible: index == self.current || index == self.current + 1,
            rotation_y: if index <= self.current { -180.0 } else { 0.0 },
            z: PAGE_SPACING * index as f32,
        }
    }

    pub fn transforms(&self) -> Vec<PageTransform> {
        (0..self.book.total_pages()).map(|i| self.page_transform(i)).collect()
    }
}

impl PageSurface for ArBook {
    fn current_page(&self) -> usize {
        self.current
    }

    fn total_pages(&self) -> usize {
        self.book.total_pages()
    }

    fn set_page(&mut self, page: usize) -> bool {
        if page >= self.total_pages() {
            return false;
        }
        self.current = page;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Marker found/lost bookkeeping and manual content offsets.
///
/// Content stays up after its marker is lost; the status line says it is
/// following device motion instead.
#[derive(Debug, Default)]
pub struct ArAnchors {
    active: Option<usize>,
    tracking: bool,
    adjust_mode: bool,
    offsets: HashMap<usize, [f32; 3]>,
}

impl ArAnchors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_target(&self) -> Option<usize> {
        self.active
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn target_found(&mut self, target: usize) {
        if let Some(previous) = self.active.filter(|&p| p != target) {
            log::info!("Switching from target {} to target {}", previous, target);
        }
        log::info!("Target {} found", target);
        self.active = Some(target);
        self.tracking = true;
    }

    pub fn target_lost(&mut self, target: usize) {
        log::info!("Target {} lost, content still visible", target);
        if self.active == Some(target) {
            self.tracking = false;
        }
    }

    pub fn status(&self) -> String {
        match (self.active, self.tracking) {
            (None, _) => "Searching for a target...".to_string(),
            (Some(t), true) => format!("Target {} detected", t + 1),
            (Some(t), false) => format!("Target {} (tracking with motion)", t + 1),
        }
    }

    pub fn adjust_mode(&self) -> bool {
        self.adjust_mode
    }

    pub fn toggle_adjust_mode(&mut self) -> bool {
        self.adjust_mode = !self.adjust_mode;
        self.adjust_mode
    }

    /// Offset of the active target's content.
    pub fn offset(&self) -> [f32; 3] {
        self.active
            .and_then(|t| self.offsets.get(&t).copied())
            .unwrap_or_default()
    }

    /// Move the active target's content one step along `axis`. `direction`
    /// is +1 or -1. Ignored outside adjust mode or with no active target.
    pub fn nudge(&mut self, axis: Axis, direction: i8) -> Option<[f32; 3]> {
        if !self.adjust_mode {
            return None;
        }
        let target = self.active?;
        let offset = self.offsets.entry(target).or_default();
        let step = ADJUST_STEP * f32::from(direction.signum());
        match axis {
            Axis::X => offset[0] += step,
            Axis::Y => offset[1] += step,
            Axis::Z => offset[2] += step,
        }
        log::debug!(
            "Adjusted {:?} by {}. Total offset: x:{:.3}, y:{:.3}, z:{:.3}",
            axis, step, offset[0], offset[1], offset[2]
        );
        Some(*offset)
    }

    /// Zero the active target's offset. False when no target is active.
    pub fn reset_offset(&mut self) -> bool {
        match self.active {
            Some(target) => {
                self.offsets.insert(target, [0.0; 3]);
                log::info!("Position reset for target {}", target);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::MockBookSource;

    fn ar_book() -> ArBook {
        ArBook::new(MockBookSource::catalog("book2").unwrap())
    }

    #[test]
    fn test_initial_transforms() {
        let book = ar_book();
        let t = book.transforms();
        assert_eq!(t.len(), 4);
        assert!(t[0].visible && t[1].visible && !t[2].visible && !t[3].visible);
        assert_eq!(t[0].rotation_y, -180.0);
        assert_eq!(t[1].rotation_y, 0.0);
    }

    #[test]
    fn test_turning_pages() {
        let mut book = ar_book();
        assert!(book.set_page(2));
        let t = book.transforms();
        assert_eq!(t.iter().filter(|p| p.visible).count(), 2);
        assert!(t[2].visible && t[3].visible);
        assert_eq!(t[1].rotation_y, -180.0);
        assert_eq!(t[3].rotation_y, 0.0);

        assert!(!book.set_page(4));
        assert_eq!(book.current_page(), 2);
        assert!(book.next_page());
        assert!(!book.next_page());
    }

    #[test]
    fn test_found_lost_status() {
        let mut anchors = ArAnchors::new();
        assert!(anchors.status().starts_with("Searching"));
        anchors.target_found(0);
        assert_eq!(anchors.status(), "Target 1 detected");
        anchors.target_lost(1);
        assert!(anchors.is_tracking());
        anchors.target_lost(0);
        assert_eq!(anchors.status(), "Target 1 (tracking with motion)");
        assert_eq!(anchors.active_target(), Some(0));
    }

    #[test]
    fn test_offsets_need_adjust_mode_and_target() {
        let mut anchors = ArAnchors::new();
        assert!(anchors.toggle_adjust_mode());
        assert_eq!(anchors.nudge(Axis::X, 1), None);
        assert!(!anchors.reset_offset());

        anchors.target_found(1);
        anchors.nudge(Axis::X, 1);
        anchors.nudge(Axis::X, 1);
        let offset = anchors.nudge(Axis::Z, -1).unwrap();
        assert!((offset[0] - 0.02).abs() < 1e-6);
        assert!((offset[2] + 0.01).abs() < 1e-6);

        // Offsets are kept per target.
        anchors.target_found(0);
        assert_eq!(anchors.offset(), [0.0; 3]);
        anchors.target_found(1);
        assert!((anchors.offset()[0] - 0.02).abs() < 1e-6);

        assert!(anchors.reset_offset());
        assert_eq!(anchors.offset(), [0.0; 3]);

        assert!(!anchors.toggle_adjust_mode());
        assert_eq!(anchors.nudge(Axis::Y, 1), None);
    }
}
