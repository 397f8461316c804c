// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Display surfaces for a loaded book.
//!
//! The AR overlay and the flip book each keep their own current page.
//! [`crate::session::PageSync`] keeps the two in step.

pub mod ar;
pub mod flipbook;

pub use ar::{ArAnchors, ArBook, Axis, PageTransform};
pub use flipbook::{FlipBook, PageStyle};

/// A surface that shows one position in a book.
pub trait PageSurface {
    fn current_page(&self) -> usize;

    fn total_pages(&self) -> usize;

    /// Jump to `page`. Out-of-range requests are ignored and return false.
    fn set_page(&mut self, page: usize) -> bool;

    fn next_page(&mut self) -> bool {
        self.set_page(self.current_page() + 1)
    }

    fn prev_page(&mut self) -> bool {
        match self.current_page().checked_sub(1) {
            Some(page) => self.set_page(page),
            None => false,
        }
    }
}
