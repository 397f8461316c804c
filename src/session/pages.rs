// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keeps the AR overlay and the flip book on the same page.

use crate::viewer::PageSurface;

/// Which surface a navigation request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ar,
    Flip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Prev,
    /// Absolute page. Negative or past-the-end targets are ignored.
    Goto(i64),
}

/// Shared current page, mirrored between two surfaces.
#[derive(Debug, Default)]
pub struct PageSync {
    current: usize,
    /// Set while mirroring so a surface echoing the change back is ignored.
    mirroring: bool,
}

impl PageSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.mirroring = false;
    }

    /// Apply `nav` to `origin` and mirror the new page onto `other`.
    ///
    /// Returns the new page, or `None` when the request was out of range
    /// and nothing changed.
    pub fn navigate(
        &mut self,
        nav: Navigation,
        origin: &mut dyn PageSurface,
        other: &mut dyn PageSurface,
    ) -> Option<usize> {
        if self.mirroring {
            return None;
        }

        let target = match nav {
            Navigation::Next => self.current.checked_add(1)?,
            Navigation::Prev => self.current.checked_sub(1)?,
            Navigation::Goto(page) => usize::try_from(page).ok()?,
        };
        if target >= origin.total_pages() {
            log::debug!("Ignoring navigation to page {} of {}", target, origin.total_pages());
            return None;
        }

        if origin.current_page() != target && !origin.set_page(target) {
            return None;
        }
        self.current = target;

        self.mirroring = true;
        if other.current_page() != target {
            other.set_page(target);
        }
        self.mirroring = false;

        log::info!("Page {}/{}", target + 1, origin.total_pages());
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::MockBookSource;
    use crate::viewer::{ArBook, FlipBook};

    /// Surface that counts how often it was moved.
    struct Counting {
        page: usize,
        total: usize,
        sets: usize,
    }

    impl PageSurface for Counting {
        fn current_page(&self) -> usize {
            self.page
        }
        fn total_pages(&self) -> usize {
            self.total
        }
        fn set_page(&mut self, page: usize) -> bool {
            if page >= self.total {
                return false;
            }
            self.sets += 1;
            self.page = page;
            true
        }
    }

    fn surfaces() -> (ArBook, FlipBook) {
        let book = MockBookSource::catalog("book2").unwrap();
        (ArBook::new(book.clone()), FlipBook::new(book))
    }

    #[test]
    fn test_navigation_mirrors_other_surface() {
        let (mut ar, mut flip) = surfaces();
        let mut sync = PageSync::new();

        assert_eq!(sync.navigate(Navigation::Next, &mut ar, &mut flip), Some(1));
        assert_eq!(flip.current_page(), 1);

        assert_eq!(sync.navigate(Navigation::Goto(3), &mut flip, &mut ar), Some(3));
        assert_eq!(ar.current_page(), 3);
        assert_eq!(sync.current(), 3);
    }

    #[test]
    fn test_out_of_range_is_a_no_op() {
        let (mut ar, mut flip) = surfaces();
        let mut sync = PageSync::new();
        sync.navigate(Navigation::Goto(2), &mut ar, &mut flip);

        assert_eq!(sync.navigate(Navigation::Goto(-1), &mut ar, &mut flip), None);
        assert_eq!(sync.navigate(Navigation::Goto(4), &mut flip, &mut ar), None);
        assert_eq!((ar.current_page(), flip.current_page(), sync.current()), (2, 2, 2));

        sync.navigate(Navigation::Goto(0), &mut ar, &mut flip);
        assert_eq!(sync.navigate(Navigation::Prev, &mut ar, &mut flip), None);
        sync.navigate(Navigation::Goto(3), &mut ar, &mut flip);
        assert_eq!(sync.navigate(Navigation::Next, &mut ar, &mut flip), None);
        assert_eq!(flip.current_page(), 3);
    }

    #[test]
    fn test_surface_already_on_page_is_not_touched() {
        let mut sync = PageSync::new();
        let mut origin = Counting { page: 0, total: 4, sets: 0 };
        let mut other = Counting { page: 2, total: 4, sets: 0 };

        sync.navigate(Navigation::Goto(2), &mut origin, &mut other);
        assert_eq!(origin.sets, 1);
        assert_eq!(other.sets, 0);
    }
}
