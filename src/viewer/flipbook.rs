// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Two-dimensional flip book surface.

use super::PageSurface;
use crate::models::{Book, Page, PageType};

/// How a page is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStyle {
    HardCover,
    HardBackCover,
    HardBlank,
    Soft,
}

impl PageStyle {
    pub fn for_page(page: &Page) -> Self {
        match page.page_type {
            PageType::Cover => PageStyle::HardCover,
            PageType::BackCover => PageStyle::HardBackCover,
            PageType::Blank => PageStyle::HardBlank,
            PageType::Content => PageStyle::Soft,
        }
    }

    pub fn is_hard(&self) -> bool {
        !matches!(self, PageStyle::Soft)
    }
}

#[derive(Debug, Clone)]
pub struct FlipBook {
    book: Book,
    current: usize,
}

impl FlipBook {
    pub fn new(book: Book) -> Self {
        Self { book, current: 0 }
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn style(&self, index: usize) -> Option<PageStyle> {
        self.book.page(index).map(PageStyle::for_page)
    }

    /// Printed number of a content page, counting content pages from 1.
    pub fn page_number(&self, index: usize) -> Option<usize> {
        let page = self.book.page(index)?;
        if page.page_type != PageType::Content {
            return None;
        }
        Some(
            self.book.pages[..index]
                .iter()
                .filter(|p| p.page_type == PageType::Content)
                .count()
                + 1,
        )
    }

    /// Whether the page shows its image as a background.
    pub fn shows_image(&self, index: usize) -> bool {
        self.book
            .page(index)
            .map(|p| !p.image_path.is_empty() && p.page_type != PageType::Cover && p.page_type != PageType::BackCover)
            .unwrap_or(false)
    }

    /// Pages on screen as `(left, right)`. The cover and back cover stand
    /// alone; other pages pair up as odd-left, even-right.
    pub fn spread(&self) -> (Option<usize>, Option<usize>) {
        let total = self.book.total_pages();
        let current = self.current;
        if current == 0 {
            return (None, Some(0));
        }
        if current + 1 == total && total % 2 == 0 {
            return (Some(current), None);
        }
        let left = if current % 2 == 1 { current } else { current - 1 };
        let right = left + 1;
        (Some(left), (right < total).then_some(right))
    }
}

impl PageSurface for FlipBook {
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
