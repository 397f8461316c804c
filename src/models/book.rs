// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Book data structures.
//!
//! Field names follow the book data shape served by the catalog:
//! `{id, title, author, pages: [{type, imagePath, content}]}`.

use serde::{Deserialize, Serialize};

/// Kind of page, which decides how the flip book renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    Cover,
    Content,
    Blank,
    BackCover,
}

/// A single page of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "type")]
    pub page_type: PageType,
    #[serde(rename = "imagePath", default)]
    pub image_path: String,
    /// HTML fragment shown on the page.
    #[serde(default)]
    pub content: String,
}

impl Page {
    pub fn new(page_type: PageType, image_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            page_type,
            image_path: image_path.into(),
            content: content.into(),
        }
    }

    /// Page content with markup removed, for surfaces that can only draw text.
    pub fn plain_text(&self) -> String {
        strip_html(&self.content)
    }
}

/// A book loaded after a successful scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: Vec<Page>,
}

impl Book {
    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
}

/// Drop tags and collapse whitespace. Block-level closing tags become spaces
/// so "<h1>A</h1><p>B</p>" reads "A B".
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
