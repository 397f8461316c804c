// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Book sources.
//!
//! A source turns a scanned [`BookId`] into a [`Book`]. Fetches block, so
//! the app runs them on a worker thread with [`spawn_fetch`] and polls the
//! result channel from the UI loop.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crate::error::LoadError;
use crate::io::media::resolve_asset;
use crate::io::serialization;
use crate::models::{Book, Page, PageType};
use crate::scan::BookId;

/// Something that can produce a book for an id.
pub trait BookSource: Send + Sync {
    fn fetch(&self, id: &BookId) -> Result<Book, LoadError>;
}

/// Result of a background fetch, tagged with the request that started it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub request: u64,
    pub result: Result<Book, LoadError>,
}

/// Run `source.fetch(id)` on a worker thread and send the outcome.
pub fn spawn_fetch(source: Arc<dyn BookSource>, request: u64, id: BookId, sender: Sender<FetchOutcome>) {
    std::thread::spawn(move || {
        log::debug!("Fetching book {} (request {})", id, request);
        let result = source.fetch(&id);
        // The receiver is gone when the app is shutting down.
        let _ = sender.send(FetchOutcome { request, result });
    });
}

/// Built-in catalog behind a simulated network delay.
pub struct MockBookSource {
    delay: Duration,
    assets_root: Option<PathBuf>,
}

impl MockBookSource {
    pub fn new(delay: Duration, assets_root: Option<PathBuf>) -> Self {
        Self { delay, assets_root }
    }

    /// Book data for a known id.
    pub fn catalog(id: &str) -> Option<Book> {
        match id {
            "book1" => Some(Book {
                id: "book1".to_string(),
                title: "Sample Book".to_string(),
                author: "John Doe".to_string(),
                pages: vec![
                    Page::new(PageType::Cover, "assets/books/book1/cover.jpg", ""),
                    Page::new(PageType::Blank, "", ""),
                    Page::new(
                        PageType::Content,
                        "assets/books/book1/page1.jpg",
                        "<h1>Chapter 1</h1><p>This is the beginning of the story...</p>",
                    ),
                    Page::new(PageType::Content, "assets/books/book1/page2.jpg", "<p>The journey continues...</p>"),
                    Page::new(PageType::Content, "assets/books/book1/page3.jpg", "<p>A storm gathers over the hills.</p>"),
                    Page::new(PageType::Content, "assets/books/book1/page4.jpg", "<h2>The End</h2>"),
                    Page::new(PageType::Blank, "", ""),
                    Page::new(PageType::BackCover, "assets/books/book1/back-cover.jpg", ""),
                ],
            }),
            "book2" => Some(Book {
                id: "book2".to_string(),
                title: "Short Stories".to_string(),
                author: "Jane Roe".to_string(),
                pages: vec![
                    Page::new(PageType::Cover, "assets/books/book2/cover.jpg", ""),
                    Page::new(PageType::Content, "assets/books/book2/page1.jpg", "<h1>Morning</h1>"),
                    Page::new(PageType::Content, "assets/books/book2/page2.jpg", "<h1>Evening</h1>"),
                    Page::new(PageType::BackCover, "assets/books/book2/back-cover.jpg", ""),
                ],
            }),
            _ => None,
        }
    }
}

impl BookSource for MockBookSource {
    fn fetch(&self, id: &BookId) -> Result<Book, LoadError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let book = Self::catalog(id.as_str())
            .ok_or_else(|| LoadError::MissingAsset(PathBuf::from(format!("books/{}", id))))?;
        check_book(&book, self.assets_root.as_deref())?;
        log::info!("Fetched '{}' ({} pages)", book.title, book.total_pages());
        Ok(book)
    }
}

/// Books stored as `<dir>/<id>.json`, `.yaml` or `.yml`.
pub struct LibrarySource {
    dir: PathBuf,
    fallback: Option<MockBookSource>,
}

impl LibrarySource {
    pub fn new(dir: PathBuf, fallback: Option<MockBookSource>) -> Self {
        Self { dir, fallback }
    }

    fn find(&self, id: &BookId) -> Option<PathBuf> {
        ["json", "yaml", "yml"]
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", id, ext)))
            .find(|path| path.is_file())
    }
}

impl BookSource for LibrarySource {
    fn fetch(&self, id: &BookId) -> Result<Book, LoadError> {
        let Some(path) = self.find(id) else {
            return match &self.fallback {
                Some(mock) => mock.fetch(id),
                None => Err(LoadError::MissingAsset(self.dir.join(id.as_str()))),
            };
        };

        let book = serialization::import_book(&path).map_err(|e| LoadError::Read {
            path: path.clone(),
            message: format!("{:#}", e),
        })?;
        // Relative image paths in a library file are relative to the library.
        check_book(&book, Some(self.dir.as_path()))?;
        log::info!("Loaded '{}' from {}", book.title, path.display());
        Ok(book)
    }
}

/// Reject books with no pages, and pages whose image is missing under `assets_root`.
fn check_book(book: &Book, assets_root: Option<&Path>) -> Result<(), LoadError> {
    if book.pages.is_empty() {
        return Err(LoadError::EmptyBook(book.id.clone()));
    }
    if let Some(root) = assets_root {
        for page in book.pages.iter().filter(|p| !p.image_path.is_empty()) {
            let path = resolve_asset(Some(root), &page.image_path);
            if !path.exists() {
                log::warn!("Missing page image {}", path.display());
                return Err(LoadError::MissingAsset(path));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn id(s: &str) -> BookId {
        BookId::parse(s).unwrap()
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("arbook-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_mock_catalog() {
        let source = MockBookSource::new(Duration::ZERO, None);
        assert_eq!(source.fetch(&id("book1")).unwrap().total_pages(), 8);
        assert_eq!(source.fetch(&id("book2")).unwrap().total_pages(), 4);
        assert!(matches!(source.fetch(&id("book9")), Err(LoadError::MissingAsset(_))));
    }

    #[test]
    fn test_missing_page_image_fails_fetch() {
        let root = temp_dir("empty-assets");
        let source = MockBookSource::new(Duration::ZERO, Some(root.clone()));
        match source.fetch(&id("book2")) {
            Err(LoadError::MissingAsset(path)) => assert!(path.ends_with("assets/books/book2/cover.jpg")),
            other => panic!("unexpected result: {:?}", other),
        }
        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_library_reads_files_and_falls_back() {
        let dir = temp_dir("library");
        let book = Book {
            id: "atlas".to_string(),
            title: "Atlas".to_string(),
            author: "M. Cartographer".to_string(),
            pages: vec![Page::new(PageType::Content, "", "<p>North</p>")],
        };
        serialization::export_book(&book, &dir.join("atlas.yaml")).unwrap();
        std::fs::write(dir.join("broken.json"), "{ not json").unwrap();

        let library = LibrarySource::new(dir.clone(), Some(MockBookSource::new(Duration::ZERO, None)));
        assert_eq!(library.fetch(&id("atlas")).unwrap(), book);
        assert_eq!(library.fetch(&id("book1")).unwrap().total_pages(), 8);
        assert!(matches!(library.fetch(&id("broken")), Err(LoadError::Read { .. })));

        let strict = LibrarySource::new(dir.clone(), None);
        assert!(matches!(strict.fetch(&id("book1")), Err(LoadError::MissingAsset(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_book_is_rejected() {
        let book = Book {
            id: "void".to_string(),
            title: String::new(),
            author: String::new(),
            pages: Vec::new(),
        };
        assert_eq!(check_book(&book, None), Err(LoadError::EmptyBook("void".to_string())));
    }

    #[test]
    fn test_spawn_fetch_reports_request() {
        let (sender, receiver) = channel();
        let source: Arc<dyn BookSource> = Arc::new(MockBookSource::new(Duration::from_millis(10), None));
        spawn_fetch(source, 7, id("book2"), sender);

        let outcome = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.request, 7);
        assert_eq!(outcome.result.unwrap().id, "book2");
    }
}
