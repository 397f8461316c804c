// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Book and landmark recording serialization.
//!
//! Files are YAML (`.yaml`, `.yml`) or JSON (`.json`), picked from the
//! file extension.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::models::{Book, HandFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            other => bail!("Unsupported file extension: {:?}", other),
        }
    }
}

fn write<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let text = match Format::from_path(path)? {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    };
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = match format {
        Format::Yaml => serde_yaml::from_str(&text)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?,
        Format::Json => serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
    };
    Ok(value)
}

/// Export a book to YAML or JSON.
pub fn export_book(book: &Book, path: &Path) -> Result<()> {
    write(book, path)
}

/// Import a book from YAML or JSON.
pub fn import_book(path: &Path) -> Result<Book> {
    read(path)
}

/// Export recorded hand frames, one entry per camera frame.
pub fn export_recording(frames: &[HandFrame], path: &Path) -> Result<()> {
    write(frames, path)
}

pub fn import_recording(path: &Path) -> Result<Vec<HandFrame>> {
    read(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::synthetic::{right_hand, Placement, Pose};
    use crate::models::{Page, PageType};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("arbook-{}-{}", std::process::id(), name))
    }

    fn sample_book() -> Book {
        Book {
            id: "shelf-7".to_string(),
            title: "Tide Tables".to_string(),
            author: "A. Harbour".to_string(),
            pages: vec![
                Page::new(PageType::Cover, "cover.jpg", ""),
                Page::new(PageType::Content, "", "<p>Low water</p>"),
            ],
        }
    }

    #[test]
    fn test_book_yaml_and_json() {
        for name in ["book.yaml", "book.json"] {
            let path = temp_path(name);
            export_book(&sample_book(), &path).unwrap();
            let loaded = import_book(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded, sample_book());
        }
    }

    #[test]
    fn test_json_uses_catalog_field_names() {
        let path = temp_path("fields.json");
        export_book(&sample_book(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.contains("\"imagePath\""));
        assert!(text.contains("\"type\": \"cover\""));
    }

    #[test]
    fn test_recording_file() {
        let path = temp_path("recording.yml");
        let frames = vec![
            HandFrame::single(right_hand(Pose::Fist, Placement::default())),
            HandFrame::empty(),
        ];
        export_recording(&frames, &path).unwrap();
        let loaded = import_recording(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[1].hands.is_empty());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(Format::from_path(Path::new("book.txt")).is_err());
        assert!(import_book(Path::new("book")).is_err());
    }
}
