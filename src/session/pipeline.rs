// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scan-to-load state machine.
//!
//! Scanning -> Loading on a valid payload, Loading -> Displaying when the
//! fetch succeeds, Loading -> Scanning when it fails. Each fetch carries a
//! request id; results for any other id are stale and dropped.

use crate::error::{LoadError, ScanError};
use crate::models::Book;
use crate::scan::{parse_payload, BookId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Scanning,
    Loading { request: u64, id: BookId },
    Displaying { id: BookId },
}

/// What a decoded payload did to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Start fetching `id`, tagging the result with `request`.
    Fetch { request: u64, id: BookId },
    /// Not a book code; keep scanning.
    Rejected(ScanError),
    /// Not scanning right now.
    Ignored,
}

#[derive(Debug)]
pub struct ScanPipeline {
    state: PipelineState,
    next_request: u64,
}

impl Default for ScanPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanPipeline {
    pub fn new() -> Self {
        Self {
            state: PipelineState::Scanning,
            next_request: 1,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PipelineState::Loading { .. })
    }

    pub fn on_payload(&mut self, payload: &str) -> ScanOutcome {
        if self.state != PipelineState::Scanning {
            log::debug!("Ignoring payload while {:?}", self.state);
            return ScanOutcome::Ignored;
        }
        match parse_payload(payload) {
            Ok(id) => {
                let request = self.next_request;
                self.next_request += 1;
                log::info!("Scanned book {} (request {})", id, request);
                self.state = PipelineState::Loading { request, id: id.clone() };
                ScanOutcome::Fetch { request, id }
            }
            Err(e) => {
                log::warn!("Rejected payload {:?}: {}", payload, e);
                ScanOutcome::Rejected(e)
            }
        }
    }

    /// Apply a fetch result. Returns `None` for stale results.
    pub fn on_fetched(&mut self, request: u64, result: Result<Book, LoadError>) -> Option<Result<Book, LoadError>> {
        let PipelineState::Loading { request: pending, id } = &self.state else {
            log::debug!("Dropping fetch result {} outside loading", request);
            return None;
        };
        if *pending != request {
            log::debug!("Dropping stale fetch result {} (waiting for {})", request, pending);
            return None;
        }
        let id = id.clone();

        self.state = match &result {
            Ok(_) => PipelineState::Displaying { id },
            Err(e) => {
                log::error!("Failed to load book {}: {}", id, e);
                PipelineState::Scanning
            }
        };
        Some(result)
    }

    /// Back to scanning, abandoning any fetch in flight.
    pub fn rescan(&mut self) {
        self.state = PipelineState::Scanning;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::source::MockBookSource;
    use std::path::PathBuf;

    #[test]
    fn test_valid_payload_starts_loading() {
        let mut pipeline = ScanPipeline::new();
        let ScanOutcome::Fetch { request, id } = pipeline.on_payload("book:book2") else {
            panic!("expected a fetch");
        };
        assert_eq!(id.as_str(), "book2");
        assert!(pipeline.is_loading());

        // A second code while loading does nothing.
        assert_eq!(pipeline.on_payload("book:book1"), ScanOutcome::Ignored);

        let book = MockBookSource::catalog("book2").unwrap();
        assert!(pipeline.on_fetched(request, Ok(book)).is_some());
        assert_eq!(pipeline.state(), &PipelineState::Displaying { id });
    }

    #[test]
    fn test_rejected_payload_keeps_scanning() {
        let mut pipeline = ScanPipeline::new();
        assert_eq!(pipeline.on_payload("movie:abc-123"), ScanOutcome::Rejected(ScanError::MissingPrefix));
        assert_eq!(pipeline.on_payload("book:"), ScanOutcome::Rejected(ScanError::EmptyId));
        assert_eq!(pipeline.state(), &PipelineState::Scanning);
    }

    #[test]
    fn test_failed_fetch_returns_to_scanning() {
        let mut pipeline = ScanPipeline::new();
        let ScanOutcome::Fetch { request, .. } = pipeline.on_payload("book:nope") else {
            panic!("expected a fetch");
        };
        let err = LoadError::MissingAsset(PathBuf::from("books/nope"));
        assert_eq!(pipeline.on_fetched(request, Err(err.clone())), Some(Err(err)));
        assert_eq!(pipeline.state(), &PipelineState::Scanning);
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut pipeline = ScanPipeline::new();
        let ScanOutcome::Fetch { request: first, .. } = pipeline.on_payload("book:book1") else {
            panic!("expected a fetch");
        };
        pipeline.rescan();
        let ScanOutcome::Fetch { request: second, .. } = pipeline.on_payload("book:book2") else {
            panic!("expected a fetch");
        };
        assert_ne!(first, second);

        let book1 = MockBookSource::catalog("book1").unwrap();
        assert_eq!(pipeline.on_fetched(first, Ok(book1)), None);
        assert!(pipeline.is_loading());
    }
}
