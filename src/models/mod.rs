// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: books and hand landmarks.

pub mod book;
pub mod landmark;

pub use book::{Book, Page, PageType};
pub use landmark::{HandFrame, HandLandmarks, Handedness, Landmark};
