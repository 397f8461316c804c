// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AR Book
//!
//! Scan a book code, load the book, and read it either as an overlay on a
//! tracked marker or as a flip book. Pages can be turned with hand
//! gestures recognized from hand landmarks.

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod gesture;
pub mod io;
pub mod models;
pub mod scan;
pub mod session;
pub mod ui;
pub mod util;
pub mod viewer;
