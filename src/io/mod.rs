// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O for books, landmark recordings and page images.

pub mod media;
pub mod serialization;
pub mod source;
