// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the AR Book application.
//!
//! Each error maps to one recovery path: scan errors keep the scanner
//! running, load errors restart it, camera errors offer a retry and init
//! errors get a single delayed retry.

use std::path::PathBuf;
use thiserror::Error;

use crate::camera::CameraConstraint;

/// A decoded code that is not a book code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("payload does not start with 'book:'")]
    MissingPrefix,
    #[error("payload has an empty book id")]
    EmptyId,
    #[error("book id '{0}' contains characters outside [a-zA-Z0-9-_]")]
    InvalidId(String),
}

/// Failure to fetch or read book data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("missing asset: {0}")]
    MissingAsset(PathBuf),
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("book '{0}' has no pages")]
    EmptyBook(String),
}

/// Camera permission or hardware failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera satisfies the {0} constraint")]
    Unsatisfied(CameraConstraint),
    #[error("no camera device available")]
    NoDevice,
    #[error("all camera attempts failed ({} tried)", .0.len())]
    AllAttemptsFailed(Vec<(CameraConstraint, CameraError)>),
}

/// A collaborator library that did not come up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{subsystem} failed to initialise: {reason}")]
pub struct InitError {
    pub subsystem: crate::session::Subsystem,
    pub reason: String,
}

impl CameraError {
    /// Message shown in the error dialog.
    pub fn user_message(&self) -> String {
        match self {
            CameraError::PermissionDenied => {
                "Camera access denied. Please allow camera access and try again.".to_string()
            }
            _ => "Unable to access the camera. Please check permissions and try again.".to_string(),
        }
    }
}
