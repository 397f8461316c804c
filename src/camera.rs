// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera acquisition.
//!
//! One consumer owns the camera at a time. Acquiring for a new consumer
//! stops the previous owner's stream first, then walks the constraint
//! fallback chain until a backend accepts one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CameraError;

/// Camera selection constraint, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraConstraint {
    /// Rear camera or nothing.
    ExactEnvironment,
    /// Prefer the rear camera.
    Environment,
    /// Any camera.
    Any,
}

impl CameraConstraint {
    pub fn default_chain() -> Vec<CameraConstraint> {
        vec![
            CameraConstraint::ExactEnvironment,
            CameraConstraint::Environment,
            CameraConstraint::Any,
        ]
    }
}

impl fmt::Display for CameraConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CameraConstraint::ExactEnvironment => "exact environment",
            CameraConstraint::Environment => "environment",
            CameraConstraint::Any => "any",
        };
        f.write_str(name)
    }
}

/// Who is using the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraConsumer {
    Scanner,
    ArTracker,
    HandTracker,
}

/// An open camera stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraStream {
    pub label: String,
    pub constraint: CameraConstraint,
}

/// Opens and stops camera streams.
pub trait CameraBackend {
    fn open(&mut self, constraint: CameraConstraint) -> Result<CameraStream, CameraError>;
    fn stop(&mut self, stream: &CameraStream);
}

/// Backend with no real device behind it.
#[derive(Debug, Clone)]
pub struct SimulatedCamera {
    pub available: bool,
    pub has_rear_camera: bool,
    pub permission_granted: bool,
    open_streams: usize,
}

impl SimulatedCamera {
    pub fn new(available: bool, has_rear_camera: bool) -> Self {
        Self {
            available,
            has_rear_camera,
            permission_granted: true,
            open_streams: 0,
        }
    }

    pub fn open_streams(&self) -> usize {
        self.open_streams
    }
}

impl CameraBackend for SimulatedCamera {
    fn open(&mut self, constraint: CameraConstraint) -> Result<CameraStream, CameraError> {
        if !self.permission_granted {
            return Err(CameraError::PermissionDenied);
        }
        if !self.available {
            return Err(CameraError::NoDevice);
        }
        let label = match (constraint, self.has_rear_camera) {
            (CameraConstraint::ExactEnvironment, false) => {
                return Err(CameraError::Unsatisfied(constraint));
            }
            (CameraConstraint::Any, _) | (CameraConstraint::Environment, false) => "Simulated front camera",
            (_, true) => "Simulated rear camera",
        };
        self.open_streams += 1;
        Ok(CameraStream {
            label: label.to_string(),
            constraint,
        })
    }

    fn stop(&mut self, stream: &CameraStream) {
        log::debug!("Stopping tracks of {}", stream.label);
        self.open_streams = self.open_streams.saturating_sub(1);
    }
}

/// Exclusive camera ownership over a backend.
pub struct CameraManager<B: CameraBackend> {
    backend: B,
    chain: Vec<CameraConstraint>,
    active: Option<(CameraConsumer, CameraStream)>,
}

impl<B: CameraBackend> CameraManager<B> {
    pub fn new(backend: B, chain: Vec<CameraConstraint>) -> Self {
        let chain = if chain.is_empty() { CameraConstraint::default_chain() } else { chain };
        Self {
            backend,
            chain,
            active: None,
        }
    }

    pub fn owner(&self) -> Option<CameraConsumer> {
        self.active.as_ref().map(|(consumer, _)| *consumer)
    }

    pub fn stream(&self) -> Option<&CameraStream> {
        self.active.as_ref().map(|(_, stream)| stream)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Give the camera to `consumer`, trying each constraint in order.
    pub fn acquire(&mut self, consumer: CameraConsumer) -> Result<&CameraStream, CameraError> {
        if self.owner() == Some(consumer) {
            log::debug!("{:?} already owns the camera", consumer);
        } else {
            self.release();

            let mut attempts = Vec::new();
            for &constraint in &self.chain {
                log::info!("Trying {} camera constraint for {:?}", constraint, consumer);
                match self.backend.open(constraint) {
                    Ok(stream) => {
                        log::info!("Camera '{}' granted to {:?}", stream.label, consumer);
                        self.active = Some((consumer, stream));
                        break;
                    }
                    Err(CameraError::PermissionDenied) => {
                        log::warn!("Camera permission denied");
                        return Err(CameraError::PermissionDenied);
                    }
                    Err(e) => {
                        log::warn!("Camera constraint {} failed: {}", constraint, e);
                        attempts.push((constraint, e));
                    }
                }
            }

            if self.active.is_none() {
                log::error!("All camera attempts failed");
                return Err(CameraError::AllAttemptsFailed(attempts));
            }
        }

        self.stream().ok_or(CameraError::NoDevice)
    }

    /// Stop the current stream, whoever owns it.
    pub fn release(&mut self) {
        if let Some((consumer, stream)) = self.active.take() {
            log::info!("Releasing camera held by {:?}", consumer);
            self.backend.stop(&stream);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rear_camera_satisfies_exact_constraint() {
        let mut cameras = CameraManager::new(SimulatedCamera::new(true, true), CameraConstraint::default_chain());
        let stream = cameras.acquire(CameraConsumer::Scanner).unwrap();
        assert_eq!(stream.constraint, CameraConstraint::ExactEnvironment);
        assert_eq!(cameras.owner(), Some(CameraConsumer::Scanner));
    }

    #[test]
    fn test_falls_back_when_no_rear_camera() {
        let mut cameras = CameraManager::new(SimulatedCamera::new(true, false), CameraConstraint::default_chain());
        let stream = cameras.acquire(CameraConsumer::HandTracker).unwrap();
        assert_eq!(stream.constraint, CameraConstraint::Environment);
    }

    #[test]
    fn test_all_attempts_failed() {
        let mut cameras = CameraManager::new(SimulatedCamera::new(false, false), CameraConstraint::default_chain());
        match cameras.acquire(CameraConsumer::Scanner) {
            Err(CameraError::AllAttemptsFailed(attempts)) => assert_eq!(attempts.len(), 3),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(cameras.owner(), None);
    }

    #[test]
    fn test_permission_denied_stops_the_chain() {
        let mut backend = SimulatedCamera::new(true, true);
        backend.permission_granted = false;
        let mut cameras = CameraManager::new(backend, CameraConstraint::default_chain());
        assert_eq!(cameras.acquire(CameraConsumer::Scanner), Err(CameraError::PermissionDenied));
    }

    #[test]
    fn test_switching_consumer_stops_previous_stream() {
        let mut cameras = CameraManager::new(SimulatedCamera::new(true, true), CameraConstraint::default_chain());
        cameras.acquire(CameraConsumer::Scanner).unwrap();
        cameras.acquire(CameraConsumer::ArTracker).unwrap();
        assert_eq!(cameras.owner(), Some(CameraConsumer::ArTracker));
        assert_eq!(cameras.backend().open_streams(), 1);

        // Re-acquiring for the same owner keeps the stream.
        cameras.acquire(CameraConsumer::ArTracker).unwrap();
        assert_eq!(cameras.backend().open_streams(), 1);

        cameras.release();
        assert_eq!(cameras.owner(), None);
        assert_eq!(cameras.backend().open_streams(), 0);
    }
}
