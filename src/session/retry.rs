// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! One delayed retry for trackers that fail to start.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::Subsystem;
use crate::error::InitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    /// Retry scheduled for this instant.
    Pending(Instant),
    /// Retry already used.
    Spent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAt(Instant),
    GiveUp,
}

#[derive(Debug)]
pub struct InitRetry {
    delay: Duration,
    attempts: HashMap<Subsystem, Attempt>,
}

impl InitRetry {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            attempts: HashMap::new(),
        }
    }

    pub fn on_failure(&mut self, error: &InitError, now: Instant) -> RetryDecision {
        match self.attempts.get(&error.subsystem) {
            None => {
                let at = now + self.delay;
                log::warn!("{}, retrying in {:?}", error, self.delay);
                self.attempts.insert(error.subsystem, Attempt::Pending(at));
                RetryDecision::RetryAt(at)
            }
            Some(Attempt::Pending(at)) => RetryDecision::RetryAt(*at),
            Some(Attempt::Spent) => {
                log::error!("{}, giving up", error);
                RetryDecision::GiveUp
            }
        }
    }

    pub fn on_ready(&mut self, subsystem: Subsystem) {
        self.attempts.remove(&subsystem);
    }

    /// Subsystems whose retry is due, marking each retry as used.
    pub fn due(&mut self, now: Instant) -> Vec<Subsystem> {
        let mut due = Vec::new();
        for (subsystem, attempt) in self.attempts.iter_mut() {
            if matches!(attempt, Attempt::Pending(at) if *at <= now) {
                *attempt = Attempt::Spent;
                due.push(*subsystem);
            }
        }
        due.sort_by_key(|s| *s as u8);
        due
    }

    pub fn clear(&mut self) {
        self.attempts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(subsystem: Subsystem) -> InitError {
        InitError {
            subsystem,
            reason: "library not loaded".to_string(),
        }
    }

    #[test]
    fn test_single_retry_then_give_up() {
        let mut retry = InitRetry::new(Duration::from_millis(1000));
        let t0 = Instant::now();

        assert_eq!(
            retry.on_failure(&failure(Subsystem::HandTracker), t0),
            RetryDecision::RetryAt(t0 + Duration::from_millis(1000))
        );
        assert!(retry.due(t0 + Duration::from_millis(999)).is_empty());
        assert_eq!(retry.due(t0 + Duration::from_millis(1000)), vec![Subsystem::HandTracker]);
        assert!(retry.due(t0 + Duration::from_secs(5)).is_empty());

        assert_eq!(retry.on_failure(&failure(Subsystem::HandTracker), t0), RetryDecision::GiveUp);
    }

    #[test]
    fn test_ready_resets_the_budget() {
        let mut retry = InitRetry::new(Duration::ZERO);
        let t0 = Instant::now();
        retry.on_failure(&failure(Subsystem::ArTracker), t0);
        retry.due(t0);
        retry.on_ready(Subsystem::ArTracker);
        assert!(matches!(
            retry.on_failure(&failure(Subsystem::ArTracker), t0),
            RetryDecision::RetryAt(_)
        ));
    }
}
