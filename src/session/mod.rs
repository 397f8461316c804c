// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state and the event dispatcher.
//!
//! Everything the app knows about the current run lives in [`Session`].
//! Input arrives as [`SessionEvent`]s, handled one at a time in delivery
//! order. Side effects the session cannot perform itself (camera, fetches,
//! tracker start-up) go back out as [`Command`]s.

mod pages;
mod pipeline;
mod retry;

pub use pages::{Navigation, PageSync, Surface};
pub use pipeline::{PipelineState, ScanOutcome, ScanPipeline};
pub use retry::{InitRetry, RetryDecision};

use std::fmt;
use std::time::{Duration, Instant};

use crate::camera::CameraConsumer;
use crate::error::{CameraError, InitError, LoadError, ScanError};
use crate::gesture::{Gesture, GestureRecognizer, GestureThresholds, GestureUpdate};
use crate::models::{Book, HandFrame};
use crate::scan::BookId;
use crate::viewer::{ArAnchors, ArBook, FlipBook, PageSurface};

/// Which view is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Scanner,
    Ar,
    Book,
}

impl ViewState {
    /// Camera consumer while this view is up.
    pub fn camera_consumer(&self) -> CameraConsumer {
        match self {
            ViewState::Scanner => CameraConsumer::Scanner,
            ViewState::Ar => CameraConsumer::ArTracker,
            ViewState::Book => CameraConsumer::HandTracker,
        }
    }

    fn subsystem(&self) -> Option<Subsystem> {
        match self {
            ViewState::Scanner => None,
            ViewState::Ar => Some(Subsystem::ArTracker),
            ViewState::Book => Some(Subsystem::HandTracker),
        }
    }
}

/// External tracker that must be started before its view works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    ArTracker,
    HandTracker,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Subsystem::ArTracker => "AR tracker",
            Subsystem::HandTracker => "hand tracker",
        })
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    /// The code reader decoded a payload.
    PayloadDecoded(String),
    BookFetched { request: u64, result: Result<Book, LoadError> },
    Navigate { origin: Surface, nav: Navigation },
    /// Flip between the AR and flip book views.
    ToggleMode,
    SwitchView(ViewState),
    Rescan,
    CameraStarted(CameraConsumer),
    CameraFailed(CameraError),
    RetryCamera,
    DismissError,
    HandFrame(HandFrame, Instant),
    TargetFound(usize),
    TargetLost(usize),
    SubsystemInitFailed(InitError, Instant),
    SubsystemReady(Subsystem),
    Tick(Instant),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartCamera(CameraConsumer),
    StopCamera,
    FetchBook { request: u64, id: BookId },
    InitSubsystem(Subsystem),
}

/// The loaded book and both of its surfaces.
#[derive(Debug)]
struct LoadedBook {
    ar: ArBook,
    flip: FlipBook,
}

pub struct Session {
    view: ViewState,
    pipeline: ScanPipeline,
    loaded: Option<LoadedBook>,
    pages: PageSync,
    anchors: ArAnchors,
    recognizer: GestureRecognizer,
    gesture: Option<Gesture>,
    camera_owner: Option<CameraConsumer>,
    camera_failed: bool,
    error: Option<String>,
    last_scan_error: Option<ScanError>,
    retry: InitRetry,
    notices: Vec<String>,
}

impl Session {
    pub fn new(thresholds: GestureThresholds, init_retry_delay: Duration) -> Self {
        Self {
            view: ViewState::Scanner,
            pipeline: ScanPipeline::new(),
            loaded: None,
            pages: PageSync::new(),
            anchors: ArAnchors::new(),
            recognizer: GestureRecognizer::new(thresholds),
            gesture: None,
            camera_owner: None,
            camera_failed: false,
            error: None,
            last_scan_error: None,
            retry: InitRetry::new(init_retry_delay),
            notices: Vec::new(),
        }
    }

    /// Commands to run once at start-up.
    pub fn start(&mut self) -> Vec<Command> {
        vec![Command::StartCamera(CameraConsumer::Scanner)]
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn pipeline(&self) -> &ScanPipeline {
        &self.pipeline
    }

    pub fn is_loading(&self) -> bool {
        self.pipeline.is_loading()
    }

    pub fn book(&self) -> Option<&Book> {
        self.loaded.as_ref().map(|l| l.ar.book())
    }

    pub fn ar_book(&self) -> Option<&ArBook> {
        self.loaded.as_ref().map(|l| &l.ar)
    }

    pub fn flip_book(&self) -> Option<&FlipBook> {
        self.loaded.as_ref().map(|l| &l.flip)
    }

    pub fn current_page(&self) -> usize {
        self.pages.current()
    }

    pub fn total_pages(&self) -> usize {
        self.loaded.as_ref().map(|l| l.ar.total_pages()).unwrap_or(0)
    }

    pub fn anchors(&self) -> &ArAnchors {
        &self.anchors
    }

    pub fn anchors_mut(&mut self) -> &mut ArAnchors {
        &mut self.anchors
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    /// Gesture label currently on screen.
    pub fn gesture(&self) -> Option<Gesture> {
        self.gesture
    }

    pub fn camera_owner(&self) -> Option<CameraConsumer> {
        self.camera_owner
    }

    pub fn camera_failed(&self) -> bool {
        self.camera_failed
    }

    /// Message for the error dialog.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_scan_error(&self) -> Option<&ScanError> {
        self.last_scan_error.as_ref()
    }

    /// Status lines produced since the last call.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<Command> {
        match event {
            SessionEvent::PayloadDecoded(payload) => self.on_payload(&payload),
            SessionEvent::BookFetched { request, result } => self.on_fetched(request, result),
            SessionEvent::Navigate { origin, nav } => {
                self.navigate(origin, nav);
                Vec::new()
            }
            SessionEvent::ToggleMode => match self.view {
                ViewState::Ar => self.enter(ViewState::Book),
                ViewState::Book => self.enter(ViewState::Ar),
                ViewState::Scanner => Vec::new(),
            },
            SessionEvent::SwitchView(view) => {
                if view == self.view {
                    Vec::new()
                } else if view == ViewState::Scanner {
                    self.rescan()
                } else {
                    self.enter(view)
                }
            }
            SessionEvent::Rescan => self.rescan(),
            SessionEvent::CameraStarted(consumer) => {
                log::info!("Camera running for {:?}", consumer);
                self.camera_owner = Some(consumer);
                self.camera_failed = false;
                Vec::new()
            }
            SessionEvent::CameraFailed(e) => {
                log::error!("Camera error: {}", e);
                self.camera_owner = None;
                self.camera_failed = true;
                self.error = Some(e.user_message());
                self.notice(format!("Camera error: {}", e));
                Vec::new()
            }
            SessionEvent::RetryCamera => {
                self.error = None;
                self.camera_failed = false;
                vec![Command::StartCamera(self.view.camera_consumer())]
            }
            SessionEvent::DismissError => {
                self.error = None;
                Vec::new()
            }
            SessionEvent::HandFrame(frame, now) => {
                self.on_hand_frame(&frame, now);
                Vec::new()
            }
            SessionEvent::TargetFound(target) => {
                self.anchors.target_found(target);
                let status = self.anchors.status();
                self.notice(status);
                Vec::new()
            }
            SessionEvent::TargetLost(target) => {
                self.anchors.target_lost(target);
                let status = self.anchors.status();
                self.notice(status);
                Vec::new()
            }
            SessionEvent::SubsystemInitFailed(error, now) => {
                let decision = self.retry.on_failure(&error, now);
                if decision == RetryDecision::GiveUp {
                    self.notice(format!("{}", error));
                }
                Vec::new()
            }
            SessionEvent::SubsystemReady(subsystem) => {
                log::info!("{} ready", subsystem);
                self.retry.on_ready(subsystem);
                Vec::new()
            }
            SessionEvent::Tick(now) => {
                if self.recognizer.poll(now) == Some(GestureUpdate::Hide) {
                    self.gesture = None;
                }
                self.retry
                    .due(now)
                    .into_iter()
                    .map(|subsystem| {
                        log::info!("Retrying {} start-up", subsystem);
                        Command::InitSubsystem(subsystem)
                    })
                    .collect()
            }
        }
    }

    fn on_payload(&mut self, payload: &str) -> Vec<Command> {
        match self.pipeline.on_payload(payload) {
            ScanOutcome::Fetch { request, id } => {
                self.last_scan_error = None;
                self.notice(format!("QR code detected: {}", payload));
                vec![Command::StopCamera, Command::FetchBook { request, id }]
            }
            ScanOutcome::Rejected(e) => {
                self.notice(format!("Invalid QR code format: {}", e));
                self.last_scan_error = Some(e);
                Vec::new()
            }
            ScanOutcome::Ignored => Vec::new(),
        }
    }

    fn on_fetched(&mut self, request: u64, result: Result<Book, LoadError>) -> Vec<Command> {
        match self.pipeline.on_fetched(request, result) {
            Some(Ok(book)) => {
                log::info!("Displaying '{}' ({} pages)", book.title, book.total_pages());
                self.notice(format!("Loaded '{}' by {}", book.title, book.author));
                self.loaded = Some(LoadedBook {
                    ar: ArBook::new(book.clone()),
                    flip: FlipBook::new(book),
                });
                self.pages.reset();
                self.enter(ViewState::Ar)
            }
            Some(Err(e)) => {
                self.error = Some(format!("Error loading book: {}", e));
                self.notice(format!("Error loading book: {}", e));
                self.view = ViewState::Scanner;
                vec![Command::StartCamera(CameraConsumer::Scanner)]
            }
            None => Vec::new(),
        }
    }

    /// Show a book view. Ignored when no book is loaded.
    fn enter(&mut self, view: ViewState) -> Vec<Command> {
        if self.loaded.is_none() {
            log::warn!("No book loaded, staying on {:?}", self.view);
            return Vec::new();
        }
        log::info!("View {:?} -> {:?}", self.view, view);
        self.view = view;
        self.recognizer.reset();
        self.gesture = None;

        let mut commands = vec![Command::StartCamera(view.camera_consumer())];
        if let Some(subsystem) = view.subsystem() {
            commands.push(Command::InitSubsystem(subsystem));
        }
        commands
    }

    fn rescan(&mut self) -> Vec<Command> {
        log::info!("Rescanning");
        self.loaded = None;
        self.pages.reset();
        self.pipeline.rescan();
        self.recognizer.reset();
        self.gesture = None;
        self.retry.clear();
        self.view = ViewState::Scanner;
        vec![Command::StartCamera(CameraConsumer::Scanner)]
    }

    fn navigate(&mut self, origin: Surface, nav: Navigation) -> Option<usize> {
        let loaded = self.loaded.as_mut()?;
        let LoadedBook { ar, flip } = loaded;
        match origin {
            Surface::Ar => self.pages.navigate(nav, ar, flip),
            Surface::Flip => self.pages.navigate(nav, flip, ar),
        }
    }

    fn on_hand_frame(&mut self, frame: &HandFrame, now: Instant) {
        let seen = self.recognizer.process(frame, now);
        match seen.update {
            Some(GestureUpdate::Show(gesture)) => {
                self.gesture = Some(gesture);
                self.notice(format!("Detected gesture: {}", gesture));
            }
            Some(GestureUpdate::Hide) => self.gesture = None,
            None => {}
        }

        let Some(motion) = seen.motion else {
            return;
        };
        let origin = match self.view {
            ViewState::Ar => Surface::Ar,
            ViewState::Book => Surface::Flip,
            ViewState::Scanner => return,
        };
        let nav = match motion {
            Gesture::SwipeLeft => Navigation::Next,
            Gesture::SwipeRight => Navigation::Prev,
            _ => return,
        };
        self.navigate(origin, nav);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraConstraint, CameraManager, SimulatedCamera};
    use crate::gesture::synthetic::{right_hand, Placement, Pose};
    use crate::io::source::{BookSource, MockBookSource};
    use crate::models::landmark::{RING_MCP, RING_TIP};

    fn session() -> Session {
        Session::new(GestureThresholds::default(), Duration::from_millis(1000))
    }

    /// Run commands against a mock source and camera, feeding results back.
    fn drive(session: &mut Session, commands: Vec<Command>) {
        let source = MockBookSource::new(Duration::ZERO, None);
        let mut cameras = CameraManager::new(SimulatedCamera::new(true, false), CameraConstraint::default_chain());
        let mut queue = commands;
        while !queue.is_empty() {
            let mut next = Vec::new();
            for command in queue {
                let event = match command {
                    Command::FetchBook { request, id } => {
                        Some(SessionEvent::BookFetched { request, result: source.fetch(&id) })
                    }
                    Command::StartCamera(consumer) => Some(match cameras.acquire(consumer) {
                        Ok(_) => SessionEvent::CameraStarted(consumer),
                        Err(e) => SessionEvent::CameraFailed(e),
                    }),
                    Command::StopCamera => {
                        cameras.release();
                        None
                    }
                    Command::InitSubsystem(subsystem) => Some(SessionEvent::SubsystemReady(subsystem)),
                };
                if let Some(event) = event {
                    next.extend(session.handle(event));
                }
            }
            queue = next;
        }
    }

    fn load(session: &mut Session, payload: &str) {
        let commands = session.handle(SessionEvent::PayloadDecoded(payload.to_string()));
        drive(session, commands);
    }

    #[test]
    fn test_scan_to_ar_view() {
        let mut session = session();
        assert_eq!(session.start(), vec![Command::StartCamera(CameraConsumer::Scanner)]);

        let commands = session.handle(SessionEvent::PayloadDecoded("book:book1".to_string()));
        assert!(session.is_loading());
        assert!(matches!(commands.as_slice(), [Command::StopCamera, Command::FetchBook { .. }]));

        drive(&mut session, commands);
        assert_eq!(session.total_pages(), 8);
        assert_eq!(session.view(), ViewState::Ar);
        assert_eq!(session.camera_owner(), Some(CameraConsumer::ArTracker));
        assert!(matches!(session.pipeline().state(), PipelineState::Displaying { .. }));
    }

    #[test]
    fn test_invalid_payload_keeps_scanning() {
        let mut session = session();
        assert!(session.handle(SessionEvent::PayloadDecoded("movie:abc-123".to_string())).is_empty());
        assert_eq!(session.view(), ViewState::Scanner);
        assert_eq!(session.pipeline().state(), &PipelineState::Scanning);
        assert_eq!(session.last_scan_error(), Some(&ScanError::MissingPrefix));
        assert!(session.error().is_none());
    }

    #[test]
    fn test_missing_book_surfaces_error_and_restarts_scanner() {
        let mut session = session();
        load(&mut session, "book:missing-volume");
        assert_eq!(session.view(), ViewState::Scanner);
        assert!(session.error().unwrap_or_default().starts_with("Error loading book"));
        assert_eq!(session.camera_owner(), Some(CameraConsumer::Scanner));
        assert_eq!(session.pipeline().state(), &PipelineState::Scanning);

        session.handle(SessionEvent::DismissError);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_stale_fetch_is_ignored_after_rescan() {
        let mut session = session();
        let commands = session.handle(SessionEvent::PayloadDecoded("book:book1".to_string()));
        let Some(Command::FetchBook { request, .. }) = commands.last().cloned() else {
            panic!("expected a fetch");
        };
        session.handle(SessionEvent::Rescan);

        let book = MockBookSource::catalog("book1").unwrap();
        assert!(session.handle(SessionEvent::BookFetched { request, result: Ok(book) }).is_empty());
        assert_eq!(session.view(), ViewState::Scanner);
        assert!(session.book().is_none());
    }

    #[test]
    fn test_navigation_keeps_surfaces_in_step() {
        let mut session = session();
        load(&mut session, "book:book2");

        session.handle(SessionEvent::Navigate { origin: Surface::Ar, nav: Navigation::Next });
        session.handle(SessionEvent::Navigate { origin: Surface::Ar, nav: Navigation::Next });
        assert_eq!(session.flip_book().map(|f| f.current_page()), Some(2));

        session.handle(SessionEvent::Navigate { origin: Surface::Flip, nav: Navigation::Goto(-1) });
        session.handle(SessionEvent::Navigate { origin: Surface::Flip, nav: Navigation::Goto(4) });
        assert_eq!(session.current_page(), 2);
        assert_eq!(session.ar_book().map(|a| a.current_page()), Some(2));
    }

    #[test]
    fn test_toggle_mode_moves_camera_to_hand_tracker() {
        let mut session = session();
        assert!(session.handle(SessionEvent::ToggleMode).is_empty());

        load(&mut session, "book:book1");
        let commands = session.handle(SessionEvent::ToggleMode);
        assert_eq!(session.view(), ViewState::Book);
        assert_eq!(
            commands,
            vec![
                Command::StartCamera(CameraConsumer::HandTracker),
                Command::InitSubsystem(Subsystem::HandTracker)
            ]
        );
        session.handle(SessionEvent::ToggleMode);
        assert_eq!(session.view(), ViewState::Ar);
    }

    #[test]
    fn test_swipe_gesture_turns_the_page() {
        let mut session = session();
        load(&mut session, "book:book1");
        session.handle(SessionEvent::SwitchView(ViewState::Book));

        let now = Instant::now();
        for i in 0..10 {
            let hand = right_hand(Pose::OpenPalm, Placement::at(0.8 - 0.04 * i as f32, 0.7));
            session.handle(SessionEvent::HandFrame(HandFrame::single(hand), now));
        }
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.ar_book().map(|a| a.current_page()), Some(1));
    }

    #[test]
    fn test_every_swipe_turns_a_page() {
        let mut session = session();
        load(&mut session, "book:book1");
        session.handle(SessionEvent::SwitchView(ViewState::Book));

        // Ring finger raised over a pointing hand: no static label.
        let unlabelled = |x: f32| {
            let mut hand = right_hand(Pose::Point, Placement::at(x, 0.7));
            hand.landmarks[RING_TIP].y = hand.landmarks[RING_MCP].y - 0.1;
            hand
        };
        let now = Instant::now();
        for _ in 0..3 {
            session.handle(SessionEvent::HandFrame(HandFrame::empty(), now));
            for i in 0..10 {
                let frame = HandFrame::single(unlabelled(0.8 - 0.04 * i as f32));
                session.handle(SessionEvent::HandFrame(frame, now));
            }
        }

        assert_eq!(session.current_page(), 3);
        assert_eq!(session.gesture(), Some(Gesture::SwipeLeft));
    }

    #[test]
    fn test_gesture_label_hides_after_hands_leave() {
        let mut session = session();
        let t0 = Instant::now();
        let fist = HandFrame::single(right_hand(Pose::Fist, Placement::default()));
        session.handle(SessionEvent::HandFrame(fist, t0));
        assert_eq!(session.gesture(), Some(Gesture::Fist));

        session.handle(SessionEvent::HandFrame(HandFrame::empty(), t0));
        session.handle(SessionEvent::Tick(t0 + Duration::from_millis(1500)));
        assert_eq!(session.gesture(), None);
    }

    #[test]
    fn test_camera_failure_and_retry() {
        let mut session = session();
        session.handle(SessionEvent::CameraFailed(CameraError::PermissionDenied));
        assert!(session.camera_failed());
        assert!(session.error().unwrap_or_default().contains("denied"));

        let commands = session.handle(SessionEvent::RetryCamera);
        assert_eq!(commands, vec![Command::StartCamera(CameraConsumer::Scanner)]);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_init_failure_retries_once() {
        let mut session = session();
        let t0 = Instant::now();
        let failure = InitError {
            subsystem: Subsystem::ArTracker,
            reason: "marker library missing".to_string(),
        };
        session.handle(SessionEvent::SubsystemInitFailed(failure.clone(), t0));
        assert!(session.handle(SessionEvent::Tick(t0)).is_empty());
        assert_eq!(
            session.handle(SessionEvent::Tick(t0 + Duration::from_secs(1))),
            vec![Command::InitSubsystem(Subsystem::ArTracker)]
        );

        session.take_notices();
        session.handle(SessionEvent::SubsystemInitFailed(failure, t0));
        assert!(session.handle(SessionEvent::Tick(t0 + Duration::from_secs(10))).is_empty());
        assert_eq!(session.take_notices().len(), 1);
    }

    #[test]
    fn test_target_events_update_status() {
        let mut session = session();
        session.handle(SessionEvent::TargetFound(0));
        session.handle(SessionEvent::TargetLost(0));
        let notices = session.take_notices();
        assert_eq!(notices.last().map(String::as_str), Some("Target 1 (tracking with motion)"));
        assert_eq!(session.anchors().active_target(), Some(0));
    }
}
