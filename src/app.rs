// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and UI logic.
//!
//! This module contains the `eframe::App` that owns the session, runs its
//! commands against the camera and the book source, and lays out the
//! panels.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::camera::{CameraConsumer, CameraManager, SimulatedCamera};
use crate::config::{AppConfig, LoaderConfig};
use crate::error::InitError;
use crate::io::media::{load_image, promote_root, resolve_asset, LoadedImage};
use crate::io::source::{spawn_fetch, BookSource, FetchOutcome, LibrarySource, MockBookSource};
use crate::models::{Book, HandFrame};
use crate::session::{Command, Navigation, Session, SessionEvent, Subsystem, Surface, ViewState};
use crate::ui::ar_view::{self, ArAction};
use crate::ui::book_view::{self, BookAction};
use crate::ui::debug_panel::{self, DebugLog};
use crate::ui::gesture_pad::{self, GesturePad};
use crate::ui::scanner_view::{self, ScannerAction, ScannerState};
use crate::ui::toolbar::{self, ToolbarAction};
use crate::ui::PageTextures;

/// How often timers are checked while nothing else repaints.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

type ImageResult = (String, Result<LoadedImage, String>);

/// Recorded landmark frames played back one per update.
struct Replay {
    frames: Vec<HandFrame>,
    cursor: usize,
}

fn book_source(loader: &LoaderConfig) -> Arc<dyn BookSource> {
    let mock = MockBookSource::new(loader.fetch_delay(), loader.assets_root.clone());
    match &loader.library_dir {
        Some(dir) => Arc::new(LibrarySource::new(dir.clone(), Some(mock))),
        None => Arc::new(mock),
    }
}

/// Main application state.
pub struct ArBookApp {
    config: AppConfig,
    session: Session,
    cameras: CameraManager<SimulatedCamera>,
    source: Arc<dyn BookSource>,
    /// Directories page image paths are resolved against, in order.
    image_roots: Vec<PathBuf>,
    fetch_sender: Sender<FetchOutcome>,
    fetch_receiver: Receiver<FetchOutcome>,
    /// Receiver for background page image loading
    image_loader: Option<Receiver<ImageResult>>,
    /// Book the current textures belong to
    textures_for: Option<String>,
    textures: PageTextures,
    scanner: ScannerState,
    gesture_pad: GesturePad,
    debug_log: DebugLog,
    replay: Option<Replay>,
    recording: Option<Vec<HandFrame>>,
}

impl ArBookApp {
    pub fn new(config: AppConfig) -> Self {
        let cameras = CameraManager::new(
            SimulatedCamera::new(config.camera.simulated_available, config.camera.simulated_rear_camera),
            config.camera.fallback.clone(),
        );
        let image_roots = [&config.loader.library_dir, &config.loader.assets_root]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        let (fetch_sender, fetch_receiver) = channel();

        let mut app = Self {
            session: Session::new(config.gestures.clone(), config.init_retry_delay()),
            source: book_source(&config.loader),
            debug_log: DebugLog::new(config.debug_log_lines),
            cameras,
            image_roots,
            fetch_sender,
            fetch_receiver,
            image_loader: None,
            textures_for: None,
            textures: PageTextures::new(),
            scanner: ScannerState::default(),
            gesture_pad: GesturePad::default(),
            replay: None,
            recording: None,
            config,
        };

        app.debug_log.push(log::Level::Info, "Starting camera initialization");
        let commands = app.session.start();
        app.execute(commands);
        app
    }

    /// Hand an event to the session and run whatever it asks for.
    fn dispatch(&mut self, event: SessionEvent) {
        let commands = self.session.handle(event);
        self.execute(commands);
    }

    fn execute(&mut self, commands: Vec<Command>) {
        let mut queue: VecDeque<Command> = commands.into();
        while let Some(command) = queue.pop_front() {
            let follow_up = match command {
                Command::StartCamera(consumer) => match self.cameras.acquire(consumer) {
                    Ok(stream) => {
                        let message = format!("Camera started for {:?}: {}", consumer, stream.label);
                        self.debug_log.push(log::Level::Info, message);
                        Some(SessionEvent::CameraStarted(consumer))
                    }
                    Err(e) => Some(SessionEvent::CameraFailed(e)),
                },
                Command::StopCamera => {
                    self.cameras.release();
                    None
                }
                Command::FetchBook { request, id } => {
                    self.debug_log.push(log::Level::Info, format!("Loading book {}", id));
                    spawn_fetch(self.source.clone(), request, id, self.fetch_sender.clone());
                    None
                }
                Command::InitSubsystem(subsystem) => Some(self.init_subsystem(subsystem)),
            };
            if let Some(event) = follow_up {
                queue.extend(self.session.handle(event));
            }
        }

        for notice in self.session.take_notices() {
            self.debug_log.push(log::Level::Info, notice);
        }
    }

    /// Trackers come up only when they hold the camera.
    fn init_subsystem(&self, subsystem: Subsystem) -> SessionEvent {
        let needs = match subsystem {
            Subsystem::ArTracker => CameraConsumer::ArTracker,
            Subsystem::HandTracker => CameraConsumer::HandTracker,
        };
        if self.cameras.owner() == Some(needs) {
            SessionEvent::SubsystemReady(subsystem)
        } else {
            SessionEvent::SubsystemInitFailed(
                InitError {
                    subsystem,
                    reason: "camera stream not available".to_string(),
                },
                Instant::now(),
            )
        }
    }

    fn poll_fetches(&mut self) {
        while let Ok(FetchOutcome { request, result }) = self.fetch_receiver.try_recv() {
            self.dispatch(SessionEvent::BookFetched { request, result });
        }

        let current = self.session.book().map(|b| b.id.clone());
        if current != self.textures_for {
            match self.session.book().cloned() {
                Some(book) => self.load_page_images(&book),
                None => {
                    self.textures.clear();
                    self.image_loader = None;
                }
            }
            self.textures_for = current;
        }
    }

    /// Decode a book's page images in the background.
    fn load_page_images(&mut self, book: &Book) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.textures.clear();

        let mut image_paths: Vec<String> = book
            .pages
            .iter()
            .map(|p| p.image_path.clone())
            .filter(|p| !p.is_empty())
            .collect();
        image_paths.dedup();
        let roots = self.image_roots.clone();

        std::thread::spawn(move || {
            for image_path in image_paths {
                let path = roots
                    .iter()
                    .map(|root| resolve_asset(Some(root.as_path()), &image_path))
                    .find(|p| p.exists())
                    .unwrap_or_else(|| resolve_asset(None, &image_path));
                let result = load_image(&path).map_err(|e| format!("{:#}", e));
                if sender.send((image_path, result)).is_err() {
                    break;
                }
            }
        });
    }

    fn poll_images(&mut self, ctx: &egui::Context) {
        let mut finished = false;
        if let Some(ref receiver) = self.image_loader {
            loop {
                match receiver.try_recv() {
                    Ok((key, Ok(loaded))) => {
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(loaded.size(), &loaded.pixels);
                        let texture = ctx.load_texture(key.clone(), color_image, egui::TextureOptions::LINEAR);
                        log::debug!("Page image {} ({}x{})", key, loaded.width, loaded.height);
                        self.textures.insert(key, texture);
                    }
                    Ok((key, Err(e))) => {
                        log::warn!("No image for page {}: {}", key, e);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            self.image_loader = None;
        }
    }

    /// Open a book file by scanning its id against the file's directory.
    fn open_book_file(&mut self, path: PathBuf) {
        let (Some(dir), Some(stem)) = (path.parent(), path.file_stem().and_then(|s| s.to_str())) else {
            self.debug_log.push(log::Level::Error, format!("Cannot open {}", path.display()));
            return;
        };
        let mock = MockBookSource::new(Duration::ZERO, self.config.loader.assets_root.clone());
        self.source = Arc::new(LibrarySource::new(dir.to_path_buf(), Some(mock)));
        promote_root(&mut self.image_roots, dir);
        let payload = format!("book:{}", stem);

        if self.session.view() != ViewState::Scanner || self.session.is_loading() {
            self.dispatch(SessionEvent::Rescan);
        }
        self.dispatch(SessionEvent::PayloadDecoded(payload));
    }

    fn export_book(&mut self, path: &Path) {
        let Some(book) = self.session.book() else { return };
        match crate::io::serialization::export_book(book, path) {
            Ok(()) => self.debug_log.push(log::Level::Info, format!("Exported book to {}", path.display())),
            Err(e) => self.debug_log.push(log::Level::Error, format!("Failed to export book: {:#}", e)),
        }
    }

    fn load_recording(&mut self, path: &Path) {
        match crate::io::serialization::import_recording(path) {
            Ok(frames) => {
                self.debug_log.push(
                    log::Level::Info,
                    format!("Replaying {} frames from {}", frames.len(), path.display()),
                );
                self.replay = Some(Replay { frames, cursor: 0 });
            }
            Err(e) => self.debug_log.push(log::Level::Error, format!("Failed to load recording: {:#}", e)),
        }
    }

    fn save_recording(&mut self, path: &Path) {
        let Some(frames) = self.recording.take() else { return };
        match crate::io::serialization::export_recording(&frames, path) {
            Ok(()) => self.debug_log.push(
                log::Level::Info,
                format!("Saved {} frames to {}", frames.len(), path.display()),
            ),
            Err(e) => self.debug_log.push(log::Level::Error, format!("Failed to save recording: {:#}", e)),
        }
    }

    /// Next frame from the replay, if one is running.
    fn next_replay_frame(&mut self) -> Option<HandFrame> {
        let replay = self.replay.as_mut()?;
        let frame = replay.frames.get(replay.cursor).cloned();
        replay.cursor += 1;
        if frame.is_none() {
            self.replay = None;
            self.debug_log.push(log::Level::Info, "Replay finished");
        }
        frame
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Book...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Books", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.open_book_file(path);
                        }
                        ui.close_menu();
                    }
                    ui.add_enabled_ui(self.session.book().is_some(), |ui| {
                        ui.menu_button("Export Book", |ui| {
                            if ui.button("Export as YAML...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("YAML", &["yaml", "yml"])
                                    .set_file_name("book.yaml")
                                    .save_file()
                                {
                                    self.export_book(&path);
                                }
                                ui.close_menu();
                            }
                            if ui.button("Export as JSON...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("JSON", &["json"])
                                    .set_file_name("book.json")
                                    .save_file()
                                {
                                    self.export_book(&path);
                                }
                                ui.close_menu();
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Load Landmark Recording...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Recordings", &["yaml", "yml", "json"])
                            .pick_file()
                        {
                            self.load_recording(&path);
                        }
                        ui.close_menu();
                    }
                    if self.recording.is_none() {
                        if ui.button("Start Recording").clicked() {
                            self.recording = Some(Vec::new());
                            self.debug_log.push(log::Level::Info, "Recording hand frames");
                            ui.close_menu();
                        }
                    } else if ui.button("Stop and Save Recording...").clicked() {
                        match rfd::FileDialog::new()
                            .add_filter("YAML", &["yaml", "yml"])
                            .add_filter("JSON", &["json"])
                            .set_file_name("recording.yaml")
                            .save_file()
                        {
                            Some(path) => self.save_recording(&path),
                            None => self.recording = None,
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Rescan").clicked() {
                        self.dispatch(SessionEvent::Rescan);
                        ui.close_menu();
                    }
                    if ui.add_enabled(self.session.book().is_some(), egui::Button::new("Toggle Mode")).clicked() {
                        self.dispatch(SessionEvent::ToggleMode);
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn error_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.session.error().map(str::to_string) else {
            return;
        };
        let camera_failed = self.session.camera_failed();
        let mut event = None;

        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if camera_failed && ui.button("Retry").clicked() {
                        event = Some(SessionEvent::RetryCamera);
                    }
                    if ui.button("OK").clicked() {
                        event = Some(SessionEvent::DismissError);
                    }
                });
            });

        if let Some(event) = event {
            self.dispatch(event);
        }
    }
}

impl eframe::App for ArBookApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetches();
        self.poll_images(ctx);
        self.dispatch(SessionEvent::Tick(Instant::now()));

        // Keep the spinner and replay moving
        if self.session.is_loading() || self.replay.is_some() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(TICK_INTERVAL);
        }

        self.menu_bar(ctx);

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, self.session.view(), self.session.book().is_some()))
            .inner;
        match toolbar_action {
            ToolbarAction::SwitchView(view) => self.dispatch(SessionEvent::SwitchView(view)),
            ToolbarAction::ToggleMode => self.dispatch(SessionEvent::ToggleMode),
            ToolbarAction::None => {}
        }

        // Hand tracking and debug output (right side)
        let shown = self.session.gesture();
        let pad_frame = egui::SidePanel::right("tracking")
            .default_width(280.0)
            .show(ctx, |ui| {
                let frame = gesture_pad::show(ui, &mut self.gesture_pad, shown);
                ui.separator();
                debug_panel::show(ui, &self.debug_log);
                frame
            })
            .inner;

        let hand_frame = self.next_replay_frame().or(pad_frame);
        if let Some(frame) = hand_frame {
            if let Some(recording) = self.recording.as_mut() {
                recording.push(frame.clone());
            }
            self.dispatch(SessionEvent::HandFrame(frame, Instant::now()));
        }

        // Arrow keys turn pages on the visible surface
        if !ctx.wants_keyboard_input() {
            let origin = match self.session.view() {
                ViewState::Ar => Some(Surface::Ar),
                ViewState::Book => Some(Surface::Flip),
                ViewState::Scanner => None,
            };
            if let Some(origin) = origin {
                if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
                    self.dispatch(SessionEvent::Navigate { origin, nav: Navigation::Next });
                }
                if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
                    self.dispatch(SessionEvent::Navigate { origin, nav: Navigation::Prev });
                }
            }
        }

        enum CentralAction {
            None,
            Scanner(ScannerAction),
            Ar(ArAction),
            Book(BookAction),
        }

        let central_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                // Show loading overlay if loading
                if self.session.is_loading() {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new("Loading book...")
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    return CentralAction::None;
                }

                match (self.session.view(), self.session.ar_book(), self.session.flip_book()) {
                    (ViewState::Ar, Some(ar), _) => {
                        CentralAction::Ar(ar_view::show(ui, ar, self.session.anchors(), &self.textures))
                    }
                    (ViewState::Book, _, Some(flip)) => {
                        CentralAction::Book(book_view::show(ui, flip, &self.textures))
                    }
                    _ => CentralAction::Scanner(scanner_view::show(
                        ui,
                        &mut self.scanner,
                        self.cameras.stream(),
                        self.session.camera_failed(),
                        self.session.last_scan_error(),
                    )),
                }
            })
            .inner;

        match central_action {
            CentralAction::Scanner(ScannerAction::Decode(payload)) => {
                self.dispatch(SessionEvent::PayloadDecoded(payload))
            }
            CentralAction::Scanner(ScannerAction::RetryCamera) => self.dispatch(SessionEvent::RetryCamera),
            CentralAction::Ar(ArAction::Navigate(nav)) => {
                self.dispatch(SessionEvent::Navigate { origin: Surface::Ar, nav })
            }
            CentralAction::Ar(ArAction::TargetFound(target)) => self.dispatch(SessionEvent::TargetFound(target)),
            CentralAction::Ar(ArAction::TargetLost(target)) => self.dispatch(SessionEvent::TargetLost(target)),
            CentralAction::Ar(ArAction::ToggleAdjust) => {
                let on = self.session.anchors_mut().toggle_adjust_mode();
                self.debug_log.push(log::Level::Info, format!("Adjust mode {}", if on { "on" } else { "off" }));
            }
            CentralAction::Ar(ArAction::Nudge(axis, direction)) => {
                self.session.anchors_mut().nudge(axis, direction);
            }
            CentralAction::Ar(ArAction::ResetOffset) => {
                let message = if self.session.anchors_mut().reset_offset() {
                    "Position reset"
                } else {
                    "First locate a marker"
                };
                self.debug_log.push(log::Level::Info, message);
            }
            CentralAction::Book(BookAction::Navigate(nav)) => {
                self.dispatch(SessionEvent::Navigate { origin: Surface::Flip, nav })
            }
            CentralAction::Scanner(ScannerAction::None)
            | CentralAction::Ar(ArAction::None)
            | CentralAction::Book(BookAction::None)
            | CentralAction::None => {}
        }

        self.error_dialog(ctx);
    }
}
