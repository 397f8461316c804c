// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! AR Book desktop application.

use anyhow::Result;
use arbook::app::ArBookApp;
use arbook::config::AppConfig;

fn main() -> Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([800.0, 600.0])
            .with_title("AR Book"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "AR Book",
        options,
        Box::new(move |_cc| Ok(Box::new(ArBookApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
