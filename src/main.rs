#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use std::path::Path;

    use snotes::{Config, NotesApp, config::CONFIG_FILE};

    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = Config::load_or_create(Path::new(CONFIG_FILE)).unwrap_or_else(|err| {
        log::error!("Failed to read {}: {}", CONFIG_FILE, err);
        Config::default()
    });
    log::info!("Notes are stored in {}", config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SNotesApp",
        options,
        Box::new(|cc| Ok(Box::new(NotesApp::new(cc, config)))),
    )
}

// The notes live on the local file system, which the browser build cannot reach.
#[cfg(target_arch = "wasm32")]
fn main() {}
