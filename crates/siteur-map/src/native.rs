#![cfg(not(target_arch = "wasm32"))]

use crate::create_app;

/// Entry point used by the native executable.
pub fn run() -> eframe::Result<()> {
    env_logger::init();
    log::info!("SITEUR GDL {}", env!("CARGO_PKG_VERSION"));

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("SITEUR GDL"),
        ..Default::default()
    };

    eframe::run_native(
        "SITEUR GDL",
        native_options,
        Box::new(|cc| Ok(Box::new(create_app(cc)))),
    )
}
