#![cfg(target_arch = "wasm32")]

use crate::actions::Action;
use crate::create_app;
use crate::services::Inbox;
use eframe::WebRunner;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

/// Launch the egui app inside the canvas referenced by `index.html`.
#[wasm_bindgen]
pub async fn start() -> Result<(), JsValue> {
    use web_sys::HtmlCanvasElement;

    console_error_panic_hook::set_once();
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    let canvas = document
        .get_element_by_id("the_canvas_id")
        .ok_or("Canvas not found")?
        .dyn_into::<HtmlCanvasElement>()?;

    let web_options = eframe::WebOptions::default();

    WebRunner::new()
        .start(canvas, web_options, Box::new(|cc| Ok(Box::new(create_app(cc)))))
        .await
}

/// Ask the browser for an exported station table and import it.
pub fn open_config_dialog(inbox: Inbox) {
    use rfd::AsyncFileDialog;
    use wasm_bindgen_futures::spawn_local;

    let task = AsyncFileDialog::new()
        .add_filter("TypeScript", &["ts", "txt"])
        .pick_file();

    spawn_local(async move {
        if let Some(file) = task.await {
            let data = file.read().await;
            match String::from_utf8(data) {
                Ok(text) => inbox.send(Action::ImportConfig { text }),
                Err(e) => log::error!("{}: not UTF-8 text ({})", file.file_name(), e),
            }
        }
    });
}
