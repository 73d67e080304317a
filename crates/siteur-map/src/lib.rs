mod actions;
mod app;
mod assistant;
mod cache;
mod clipboard;
mod effects;
mod geolocation;
mod map_view;
pub mod native;
mod projection;
mod services;
mod settings;
mod state;
mod station_icons;
mod store;
mod versioned;
pub mod web;

use app::SiteurApp;
use assistant::{GeminiClient, GeminiConfig};
use clipboard::SystemClipboard;
use services::{Inbox, Services};
use settings::Settings;
use state::State;
use store::Store;

/// Build the application: settings, platform services and the initial
/// store.
pub fn create_app(cc: &eframe::CreationContext<'_>) -> SiteurApp {
    egui_extras::install_image_loaders(&cc.egui_ctx);

    let settings = Settings::load_or_default();
    let ctx = cc.egui_ctx.clone();
    let (inbox, receiver) = Inbox::channel(ctx.clone());

    #[cfg(not(target_arch = "wasm32"))]
    let (location, clipboard) = (
        geolocation::IpLocationProvider::new(
            inbox.clone(),
            std::time::Duration::from_secs(settings.location_poll_secs),
        ),
        SystemClipboard::default(),
    );
    #[cfg(target_arch = "wasm32")]
    let (location, clipboard) = (
        geolocation::BrowserLocationProvider::new(inbox.clone()),
        SystemClipboard::new(ctx.clone()),
    );

    let assistant = GeminiClient::new(
        GeminiConfig {
            endpoint: settings.assistant_endpoint.clone(),
            model: settings.assistant_model.clone(),
            api_key: settings.api_key(),
        },
        inbox.clone(),
    );
    let services = Services::new(
        ctx,
        Box::new(location),
        Box::new(clipboard),
        Box::new(assistant),
    );

    log::info!(
        "starting at {:?}, zoom {}",
        settings.initial_center,
        settings.initial_zoom
    );
    let state = State::new(Store::new(settings), services, receiver);
    SiteurApp::new(state, inbox)
}
