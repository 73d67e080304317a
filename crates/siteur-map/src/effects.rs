use crate::services::Services;
use crate::store::Store;
use siteur::ChatRequest;
use std::path::PathBuf;

/// Deferred effects that must run outside the main reducer (IO,
/// platform services, background requests)
#[derive(Debug, Clone)]
pub enum Effect {
    /// Begin continuous location updates tagged with `generation`
    StartLocationWatch { generation: u64 },
    /// Release the active location watch
    StopLocationWatch,
    /// Ask once for the current position
    FetchCurrentPosition { generation: u64 },
    /// Write text to the system clipboard
    CopyToClipboard { text: String },
    /// Save the station table to disk
    SaveToFile { path: PathBuf },
    /// Load station positions from disk
    LoadFromFile { path: PathBuf },
    /// Forward a chat turn to the assistant service
    RequestAssistant { request: ChatRequest },
    /// Open a link in the browser
    OpenUrl { url: String },
}

/// Execute a single effect against the store
pub fn run(store: &mut Store, services: &mut Services, effect: Effect) {
    log::debug!("effect: {:?}", effect);
    match effect {
        Effect::StartLocationWatch { generation } => {
            services.location.watch(generation);
        }
        Effect::StopLocationWatch => {
            services.location.cancel();
        }
        Effect::FetchCurrentPosition { generation } => {
            services.location.current_position(generation);
        }
        Effect::CopyToClipboard { text } => {
            match services.clipboard.write_text(&text) {
                Ok(()) => {
                    store.copy_success_until =
                        Some(store.now + store.settings.copy_indicator_secs);
                }
                Err(e) => {
                    log::error!("{}", e);
                    store.copy_success_until = None;
                    store.error_message = Some(e.to_string());
                }
            }
        }
        Effect::SaveToFile { path } => {
            if let Err(e) = store.save_to_file(&path) {
                store.error_message = Some(e);
            }
        }
        Effect::LoadFromFile { path } => {
            if let Err(e) = store.load_from_file(&path) {
                store.error_message = Some(e);
            }
        }
        Effect::RequestAssistant { request } => {
            services.assistant.request(request);
        }
        Effect::OpenUrl { url } => {
            services.open_url(&url);
        }
    }
}
