use crate::projection::Camera;
use crate::settings::Settings;
use crate::versioned::Versioned;
use once_cell::sync::Lazy;
use siteur::{
    ChatSession, DragHandler, LatLng, LineId, LineTable, Registry, Station,
    data, export_stations, parse_stations,
};
use std::collections::BTreeSet;
use std::path::Path;

/// Color and name table for every line of the network.
pub static LINES: Lazy<LineTable> = Lazy::new(data::guadalajara_lines);

/// Everything the UI shows, owned by the UI thread and changed only
/// through `actions::update`.
pub struct Store {
    pub settings: Settings,
    pub registry: Versioned<Registry>,
    pub drag: DragHandler,
    pub search_text: String,
    pub visible_lines: BTreeSet<LineId>,
    pub selected: Option<String>,
    pub camera: Camera,
    pub edit_mode: bool,
    pub tracking: bool,
    /// Id of the current location watch; fixes from older watches are
    /// ignored.
    pub watch_generation: u64,
    pub user_location: Option<LatLng>,
    pub sidebar_open: bool,
    pub chat_open: bool,
    pub chat: ChatSession,
    pub chat_input: String,
    pub compact: bool,
    /// Seconds since start, as seen by the last frame.
    pub now: f64,
    pub copy_success_until: Option<f64>,
    pub error_message: Option<String>,
}

impl Store {
    pub fn new(settings: Settings) -> Self {
        let registry = data::guadalajara();
        let anchor = settings.anchor_station.clone().filter(|id| {
            let known = registry.get(id).is_some();
            if !known {
                log::warn!("anchor station `{}` not found; group drag disabled", id);
            }
            known
        });

        Self {
            camera: Camera::new(settings.initial_center, settings.initial_zoom),
            visible_lines: settings.visible_lines.iter().cloned().collect(),
            registry: Versioned::new(registry),
            drag: DragHandler::new(anchor),
            search_text: String::new(),
            selected: None,
            edit_mode: false,
            tracking: false,
            watch_generation: 0,
            user_location: None,
            sidebar_open: true,
            chat_open: false,
            chat: ChatSession::default(),
            chat_input: String::new(),
            compact: false,
            now: 0.0,
            copy_success_until: None,
            error_message: None,
            settings,
        }
    }

    pub fn selected_station(&self) -> Option<&Station> {
        self.selected
            .as_deref()
            .and_then(|id| self.registry.get().get(id))
    }

    pub fn copy_success(&self) -> bool {
        self.copy_success_until.is_some_and(|until| self.now < until)
    }

    /// Apply the coalesced group move, if any. Runs once per frame.
    pub fn flush_pending_drag(&mut self) {
        let drag = &mut self.drag;
        self.registry.modify(|registry| drag.flush(registry));
    }

    pub fn export_text(&self) -> String {
        export_stations(self.registry.get())
    }

    /// Apply station positions from an exported table. Returns the
    /// number of stations updated.
    pub fn import_config(&mut self, text: &str) -> Result<usize, String> {
        let stations = parse_stations(text).map_err(|e| e.to_string())?;
        let mut updated = 0;
        self.registry.modify(|registry| {
            updated = registry.apply_positions(&stations);
            updated > 0
        });
        log::info!("imported positions for {} stations", updated);
        Ok(updated)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        std::fs::write(path, self.export_text())
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<(), String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        self.import_config(&text)
            .map(|_| ())
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }
}
