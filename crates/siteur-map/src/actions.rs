use crate::effects::Effect;
use crate::projection::Camera;
use crate::store::Store;
use siteur::{LatLng, LineId, Reply, Station};
use std::path::PathBuf;

/// Actions that can be dispatched to modify the map state
#[derive(Debug, Clone)]
pub enum Action {
    // Map Actions
    /// User panned or zoomed the map
    SetCamera { camera: Camera },
    /// Window crossed the compact-layout breakpoint
    SetCompact { compact: bool },
    /// Frame clock, in seconds
    Tick { now: f64 },

    // Filter Actions
    /// Update the station search text
    SetSearchText { text: String },
    /// Show or hide one line
    ToggleLine { line: LineId },

    // Selection Actions
    /// Focus a station and show its detail card
    SelectStation { id: String },
    /// Close the detail card
    ClearSelection,
    /// Open external directions to the selected station
    OpenDirections,

    // Panel Actions
    SetSidebarOpen { open: bool },
    SetChatOpen { open: bool },
    /// Enter or leave station edit mode
    ToggleEditMode,

    // Drag Actions
    /// Pointer grabbed a station marker
    BeginDrag { id: String },
    /// Pointer moved while holding a marker
    DragStation { id: String, position: LatLng },
    /// Pointer released a marker
    EndDrag { id: String, position: LatLng },

    // Config Actions
    /// Copy the station table to the clipboard
    CopyConfig,
    /// Save the station table to a file
    SaveToFile { path: PathBuf },
    /// Load station positions from a file
    LoadFromFile { path: PathBuf },
    /// Load station positions from already-read text
    ImportConfig { text: String },

    // Location Actions
    /// Start or stop following the user's position
    ToggleTracking,
    /// Position reported by a location request
    LocationFix {
        generation: u64,
        position: LatLng,
        /// One-shot fix issued when tracking starts
        initial: bool,
    },
    /// A location request failed
    LocationFailed { generation: u64, message: String },

    // Assistant Actions
    SetChatInput { text: String },
    /// Send the pending input to the assistant
    SendChat,
    /// Reply for a request issued in `session`
    ChatReply { session: u64, reply: Reply },
    /// Start a new conversation
    ResetChat,

    /// Clear any error message
    ClearErrorMessage,
}

pub fn directions_url(station: &Station) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        station.lat(),
        station.lng()
    )
}

/// Stop following the user; later fixes from the old watch are stale.
fn stop_tracking(store: &mut Store) -> Vec<Effect> {
    if !store.tracking {
        return vec![];
    }
    store.tracking = false;
    store.watch_generation += 1;
    vec![Effect::StopLocationWatch]
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    match action {
        // Map Actions
        Action::SetCamera { camera } => {
            store.camera = camera;
            vec![]
        }
        Action::SetCompact { compact } => {
            if store.compact != compact {
                store.compact = compact;
                store.sidebar_open = !compact;
            }
            vec![]
        }
        Action::Tick { now } => {
            store.now = now;
            if store.copy_success_until.is_some_and(|until| now >= until) {
                store.copy_success_until = None;
            }
            vec![]
        }

        // Filter Actions
        Action::SetSearchText { text } => {
            store.search_text = text;
            vec![]
        }
        Action::ToggleLine { line } => {
            if !store.visible_lines.remove(&line) {
                store.visible_lines.insert(line);
            }
            vec![]
        }

        // Selection Actions
        Action::SelectStation { id } => {
            if store.edit_mode {
                return vec![];
            }
            let Some(position) =
                store.registry.get().get(&id).map(|s| s.position)
            else {
                log::warn!("select: unknown station `{}`", id);
                return vec![];
            };
            store.selected = Some(id);
            store.camera =
                Camera::new(position, store.settings.station_zoom);
            if store.compact {
                store.sidebar_open = false;
            }
            stop_tracking(store)
        }
        Action::ClearSelection => {
            store.selected = None;
            vec![]
        }
        Action::OpenDirections => match store.selected_station() {
            Some(station) if !store.edit_mode => vec![Effect::OpenUrl {
                url: directions_url(station),
            }],
            _ => vec![],
        },

        // Panel Actions
        Action::SetSidebarOpen { open } => {
            store.sidebar_open = open;
            vec![]
        }
        Action::SetChatOpen { open } => {
            store.chat_open = open;
            vec![]
        }
        Action::ToggleEditMode => {
            store.edit_mode = !store.edit_mode;
            store.selected = None;
            if !store.edit_mode {
                store.drag.cancel();
            }
            log::debug!("edit mode {}", store.edit_mode);
            vec![]
        }

        // Drag Actions
        Action::BeginDrag { id } => {
            if store.edit_mode {
                store.drag.begin(store.registry.get(), &id);
            }
            vec![]
        }
        Action::DragStation { id, position } => {
            if store.edit_mode {
                let drag = &mut store.drag;
                store
                    .registry
                    .modify(|registry| drag.drag(registry, &id, position));
            }
            vec![]
        }
        Action::EndDrag { id, position } => {
            if store.edit_mode {
                let drag = &mut store.drag;
                store
                    .registry
                    .modify(|registry| drag.end(registry, &id, position));
            }
            vec![]
        }

        // Config Actions
        Action::CopyConfig => vec![Effect::CopyToClipboard {
            text: store.export_text(),
        }],
        Action::SaveToFile { path } => {
            vec![Effect::SaveToFile { path }]
        }
        Action::LoadFromFile { path } => {
            vec![Effect::LoadFromFile { path }]
        }
        Action::ImportConfig { text } => {
            if let Err(e) = store.import_config(&text) {
                store.error_message =
                    Some(format!("Failed to parse configuration: {}", e));
            }
            vec![]
        }

        // Location Actions
        Action::ToggleTracking => {
            if store.tracking {
                return stop_tracking(store);
            }
            store.tracking = true;
            store.watch_generation += 1;
            let generation = store.watch_generation;
            vec![
                Effect::StartLocationWatch { generation },
                Effect::FetchCurrentPosition { generation },
            ]
        }
        Action::LocationFix {
            generation,
            position,
            initial,
        } => {
            if !store.tracking || generation != store.watch_generation {
                log::debug!("ignoring stale location fix ({})", generation);
                return vec![];
            }
            store.user_location = Some(position);
            let zoom = if initial {
                store.settings.station_zoom
            } else {
                store.camera.zoom
            };
            store.camera = Camera::new(position, zoom);
            vec![]
        }
        Action::LocationFailed {
            generation,
            message,
        } => {
            if !store.tracking || generation != store.watch_generation {
                return vec![];
            }
            log::warn!("location unavailable: {}", message);
            stop_tracking(store)
        }

        // Assistant Actions
        Action::SetChatInput { text } => {
            store.chat_input = text;
            vec![]
        }
        Action::SendChat => match store.chat.send(&store.chat_input) {
            Some(request) => {
                store.chat_input.clear();
                vec![Effect::RequestAssistant { request }]
            }
            None => vec![],
        },
        Action::ChatReply { session, reply } => {
            store.chat.receive(session, reply);
            vec![]
        }
        Action::ResetChat => {
            store.chat.reset();
            vec![]
        }

        Action::ClearErrorMessage => {
            store.error_message = None;
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use siteur::transcript::{ChatMessage, ERROR_REPLY};

    fn store() -> Store {
        Store::new(Settings::default())
    }

    fn position(store: &Store, id: &str) -> LatLng {
        store.registry.get().get(id).unwrap().position
    }

    #[test]
    fn test_selecting_station_cancels_tracking() {
        let mut store = store();
        let effects = update(&mut store, Action::ToggleTracking);
        assert!(matches!(
            effects.as_slice(),
            [
                Effect::StartLocationWatch { generation: 1 },
                Effect::FetchCurrentPosition { generation: 1 }
            ]
        ));

        let effects = update(
            &mut store,
            Action::SelectStation {
                id: "l3-belen".to_string(),
            },
        );
        assert!(matches!(effects.as_slice(), [Effect::StopLocationWatch]));
        assert!(!store.tracking);
        assert_eq!(store.selected.as_deref(), Some("l3-belen"));
        assert_eq!(store.camera.center, position(&store, "l3-belen"));
        assert_eq!(store.camera.zoom, 16.0);
    }

    #[test]
    fn test_selection_closes_sidebar_only_when_compact() {
        let mut store = store();
        update(
            &mut store,
            Action::SelectStation {
                id: "l1-audi".to_string(),
            },
        );
        assert!(store.sidebar_open);

        update(&mut store, Action::SetCompact { compact: true });
        update(&mut store, Action::SetSidebarOpen { open: true });
        update(
            &mut store,
            Action::SelectStation {
                id: "l1-audi".to_string(),
            },
        );
        assert!(!store.sidebar_open);
    }

    #[test]
    fn test_edit_mode_blocks_selection_and_clears_it() {
        let mut store = store();
        update(
            &mut store,
            Action::SelectStation {
                id: "l1-audi".to_string(),
            },
        );
        update(&mut store, Action::ToggleEditMode);
        assert!(store.edit_mode);
        assert_eq!(store.selected, None);

        update(
            &mut store,
            Action::SelectStation {
                id: "l1-audi".to_string(),
            },
        );
        assert_eq!(store.selected, None);
        assert!(update(&mut store, Action::OpenDirections).is_empty());
    }

    #[test]
    fn test_anchor_drag_moves_line_once_flushed() {
        let mut store = store();
        let before = position(&store, "mc-02");
        let l1 = position(&store, "l1-audi");
        update(&mut store, Action::ToggleEditMode);
        update(
            &mut store,
            Action::BeginDrag {
                id: "mc-01".to_string(),
            },
        );

        let start = position(&store, "mc-01");
        let version = store.registry.version();
        update(
            &mut store,
            Action::DragStation {
                id: "mc-01".to_string(),
                position: LatLng::new(start.lat + 0.001, start.lng - 0.002),
            },
        );
        assert_eq!(store.registry.version(), version);

        store.flush_pending_drag();
        assert!(store.registry.version() > version);
        let after = position(&store, "mc-02");
        assert!((after.lat - (before.lat + 0.001)).abs() < 1e-9);
        assert!((after.lng - (before.lng - 0.002)).abs() < 1e-9);
        assert_eq!(position(&store, "l1-audi"), l1);
    }

    #[test]
    fn test_leaving_edit_mode_cancels_drag() {
        let mut store = store();
        update(&mut store, Action::ToggleEditMode);
        update(
            &mut store,
            Action::BeginDrag {
                id: "mc-01".to_string(),
            },
        );
        update(
            &mut store,
            Action::DragStation {
                id: "mc-01".to_string(),
                position: LatLng::new(21.0, -104.0),
            },
        );
        let before = position(&store, "mc-01");
        update(&mut store, Action::ToggleEditMode);
        store.flush_pending_drag();
        assert!(!store.drag.is_dragging());
        assert_eq!(position(&store, "mc-01"), before);
    }

    #[test]
    fn test_drags_outside_edit_mode_are_ignored() {
        let mut store = store();
        let before = position(&store, "l1-audi");
        update(
            &mut store,
            Action::BeginDrag {
                id: "l1-audi".to_string(),
            },
        );
        update(
            &mut store,
            Action::EndDrag {
                id: "l1-audi".to_string(),
                position: LatLng::new(0.0, 0.0),
            },
        );
        assert_eq!(position(&store, "l1-audi"), before);
    }

    #[test]
    fn test_stale_location_fix_is_ignored() {
        let mut store = store();
        let camera = store.camera;
        update(&mut store, Action::ToggleTracking);
        update(&mut store, Action::ToggleTracking);
        update(
            &mut store,
            Action::LocationFix {
                generation: 1,
                position: LatLng::new(20.7, -103.4),
                initial: true,
            },
        );
        assert_eq!(store.camera, camera);
        assert_eq!(store.user_location, None);
    }

    #[test]
    fn test_location_fixes_recenter_while_tracking() {
        let mut store = store();
        update(&mut store, Action::ToggleTracking);
        let here = LatLng::new(20.7, -103.4);
        update(
            &mut store,
            Action::LocationFix {
                generation: 1,
                position: here,
                initial: true,
            },
        );
        assert_eq!(store.camera, Camera::new(here, 16.0));

        update(
            &mut store,
            Action::SetCamera {
                camera: Camera::new(here, 14.0),
            },
        );
        let there = LatLng::new(20.71, -103.41);
        update(
            &mut store,
            Action::LocationFix {
                generation: 1,
                position: there,
                initial: false,
            },
        );
        assert_eq!(store.camera, Camera::new(there, 14.0));
        assert_eq!(store.user_location, Some(there));
    }

    #[test]
    fn test_location_failure_stops_tracking() {
        let mut store = store();
        update(&mut store, Action::ToggleTracking);
        let effects = update(
            &mut store,
            Action::LocationFailed {
                generation: 1,
                message: "denied".to_string(),
            },
        );
        assert!(matches!(effects.as_slice(), [Effect::StopLocationWatch]));
        assert!(!store.tracking);
        assert_eq!(store.error_message, None);
    }

    #[test]
    fn test_chat_network_error_scenario() {
        let mut store = store();
        update(
            &mut store,
            Action::SetChatInput {
                text: "¿Cómo llego a Oblatos?".to_string(),
            },
        );
        let effects = update(&mut store, Action::SendChat);
        let [Effect::RequestAssistant { request }] = effects.as_slice()
        else {
            panic!("expected one assistant request, got {:?}", effects);
        };
        assert!(request.prompt.ends_with("Pregunta: ¿Cómo llego a Oblatos?"));
        assert!(store.chat_input.is_empty());
        assert!(store.chat.is_busy());

        store.chat_input = "otra".to_string();
        assert!(update(&mut store, Action::SendChat).is_empty());
        assert_eq!(store.chat_input, "otra");

        update(
            &mut store,
            Action::ChatReply {
                session: request.session,
                reply: Reply::Failed,
            },
        );
        let messages = store.chat.messages();
        assert_eq!(
            messages[messages.len() - 2..],
            [
                ChatMessage::user("¿Cómo llego a Oblatos?"),
                ChatMessage::assistant(ERROR_REPLY),
            ]
        );
        assert!(!store.chat.is_busy());
    }

    #[test]
    fn test_copy_indicator_expires() {
        let mut store = store();
        let effects = update(&mut store, Action::CopyConfig);
        let [Effect::CopyToClipboard { text }] = effects.as_slice() else {
            panic!("expected a clipboard write");
        };
        assert!(text.starts_with("export const STATIONS: Station[] = ["));

        store.copy_success_until = Some(3.0);
        update(&mut store, Action::Tick { now: 2.9 });
        assert!(store.copy_success());
        update(&mut store, Action::Tick { now: 3.0 });
        assert!(!store.copy_success());
        assert_eq!(store.copy_success_until, None);
    }

    #[test]
    fn test_directions_url_points_at_station() {
        let mut store = store();
        update(
            &mut store,
            Action::SelectStation {
                id: "l1-audi".to_string(),
            },
        );
        let effects = update(&mut store, Action::OpenDirections);
        let [Effect::OpenUrl { url }] = effects.as_slice() else {
            panic!("expected a url");
        };
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=20.73524,-103.35079"
        );
    }

    #[test]
    fn test_toggle_line_and_import_errors() {
        let mut store = store();
        update(&mut store, Action::ToggleLine { line: LineId::Number(2) });
        assert!(!store.visible_lines.contains(&LineId::Number(2)));
        update(&mut store, Action::ToggleLine { line: LineId::Number(2) });
        assert!(store.visible_lines.contains(&LineId::Number(2)));

        update(
            &mut store,
            Action::ImportConfig {
                text: "[{ id: 'x' ".to_string(),
            },
        );
        assert!(store.error_message.is_some());
        update(&mut store, Action::ClearErrorMessage);
        assert_eq!(store.error_message, None);
    }
}
