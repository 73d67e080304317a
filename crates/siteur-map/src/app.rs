use crate::actions::Action;
use crate::map_view::MapView;
use crate::services::Inbox;
use crate::state::State;
use crate::station_icons::{
    BRT_LABEL, RAIL_MARKER, glyph, legend_dot, line_color,
};
use crate::store::{LINES, Store};
use eframe::egui::{
    self, Align, Align2, Button, Color32, Id, Layout, RichText, Sense,
    TextEdit, Ui, vec2,
};
use siteur::{ChatMessage, LineId, LineKind, Role};
use std::time::Duration;

pub struct SiteurApp {
    state: State,
    inbox: Inbox,
}

impl SiteurApp {
    pub fn new(state: State, inbox: Inbox) -> Self {
        Self { state, inbox }
    }
}

impl eframe::App for SiteurApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_inbox();
        let now = ctx.input(|i| i.time);
        let compact = ctx.available_rect().width()
            < self.state.store.settings.compact_breakpoint;
        self.state.dispatch(Action::Tick { now });
        self.state.dispatch(Action::SetCompact { compact });
        self.state.flush_actions();

        let mut actions = Vec::new();
        {
            let store = &self.state.store;
            let paths = self.state.cache.line_paths.get(store);
            let visible = self.state.cache.visible_stations.get(store);

            if store.sidebar_open {
                sidebar(ctx, store, visible, &self.inbox, &mut actions);
            }

            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    MapView {
                        store,
                        paths,
                        visible,
                    }
                    .show(ui, &mut actions);
                });

            map_buttons(ctx, store, &mut actions);
            detail_card(ctx, store, &mut actions);
            chat_window(ctx, store, &mut actions);

            // Display error dialog if there's an error message
            if let Some(error) = store.error_message.clone() {
                egui::Window::new("Error")
                    .collapsible(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        ui.label(&error);
                        if ui.button("OK").clicked() {
                            actions.push(Action::ClearErrorMessage);
                        }
                    });
            }
        }

        for action in actions {
            self.state.dispatch(action);
        }
        self.state.flush_actions();
        self.state.flush_effects();

        let store = &self.state.store;
        if let Some(until) = store.copy_success_until {
            ctx.request_repaint_after(Duration::from_secs_f64(
                (until - store.now).max(0.0),
            ));
        }
    }
}

fn section_title(ui: &mut Ui, text: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(text).small().strong().weak());
}

fn sidebar(
    ctx: &egui::Context,
    store: &Store,
    visible: &[usize],
    inbox: &Inbox,
    actions: &mut Vec<Action>,
) {
    let width = if store.compact {
        (ctx.available_rect().width() * 0.85).min(384.0)
    } else {
        320.0
    };

    egui::SidePanel::left("sidebar")
        .exact_width(width)
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading("🚆 SITEUR GDL");
                if store.compact {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            actions.push(Action::SetSidebarOpen { open: false });
                        }
                    });
                }
            });
            ui.add_space(4.0);

            let mut search = store.search_text.clone();
            if ui
                .add(
                    TextEdit::singleline(&mut search)
                        .hint_text("Buscar estación...")
                        .desired_width(f32::INFINITY),
                )
                .changed()
            {
                actions.push(Action::SetSearchText { text: search });
            }

            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                let label = if store.edit_mode {
                    "✏ Listo"
                } else {
                    "✏ Edición"
                };
                if ui
                    .selectable_label(store.edit_mode, label)
                    .on_hover_text("Arrastrar estaciones para ajustar su posición")
                    .clicked()
                {
                    actions.push(Action::ToggleEditMode);
                }
                if store.edit_mode {
                    let copy = if store.copy_success() {
                        "✔ Config"
                    } else {
                        "📋 Config"
                    };
                    if ui
                        .button(copy)
                        .on_hover_text("Copiar la tabla de estaciones")
                        .clicked()
                    {
                        actions.push(Action::CopyConfig);
                    }
                    file_buttons(ui, inbox, actions);
                }
            });

            let lines = store.registry.get().line_ids();
            section_title(ui, "LÍNEAS DE TREN");
            for id in lines.iter().filter(|id| id.kind() == LineKind::Rail) {
                line_toggle(ui, store, id, actions);
            }
            section_title(ui, "MI MACRO (BRT)");
            for id in lines.iter().filter(|id| id.kind() == LineKind::Brt) {
                line_toggle(ui, store, id, actions);
            }

            section_title(ui, &format!("ESTACIONES ({})", visible.len()));
            station_list(ui, store, visible, actions);
        });
}

fn line_toggle(ui: &mut Ui, store: &Store, id: &LineId, actions: &mut Vec<Action>) {
    let label = match (id, LINES.get(id)) {
        (LineId::Code(_), Some(info)) => info.short_name.clone(),
        _ => LINES.name(id),
    };
    ui.horizontal(|ui| {
        legend_dot(ui, line_color(LINES.color(id)));
        if ui
            .selectable_label(store.visible_lines.contains(id), label)
            .clicked()
        {
            actions.push(Action::ToggleLine { line: id.clone() });
        }
    });
}

fn station_list(
    ui: &mut Ui,
    store: &Store,
    visible: &[usize],
    actions: &mut Vec<Action>,
) {
    let registry = store.registry.get();
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if visible.is_empty() {
                ui.weak("Sin resultados");
            }
            for station in visible.iter().filter_map(|&i| registry.at(i)) {
                let selected =
                    store.selected.as_deref() == Some(station.id.as_str());
                let text =
                    format!("{} {}", glyph(station.line.kind()), station.name);
                let mut response = ui.selectable_label(selected, text);
                if let Some(line) = LINES.get(&station.line) {
                    response = response.on_hover_text(line.service_label());
                }
                if response.clicked() {
                    actions.push(Action::SelectStation {
                        id: station.id.clone(),
                    });
                }
            }
        });
}

#[cfg(not(target_arch = "wasm32"))]
fn file_buttons(ui: &mut Ui, _inbox: &Inbox, actions: &mut Vec<Action>) {
    if ui.button("💾 Guardar").clicked()
        && let Some(path) = rfd::FileDialog::new()
            .add_filter("TypeScript", &["ts"])
            .set_file_name("stations.ts")
            .save_file()
    {
        actions.push(Action::SaveToFile { path });
    }

    if ui.button("📂 Cargar").clicked()
        && let Some(path) = rfd::FileDialog::new()
            .add_filter("TypeScript", &["ts", "txt"])
            .pick_file()
    {
        actions.push(Action::LoadFromFile { path });
    }
}

#[cfg(target_arch = "wasm32")]
fn file_buttons(ui: &mut Ui, inbox: &Inbox, _actions: &mut Vec<Action>) {
    if ui.button("📂 Cargar").clicked() {
        crate::web::open_config_dialog(inbox.clone());
    }
}

fn round_button(text: &str) -> Button<'static> {
    Button::new(RichText::new(text.to_string()).size(20.0))
        .min_size(vec2(44.0, 44.0))
        .corner_radius(22.0)
}

fn map_buttons(ctx: &egui::Context, store: &Store, actions: &mut Vec<Action>) {
    if store.compact && !store.sidebar_open {
        egui::Area::new(Id::new("menu_button"))
            .anchor(Align2::LEFT_TOP, vec2(16.0, 16.0))
            .show(ctx, |ui| {
                if ui.add(round_button("☰")).clicked() {
                    actions.push(Action::SetSidebarOpen { open: true });
                }
            });
    }

    egui::Area::new(Id::new("map_buttons"))
        .anchor(Align2::RIGHT_TOP, vec2(-16.0, 16.0))
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                let (icon, hint) = if store.tracking {
                    ("⌖", "Dejar de seguir mi ubicación")
                } else {
                    ("🧭", "Seguir mi ubicación")
                };
                if ui
                    .add(round_button(icon).selected(store.tracking))
                    .on_hover_text(hint)
                    .clicked()
                {
                    actions.push(Action::ToggleTracking);
                }
                if !store.edit_mode
                    && ui
                        .add(round_button("💬").selected(store.chat_open))
                        .on_hover_text("Guía SITEUR")
                        .clicked()
                {
                    actions.push(Action::SetChatOpen {
                        open: !store.chat_open,
                    });
                }
            });
        });
}

fn detail_card(ctx: &egui::Context, store: &Store, actions: &mut Vec<Action>) {
    if store.edit_mode {
        return;
    }
    let Some(station) = store.selected_station() else {
        return;
    };
    let info = LINES.get(&station.line);

    egui::Area::new(Id::new("detail_card"))
        .anchor(Align2::CENTER_BOTTOM, vec2(0.0, -24.0))
        .show(ctx, |ui| {
            egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                ui.set_width(300.0);
                ui.horizontal(|ui| {
                    let (bar, _) =
                        ui.allocate_exact_size(vec2(6.0, 40.0), Sense::hover());
                    ui.painter().rect_filled(
                        bar,
                        3.0,
                        line_color(LINES.color(&station.line)),
                    );
                    ui.label(RichText::new(glyph(station.line.kind())).size(24.0));
                    ui.vertical(|ui| {
                        ui.strong(&station.name);
                        if let Some(info) = info {
                            ui.weak(info.card_subtitle());
                        }
                    });
                });

                if station.is_transfer && !station.transfer_lines.is_empty() {
                    ui.horizontal_wrapped(|ui| {
                        ui.label("Transbordo:");
                        for line in &station.transfer_lines {
                            legend_dot(ui, line_color(LINES.color(line)));
                            ui.label(LINES.name(line));
                        }
                    });
                }
                if let Some(description) = &station.description {
                    ui.label(description);
                }

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui.button("➡ Ir").on_hover_text("Cómo llegar").clicked() {
                        actions.push(Action::OpenDirections);
                    }
                    if ui.button("✕").clicked() {
                        actions.push(Action::ClearSelection);
                    }
                });
            });
        });
}

fn chat_bubble(ui: &mut Ui, message: &ChatMessage) {
    let (layout, fill, text_color) = match message.role {
        Role::User => {
            (Layout::right_to_left(Align::TOP), RAIL_MARKER, Color32::WHITE)
        }
        Role::Assistant => (
            Layout::left_to_right(Align::TOP),
            Color32::from_gray(235),
            BRT_LABEL,
        ),
    };
    ui.with_layout(layout, |ui| {
        egui::Frame::new()
            .fill(fill)
            .corner_radius(10.0)
            .inner_margin(egui::Margin::symmetric(10, 6))
            .show(ui, |ui| {
                ui.set_max_width(240.0);
                ui.label(RichText::new(&message.content).color(text_color));
            });
    });
}

fn chat_window(ctx: &egui::Context, store: &Store, actions: &mut Vec<Action>) {
    if !store.chat_open || store.edit_mode {
        return;
    }
    let busy = store.chat.is_busy();
    let mut open = true;

    egui::Window::new("💬 Guía SITEUR")
        .open(&mut open)
        .default_width(340.0)
        .anchor(Align2::RIGHT_BOTTOM, vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.weak("Tu asistente de transporte");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui
                        .small_button("↺")
                        .on_hover_text("Nueva conversación")
                        .clicked()
                    {
                        actions.push(Action::ResetChat);
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(320.0)
                .auto_shrink([false, true])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in store.chat.messages() {
                        chat_bubble(ui, message);
                        ui.add_space(4.0);
                    }
                    if busy {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.weak("Pensando...");
                        });
                    }
                });
            ui.separator();

            ui.horizontal(|ui| {
                let mut input = store.chat_input.clone();
                let edit = ui.add(
                    TextEdit::singleline(&mut input)
                        .hint_text("¿A dónde quieres ir?")
                        .desired_width(ui.available_width() - 40.0),
                );
                if edit.changed() {
                    actions.push(Action::SetChatInput {
                        text: input.clone(),
                    });
                }
                let submitted = edit.lost_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let ready = !busy && !input.trim().is_empty();
                let clicked = ui.add_enabled(ready, Button::new("➤")).clicked();
                if ready && (submitted || clicked) {
                    actions.push(Action::SendChat);
                    edit.request_focus();
                }
            });
        });

    if !open {
        actions.push(Action::SetChatOpen { open: false });
    }
}
