use crate::actions::Action;
use crate::projection::{Camera, tile_url};
use crate::station_icons::{
    StationMarker, labels_visible, line_color, line_stroke_width,
    paint_user_location,
};
use crate::store::{LINES, Store};
use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Id, Pos2, Rect, Sense, Shape,
    Stroke, Ui, Vec2, vec2,
};
use siteur::{LatLng, LinePath, LineKind, Station};

const BACKGROUND: Color32 = Color32::from_rgb(0xe5, 0xe7, 0xeb);
const LINE_ALPHA: u8 = 204;
const SCROLL_PER_LEVEL: f32 = 200.0;
const MARKER_MARGIN: f32 = 40.0;

/// Slippy map with line paths and station markers. Gestures are
/// reported as actions; the camera is never changed in place.
pub struct MapView<'a> {
    pub store: &'a Store,
    pub paths: &'a [LinePath],
    /// Registry indices of the stations to draw.
    pub visible: &'a [usize],
}

impl MapView<'_> {
    pub fn show(self, ui: &mut Ui, actions: &mut Vec<Action>) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let store = self.store;
        let camera = store.camera;

        painter.rect_filled(rect, 0.0, BACKGROUND);
        for tile in camera.visible_tiles(rect) {
            let url = tile_url(
                &store.settings.tile_url,
                &store.settings.tile_subdomains,
                &tile,
            );
            egui::Image::new(url)
                .show_loading_spinner(false)
                .paint_at(ui, tile.rect);
        }

        for path in self.paths {
            if store.visible_lines.contains(&path.id) {
                paint_path(&painter, &camera, rect, path);
            }
        }

        if let Some(here) = store.user_location {
            let pos = camera.project(rect, here);
            if rect.contains(pos) {
                paint_user_location(&painter, pos);
                ui.interact(
                    Rect::from_center_size(pos, Vec2::splat(16.0)),
                    Id::new("user_location"),
                    Sense::hover(),
                )
                .on_hover_text("Tu ubicación actual");
            }
        }

        let registry = store.registry.get();
        for station in self.visible.iter().filter_map(|&i| registry.at(i)) {
            self.station_marker(ui, &painter, rect, station, actions);
        }

        let mut next = camera;
        if response.dragged() {
            next.pan(response.drag_delta());
        }
        if response.contains_pointer() {
            let (scroll, pinch, pointer) = ui.input(|i| {
                (i.smooth_scroll_delta.y, i.zoom_delta(), i.pointer.hover_pos())
            });
            let levels = scroll / SCROLL_PER_LEVEL + pinch.log2();
            if levels != 0.0
                && let Some(pointer) = pointer
            {
                next.zoom_around(rect, pointer, levels as f64);
            }
        }
        if response.double_clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            next.zoom_around(rect, pointer, 1.0);
        }

        paint_attribution(&painter, rect, &store.settings.tile_attribution);
        zoom_buttons(ui, rect, &mut next);

        if store.edit_mode {
            edit_banner(&painter, rect);
        }

        if next != camera {
            actions.push(Action::SetCamera { camera: next });
        }
    }

    fn station_marker(
        &self,
        ui: &mut Ui,
        painter: &egui::Painter,
        rect: Rect,
        station: &Station,
        actions: &mut Vec<Action>,
    ) {
        let store = self.store;
        let camera = &store.camera;
        let pos = camera.project(rect, station.position);
        let held = store.drag.active_station() == Some(station.id.as_str());
        if !marker_in_view(rect, pos, held) {
            return;
        }

        let selected = store.selected.as_deref() == Some(station.id.as_str());
        let sense = if store.edit_mode {
            Sense::click_and_drag()
        } else {
            Sense::click()
        };
        let mut marker = StationMarker::new(pos, station.line.kind())
            .anchor(store.edit_mode && store.drag.is_anchor(&station.id));
        let response = ui.interact(
            marker.hit_rect(),
            Id::new(("station", &station.id)),
            sense,
        );

        if store.edit_mode {
            let response = response.on_hover_cursor(CursorIcon::Grab);
            // Current position plus this frame's pointer motion.
            let moved = || -> LatLng {
                camera.unproject(rect, pos + response.drag_delta())
            };
            if response.drag_started() {
                actions.push(Action::BeginDrag {
                    id: station.id.clone(),
                });
            }
            if response.dragged() && response.drag_delta() != Vec2::ZERO {
                actions.push(Action::DragStation {
                    id: station.id.clone(),
                    position: moved(),
                });
            }
            if response.drag_stopped() {
                actions.push(Action::EndDrag {
                    id: station.id.clone(),
                    position: moved(),
                });
            }
            marker = marker.highlighted(response.hovered() || response.dragged());
        } else {
            if response.clicked() {
                actions.push(Action::SelectStation {
                    id: station.id.clone(),
                });
            }
            let hovered = response.hovered();
            response
                .on_hover_cursor(CursorIcon::PointingHand)
                .on_hover_ui(|ui| {
                    ui.strong(&station.name);
                    if let Some(line) = LINES.get(&station.line) {
                        ui.label(line.service_label());
                    }
                });
            marker = marker.highlighted(hovered || selected);
        }

        if labels_visible(camera.zoom) || selected {
            marker = marker.label(&station.name);
        }
        marker.paint(painter);
    }
}

/// Off-screen markers are skipped, except the one being dragged: it
/// must keep its widget so the release still reaches it.
fn marker_in_view(rect: Rect, pos: Pos2, held: bool) -> bool {
    held || rect.expand(MARKER_MARGIN).contains(pos)
}

fn paint_path(
    painter: &egui::Painter,
    camera: &Camera,
    rect: Rect,
    path: &LinePath,
) {
    if path.coordinates.len() < 2 {
        return;
    }
    let points: Vec<Pos2> = path
        .coordinates
        .iter()
        .map(|&p| camera.project(rect, p))
        .collect();
    let rgb = LINES.color(&path.id);
    let color =
        Color32::from_rgba_unmultiplied(rgb.0, rgb.1, rgb.2, LINE_ALPHA);
    let kind = path.id.kind();
    let width = line_stroke_width(kind);
    match kind {
        LineKind::Rail => {
            painter.add(Shape::line(points, Stroke::new(width, color)));
        }
        LineKind::Brt => {
            painter.extend(Shape::dotted_line(
                &points,
                line_color(rgb),
                2.0 * width + 1.0,
                width / 2.0,
            ));
        }
    }
}

fn paint_attribution(painter: &egui::Painter, rect: Rect, text: &str) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(10.0),
        Color32::from_gray(60),
    );
    let text_rect = Align2::RIGHT_BOTTOM
        .anchor_size(rect.right_bottom(), galley.size())
        .expand2(vec2(4.0, 1.0))
        .translate(vec2(-4.0, -1.0));
    painter.rect_filled(text_rect, 2.0, Color32::from_white_alpha(190));
    painter.galley(
        text_rect.min + vec2(4.0, 1.0),
        galley,
        Color32::from_gray(60),
    );
}

fn zoom_buttons(ui: &mut Ui, rect: Rect, camera: &mut Camera) {
    let size = Vec2::splat(28.0);
    let bottom_right = rect.right_bottom() - vec2(12.0, 28.0);
    let minus = Rect::from_min_size(bottom_right - size, size);
    let plus = minus.translate(vec2(0.0, -size.y - 4.0));

    if ui.put(plus, egui::Button::new("+")).clicked() {
        camera.zoom_around(rect, rect.center(), 1.0);
    }
    if ui.put(minus, egui::Button::new("−")).clicked() {
        camera.zoom_around(rect, rect.center(), -1.0);
    }
}

fn edit_banner(painter: &egui::Painter, rect: Rect) {
    let galley = painter.layout_no_wrap(
        "Modo edición: arrastra las estaciones".to_string(),
        FontId::proportional(13.0),
        Color32::WHITE,
    );
    let banner = Align2::CENTER_TOP
        .anchor_size(rect.center_top() + vec2(0.0, 12.0), galley.size())
        .expand2(vec2(10.0, 5.0));
    painter.rect_filled(banner, 6.0, Color32::from_rgb(0xd9, 0x77, 0x06));
    painter.galley(banner.min + vec2(10.0, 5.0), galley, Color32::WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn test_dragged_marker_survives_leaving_the_map() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let outside = pos2(-120.0, 300.0);
        assert!(marker_in_view(rect, pos2(400.0, 300.0), false));
        assert!(marker_in_view(rect, pos2(-30.0, 300.0), false));
        assert!(!marker_in_view(rect, outside, false));
        assert!(marker_in_view(rect, outside, true));
    }
}
