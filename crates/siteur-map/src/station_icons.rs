use eframe::egui::{
    self, Align2, Color32, FontFamily, FontId, Painter, Pos2, Rect, Shape,
    Stroke, Vec2, epaint::CircleShape,
};
use siteur::{LineKind, Rgb};

pub const RAIL_MARKER: Color32 = Color32::from_rgb(0x1d, 0x4e, 0xd8);
pub const RAIL_LABEL: Color32 = Color32::from_rgb(0x7e, 0x22, 0xce);
pub const BRT_MARKER: Color32 = Color32::from_rgb(0x4b, 0x55, 0x63);
pub const BRT_LABEL: Color32 = Color32::from_rgb(0x37, 0x41, 0x51);
pub const ANCHOR_RING: Color32 = Color32::from_rgb(0xf5, 0x9e, 0x0b);
pub const USER_LOCATION: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);

const MARKER_RADIUS: f32 = 11.0;
const GLYPH_FONT: f32 = 12.0;
const LABEL_FONT: f32 = 12.0;
const LABEL_GAP: f32 = 4.0;
/// Station names are drawn from this zoom level up.
const LABEL_MIN_ZOOM: f64 = 14.0;

pub fn line_color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

pub fn line_stroke_width(kind: LineKind) -> f32 {
    match kind {
        LineKind::Rail => 6.0,
        LineKind::Brt => 4.0,
    }
}

pub fn glyph(kind: LineKind) -> &'static str {
    match kind {
        LineKind::Rail => "🚆",
        LineKind::Brt => "🚌",
    }
}

pub fn labels_visible(zoom: f64) -> bool {
    zoom >= LABEL_MIN_ZOOM
}

/// Round marker with a vehicle glyph and an optional haloed name
/// label underneath.
pub struct StationMarker<'a> {
    pos: Pos2,
    kind: LineKind,
    label: Option<&'a str>,
    highlighted: bool,
    anchor: bool,
}

impl<'a> StationMarker<'a> {
    pub fn new(pos: Pos2, kind: LineKind) -> Self {
        Self {
            pos,
            kind,
            label: None,
            highlighted: false,
            anchor: false,
        }
    }

    pub fn label(mut self, text: &'a str) -> Self {
        self.label = Some(text);
        self
    }

    /// Hovered, selected or being dragged.
    pub fn highlighted(mut self, on: bool) -> Self {
        self.highlighted = on;
        self
    }

    /// Marks the station that moves its whole line in edit mode.
    pub fn anchor(mut self, on: bool) -> Self {
        self.anchor = on;
        self
    }

    pub fn hit_rect(&self) -> Rect {
        Rect::from_center_size(self.pos, Vec2::splat(MARKER_RADIUS * 2.0 + 4.0))
    }

    fn colors(&self) -> (Color32, Color32) {
        match self.kind {
            LineKind::Rail => (RAIL_MARKER, RAIL_LABEL),
            LineKind::Brt => (BRT_MARKER, BRT_LABEL),
        }
    }

    pub fn paint(&self, painter: &Painter) {
        let (fill, label_color) = self.colors();
        let radius = if self.highlighted {
            MARKER_RADIUS + 2.0
        } else {
            MARKER_RADIUS
        };
        let stroke = if self.anchor {
            Stroke::new(3.0, ANCHOR_RING)
        } else {
            Stroke::new(2.0, Color32::WHITE)
        };

        painter.add(Shape::Circle(CircleShape {
            center: self.pos + Vec2::new(0.0, 1.5),
            radius: radius + 1.0,
            fill: Color32::from_black_alpha(60),
            stroke: Stroke::NONE,
        }));
        painter.add(Shape::Circle(CircleShape {
            center: self.pos,
            radius,
            fill,
            stroke,
        }));
        painter.text(
            self.pos,
            Align2::CENTER_CENTER,
            glyph(self.kind),
            FontId::new(GLYPH_FONT, FontFamily::Proportional),
            Color32::WHITE,
        );

        if let Some(text) = self.label {
            let top = self.pos + Vec2::new(0.0, radius + LABEL_GAP);
            paint_haloed_label(painter, top, text, label_color);
        }
    }
}

/// Bold-looking text with a white outline so it stays readable over
/// map tiles.
fn paint_haloed_label(painter: &Painter, top: Pos2, text: &str, color: Color32) {
    let font = FontId::new(LABEL_FONT, FontFamily::Proportional);
    let galley =
        painter.layout_no_wrap(text.to_string(), font.clone(), Color32::WHITE);
    let origin = top - Vec2::new(galley.size().x / 2.0, 0.0);
    for offset in [
        Vec2::new(-1.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, -1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-1.0, 1.0),
        Vec2::new(1.0, -1.0),
    ] {
        painter.galley(origin + offset, galley.clone(), Color32::WHITE);
    }
    let galley = painter.layout_no_wrap(text.to_string(), font, color);
    painter.galley(origin, galley, color);
}

/// Blue "you are here" dot.
pub fn paint_user_location(painter: &Painter, pos: Pos2) {
    painter.circle_filled(pos, 14.0, USER_LOCATION.gamma_multiply(0.25));
    painter.circle(pos, 7.0, USER_LOCATION, Stroke::new(2.5, Color32::WHITE));
}

/// Small colored dot used in the line legend.
pub fn legend_dot(ui: &mut egui::Ui, color: Color32) {
    let (rect, _) =
        ui.allocate_exact_size(Vec2::splat(12.0), egui::Sense::hover());
    ui.painter().circle_filled(rect.center(), 5.0, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rail_and_brt_styles_differ() {
        assert_eq!(line_stroke_width(LineKind::Rail), 6.0);
        assert_eq!(line_stroke_width(LineKind::Brt), 4.0);
        assert_ne!(glyph(LineKind::Rail), glyph(LineKind::Brt));
        assert_eq!(
            line_color(Rgb(0x1d, 0x4e, 0xd8)),
            RAIL_MARKER,
        );
    }

    #[test]
    fn test_labels_hidden_when_zoomed_out() {
        assert!(!labels_visible(13.0));
        assert!(labels_visible(14.0));
        assert!(labels_visible(16.0));
    }

    #[test]
    fn test_hit_rect_covers_marker() {
        let marker = StationMarker::new(Pos2::new(100.0, 50.0), LineKind::Rail);
        let rect = marker.hit_rect();
        assert!(rect.contains(Pos2::new(100.0 + MARKER_RADIUS, 50.0)));
        assert!(!rect.contains(Pos2::new(130.0, 50.0)));
    }
}
