//! Web Mercator math for the slippy map: geographic <-> world pixel
//! <-> screen conversions and the tile grid covering a viewport.

use eframe::egui::{Pos2, Rect, Vec2, vec2};
use siteur::LatLng;
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;
pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 19.0;
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Position in world pixels at `zoom` (origin at 180°W, 85°N).
pub fn world_px(pos: LatLng, zoom: f64) -> (f64, f64) {
    let size = TILE_SIZE * 2f64.powf(zoom);
    let lat = pos.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (pos.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

pub fn from_world_px(x: f64, y: f64, zoom: f64) -> LatLng {
    let size = TILE_SIZE * 2f64.powf(zoom);
    let lng = x / size * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// One tile to draw, with its on-screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRef {
    pub z: u8,
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

/// Expand `{s}`, `{z}`, `{x}` and `{y}` in a tile URL template.
pub fn tile_url(template: &str, subdomains: &[String], tile: &TileRef) -> String {
    let subdomain = if subdomains.is_empty() {
        "a"
    } else {
        &subdomains[(tile.x + tile.y) as usize % subdomains.len()]
    };
    template
        .replace("{s}", subdomain)
        .replace("{z}", &tile.z.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: LatLng,
    pub zoom: f64,
}

impl Camera {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn project(&self, viewport: Rect, pos: LatLng) -> Pos2 {
        let (cx, cy) = world_px(self.center, self.zoom);
        let (x, y) = world_px(pos, self.zoom);
        viewport.center() + vec2((x - cx) as f32, (y - cy) as f32)
    }

    pub fn unproject(&self, viewport: Rect, point: Pos2) -> LatLng {
        let (cx, cy) = world_px(self.center, self.zoom);
        let offset = point - viewport.center();
        from_world_px(cx + offset.x as f64, cy + offset.y as f64, self.zoom)
    }

    /// Move the map with the pointer by a screen delta.
    pub fn pan(&mut self, delta: Vec2) {
        let (cx, cy) = world_px(self.center, self.zoom);
        self.center =
            from_world_px(cx - delta.x as f64, cy - delta.y as f64, self.zoom);
    }

    /// Change zoom by `levels` keeping the point under `anchor` fixed.
    pub fn zoom_around(&mut self, viewport: Rect, anchor: Pos2, levels: f64) {
        let fixed = self.unproject(viewport, anchor);
        self.zoom = (self.zoom + levels).clamp(MIN_ZOOM, MAX_ZOOM);
        let (fx, fy) = world_px(fixed, self.zoom);
        let offset = anchor - viewport.center();
        self.center = from_world_px(
            fx - offset.x as f64,
            fy - offset.y as f64,
            self.zoom,
        );
    }

    /// Tiles at the nearest integer zoom that intersect `viewport`.
    pub fn visible_tiles(&self, viewport: Rect) -> Vec<TileRef> {
        let z = self.zoom.round().clamp(MIN_ZOOM, MAX_ZOOM);
        let scale = 2f64.powf(self.zoom - z);
        let tile_px = TILE_SIZE * scale;
        let count = 2f64.powf(z) as i64;

        let (cx, cy) = world_px(self.center, self.zoom);
        let left = cx - viewport.width() as f64 / 2.0;
        let top = cy - viewport.height() as f64 / 2.0;
        let x0 = (left / tile_px).floor() as i64;
        let x1 = ((left + viewport.width() as f64) / tile_px).floor() as i64;
        let y0 = ((top / tile_px).floor() as i64).max(0);
        let y1 = (((top + viewport.height() as f64) / tile_px).floor() as i64)
            .min(count - 1);

        let mut tiles = Vec::new();
        for ty in y0..=y1 {
            for tx in x0..=x1 {
                let min = viewport.min
                    + vec2(
                        (tx as f64 * tile_px - left) as f32,
                        (ty as f64 * tile_px - top) as f32,
                    );
                tiles.push(TileRef {
                    z: z as u8,
                    x: tx.rem_euclid(count) as u32,
                    y: ty as u32,
                    rect: Rect::from_min_size(
                        min,
                        vec2(tile_px as f32, tile_px as f32),
                    ),
                });
            }
        }
        tiles
    }
}
