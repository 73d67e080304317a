use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::line::LineId;

/// Geographic position in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl Add for LatLng {
    type Output = LatLng;
    fn add(self, rhs: LatLng) -> LatLng {
        LatLng::new(self.lat + rhs.lat, self.lng + rhs.lng)
    }
}

impl Sub for LatLng {
    type Output = LatLng;
    fn sub(self, rhs: LatLng) -> LatLng {
        LatLng::new(self.lat - rhs.lat, self.lng - rhs.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub position: LatLng,
    pub line: LineId,
    #[serde(default)]
    pub is_transfer: bool,
    #[serde(default)]
    pub transfer_lines: Vec<LineId>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Station {
    pub fn new(
        id: &str,
        name: &str,
        lat: f64,
        lng: f64,
        line: LineId,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            position: LatLng::new(lat, lng),
            line,
            is_transfer: false,
            transfer_lines: Vec::new(),
            description: None,
        }
    }

    /// Station on a numbered rail line.
    pub fn rail(id: &str, name: &str, lat: f64, lng: f64, line: u32) -> Self {
        Self::new(id, name, lat, lng, LineId::Number(line))
    }

    /// Station on a code-named bus corridor.
    pub fn brt(id: &str, name: &str, lat: f64, lng: f64, line: &str) -> Self {
        Self::new(id, name, lat, lng, LineId::code(line))
    }

    /// Mark the station as a transfer point to the given lines.
    pub fn with_transfers(mut self, lines: Vec<LineId>) -> Self {
        self.is_transfer = true;
        self.transfer_lines = lines;
        self
    }

    pub fn with_description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn lat(&self) -> f64 {
        self.position.lat
    }

    pub fn lng(&self) -> f64 {
        self.position.lng
    }
}
