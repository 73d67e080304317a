use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a transit line.
///
/// Rail lines are numbered (`1`, `2`, ...), bus-rapid-transit corridors
/// use a short code (`"mc"`, `"mp"`).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(untagged)]
pub enum LineId {
    Number(u32),
    Code(String),
}

impl LineId {
    pub fn code(code: &str) -> Self {
        LineId::Code(code.to_string())
    }

    /// Bus corridors are the string-coded lines.
    pub fn is_brt(&self) -> bool {
        matches!(self, LineId::Code(_))
    }

    pub fn kind(&self) -> LineKind {
        if self.is_brt() {
            LineKind::Brt
        } else {
            LineKind::Rail
        }
    }
}

impl From<u32> for LineId {
    fn from(n: u32) -> Self {
        LineId::Number(n)
    }
}

impl From<&str> for LineId {
    fn from(code: &str) -> Self {
        LineId::code(code)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineId::Number(n) => write!(f, "{}", n),
            LineId::Code(c) => f.write_str(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Rail,
    Brt,
}

/// Plain sRGB color, kept free of any rendering crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

const UNKNOWN_LINE_COLOR: Rgb = Rgb(0x6B, 0x72, 0x80);

/// Display metadata for one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInfo {
    pub id: LineId,
    /// Legend name, e.g. "Línea 1" or "Macro Calzada (L6)".
    pub name: String,
    /// Name without the legend suffix, e.g. "Macro Calzada".
    pub short_name: String,
    pub color: Rgb,
}

impl LineInfo {
    pub fn kind(&self) -> LineKind {
        self.id.kind()
    }

    /// Label shown in marker popups.
    pub fn service_label(&self) -> String {
        match &self.id {
            LineId::Number(n) => format!("Tren Ligero L{}", n),
            LineId::Code(_) => format!("Mi {}", self.short_name),
        }
    }

    /// Subtitle of the station detail card.
    pub fn card_subtitle(&self) -> String {
        match &self.id {
            LineId::Number(n) => format!("Línea {} - Tren Ligero", n),
            LineId::Code(_) => self.short_name.clone(),
        }
    }
}

/// Color and name table keyed by line id.
#[derive(Debug, Clone, Default)]
pub struct LineTable {
    lines: Vec<LineInfo>,
}

impl LineTable {
    pub fn new(lines: Vec<LineInfo>) -> Self {
        Self { lines }
    }

    pub fn get(&self, id: &LineId) -> Option<&LineInfo> {
        self.lines.iter().find(|l| &l.id == id)
    }

    pub fn color(&self, id: &LineId) -> Rgb {
        self.get(id).map(|l| l.color).unwrap_or(UNKNOWN_LINE_COLOR)
    }

    pub fn name(&self, id: &LineId) -> String {
        self.get(id)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| format!("Línea {}", id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineInfo> {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors_parse() {
        assert_eq!(Rgb::from_hex("#E11D48"), Some(Rgb(0xE1, 0x1D, 0x48)));
        assert_eq!(Rgb::from_hex("E11D48"), None);
        assert_eq!(Rgb::from_hex("#E11D4"), None);
        assert_eq!(Rgb::from_hex("#GG1D48"), None);
    }

    #[test]
    fn test_line_id_kind_follows_identifier_type() {
        assert_eq!(LineId::Number(3).kind(), LineKind::Rail);
        assert_eq!(LineId::from("mc").kind(), LineKind::Brt);
        assert_eq!(LineId::from("mp").to_string(), "mp");
        assert_eq!(LineId::Number(4).to_string(), "4");
    }

    #[test]
    fn test_unknown_line_falls_back_to_gray() {
        let table = LineTable::default();
        assert_eq!(table.color(&LineId::Number(9)), UNKNOWN_LINE_COLOR);
        assert_eq!(table.name(&LineId::Number(9)), "Línea 9");
    }
}
