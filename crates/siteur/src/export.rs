//! Writes the working registry back out as the station-table literal,
//! so edited positions can be pasted over the original table.

use std::fmt::Write;

use crate::line::LineId;
use crate::registry::Registry;
use crate::station::Station;

pub const TABLE_HEADER: &str = "export const STATIONS: Station[] = [";
pub const TABLE_FOOTER: &str = "];";

const COORDINATE_DECIMALS: usize = 5;

/// `value` with `COORDINATE_DECIMALS` places, halves rounded away from
/// zero on the exact binary value (`20.015625` -> `20.01563`).
fn round_half_away(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // Exact enough that the digit after the cut is never disturbed.
    let exact = format!("{:.40}", value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().take(COORDINATE_DECIMALS))
        .map(|b| b - b'0')
        .collect();

    if fraction
        .as_bytes()
        .get(COORDINATE_DECIMALS)
        .is_some_and(|&d| d >= b'5')
    {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, 1);
                break;
            }
            i -= 1;
            if digits[i] == 9 {
                digits[i] = 0;
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let split = digits.len() - COORDINATE_DECIMALS;
    let mut text = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        text.push('-');
    }
    text.extend(digits[..split].iter().map(|&d| char::from(b'0' + d)));
    text.push('.');
    text.extend(digits[split..].iter().map(|&d| char::from(b'0' + d)));
    text
}

/// Round to 5 decimals and print in shortest form (`20.7`, not
/// `20.70000`).
pub fn format_coordinate(value: f64) -> String {
    let mut text = round_half_away(value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn line_literal(line: &LineId) -> String {
    match line {
        LineId::Number(n) => n.to_string(),
        LineId::Code(code) => quote(code),
    }
}

pub fn station_entry(station: &Station) -> String {
    let mut entry = format!(
        "  {{ id: {}, name: {}, lat: {}, lng: {}, line: {}",
        quote(&station.id),
        quote(&station.name),
        format_coordinate(station.lat()),
        format_coordinate(station.lng()),
        line_literal(&station.line),
    );
    if station.is_transfer {
        let lines: Vec<String> =
            station.transfer_lines.iter().map(line_literal).collect();
        let _ = write!(
            entry,
            ", isTransfer: true, transferLines: [{}]",
            lines.join(", ")
        );
    }
    if let Some(description) = &station.description {
        let _ = write!(entry, ", description: {}", quote(description));
    }
    entry.push_str(" },");
    entry
}

/// Full table declaration, one station per line.
pub fn export_stations(registry: &Registry) -> String {
    let body: Vec<String> = registry.iter().map(station_entry).collect();
    format!("{}\n{}\n{}", TABLE_HEADER, body.join("\n"), TABLE_FOOTER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;
    use crate::parse::parse_stations;
    use crate::station::LatLng;

    #[test]
    fn test_coordinates_round_to_five_decimals() {
        assert_eq!(format_coordinate(20.73524), "20.73524");
        assert_eq!(format_coordinate(20.7), "20.7");
        assert_eq!(format_coordinate(-103.3), "-103.3");
        assert_eq!(format_coordinate(20.123456789), "20.12346");
        assert_eq!(format_coordinate(-103.0), "-103");
        assert_eq!(format_coordinate(-0.000001), "0");
        assert_eq!(format_coordinate(1.999996), "2");
    }

    #[test]
    fn test_exact_halves_round_away_from_zero() {
        assert_eq!(format_coordinate(20.015625), "20.01563");
        assert_eq!(format_coordinate(-20.015625), "-20.01563");
        assert_eq!(format_coordinate(0.984375), "0.98438");
        assert_eq!(format_coordinate(-103.046875), "-103.04688");
    }

    #[test]
    fn test_entry_field_order_and_quoting() {
        let plain = Station::rail("l1-audi", "Auditorio", 20.73524, -103.35079, 1);
        assert_eq!(
            station_entry(&plain),
            "  { id: 'l1-audi', name: 'Auditorio', lat: 20.73524, lng: -103.35079, line: 1 },"
        );

        let transfer = Station::brt("mc-13", "San Juan de Dios", 20.67576, -103.34129, "mc")
            .with_transfers(vec![LineId::Number(2), LineId::code("mp")])
            .with_description("Salida a Mercado Libertad");
        assert_eq!(
            station_entry(&transfer),
            "  { id: 'mc-13', name: 'San Juan de Dios', lat: 20.67576, lng: -103.34129, line: 'mc', \
             isTransfer: true, transferLines: [2, 'mp'], description: 'Salida a Mercado Libertad' },"
        );
    }

    #[test]
    fn test_quotes_in_names_are_escaped() {
        let station = Station::rail("x", "O'Higgins \\ Sur", 1.0, 2.0, 1);
        let entry = station_entry(&station);
        assert!(entry.contains(r"name: 'O\'Higgins \\ Sur'"));
    }

    #[test]
    fn test_table_is_wrapped_in_declaration() {
        let text = export_stations(&data::guadalajara());
        assert!(text.starts_with("export const STATIONS: Station[] = [\n  { id: 'l1-audi'"));
        assert!(text.ends_with(" },\n];"));
        assert_eq!(text.lines().count(), 88 + 2);
    }

    #[test]
    fn test_export_parses_back_to_registry() {
        let mut registry = data::guadalajara();
        registry
            .set_position("mc-01", LatLng::new(20.7381234567, -103.3111111))
            .unwrap();
        let mut last = registry.stations().last().unwrap().clone();
        last.description = Some("Terminal 'Chapala'".to_string());
        let mut stations = registry.stations().to_vec();
        let n = stations.len();
        stations[n - 1] = last;
        let registry = Registry::new(stations).unwrap();

        let parsed = parse_stations(&export_stations(&registry)).unwrap();
        assert_eq!(parsed.len(), registry.len());
        for (original, back) in registry.iter().zip(&parsed) {
            assert_eq!(original.id, back.id);
            assert_eq!(original.name, back.name);
            assert_eq!(original.line, back.line);
            assert_eq!(format_coordinate(original.lat()), format_coordinate(back.lat()));
            assert_eq!(format_coordinate(original.lng()), format_coordinate(back.lng()));
            assert_eq!(original.is_transfer, back.is_transfer);
            assert_eq!(original.transfer_lines, back.transfer_lines);
            assert_eq!(original.description, back.description);
        }
        let moved = parsed.iter().find(|s| s.id == "mc-01").unwrap();
        assert_eq!(moved.position, LatLng::new(20.73812, -103.31111));
    }
}
