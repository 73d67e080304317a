use std::collections::BTreeSet;

use crate::line::LineId;
use crate::registry::Registry;
use crate::station::{LatLng, Station};

/// Ordered coordinates of one line, derived from registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePath {
    pub id: LineId,
    pub coordinates: Vec<LatLng>,
}

fn matches_search(name: &str, needle: &str) -> bool {
    needle.is_empty() || name.to_lowercase().contains(needle)
}

/// Registry indices of the stations that pass the current filters.
pub fn visible_station_indices(
    registry: &Registry,
    search_text: &str,
    visible_lines: &BTreeSet<LineId>,
) -> Vec<usize> {
    let needle = search_text.to_lowercase();
    registry
        .iter()
        .enumerate()
        .filter(|(_, s)| visible_lines.contains(&s.line))
        .filter(|(_, s)| matches_search(&s.name, &needle))
        .map(|(i, _)| i)
        .collect()
}

/// Stations whose name contains `search_text` (case-insensitive) and
/// whose line is toggled on, in registry order.
pub fn visible_stations<'a>(
    registry: &'a Registry,
    search_text: &str,
    visible_lines: &BTreeSet<LineId>,
) -> Vec<&'a Station> {
    visible_station_indices(registry, search_text, visible_lines)
        .into_iter()
        .filter_map(|i| registry.at(i))
        .collect()
}

/// One path per distinct line, in order of first appearance.
pub fn line_paths(registry: &Registry) -> Vec<LinePath> {
    registry
        .line_ids()
        .into_iter()
        .map(|id| {
            let coordinates = registry
                .stations_on_line(&id)
                .map(|(_, s)| s.position)
                .collect();
            LinePath { id, coordinates }
        })
        .collect()
}

pub fn visible_line_paths(
    paths: &[LinePath],
    visible_lines: &BTreeSet<LineId>,
) -> Vec<LinePath> {
    paths
        .iter()
        .filter(|p| visible_lines.contains(&p.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    fn all_lines(registry: &Registry) -> BTreeSet<LineId> {
        registry.line_ids().into_iter().collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let registry = data::guadalajara();
        let names: Vec<_> =
            visible_stations(&registry, "PERIFÉRICO", &all_lines(&registry))
                .iter()
                .map(|s| s.id.as_str())
                .collect();
        assert_eq!(
            names,
            vec!["l1-pnor", "l1-psur", "l3-belen", "mp-pnor", "mp-psur"]
        );
    }

    #[test]
    fn test_hidden_lines_are_filtered_out() {
        let registry = data::guadalajara();
        let only_l2: BTreeSet<_> = [LineId::Number(2)].into_iter().collect();
        let found = visible_stations(&registry, "juárez", &only_l2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "l2-juar");
    }

    #[test]
    fn test_visible_stations_returns_each_match_once() {
        let registry = data::guadalajara();
        let lines = all_lines(&registry);
        for needle in ["", "a", "san", "xyz"] {
            let found = visible_station_indices(&registry, needle, &lines);
            let expected: Vec<usize> = registry
                .iter()
                .enumerate()
                .filter(|(_, s)| s.name.to_lowercase().contains(needle))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(found, expected, "search {:?}", needle);
        }
        assert!(visible_stations(&registry, "", &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_line_paths_follow_registry_order() {
        let registry = data::guadalajara();
        let paths = line_paths(&registry);
        assert_eq!(paths.len(), registry.line_ids().len());
        for path in &paths {
            let expected: Vec<LatLng> = registry
                .iter()
                .filter(|s| s.line == path.id)
                .map(|s| s.position)
                .collect();
            assert_eq!(path.coordinates, expected);
        }
        let mc = paths.iter().find(|p| p.id == LineId::code("mc")).unwrap();
        assert_eq!(mc.coordinates.len(), 7);
        assert_eq!(mc.coordinates[0], LatLng::new(20.73711, -103.31217));
    }

    #[test]
    fn test_line_paths_track_moved_stations() {
        let mut registry = data::guadalajara();
        registry
            .set_position("l4-tlaj", LatLng::new(20.4, -103.5))
            .unwrap();
        let paths = line_paths(&registry);
        let l4 = paths.iter().find(|p| p.id == LineId::Number(4)).unwrap();
        assert_eq!(l4.coordinates.last(), Some(&LatLng::new(20.4, -103.5)));
    }

    #[test]
    fn test_visible_line_paths_respects_toggles() {
        let registry = data::guadalajara();
        let paths = line_paths(&registry);
        let visible: BTreeSet<_> =
            [LineId::Number(1), LineId::code("mp")].into_iter().collect();
        let shown: Vec<_> = visible_line_paths(&paths, &visible)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(shown, vec![LineId::Number(1), LineId::code("mp")]);
    }
}
