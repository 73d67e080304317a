use std::collections::HashMap;

use crate::line::LineId;
use crate::station::{LatLng, Station};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("duplicate station id `{0}`")]
    DuplicateId(String),
    #[error("unknown station id `{0}`")]
    UnknownStation(String),
}

/// Working copy of the station catalog.
///
/// Stations keep their insertion order, which is also the travel order
/// used to draw line paths. Ids are unique and never change; only
/// positions are mutable.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    stations: Vec<Station>,
    index_of: HashMap<String, usize>,
}

impl Registry {
    pub fn new(stations: Vec<Station>) -> Result<Self, RegistryError> {
        let mut index_of = HashMap::with_capacity(stations.len());
        for (i, station) in stations.iter().enumerate() {
            if index_of.insert(station.id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateId(station.id.clone()));
            }
        }
        Ok(Self { stations, index_of })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_of.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Station> {
        self.index_of(id).map(|i| &self.stations[i])
    }

    pub fn at(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    pub fn set_position(
        &mut self,
        id: &str,
        position: LatLng,
    ) -> Result<(), RegistryError> {
        let i = self
            .index_of(id)
            .ok_or_else(|| RegistryError::UnknownStation(id.to_string()))?;
        self.stations[i].position = position;
        Ok(())
    }

    pub(crate) fn set_position_at(&mut self, index: usize, position: LatLng) {
        if let Some(station) = self.stations.get_mut(index) {
            station.position = position;
        }
    }

    /// Distinct line ids in order of first appearance.
    pub fn line_ids(&self) -> Vec<LineId> {
        let mut seen: Vec<LineId> = Vec::new();
        for station in &self.stations {
            if !seen.contains(&station.line) {
                seen.push(station.line.clone());
            }
        }
        seen
    }

    /// Stations on `line` with their registry index, in registry order.
    pub fn stations_on_line<'a>(
        &'a self,
        line: &'a LineId,
    ) -> impl Iterator<Item = (usize, &'a Station)> + 'a {
        self.stations
            .iter()
            .enumerate()
            .filter(move |(_, s)| &s.line == line)
    }

    /// Copy positions from `stations` onto matching ids.
    ///
    /// Unknown ids are skipped. Returns how many stations moved.
    pub fn apply_positions(&mut self, stations: &[Station]) -> usize {
        let mut updated = 0;
        for incoming in stations {
            match self.index_of(&incoming.id) {
                Some(i) => {
                    if self.stations[i].position != incoming.position {
                        self.stations[i].position = incoming.position;
                        updated += 1;
                    }
                }
                None => {
                    log::warn!(
                        "ignoring position for unknown station `{}`",
                        incoming.id
                    );
                }
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Registry {
        Registry::new(vec![
            Station::rail("a", "Alfa", 20.0, -103.0, 1),
            Station::brt("m1", "Eme Uno", 20.1, -103.1, "mc"),
            Station::rail("b", "Beta", 20.2, -103.2, 1),
            Station::brt("m2", "Eme Dos", 20.3, -103.3, "mc"),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = Registry::new(vec![
            Station::rail("a", "Alfa", 0.0, 0.0, 1),
            Station::rail("a", "Otra", 1.0, 1.0, 2),
        ]);
        assert_eq!(result.unwrap_err(), RegistryError::DuplicateId("a".into()));
    }

    #[test]
    fn test_line_ids_in_first_seen_order() {
        assert_eq!(
            sample().line_ids(),
            vec![LineId::Number(1), LineId::code("mc")]
        );
    }

    #[test]
    fn test_set_position_unknown_station() {
        let mut registry = sample();
        let err = registry
            .set_position("zz", LatLng::new(0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownStation("zz".into()));
    }

    #[test]
    fn test_apply_positions_skips_unknown_and_unchanged() {
        let mut registry = sample();
        let moved = registry.apply_positions(&[
            Station::rail("a", "Alfa", 21.0, -104.0, 1),
            Station::rail("b", "Beta", 20.2, -103.2, 1),
            Station::rail("nope", "Nada", 0.0, 0.0, 1),
        ]);
        assert_eq!(moved, 1);
        assert_eq!(registry.get("a").unwrap().position, LatLng::new(21.0, -104.0));
    }
}
