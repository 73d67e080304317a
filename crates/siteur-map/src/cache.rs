use crate::store::Store;
use crate::versioned::Memoized;
use siteur::view::{self, LinePath};
use siteur::LineId;
use std::collections::BTreeSet;

type FilterKey = (u64, String, BTreeSet<LineId>);

/// Data derived from the store, recomputed when its inputs change.
pub struct Cache {
    pub line_paths: Memoized<Store, u64, Vec<LinePath>>,
    /// Registry indices of the stations passing search and line filters.
    pub visible_stations: Memoized<Store, FilterKey, Vec<usize>>,
}

impl Cache {
    pub fn new() -> Self {
        let line_paths = Memoized::new(
            |s: &Store| s.registry.version(),
            |s: &Store| view::line_paths(s.registry.get()),
        );

        let visible_stations = Memoized::new(
            |s: &Store| {
                (
                    s.registry.version(),
                    s.search_text.clone(),
                    s.visible_lines.clone(),
                )
            },
            |s: &Store| {
                view::visible_station_indices(
                    s.registry.get(),
                    &s.search_text,
                    &s.visible_lines,
                )
            },
        );

        Self {
            line_paths,
            visible_stations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use siteur::LatLng;

    #[test]
    fn test_paths_follow_registry_edits() {
        let mut store = Store::new(Settings::default());
        let mut cache = Cache::new();
        let before = cache.line_paths.get(&store).clone();
        assert_eq!(cache.line_paths.get(&store), &before);
        assert_eq!(cache.line_paths.version(), 1);

        store.registry.modify(|r| {
            r.set_position("l1-audi", LatLng::new(20.8, -103.4)).is_ok()
        });
        let after = cache.line_paths.get(&store);
        assert_ne!(after, &before);
        assert_eq!(after[0].coordinates[0], LatLng::new(20.8, -103.4));
    }

    #[test]
    fn test_visible_stations_follow_filters() {
        let mut store = Store::new(Settings::default());
        let mut cache = Cache::new();
        let all = cache.visible_stations.get(&store).len();
        assert_eq!(all, store.registry.get().len());

        store.search_text = "periférico".to_string();
        assert_eq!(cache.visible_stations.get(&store).len(), 5);

        store.visible_lines.remove(&LineId::code("mp"));
        assert_eq!(cache.visible_stations.get(&store).len(), 3);
    }
}
