//! Drag repositioning of station markers.
//!
//! One configurable anchor station acts as a rigid handle for its whole
//! line: dragging it translates every station on that line by the same
//! delta, measured against positions captured at drag start. Any other
//! station is moved on its own.
//!
//! Group moves are coalesced: `drag` only records the latest reported
//! position and `flush` (called once per frame) applies it.

use crate::line::LineId;
use crate::registry::Registry;
use crate::station::LatLng;

#[derive(Debug, Clone)]
struct GroupSnapshot {
    line: LineId,
    anchor_start: LatLng,
    members: Vec<(usize, LatLng)>,
}

#[derive(Debug, Clone)]
struct Gesture {
    station_id: String,
    group: Option<GroupSnapshot>,
}

#[derive(Debug, Clone, Default)]
pub struct DragHandler {
    anchor_id: Option<String>,
    gesture: Option<Gesture>,
    pending: Option<LatLng>,
}

impl DragHandler {
    pub fn new(anchor_id: Option<String>) -> Self {
        Self {
            anchor_id,
            gesture: None,
            pending: None,
        }
    }

    pub fn anchor_id(&self) -> Option<&str> {
        self.anchor_id.as_deref()
    }

    pub fn is_anchor(&self, station_id: &str) -> bool {
        self.anchor_id.as_deref() == Some(station_id)
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Station held by the current gesture.
    pub fn active_station(&self) -> Option<&str> {
        self.gesture.as_ref().map(|g| g.station_id.as_str())
    }

    /// Line currently being moved as a group, if any.
    pub fn group_line(&self) -> Option<&LineId> {
        self.gesture
            .as_ref()
            .and_then(|g| g.group.as_ref())
            .map(|g| &g.line)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Idle -> Dragging. Snapshots the anchor's line when `station_id`
    /// is the anchor.
    pub fn begin(&mut self, registry: &Registry, station_id: &str) {
        self.pending = None;
        let Some(station) = registry.get(station_id) else {
            log::warn!("drag started on unknown station `{}`", station_id);
            self.gesture = None;
            return;
        };

        let group = if self.is_anchor(station_id) {
            let members: Vec<(usize, LatLng)> = registry
                .stations_on_line(&station.line)
                .map(|(i, s)| (i, s.position))
                .collect();
            log::debug!(
                "group drag of line {} ({} stations) via `{}`",
                station.line,
                members.len(),
                station_id
            );
            Some(GroupSnapshot {
                line: station.line.clone(),
                anchor_start: station.position,
                members,
            })
        } else {
            None
        };

        self.gesture = Some(Gesture {
            station_id: station_id.to_string(),
            group,
        });
    }

    /// Report a pointer move. Returns `true` when the registry changed.
    ///
    /// Moves without a matching active gesture are discarded.
    pub fn drag(
        &mut self,
        registry: &mut Registry,
        station_id: &str,
        position: LatLng,
    ) -> bool {
        let Some(gesture) = &self.gesture else {
            return false;
        };
        if gesture.station_id != station_id {
            return false;
        }
        if gesture.group.is_some() {
            self.pending = Some(position);
            false
        } else {
            registry.set_position(station_id, position).is_ok()
        }
    }

    /// Apply the latest coalesced group move, if one is waiting.
    pub fn flush(&mut self, registry: &mut Registry) -> bool {
        let Some(position) = self.pending.take() else {
            return false;
        };
        match self.gesture.as_ref().and_then(|g| g.group.as_ref()) {
            Some(group) => {
                apply_group_move(registry, group, position);
                true
            }
            None => false,
        }
    }

    /// Dragging -> Idle. Commits the final reported position and drops
    /// any pending move.
    pub fn end(
        &mut self,
        registry: &mut Registry,
        station_id: &str,
        position: LatLng,
    ) -> bool {
        self.pending = None;
        let gesture = self.gesture.take();
        match gesture {
            Some(Gesture {
                station_id: ref active,
                group: Some(ref group),
            }) if active == station_id => {
                apply_group_move(registry, group, position);
                true
            }
            _ if self.is_anchor(station_id) => false,
            _ => registry.set_position(station_id, position).is_ok(),
        }
    }

    /// Abort the current gesture without applying anything further.
    pub fn cancel(&mut self) {
        if self.gesture.is_some() {
            log::debug!("drag gesture cancelled");
        }
        self.gesture = None;
        self.pending = None;
    }
}

fn apply_group_move(
    registry: &mut Registry,
    group: &GroupSnapshot,
    anchor_position: LatLng,
) {
    let delta = anchor_position - group.anchor_start;
    for &(index, start) in &group.members {
        registry.set_position_at(index, start + delta);
    }
}
