//! Collections of zones evaluated together.

use rustc_hash::FxHashMap;

use scn_core::{Point2, Tick, ZoneId};

use crate::{Zone, ZoneError, ZoneEvent, ZoneResult};

/// Per-zone events produced by one evaluation pass.
pub type ZoneEvents = FxHashMap<ZoneId, ZoneEvent>;

/// Check every zone in `zones` against `p` and collect the events by id.
pub fn check_zones<'a>(
    zones: impl IntoIterator<Item = &'a mut Zone>,
    p:     Point2,
    tick:  Tick,
) -> ZoneEvents {
    zones
        .into_iter()
        .map(|zone| {
            let event = zone.check(p, tick);
            (zone.id().clone(), event)
        })
        .collect()
}

/// All zones of a scenario, addressable by id.
///
/// Zones keep their insertion order for iteration.
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: Vec<Zone>,
    index: FxHashMap<ZoneId, usize>,
}

impl ZoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, rejecting duplicate ids.
    pub fn from_zones(zones: impl IntoIterator<Item = Zone>) -> ZoneResult<Self> {
        let mut set = Self::new();
        for zone in zones {
            set.insert(zone)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, zone: Zone) -> ZoneResult<()> {
        if self.index.contains_key(zone.id()) {
            return Err(ZoneError::DuplicateId(zone.id().clone()));
        }
        self.index.insert(zone.id().clone(), self.zones.len());
        self.zones.push(zone);
        Ok(())
    }

    pub fn contains(&self, id: &ZoneId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &ZoneId) -> Option<&Zone> {
        self.index.get(id).map(|&i| &self.zones[i])
    }

    pub fn get_mut(&mut self, id: &ZoneId) -> Option<&mut Zone> {
        self.index.get(id).map(|&i| &mut self.zones[i])
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Check every zone against `p`.
    pub fn check_all(&mut self, p: Point2, tick: Tick) -> ZoneEvents {
        check_zones(self.zones.iter_mut(), p, tick)
    }

    /// Check one zone against `p`.
    pub fn check(&mut self, id: &ZoneId, p: Point2, tick: Tick) -> ZoneResult<ZoneEvent> {
        self.get_mut(id)
            .map(|zone| zone.check(p, tick))
            .ok_or_else(|| ZoneError::UnknownZone(id.clone()))
    }
}
