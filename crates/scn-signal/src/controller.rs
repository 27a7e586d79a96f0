//! Per-vehicle signal controller.

use log::debug;

use scn_core::{EntityId, ZoneId};
use scn_engine::TrafficEngine;
use scn_zone::{ZoneEvent, ZoneSet};

use crate::{SignalChannel, SignalResult};

/// Zones that switch a channel on or off.
///
/// Both events default to [`ZoneEvent::Entry`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelGates {
    pub enable_zone:   Option<ZoneId>,
    pub disable_zone:  Option<ZoneId>,
    pub enable_event:  ZoneEvent,
    pub disable_event: ZoneEvent,
}

impl Default for ChannelGates {
    fn default() -> Self {
        Self {
            enable_zone:   None,
            disable_zone:  None,
            enable_event:  ZoneEvent::Entry,
            disable_event: ZoneEvent::Entry,
        }
    }
}

impl ChannelGates {
    /// No gating: the channel is switched only by hand.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn enable_on(mut self, zone: impl Into<ZoneId>, event: ZoneEvent) -> Self {
        self.enable_zone = Some(zone.into());
        self.enable_event = event;
        self
    }

    pub fn disable_on(mut self, zone: impl Into<ZoneId>, event: ZoneEvent) -> Self {
        self.disable_zone = Some(zone.into());
        self.disable_event = event;
        self
    }

    pub fn zones(&self) -> impl Iterator<Item = &ZoneId> {
        self.enable_zone.iter().chain(self.disable_zone.iter())
    }
}

/// Drives the signal bitmask of one vehicle.
pub struct SignalController {
    entity:   EntityId,
    channels: Vec<(SignalChannel, ChannelGates)>,
}

impl SignalController {
    pub fn new(entity: impl Into<EntityId>) -> Self {
        Self { entity: entity.into(), channels: Vec::new() }
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn add_channel(&mut self, channel: SignalChannel, gates: ChannelGates) -> &mut Self {
        self.channels.push((channel, gates));
        self
    }

    pub fn channels(&self) -> impl Iterator<Item = &SignalChannel> {
        self.channels.iter().map(|(c, _)| c)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut SignalChannel> {
        self.channels.get_mut(index).map(|(c, _)| c)
    }

    /// Every zone id referenced by a channel gate.
    pub fn referenced_zones(&self) -> impl Iterator<Item = &ZoneId> {
        self.channels.iter().flat_map(|(_, g)| g.zones())
    }

    /// Apply zone gates, advance every channel and write the combined mask.
    ///
    /// Returns the mask written, or `None` if the vehicle is not in the
    /// network this tick.
    pub fn update<E>(&mut self, engine: &mut E, zones: &mut ZoneSet) -> SignalResult<Option<u32>>
    where
        E: TrafficEngine + ?Sized,
    {
        if !engine.has_vehicle(&self.entity)? {
            return Ok(None);
        }
        let tick = engine.tick();
        let now = engine.time_secs();
        let position = engine.position(&self.entity)?;
        engine.restore_signals(&self.entity)?;
        let mut mask = engine.signals(&self.entity)?;

        for (channel, gates) in &mut self.channels {
            if let Some(zone) = &gates.enable_zone {
                if zones.check(zone, position, tick)? == gates.enable_event {
                    debug!("{}: bit {} enabled by {zone}", self.entity, channel.bit());
                    channel.enable(now);
                }
            }
            if let Some(zone) = &gates.disable_zone {
                if zones.check(zone, position, tick)? == gates.disable_event {
                    debug!("{}: bit {} disabled by {zone}", self.entity, channel.bit());
                    channel.disable();
                }
            }
            if channel.update(now) {
                mask |= channel.mask();
            } else {
                mask &= !channel.mask();
            }
        }

        engine.set_signals(&self.entity, mask)?;
        Ok(Some(mask))
    }
}
