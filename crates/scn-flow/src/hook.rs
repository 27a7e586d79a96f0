//! Post-creation hook for flow entities.

use scn_core::{EntityId, VTypeId};

/// Called by a [`Flow`][crate::Flow] right after it inserts an entity.
///
/// The default method does nothing, so implementors only override what they
/// need.
///
/// ```rust,ignore
/// struct Tally(usize);
///
/// impl SpawnObserver for Tally {
///     fn on_spawn(&mut self, _flow: &str, _id: &EntityId, _type_id: &VTypeId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SpawnObserver {
    fn on_spawn(&mut self, _flow: &str, _id: &EntityId, _type_id: &VTypeId) {}
}

/// A [`SpawnObserver`] that does nothing.
pub struct NoopSpawnObserver;

impl SpawnObserver for NoopSpawnObserver {}
