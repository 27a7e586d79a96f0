//! `scn-zone` — geometric trigger zones.
//!
//! A [`Zone`] is a labeled polygon that reports when a tracked point enters
//! or leaves it.  Detection is memoized per simulation tick, so a zone that
//! is consulted from several places in one tick (a flow router and a signal
//! controller, say) fires its transition exactly once and reports the same
//! event to every caller.
//!
//! # Crate layout
//!
//! | Module    | Contents                                          |
//! |-----------|---------------------------------------------------|
//! | [`event`] | `ZoneEvent` (`Entry`, `Exit`, `NoChange`)         |
//! | [`zone`]  | `Zone`                                            |
//! | [`set`]   | `ZoneSet`, `check_zones`, `ZoneEvents`            |
//! | [`error`] | `ZoneError`, `ZoneResult<T>`                      |

pub mod error;
pub mod event;
pub mod set;
pub mod zone;


pub use error::{ZoneError, ZoneResult};
pub use event::ZoneEvent;
pub use set::{ZoneEvents, ZoneSet, check_zones};
pub use zone::Zone;
