//! `scn-signal` — scripted vehicle signals.
//!
//! A vehicle's signal state (blinkers, brake light, …) is one integer
//! bitmask on the simulator side.  A [`SignalController`] owns a set of
//! [`SignalChannel`]s for one vehicle, each driving one bit with a steady or
//! blinking [`BlinkPattern`], optionally switched on and off by zone events.
//! All channels are folded into a single mask write per tick.
//!
//! # Crate layout
//!
//! | Module         | Contents                                          |
//! |----------------|---------------------------------------------------|
//! | [`pattern`]    | `BlinkPattern`                                    |
//! | [`channel`]    | `SignalChannel`                                   |
//! | [`controller`] | `SignalController`, `ChannelGates`                |
//! | [`error`]      | `SignalError`, `SignalResult<T>`                  |

pub mod channel;
pub mod controller;
pub mod error;
pub mod pattern;


pub use channel::SignalChannel;
pub use controller::{ChannelGates, SignalController};
pub use error::{SignalError, SignalResult};
pub use pattern::{BlinkPattern, DEFAULT_BLINK};
