//! Zone transition events.

use std::fmt;

/// What happened to a zone's containment state on the current tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZoneEvent {
    /// The point moved from outside to inside.
    Entry,
    /// The point moved from inside to outside.
    Exit,
    #[default]
    NoChange,
}

impl ZoneEvent {
    /// `true` for `Entry` and `Exit`.
    #[inline]
    pub fn is_transition(self) -> bool {
        self != ZoneEvent::NoChange
    }
}

impl fmt::Display for ZoneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ZoneEvent::Entry    => "entry",
            ZoneEvent::Exit     => "exit",
            ZoneEvent::NoChange => "no-change",
        };
        f.write_str(s)
    }
}
