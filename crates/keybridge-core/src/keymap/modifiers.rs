//! Host modifier state flags and the engine's modifier bitmask.
//!
//! # Two different modifier models (for beginners)
//!
//! The host reports modifiers as an X11-style *state mask*: one bit for
//! "some Shift is down", one for "some Ctrl is down", one for `Mod1`
//! (usually Alt) and one for `Mod5` (usually AltGr).  It never says *which*
//! Ctrl or Alt.
//!
//! The engine wants left and right variants as separate bits, because
//! keyboard rules frequently distinguish `RALT` (AltGr) from `LALT`.  The
//! missing information is recovered from [`ModifierLatches`](crate::domain::latches::ModifierLatches).

use serde::{Deserialize, Serialize};

/// Raw host key-state mask (X11 layout).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostKeyStates(pub u32);

impl HostKeyStates {
    pub const SHIFT: u32 = 1 << 0;
    pub const CAPS_LOCK: u32 = 1 << 1;
    pub const CTRL: u32 = 1 << 2;
    /// Generic Alt.
    pub const MOD1: u32 = 1 << 3;
    /// Num Lock.
    pub const MOD2: u32 = 1 << 4;
    pub const MOD3: u32 = 1 << 5;
    /// Super.
    pub const MOD4: u32 = 1 << 6;
    /// AltGr / ISO Level 3 shift.
    pub const MOD5: u32 = 1 << 7;

    /// Mask of states that make a key "modified" for exact-key comparisons.
    /// Lock states are deliberately not part of it.
    pub const SIMPLE_MASK: u32 = Self::SHIFT | Self::CTRL | Self::MOD1 | Self::MOD4;

    /// Returns `true` if every bit in `flag` is set.
    pub fn test(&self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    /// Returns `true` if no Shift/Ctrl/Alt/Super state is active.
    pub fn is_unmodified(&self) -> bool {
        self.0 & Self::SIMPLE_MASK == 0
    }
}

/// Engine modifier bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineModifiers(pub u16);

impl EngineModifiers {
    pub const LEFT_CTRL: u16 = 1 << 0;
    pub const RIGHT_CTRL: u16 = 1 << 1;
    pub const LEFT_ALT: u16 = 1 << 2;
    pub const RIGHT_ALT: u16 = 1 << 3;
    pub const SHIFT: u16 = 1 << 4;
    pub const CTRL: u16 = 1 << 5;
    pub const ALT: u16 = 1 << 6;
    pub const CAPS: u16 = 1 << 8;

    /// Sets `flag` in the mask.
    pub fn insert(&mut self, flag: u16) {
        self.0 |= flag;
    }

    /// Returns `true` if every bit in `flag` is set.
    pub fn contains(&self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    /// Returns `true` if either Alt bit is set.
    pub fn alt(&self) -> bool {
        self.0 & (Self::LEFT_ALT | Self::RIGHT_ALT) != 0
    }

    /// Returns `true` if either Ctrl bit is set.
    pub fn ctrl(&self) -> bool {
        self.0 & (Self::LEFT_CTRL | Self::RIGHT_CTRL) != 0
    }
}
