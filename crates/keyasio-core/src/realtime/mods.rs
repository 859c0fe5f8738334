//! Gameplay modifier bit set.
//!
//! The game reports active mods as a 32-bit mask.  [`PlayMods`] wraps that
//! mask and knows the bits KeyAsio cares about: which ones change playback
//! speed (and therefore when audio cues have to fire) and how to print them
//! the way players write them (`HDDT`, `HR`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Set of active gameplay modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayMods(u32);

impl PlayMods {
    pub const NONE: PlayMods = PlayMods(0);
    pub const NO_FAIL: PlayMods = PlayMods(1);
    pub const EASY: PlayMods = PlayMods(1 << 1);
    pub const TOUCH_DEVICE: PlayMods = PlayMods(1 << 2);
    pub const HIDDEN: PlayMods = PlayMods(1 << 3);
    pub const HARD_ROCK: PlayMods = PlayMods(1 << 4);
    pub const SUDDEN_DEATH: PlayMods = PlayMods(1 << 5);
    pub const DOUBLE_TIME: PlayMods = PlayMods(1 << 6);
    pub const RELAX: PlayMods = PlayMods(1 << 7);
    pub const HALF_TIME: PlayMods = PlayMods(1 << 8);
    /// Always reported together with `DOUBLE_TIME`.
    pub const NIGHTCORE: PlayMods = PlayMods(1 << 9);
    pub const FLASHLIGHT: PlayMods = PlayMods(1 << 10);
    pub const AUTOPLAY: PlayMods = PlayMods(1 << 11);
    pub const SPUN_OUT: PlayMods = PlayMods(1 << 12);
    pub const AUTOPILOT: PlayMods = PlayMods(1 << 13);
    /// Always reported together with `SUDDEN_DEATH`.
    pub const PERFECT: PlayMods = PlayMods(1 << 14);

    /// Display order and acronyms used by [`fmt::Display`].
    const ACRONYMS: [(PlayMods, &'static str); 15] = [
        (PlayMods::EASY, "EZ"),
        (PlayMods::NO_FAIL, "NF"),
        (PlayMods::HALF_TIME, "HT"),
        (PlayMods::HARD_ROCK, "HR"),
        (PlayMods::SUDDEN_DEATH, "SD"),
        (PlayMods::PERFECT, "PF"),
        (PlayMods::DOUBLE_TIME, "DT"),
        (PlayMods::NIGHTCORE, "NC"),
        (PlayMods::HIDDEN, "HD"),
        (PlayMods::FLASHLIGHT, "FL"),
        (PlayMods::RELAX, "RX"),
        (PlayMods::AUTOPILOT, "AP"),
        (PlayMods::SPUN_OUT, "SO"),
        (PlayMods::AUTOPLAY, "AT"),
        (PlayMods::TOUCH_DEVICE, "TD"),
    ];

    /// Wraps a raw mask as reported by the game.
    pub const fn from_bits(bits: u32) -> Self {
        PlayMods(bits)
    }

    /// Raw mask.
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: PlayMods) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: PlayMods) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: PlayMods) {
        self.0 &= !other.0;
    }

    /// Song playback rate implied by the speed-changing mods.
    ///
    /// Audio cue offsets are divided by this value to stay in sync.
    pub fn playback_rate(self) -> f64 {
        if self.contains(PlayMods::DOUBLE_TIME) || self.contains(PlayMods::NIGHTCORE) {
            1.5
        } else if self.contains(PlayMods::HALF_TIME) {
            0.75
        } else {
            1.0
        }
    }
}

impl std::ops::BitOr for PlayMods {
    type Output = PlayMods;

    fn bitor(self, rhs: PlayMods) -> PlayMods {
        PlayMods(self.0 | rhs.0)
    }
}

impl fmt::Display for PlayMods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        for (flag, acronym) in Self::ACRONYMS {
            // NC implies DT and PF implies SD; print only the stronger one.
            if flag == PlayMods::DOUBLE_TIME && self.contains(PlayMods::NIGHTCORE) {
                continue;
            }
            if flag == PlayMods::SUDDEN_DEATH && self.contains(PlayMods::PERFECT) {
                continue;
            }
            if self.contains(flag) {
                f.write_str(acronym)?;
            }
        }
        Ok(())
    }
}
