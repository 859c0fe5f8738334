//! Real-time state and the events that change it.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::mods::PlayMods;

/// What the game client is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsuStatus {
    /// The game process is not running.
    #[default]
    NoFoundProcess,
    Unknown,
    SelectSong,
    Playing,
    Editing,
    Rank,
    MatchSetup,
    Lobby,
    Idle,
}

impl OsuStatus {
    /// `true` while gameplay audio cues should be scheduled.
    pub fn is_playing(self) -> bool {
        self == OsuStatus::Playing
    }
}

/// The beatmap currently selected or being played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beatmap {
    pub id: i32,
    pub set_id: i32,
    /// Song folder containing the `.osu` file and its hit sounds.
    pub folder: PathBuf,
    /// File name of the `.osu` difficulty inside `folder`.
    pub filename: String,
}

impl Beatmap {
    /// Full path to the `.osu` file.
    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.filename)
    }
}

/// A change notification emitted by the real-time listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RealtimeEvent {
    PlayerChanged(String),
    ModsChanged(PlayMods),
    ComboChanged(u32),
    ScoreChanged(u64),
    /// Song position in milliseconds.  Negative during the lead-in.
    PlayTimeChanged(i64),
    BeatmapChanged(Beatmap),
    StatusChanged {
        previous: OsuStatus,
        current: OsuStatus,
    },
}

/// The state property touched by an applied [`RealtimeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealtimeProperty {
    Username,
    PlayMods,
    Combo,
    Score,
    PlayTime,
    Beatmap,
    OsuStatus,
}

impl fmt::Display for RealtimeProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RealtimeProperty::Username => "username",
            RealtimeProperty::PlayMods => "play_mods",
            RealtimeProperty::Combo => "combo",
            RealtimeProperty::Score => "score",
            RealtimeProperty::PlayTime => "play_time",
            RealtimeProperty::Beatmap => "beatmap",
            RealtimeProperty::OsuStatus => "osu_status",
        };
        f.write_str(name)
    }
}

/// Live snapshot of the game, built up from [`RealtimeEvent`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RealtimeState {
    pub username: Option<String>,
    pub play_mods: PlayMods,
    pub combo: u32,
    /// Highest combo reached since the last status change into `Playing`.
    pub max_combo: u32,
    pub score: u64,
    pub play_time_ms: i64,
    pub beatmap: Option<Beatmap>,
    pub osu_status: OsuStatus,
}

impl RealtimeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `event` and returns the property it changed.
    ///
    /// Returns `None` when the event carries the value already held, so
    /// repeated notifications from a polling listener do not fan out.
    pub fn apply(&mut self, event: RealtimeEvent) -> Option<RealtimeProperty> {
        match event {
            RealtimeEvent::PlayerChanged(name) => {
                let name = Some(name).filter(|n| !n.is_empty());
                replace(&mut self.username, name).then_some(RealtimeProperty::Username)
            }
            RealtimeEvent::ModsChanged(mods) => {
                replace(&mut self.play_mods, mods).then_some(RealtimeProperty::PlayMods)
            }
            RealtimeEvent::ComboChanged(combo) => {
                self.max_combo = self.max_combo.max(combo);
                replace(&mut self.combo, combo).then_some(RealtimeProperty::Combo)
            }
            RealtimeEvent::ScoreChanged(score) => {
                replace(&mut self.score, score).then_some(RealtimeProperty::Score)
            }
            RealtimeEvent::PlayTimeChanged(ms) => {
                replace(&mut self.play_time_ms, ms).then_some(RealtimeProperty::PlayTime)
            }
            RealtimeEvent::BeatmapChanged(beatmap) => {
                replace(&mut self.beatmap, Some(beatmap)).then_some(RealtimeProperty::Beatmap)
            }
            RealtimeEvent::StatusChanged { current, .. } => {
                if current.is_playing() && !self.osu_status.is_playing() {
                    self.max_combo = 0;
                }
                replace(&mut self.osu_status, current).then_some(RealtimeProperty::OsuStatus)
            }
        }
    }

    /// `true` if going from `previous` to the current combo is a combo break.
    pub fn is_combo_break(&self, previous: u32) -> bool {
        self.osu_status.is_playing() && previous > self.combo
    }
}

/// Stores `value` in `slot`, returning whether it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
