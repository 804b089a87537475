use core::fmt;
use serde::{Deserialize, Serialize};

/// What a cell holds underneath: a mine, nothing around it, or a neighbor count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjacency {
    Mine,
    /// No mine here and none adjacent, revealing it opens its neighbors.
    Clear,
    /// No mine here, `1..=8` adjacent mines.
    Near(u8),
}

impl Adjacency {
    pub(crate) const fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Clear,
            n => Self::Near(n),
        }
    }

    /// Numeric encoding used by bots: `-1` clear, `0` mine, `1..=8` count.
    pub const fn value(self) -> i8 {
        match self {
            Self::Mine => 0,
            Self::Clear => -1,
            Self::Near(n) => n as i8,
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_clear(self) -> bool {
        matches!(self, Self::Clear)
    }
}

impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}", self.value())
    }
}

/// Player-visible state of a single cell, as returned by snapshots.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    #[default]
    Hidden,
    Flagged,
    Revealed(Adjacency),
}

impl EngineCell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    /// Numeric value of a revealed cell, `None` while hidden or flagged.
    pub const fn value(self) -> Option<i8> {
        match self {
            Self::Revealed(adjacency) => Some(adjacency.value()),
            Self::Hidden | Self::Flagged => None,
        }
    }
}

impl fmt::Display for EngineCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str(" ."),
            Self::Flagged => f.write_str(" F"),
            Self::Revealed(adjacency) => adjacency.fmt(f),
        }
    }
}

/// Engine-internal cell state. `OverflowPending` marks a cell queued on the
/// overflow stack and is drained before any reveal returns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Slot {
    #[default]
    Hidden,
    Flagged,
    Revealed(Adjacency),
    OverflowPending,
}

impl Slot {
    /// Revealed or flagged, reveal must not touch it.
    pub(crate) const fn is_settled(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Flagged)
    }

    pub(crate) const fn to_public(self) -> EngineCell {
        match self {
            Self::Revealed(adjacency) => EngineCell::Revealed(adjacency),
            Self::Flagged => EngineCell::Flagged,
            Self::Hidden | Self::OverflowPending => EngineCell::Hidden,
        }
    }
}
