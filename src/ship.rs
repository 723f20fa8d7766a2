//! Ship descriptors and placement geometry on the flat 100-cell board.

use core::fmt;

use crate::config::{BOARD_CELLS, BOARD_SIDE};

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Type of ship: name and length. Immutable catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: u8,
}

impl ShipType {
    pub const fn new(name: &'static str, length: u8) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> u8 {
        self.length
    }
}

/// Assignment of a ship type to an anchor cell and orientation.
///
/// The anchor is the first cell index (0-99); the remaining cells follow to
/// the right or downward depending on orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub ship: ShipType,
    pub anchor: u8,
    pub orientation: Orientation,
}

impl Placement {
    pub fn new(ship: ShipType, anchor: u8, orientation: Orientation) -> Self {
        Self {
            ship,
            anchor,
            orientation,
        }
    }

    /// Whether every occupied cell stays on the board. Horizontal ships must
    /// not wrap across a row boundary; vertical ships must not run past the
    /// last row.
    pub fn in_bounds(&self) -> bool {
        if self.anchor >= BOARD_CELLS {
            return false;
        }
        let len = self.ship.length();
        match self.orientation {
            Orientation::Horizontal => self.anchor % BOARD_SIDE <= BOARD_SIDE - len,
            Orientation::Vertical => self.anchor <= (BOARD_CELLS - 1) - (len - 1) * BOARD_SIDE,
        }
    }

    /// Cell indices occupied by this placement. Only meaningful when
    /// `in_bounds` holds; out-of-bounds placements yield indices past 99.
    pub fn cells(&self) -> impl Iterator<Item = u8> + '_ {
        let step = match self.orientation {
            Orientation::Horizontal => 1,
            Orientation::Vertical => BOARD_SIDE,
        };
        (0..self.ship.length()).map(move |i| self.anchor + i * step)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} ({:?})",
            self.ship.name(),
            self.anchor,
            self.orientation
        )
    }
}
