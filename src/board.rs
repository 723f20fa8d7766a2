//! Per-player board state: occupancy, reveal state and fleet health.

use crate::common::{BoardError, ShotOutcome, ShotResult};
use crate::config::{BOARD_CELLS, NUM_SHIPS, SHIPS, TOTAL_SHIP_CELLS};
use crate::ship::Placement;

/// Per-cell reveal state. A cell moves from `Unrevealed` to exactly one of
/// `Hit` or `Miss` and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reveal {
    #[default]
    Unrevealed,
    Hit,
    Miss,
}

/// One player's board: which catalog ship (if any) occupies each cell, what
/// has been revealed, and how many unhit cells each ship has left.
///
/// Occupancy is fixed once the layout engine finishes placing the fleet;
/// reveal state and health mutate only through [`Board::apply_shot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    occupant: [Option<u8>; BOARD_CELLS as usize],
    reveal: [Reveal; BOARD_CELLS as usize],
    health: [u8; NUM_SHIPS],
    placed: [bool; NUM_SHIPS],
}

impl Board {
    /// Empty board with full per-ship health and nothing placed.
    pub fn new() -> Self {
        let health = core::array::from_fn(|i| SHIPS[i].length());
        Self {
            occupant: [None; BOARD_CELLS as usize],
            reveal: [Reveal::Unrevealed; BOARD_CELLS as usize],
            health,
            placed: [false; NUM_SHIPS],
        }
    }

    /// Record a validated placement. Callers (the layout engine) must have
    /// checked bounds and overlap already.
    pub(crate) fn commit(&mut self, ship_index: usize, placement: &Placement) {
        for cell in placement.cells() {
            self.occupant[cell as usize] = Some(ship_index as u8);
        }
        self.placed[ship_index] = true;
    }

    /// Whether the given cell holds a ship segment.
    pub fn is_occupied(&self, cell: u8) -> bool {
        (cell as usize) < self.occupant.len() && self.occupant[cell as usize].is_some()
    }

    /// Whether any placed ship occupies one of the given cells.
    pub(crate) fn any_occupied(&self, mut cells: impl Iterator<Item = u8>) -> bool {
        cells.any(|c| self.is_occupied(c))
    }

    pub fn reveal(&self, cell: u8) -> Option<Reveal> {
        self.reveal.get(cell as usize).copied()
    }

    /// True once every catalog ship has been placed.
    pub fn all_ships_placed(&self) -> bool {
        self.placed.iter().all(|&p| p)
    }

    /// Remaining unhit cells for the ship at the given catalog index.
    pub fn ship_health(&self, ship_index: usize) -> Option<u8> {
        self.health.get(ship_index).copied()
    }

    /// Sum of remaining unhit cells across the fleet.
    pub fn total_health(&self) -> u8 {
        self.health.iter().sum()
    }

    /// True when the whole fleet has been destroyed.
    pub fn all_sunk(&self) -> bool {
        self.total_health() == 0
    }

    /// Apply a shot to this board. The single mutation point for reveal
    /// state and fleet health.
    ///
    /// Fails with `AlreadyRevealed` when the cell is not unrevealed, leaving
    /// health untouched, so a double-processed cell can never be
    /// double-counted.
    pub fn apply_shot(&mut self, cell: u8) -> Result<ShotResult, BoardError> {
        if cell >= BOARD_CELLS {
            return Err(BoardError::InvalidCell);
        }
        if self.reveal[cell as usize] != Reveal::Unrevealed {
            return Err(BoardError::AlreadyRevealed);
        }
        match self.occupant[cell as usize] {
            Some(idx) => {
                self.reveal[cell as usize] = Reveal::Hit;
                let idx = idx as usize;
                self.health[idx] -= 1;
                let just_sunk = self.health[idx] == 0;
                Ok(ShotResult::hit(SHIPS[idx].name(), just_sunk))
            }
            None => {
                self.reveal[cell as usize] = Reveal::Miss;
                Ok(ShotResult::miss())
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Attacker-side mirror of shots fired at the opponent.
///
/// In remote play the real defender board is never visible; the attacker
/// keeps its own reveal record and a mirrored health total, fed from the
/// `FireResult` payloads the defender computed locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyTracker {
    reveal: [Reveal; BOARD_CELLS as usize],
    enemy_cells_left: u8,
}

impl EnemyTracker {
    pub fn new() -> Self {
        Self {
            reveal: [Reveal::Unrevealed; BOARD_CELLS as usize],
            enemy_cells_left: TOTAL_SHIP_CELLS,
        }
    }

    pub fn reveal(&self, cell: u8) -> Option<Reveal> {
        self.reveal.get(cell as usize).copied()
    }

    /// Record the outcome the defender reported for a shot at `cell`.
    ///
    /// Guards against double-recording with the same `AlreadyRevealed`
    /// failure as [`Board::apply_shot`].
    pub fn record(&mut self, cell: u8, result: &ShotResult) -> Result<(), BoardError> {
        if cell >= BOARD_CELLS {
            return Err(BoardError::InvalidCell);
        }
        if self.reveal[cell as usize] != Reveal::Unrevealed {
            return Err(BoardError::AlreadyRevealed);
        }
        match result.outcome {
            ShotOutcome::Hit => {
                self.reveal[cell as usize] = Reveal::Hit;
                self.enemy_cells_left = self.enemy_cells_left.saturating_sub(1);
            }
            ShotOutcome::Miss => {
                self.reveal[cell as usize] = Reveal::Miss;
            }
        }
        Ok(())
    }

    /// Mirrored count of enemy ship cells not yet hit.
    pub fn enemy_cells_left(&self) -> u8 {
        self.enemy_cells_left
    }

    /// True once every mirrored enemy cell has been hit.
    pub fn enemy_fleet_destroyed(&self) -> bool {
        self.enemy_cells_left == 0
    }

    /// Cells not yet fired at, in index order.
    pub fn unrevealed_cells(&self) -> Vec<u8> {
        (0..BOARD_CELLS)
            .filter(|&c| self.reveal[c as usize] == Reveal::Unrevealed)
            .collect()
    }
}

impl Default for EnemyTracker {
    fn default() -> Self {
        Self::new()
    }
}
