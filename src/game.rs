//! Turn/match state machine: the authoritative aggregate owning both
//! boards, the turn indicator and the lifecycle phase.

use core::fmt;

use crate::board::Board;
use crate::common::{MatchError, ShotResult};

/// A player's fixed identity within a two-party match. Slot 0 moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayerSlot {
    P0,
    P1,
}

impl PlayerSlot {
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::P0 => PlayerSlot::P1,
            PlayerSlot::P1 => PlayerSlot::P0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::P0 => 0,
            PlayerSlot::P1 => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerSlot::P0),
            1 => Some(PlayerSlot::P1),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.index())
    }
}

/// Match lifecycle. `Over` is terminal; `winner` is `None` only in the
/// defensive draw case where both fleets reach zero health in the same
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    InProgress,
    Over { winner: Option<PlayerSlot> },
}

/// Authoritative match state: two boards, whose turn it is, and the phase.
///
/// Boards and their health counters live inside the match for its whole
/// lifetime; all turn-ordered mutation funnels through [`Match::fire`].
pub struct Match {
    boards: [Board; 2],
    turn: PlayerSlot,
    phase: Phase,
}

impl Match {
    /// Fresh match in setup phase with two empty boards.
    pub fn new() -> Self {
        Self {
            boards: [Board::new(), Board::new()],
            turn: PlayerSlot::P0,
            phase: Phase::Setup,
        }
    }

    /// Install a player's placed board. Only legal during setup.
    pub fn set_fleet(&mut self, slot: PlayerSlot, board: Board) -> Result<(), MatchError> {
        if self.phase != Phase::Setup {
            return Err(MatchError::AlreadyStarted);
        }
        self.boards[slot.index()] = board;
        Ok(())
    }

    /// Move from setup to play. A premature start is a no-op reporting
    /// `FleetIncomplete`; starting an in-progress match is idempotent.
    pub fn start(&mut self) -> Result<(), MatchError> {
        match self.phase {
            Phase::Setup => {
                if self.boards.iter().all(|b| b.all_ships_placed()) {
                    self.phase = Phase::InProgress;
                    Ok(())
                } else {
                    Err(MatchError::FleetIncomplete)
                }
            }
            Phase::InProgress => Ok(()),
            Phase::Over { .. } => Err(MatchError::GameAlreadyOver),
        }
    }

    /// Fire a shot from `attacker` at the defender's board.
    ///
    /// Rejects the shot without side effects unless the match is in
    /// progress and `attacker` holds the turn. On success the turn flips to
    /// the other slot and game-over is evaluated.
    pub fn fire(&mut self, attacker: PlayerSlot, cell: u8) -> Result<ShotResult, MatchError> {
        match self.phase {
            Phase::Over { .. } => return Err(MatchError::GameAlreadyOver),
            Phase::Setup => return Err(MatchError::NotStarted),
            Phase::InProgress => {}
        }
        if attacker != self.turn {
            return Err(MatchError::NotYourTurn);
        }
        let defender = attacker.other();
        let shot = self.boards[defender.index()].apply_shot(cell)?;
        self.turn = defender;
        self.evaluate_game_over();
        Ok(shot)
    }

    fn evaluate_game_over(&mut self) {
        let p0_dead = self.boards[0].all_sunk();
        let p1_dead = self.boards[1].all_sunk();
        let winner = match (p0_dead, p1_dead) {
            (false, false) => return,
            // both fleets at zero in the same evaluation: a draw, not a crash
            (true, true) => None,
            (true, false) => Some(PlayerSlot::P1),
            (false, true) => Some(PlayerSlot::P0),
        };
        self.phase = Phase::Over { winner };
    }

    pub fn board(&self, slot: PlayerSlot) -> &Board {
        &self.boards[slot.index()]
    }

    pub fn turn(&self) -> PlayerSlot {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::Over { .. })
    }

    /// Winning slot once the match is over; `None` while in progress or on
    /// a draw.
    pub fn winner(&self) -> Option<PlayerSlot> {
        match self.phase {
            Phase::Over { winner } => winner,
            _ => None,
        }
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}
