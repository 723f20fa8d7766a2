//! Common types: shot outcomes and the domain error taxonomy.

use core::fmt;

/// Whether a shot landed on a ship cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ShotOutcome {
    Hit,
    Miss,
}

/// Result of applying a shot to a board.
///
/// `ship` names the struck ship on a hit; `just_sunk` is set only on the
/// shot that took the ship's last remaining cell.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShotResult {
    pub outcome: ShotOutcome,
    pub ship: Option<String>,
    pub just_sunk: bool,
}

impl ShotResult {
    pub fn miss() -> Self {
        Self {
            outcome: ShotOutcome::Miss,
            ship: None,
            just_sunk: false,
        }
    }

    pub fn hit(ship: &str, just_sunk: bool) -> Self {
        Self {
            outcome: ShotOutcome::Hit,
            ship: Some(ship.to_string()),
            just_sunk,
        }
    }
}

/// Reason a manual placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementFault {
    OutOfBounds,
    Overlap,
}

/// Errors from board mutation and fleet layout.
#[derive(Debug, PartialEq, Eq)]
pub enum BoardError {
    /// Cell index past the end of the board.
    InvalidCell,
    /// The cell was already revealed as hit or miss; health is untouched.
    AlreadyRevealed,
    /// A manual placement violated bounds or overlapped a placed ship.
    InvalidPlacement {
        ship: &'static str,
        fault: PlacementFault,
    },
    /// Manual layout did not supply exactly one placement per catalog ship.
    IncompleteFleet,
    /// Random layout exhausted its retry budget.
    UnableToPlace,
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::InvalidCell => write!(f, "cell index is out of range"),
            BoardError::AlreadyRevealed => write!(f, "cell was already revealed"),
            BoardError::InvalidPlacement { ship, fault } => match fault {
                PlacementFault::OutOfBounds => {
                    write!(f, "{ship} placement is out of bounds")
                }
                PlacementFault::Overlap => {
                    write!(f, "{ship} placement overlaps another ship")
                }
            },
            BoardError::IncompleteFleet => {
                write!(f, "fleet needs exactly one placement per ship")
            }
            BoardError::UnableToPlace => write!(f, "unable to place fleet"),
        }
    }
}

impl std::error::Error for BoardError {}

/// Errors from the match state machine.
#[derive(Debug, PartialEq, Eq)]
pub enum MatchError {
    /// Both fleets must be placed before the match can start.
    FleetIncomplete,
    /// Firing before the match left the setup phase.
    NotStarted,
    /// Changing a fleet after the match left the setup phase.
    AlreadyStarted,
    /// The firing slot does not hold the turn.
    NotYourTurn,
    /// The match already reached a terminal state.
    GameAlreadyOver,
    /// Underlying board rejected the shot.
    Board(BoardError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::FleetIncomplete => write!(f, "all ships must be placed"),
            MatchError::NotStarted => write!(f, "match has not started"),
            MatchError::AlreadyStarted => write!(f, "match has already started"),
            MatchError::NotYourTurn => write!(f, "not your turn"),
            MatchError::GameAlreadyOver => write!(f, "game is already over"),
            MatchError::Board(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MatchError {}

impl From<BoardError> for MatchError {
    fn from(err: BoardError) -> Self {
        MatchError::Board(err)
    }
}
