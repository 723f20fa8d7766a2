//! Fleet layout engine: random rejection-sampled layouts and validated
//! manual layouts.

use rand::Rng;

use crate::board::Board;
use crate::common::{BoardError, PlacementFault};
use crate::config::{BOARD_CELLS, NUM_SHIPS, SHIPS};
use crate::ship::{Orientation, Placement};

/// Retry budget per ship for random placement. The reference behavior loops
/// forever; a bound keeps a pathological RNG from spinning. With five small
/// ships on 100 cells the expected draw count per ship stays in single
/// digits.
const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Place the full catalog at random: for each ship, draw orientation and
/// anchor independently and re-draw entirely on any bounds or overlap
/// violation.
pub fn random_fleet<R: Rng>(rng: &mut R) -> Result<Board, BoardError> {
    let mut board = Board::new();
    for i in 0..NUM_SHIPS {
        let placement = random_placement(rng, &board, i)?;
        board.commit(i, &placement);
    }
    Ok(board)
}

fn random_placement<R: Rng>(
    rng: &mut R,
    board: &Board,
    ship_index: usize,
) -> Result<Placement, BoardError> {
    let ship = SHIPS[ship_index];
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let orientation = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let anchor = rng.random_range(0..BOARD_CELLS);
        let placement = Placement::new(ship, anchor, orientation);
        if !placement.in_bounds() {
            continue;
        }
        if board.any_occupied(placement.cells()) {
            continue;
        }
        return Ok(placement);
    }
    Err(BoardError::UnableToPlace)
}

/// Build a board from user-supplied placements, validated in order.
///
/// Fails with `InvalidPlacement` on the first bounds or overlap violation
/// and with `IncompleteFleet` unless exactly one placement per catalog ship
/// is supplied.
pub fn manual_fleet(placements: &[Placement]) -> Result<Board, BoardError> {
    if placements.len() != NUM_SHIPS {
        return Err(BoardError::IncompleteFleet);
    }
    let mut board = Board::new();
    let mut seen = [false; NUM_SHIPS];
    for placement in placements {
        let Some(index) = SHIPS.iter().position(|s| *s == placement.ship) else {
            return Err(BoardError::IncompleteFleet);
        };
        if seen[index] {
            return Err(BoardError::IncompleteFleet);
        }
        if !placement.in_bounds() {
            return Err(BoardError::InvalidPlacement {
                ship: placement.ship.name(),
                fault: PlacementFault::OutOfBounds,
            });
        }
        if board.any_occupied(placement.cells()) {
            return Err(BoardError::InvalidPlacement {
                ship: placement.ship.name(),
                fault: PlacementFault::Overlap,
            });
        }
        board.commit(index, placement);
        seen[index] = true;
    }
    Ok(board)
}
