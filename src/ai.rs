//! Shot selection for the AI opponent.

use rand::Rng;

use crate::board::EnemyTracker;

/// Pick a uniformly random cell among those not yet revealed on the target
/// board. `None` once every cell has been fired at.
pub fn uniform_target<R: Rng>(rng: &mut R, tracker: &EnemyTracker) -> Option<u8> {
    let candidates = tracker.unrevealed_cells();
    if candidates.is_empty() {
        return None;
    }
    let pick = rng.random_range(0..candidates.len());
    Some(candidates[pick])
}
