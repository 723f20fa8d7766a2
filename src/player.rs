//! Player trait and the AI implementation.

use rand::rngs::SmallRng;
use tokio::time::Duration;

use crate::ai;
use crate::board::{Board, EnemyTracker};
use crate::common::BoardError;
use crate::config::AI_MOVE_DELAY;
use crate::layout;

/// Interface implemented by the different player kinds driving a match.
pub trait Player: Send {
    /// Produce this player's fully placed board.
    fn place_fleet(&mut self, rng: &mut SmallRng) -> Result<Board, BoardError>;

    /// Choose the next cell to fire at, given the record of previous shots.
    fn select_target(&mut self, rng: &mut SmallRng, tracker: &EnemyTracker) -> Option<u8>;

    /// Pacing delay applied before this player's shot is committed.
    fn move_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// AI opponent: random fleet layout and uniform random targeting, with a
/// presentation delay before each shot.
pub struct AiPlayer {
    delay: Duration,
}

impl AiPlayer {
    pub fn new() -> Self {
        Self {
            delay: AI_MOVE_DELAY,
        }
    }

    /// AI with a custom pacing delay; tests use `Duration::ZERO`.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for AiPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for AiPlayer {
    fn place_fleet(&mut self, rng: &mut SmallRng) -> Result<Board, BoardError> {
        layout::random_fleet(rng)
    }

    fn select_target(&mut self, rng: &mut SmallRng, tracker: &EnemyTracker) -> Option<u8> {
        ai::uniform_target(rng, tracker)
    }

    fn move_delay(&self) -> Duration {
        self.delay
    }
}
