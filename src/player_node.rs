//! Remote session driver: one player's engine attached to a relay
//! connection.
//!
//! The node keeps its own board authoritative for incoming shots and an
//! [`EnemyTracker`] mirror for outgoing ones, applying everything strictly
//! in local turn order. The relay only forwards; all reveal computation
//! happens here.

use std::collections::VecDeque;

use log::{info, warn};
use rand::rngs::SmallRng;
use tokio::time::sleep;

use crate::board::{Board, EnemyTracker};
use crate::config::ship_name_static;
use crate::game::PlayerSlot;
use crate::player::Player;
use crate::protocol::{Message, SlotAssignment};
use crate::transport::Transport;

/// How a relayed session ended, from this node's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every enemy ship cell was hit.
    Won,
    /// This node's whole fleet was destroyed.
    Lost,
    /// Both match slots were already occupied.
    ServerFull,
    /// The opponent's connection closed mid-session.
    OpponentLeft,
    /// The relay evicted this connection after its inactivity budget.
    TimedOut,
}

pub struct PlayerNode {
    player: Box<dyn Player>,
    transport: Box<dyn Transport>,
}

impl PlayerNode {
    pub fn new(player: Box<dyn Player>, transport: Box<dyn Transport>) -> Self {
        Self { player, transport }
    }

    /// Join a relayed match and play it to completion.
    pub async fn run(&mut self, rng: &mut SmallRng) -> anyhow::Result<SessionOutcome> {
        let slot = match self.transport.recv().await? {
            Message::AssignSlot {
                slot: SlotAssignment::Slot(slot),
            } => slot,
            Message::AssignSlot {
                slot: SlotAssignment::Full,
            } => {
                info!("server is full; session is read-only");
                return Ok(SessionOutcome::ServerFull);
            }
            other => {
                return Err(anyhow::anyhow!(
                    "expected slot assignment, got {other:?}"
                ))
            }
        };
        info!("assigned {slot}");

        let board = self.player.place_fleet(rng).map_err(|e| anyhow::anyhow!(e))?;
        let tracker = EnemyTracker::new();

        self.transport.send(Message::Ready { slot }).await?;
        // Pick up readiness the opponent may have announced before we
        // connected.
        self.transport.send(Message::StatusQuery).await?;

        let mut pending = VecDeque::new();
        if let Some(outcome) = self.wait_for_opponent(slot, &mut pending).await? {
            return Ok(outcome);
        }
        info!("both sides ready; {slot} starting match");

        self.play(rng, slot, board, tracker, pending).await
    }

    /// Block until the opponent reports ready, or the session dies first.
    ///
    /// A shot can legally overtake the readiness signal: the opponent fires
    /// as soon as it sees our `Ready` broadcast, which the relay processes
    /// before our `StatusQuery`. Such messages are held in `pending` and
    /// replayed by the play loop, never dropped.
    async fn wait_for_opponent(
        &mut self,
        slot: PlayerSlot,
        pending: &mut VecDeque<Message>,
    ) -> anyhow::Result<Option<SessionOutcome>> {
        loop {
            match self.transport.recv().await? {
                Message::Ready { slot: from } if from != slot => return Ok(None),
                Message::StatusReply { slots } => {
                    if slots[slot.other().index()].ready {
                        return Ok(None);
                    }
                }
                Message::Presence { slot: from, connected } => {
                    info!("{from} {}", if connected { "connected" } else { "disconnected" });
                    if !connected && from != slot {
                        return Ok(Some(SessionOutcome::OpponentLeft));
                    }
                }
                Message::IdleTimeout => {
                    info!("idle timeout while waiting for opponent");
                    return Ok(Some(SessionOutcome::TimedOut));
                }
                msg @ Message::Fire { .. } => {
                    pending.push_back(msg);
                }
                other => {
                    warn!("unexpected message during setup: {other:?}");
                }
            }
        }
    }

    /// Next message in arrival order: setup-phase holdovers first, then the
    /// transport.
    async fn next_message(&mut self, pending: &mut VecDeque<Message>) -> anyhow::Result<Message> {
        match pending.pop_front() {
            Some(msg) => Ok(msg),
            None => self.transport.recv().await,
        }
    }

    async fn play(
        &mut self,
        rng: &mut SmallRng,
        slot: PlayerSlot,
        mut board: Board,
        mut tracker: EnemyTracker,
        mut pending: VecDeque<Message>,
    ) -> anyhow::Result<SessionOutcome> {
        // Slot 0 moves first by convention.
        let mut my_turn = slot == PlayerSlot::P0;
        loop {
            if my_turn {
                sleep(self.player.move_delay()).await;
                let cell = self
                    .player
                    .select_target(rng, &tracker)
                    .ok_or_else(|| anyhow::anyhow!("no unrevealed cells left to target"))?;
                self.transport.send(Message::Fire { cell }).await?;

                let result = loop {
                    match self.next_message(&mut pending).await? {
                        Message::FireResult { result } => break result,
                        Message::Presence { connected: false, slot: from } if from != slot => {
                            info!("opponent left mid-session");
                            return Ok(SessionOutcome::OpponentLeft);
                        }
                        Message::IdleTimeout => return Ok(SessionOutcome::TimedOut),
                        Message::Fire { .. } => {
                            // Out-of-order shot for a side that does not
                            // hold the turn: never applied.
                            warn!("rejecting out-of-turn fire from opponent");
                        }
                        other => warn!("unexpected message awaiting fire result: {other:?}"),
                    }
                };
                tracker
                    .record(cell, &result)
                    .map_err(|e| anyhow::anyhow!(e))?;
                if result.just_sunk {
                    if let Some(name) = result.ship.as_deref().and_then(ship_name_static) {
                        info!("sunk the enemy {name}");
                    }
                }
                my_turn = false;
                if tracker.enemy_fleet_destroyed() {
                    info!("{slot} wins: enemy fleet destroyed");
                    return Ok(SessionOutcome::Won);
                }
            } else {
                match self.next_message(&mut pending).await? {
                    Message::Fire { cell } => {
                        let shot = board.apply_shot(cell).map_err(|e| anyhow::anyhow!(e))?;
                        self.transport
                            .send(Message::FireResult {
                                result: shot.clone(),
                            })
                            .await?;
                        my_turn = true;
                        if board.all_sunk() {
                            info!("{slot} loses: fleet destroyed");
                            return Ok(SessionOutcome::Lost);
                        }
                    }
                    Message::Presence { connected: false, slot: from } if from != slot => {
                        info!("opponent left mid-session");
                        return Ok(SessionOutcome::OpponentLeft);
                    }
                    Message::IdleTimeout => return Ok(SessionOutcome::TimedOut),
                    other => warn!("unexpected message awaiting opponent shot: {other:?}"),
                }
            }
        }
    }
}
