//! Wire messages exchanged between player nodes and the relay coordinator.
//!
//! The relay forwards `Fire` and `FireResult` payloads verbatim; it never
//! inspects reveal outcomes. Everything is bincode-encoded inside the
//! length-prefixed frames of the transport layer.

use crate::common::ShotResult;
use crate::game::PlayerSlot;

/// Slot assignment handed to a freshly accepted connection. `Full` marks a
/// connection beyond the two-slot capacity; it stays open but takes no
/// further part in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SlotAssignment {
    Slot(PlayerSlot),
    Full,
}

/// Connected/ready flags for one slot, as reported in `StatusReply`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlotStatus {
    pub connected: bool,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Message {
    /// Sent once per new connection.
    AssignSlot { slot: SlotAssignment },
    /// Broadcast to the other side when a slot's connection opens or closes.
    Presence { slot: PlayerSlot, connected: bool },
    /// A side finished placement and signals readiness.
    Ready { slot: PlayerSlot },
    /// Ask the relay for the current state of both slots.
    StatusQuery,
    /// Answer to `StatusQuery`, indexed by slot.
    StatusReply { slots: [SlotStatus; 2] },
    /// Shot fired at the given cell; forwarded to the defender unmodified.
    Fire { cell: u8 },
    /// Reveal outcome the defender computed locally; forwarded back to the
    /// attacker as an opaque payload.
    FireResult { result: ShotResult },
    /// The connection exceeded its inactivity budget and will be closed.
    IdleTimeout,
}
