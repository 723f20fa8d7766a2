//! Relay coordinator: pairs up to two connections into a match and forwards
//! their protocol traffic verbatim.
//!
//! The coordinator never inspects board contents. Each side runs its own
//! state machine and applies shots locally; the relay only moves `Ready`,
//! `Fire` and `FireResult` between the slots, answers `StatusQuery`, and
//! evicts connections that outlive their inactivity budget.
//!
//! All slot-table mutation happens in one event-loop task. Per-connection
//! reader and writer tasks only shuttle messages through channels, so no
//! locking is needed.

use std::collections::HashMap;

use log::{debug, info, warn};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use crate::config::RELAY_IDLE_TIMEOUT;
use crate::game::PlayerSlot;
use crate::protocol::{Message, SlotAssignment, SlotStatus};
use crate::transport::tcp::{read_frame, write_frame};

type ConnId = u64;

enum Event {
    Connected {
        conn: ConnId,
        outbound: mpsc::UnboundedSender<Message>,
    },
    Inbound {
        conn: ConnId,
        msg: Message,
    },
    Disconnected {
        conn: ConnId,
    },
    Deadline {
        conn: ConnId,
    },
}

struct Session {
    conn: ConnId,
    outbound: mpsc::UnboundedSender<Message>,
    ready: bool,
}

pub struct Relay {
    idle_timeout: Duration,
}

impl Relay {
    pub fn new() -> Self {
        Self {
            idle_timeout: RELAY_IDLE_TIMEOUT,
        }
    }

    /// Relay with a custom inactivity budget; tests use short values.
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self { idle_timeout }
    }

    /// Accept connections on `listener` and coordinate them until the task
    /// is cancelled. State lives only as long as the sockets do.
    pub async fn run(self, listener: TcpListener) -> anyhow::Result<()> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        tokio::spawn(coordinate(events_rx));

        let mut next_conn: ConnId = 0;
        loop {
            let (stream, addr) = listener.accept().await?;
            let conn = next_conn;
            next_conn += 1;
            info!("connection {conn} accepted from {addr}");

            let (mut read_half, mut write_half) = stream.into_split();
            let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

            if events_tx
                .send(Event::Connected {
                    conn,
                    outbound: outbound_tx,
                })
                .is_err()
            {
                return Err(anyhow::anyhow!("coordinator task ended"));
            }

            // Writer: drains the outbound queue; exits (closing the socket)
            // once the coordinator drops the sender.
            tokio::spawn(async move {
                while let Some(msg) = outbound_rx.recv().await {
                    if let Err(e) = write_frame(&mut write_half, &msg).await {
                        debug!("connection {conn} write failed: {e}");
                        break;
                    }
                }
            });

            // Reader: feeds inbound frames to the coordinator until the
            // connection drops.
            let events = events_tx.clone();
            tokio::spawn(async move {
                loop {
                    match read_frame(&mut read_half).await {
                        Ok(msg) => {
                            if events.send(Event::Inbound { conn, msg }).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            debug!("connection {conn} closed: {e}");
                            let _ = events.send(Event::Disconnected { conn });
                            break;
                        }
                    }
                }
            });

            // Fixed-duration eviction, measured from connection open.
            let events = events_tx.clone();
            let idle_timeout = self.idle_timeout;
            tokio::spawn(async move {
                sleep(idle_timeout).await;
                let _ = events.send(Event::Deadline { conn });
            });
        }
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

/// The single-threaded event handler owning the slot table.
async fn coordinate(mut events: mpsc::UnboundedReceiver<Event>) {
    let mut slots: [Option<Session>; 2] = [None, None];
    // Connections beyond the two-slot capacity: informed they are read-only
    // and otherwise ignored until they close or time out.
    let mut overflow: HashMap<ConnId, mpsc::UnboundedSender<Message>> = HashMap::new();

    while let Some(event) = events.recv().await {
        match event {
            Event::Connected { conn, outbound } => {
                let free = [PlayerSlot::P0, PlayerSlot::P1]
                    .into_iter()
                    .find(|s| slots[s.index()].is_none());
                match free {
                    Some(slot) => {
                        let _ = outbound.send(Message::AssignSlot {
                            slot: SlotAssignment::Slot(slot),
                        });
                        info!("connection {conn} assigned {slot}");
                        slots[slot.index()] = Some(Session {
                            conn,
                            outbound,
                            ready: false,
                        });
                        notify_other(
                            &slots,
                            slot,
                            Message::Presence {
                                slot,
                                connected: true,
                            },
                        );
                    }
                    None => {
                        let _ = outbound.send(Message::AssignSlot {
                            slot: SlotAssignment::Full,
                        });
                        info!("connection {conn} rejected: server full");
                        overflow.insert(conn, outbound);
                    }
                }
            }
            Event::Inbound { conn, msg } => {
                let Some(slot) = slot_of(&slots, conn) else {
                    // Overflow connections take no part in the protocol.
                    debug!("ignoring message from overflow connection {conn}");
                    continue;
                };
                match msg {
                    Message::Ready { .. } => {
                        if let Some(session) = slots[slot.index()].as_mut() {
                            session.ready = true;
                        }
                        // Stamp the slot server-side rather than trusting
                        // the client payload.
                        notify_other(&slots, slot, Message::Ready { slot });
                    }
                    Message::StatusQuery => {
                        let reply = Message::StatusReply {
                            slots: [status_of(&slots, 0), status_of(&slots, 1)],
                        };
                        if let Some(session) = slots[slot.index()].as_ref() {
                            let _ = session.outbound.send(reply);
                        }
                    }
                    msg @ (Message::Fire { .. } | Message::FireResult { .. }) => {
                        // Forwarded verbatim; the payload is opaque here.
                        notify_other(&slots, slot, msg);
                    }
                    other => {
                        warn!("unexpected message from {slot}: {other:?}");
                    }
                }
            }
            Event::Disconnected { conn } => {
                if overflow.remove(&conn).is_some() {
                    continue;
                }
                if let Some(slot) = slot_of(&slots, conn) {
                    info!("{slot} disconnected (connection {conn})");
                    slots[slot.index()] = None;
                    notify_other(
                        &slots,
                        slot,
                        Message::Presence {
                            slot,
                            connected: false,
                        },
                    );
                }
            }
            Event::Deadline { conn } => {
                // Unconditional teardown: notify, then drop the outbound
                // sender so the writer task closes the socket.
                if let Some(outbound) = overflow.remove(&conn) {
                    let _ = outbound.send(Message::IdleTimeout);
                    continue;
                }
                if let Some(slot) = slot_of(&slots, conn) {
                    info!("{slot} evicted after idle timeout (connection {conn})");
                    if let Some(session) = slots[slot.index()].take() {
                        let _ = session.outbound.send(Message::IdleTimeout);
                    }
                    notify_other(
                        &slots,
                        slot,
                        Message::Presence {
                            slot,
                            connected: false,
                        },
                    );
                }
            }
        }
    }
}

fn slot_of(slots: &[Option<Session>; 2], conn: ConnId) -> Option<PlayerSlot> {
    slots
        .iter()
        .position(|s| s.as_ref().is_some_and(|s| s.conn == conn))
        .and_then(PlayerSlot::from_index)
}

fn status_of(slots: &[Option<Session>; 2], index: usize) -> SlotStatus {
    match slots[index].as_ref() {
        Some(session) => SlotStatus {
            connected: true,
            ready: session.ready,
        },
        None => SlotStatus::default(),
    }
}

fn notify_other(slots: &[Option<Session>; 2], from: PlayerSlot, msg: Message) {
    if let Some(session) = slots[from.other().index()].as_ref() {
        let _ = session.outbound.send(msg);
    }
}
