use seabattle::protocol::{Message, SlotAssignment, SlotStatus};
use seabattle::transport::Transport;
use seabattle::{PlayerSlot, Relay, ShotResult, TcpTransport};
use tokio::net::TcpListener;
use tokio::time::{timeout, Duration};

async fn spawn_relay(idle_timeout: Duration) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { Relay::with_idle_timeout(idle_timeout).run(listener).await });
    addr
}

async fn recv(transport: &mut TcpTransport) -> Message {
    timeout(Duration::from_secs(5), transport.recv())
        .await
        .expect("timed out waiting for relay message")
        .expect("relay connection failed")
}

/// Drain messages until one satisfies the predicate, skipping broadcasts
/// (presence updates and the like) that arrive in between.
async fn recv_until(
    transport: &mut TcpTransport,
    mut pred: impl FnMut(&Message) -> bool,
) -> Message {
    loop {
        let msg = recv(transport).await;
        if pred(&msg) {
            return msg;
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn slots_assigned_in_order_and_third_connection_is_full() {
    let addr = spawn_relay(Duration::from_secs(600)).await;

    let mut c0 = TcpTransport::connect(addr).await.unwrap();
    assert_eq!(
        recv(&mut c0).await,
        Message::AssignSlot {
            slot: SlotAssignment::Slot(PlayerSlot::P0)
        }
    );

    let mut c1 = TcpTransport::connect(addr).await.unwrap();
    assert_eq!(
        recv(&mut c1).await,
        Message::AssignSlot {
            slot: SlotAssignment::Slot(PlayerSlot::P1)
        }
    );
    // the first player hears about the second one joining
    assert_eq!(
        recv(&mut c0).await,
        Message::Presence {
            slot: PlayerSlot::P1,
            connected: true
        }
    );

    let mut c2 = TcpTransport::connect(addr).await.unwrap();
    assert_eq!(
        recv(&mut c2).await,
        Message::AssignSlot {
            slot: SlotAssignment::Full
        }
    );

    // the overflow connection takes no further part in the protocol
    c2.send(Message::StatusQuery).await.unwrap();
    let silence = timeout(Duration::from_millis(300), c2.recv()).await;
    assert!(silence.is_err(), "overflow connection should get no reply");

    // and its query must not have disturbed the real players
    c0.send(Message::StatusQuery).await.unwrap();
    let reply = recv_until(&mut c0, |m| matches!(m, Message::StatusReply { .. })).await;
    assert_eq!(
        reply,
        Message::StatusReply {
            slots: [
                SlotStatus {
                    connected: true,
                    ready: false
                },
                SlotStatus {
                    connected: true,
                    ready: false
                },
            ]
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn ready_fire_and_fire_result_are_forwarded_verbatim() {
    let addr = spawn_relay(Duration::from_secs(600)).await;

    let mut c0 = TcpTransport::connect(addr).await.unwrap();
    recv(&mut c0).await; // slot assignment
    let mut c1 = TcpTransport::connect(addr).await.unwrap();
    recv(&mut c1).await;

    c0.send(Message::Ready { slot: PlayerSlot::P0 }).await.unwrap();
    let forwarded = recv_until(&mut c1, |m| matches!(m, Message::Ready { .. })).await;
    assert_eq!(forwarded, Message::Ready { slot: PlayerSlot::P0 });

    c1.send(Message::Fire { cell: 42 }).await.unwrap();
    let forwarded = recv_until(&mut c0, |m| matches!(m, Message::Fire { .. })).await;
    assert_eq!(forwarded, Message::Fire { cell: 42 });

    let result = ShotResult::hit("Destroyer", true);
    c0.send(Message::FireResult {
        result: result.clone(),
    })
    .await
    .unwrap();
    let forwarded = recv_until(&mut c1, |m| matches!(m, Message::FireResult { .. })).await;
    assert_eq!(forwarded, Message::FireResult { result });
}

#[tokio::test(flavor = "multi_thread")]
async fn relay_stamps_ready_with_the_senders_slot() {
    let addr = spawn_relay(Duration::from_secs(600)).await;

    let mut c0 = TcpTransport::connect(addr).await.unwrap();
    recv(&mut c0).await;
    let mut c1 = TcpTransport::connect(addr).await.unwrap();
    recv(&mut c1).await;

    // a lying client claims to be slot 1
    c0.send(Message::Ready { slot: PlayerSlot::P1 }).await.unwrap();
    let forwarded = recv_until(&mut c1, |m| matches!(m, Message::Ready { .. })).await;
    assert_eq!(forwarded, Message::Ready { slot: PlayerSlot::P0 });
}

#[tokio::test(flavor = "multi_thread")]
async fn status_reply_reflects_readiness() {
    let addr = spawn_relay(Duration::from_secs(600)).await;

    let mut c0 = TcpTransport::connect(addr).await.unwrap();
    recv(&mut c0).await;
    c0.send(Message::Ready { slot: PlayerSlot::P0 }).await.unwrap();
    c0.send(Message::StatusQuery).await.unwrap();

    let reply = recv_until(&mut c0, |m| matches!(m, Message::StatusReply { .. })).await;
    assert_eq!(
        reply,
        Message::StatusReply {
            slots: [
                SlotStatus {
                    connected: true,
                    ready: true
                },
                SlotStatus::default(),
            ]
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn vacated_slot_is_reusable_and_opponent_is_notified() {
    let addr = spawn_relay(Duration::from_secs(600)).await;

    let mut c0 = TcpTransport::connect(addr).await.unwrap();
    recv(&mut c0).await;
    let mut c1 = TcpTransport::connect(addr).await.unwrap();
    recv(&mut c1).await;

    drop(c0);
    let notice = recv_until(&mut c1, |m| {
        matches!(m, Message::Presence { connected: false, .. })
    })
    .await;
    assert_eq!(
        notice,
        Message::Presence {
            slot: PlayerSlot::P0,
            connected: false
        }
    );

    // the freed slot goes to the next connection
    let mut c2 = TcpTransport::connect(addr).await.unwrap();
    assert_eq!(
        recv(&mut c2).await,
        Message::AssignSlot {
            slot: SlotAssignment::Slot(PlayerSlot::P0)
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn idle_connection_is_told_then_evicted() {
    let addr = spawn_relay(Duration::from_millis(200)).await;

    let mut c0 = TcpTransport::connect(addr).await.unwrap();
    recv(&mut c0).await; // slot assignment
    assert_eq!(recv(&mut c0).await, Message::IdleTimeout);
    // the relay closes the connection after the notice
    let closed = timeout(Duration::from_secs(5), c0.recv()).await.unwrap();
    assert!(closed.is_err());
}
