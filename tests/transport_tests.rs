use seabattle::protocol::{Message, SlotAssignment};
use seabattle::transport::in_memory::InMemoryTransport;
use seabattle::transport::Transport;
use seabattle::{PlayerSlot, ShotResult, TcpTransport};
use tokio::net::TcpListener;

#[tokio::test]
async fn in_memory_pair_delivers_in_order() {
    let (mut a, mut b) = InMemoryTransport::pair();

    a.send(Message::Fire { cell: 7 }).await.unwrap();
    a.send(Message::StatusQuery).await.unwrap();

    assert_eq!(b.recv().await.unwrap(), Message::Fire { cell: 7 });
    assert_eq!(b.recv().await.unwrap(), Message::StatusQuery);

    b.send(Message::FireResult {
        result: ShotResult::miss(),
    })
    .await
    .unwrap();
    assert_eq!(
        a.recv().await.unwrap(),
        Message::FireResult {
            result: ShotResult::miss()
        }
    );
}

#[tokio::test]
async fn dropped_in_memory_peer_closes_the_channel() {
    let (mut a, b) = InMemoryTransport::pair();
    drop(b);
    assert!(a.recv().await.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_roundtrips_every_message_kind() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut transport = TcpTransport::new(socket);
        // echo until the peer hangs up
        while let Ok(msg) = transport.recv().await {
            transport.send(msg).await.unwrap();
        }
    });

    let mut client = TcpTransport::connect(addr).await.unwrap();
    let messages = vec![
        Message::AssignSlot {
            slot: SlotAssignment::Slot(PlayerSlot::P1),
        },
        Message::AssignSlot {
            slot: SlotAssignment::Full,
        },
        Message::Presence {
            slot: PlayerSlot::P0,
            connected: false,
        },
        Message::Ready {
            slot: PlayerSlot::P1,
        },
        Message::StatusQuery,
        Message::Fire { cell: 99 },
        Message::FireResult {
            result: ShotResult::hit("Carrier", false),
        },
        Message::IdleTimeout,
    ];
    for msg in messages {
        client.send(msg.clone()).await.unwrap();
        assert_eq!(client.recv().await.unwrap(), msg);
    }

    drop(client);
    server.await.unwrap();
}
