//! In-memory transport pair for tests and local games.

use tokio::sync::mpsc;

use crate::protocol::Message;
use crate::transport::Transport;

/// One endpoint of an in-process message pipe. Built on a pair of crossed
/// unbounded channels, so delivery order matches send order and a dropped
/// peer surfaces as a closed channel after any buffered messages drain.
pub struct InMemoryTransport {
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl InMemoryTransport {
    /// Two connected endpoints; what one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (
            Self { tx: a_tx, rx: a_rx },
            Self { tx: b_tx, rx: b_rx },
        )
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.tx
            .send(msg)
            .map_err(|_| anyhow::anyhow!("peer endpoint dropped"))
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("peer endpoint dropped"))
    }
}
