//! TCP transport: bincode messages in length-prefixed frames.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::protocol::Message;
use crate::transport::Transport;

/// Maximum frame size. Protocol messages are tiny; anything larger is a
/// corrupt or hostile frame.
const MAX_FRAME_SIZE: u32 = 64 * 1024;

/// Write one length-prefixed bincode frame.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, msg: &Message) -> anyhow::Result<()> {
    let data =
        bincode::serialize(msg).map_err(|e| anyhow::anyhow!("serialization error: {e}"))?;
    if data.len() as u32 > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "message too large: {} bytes (max: {MAX_FRAME_SIZE})",
            data.len()
        ));
    }
    let len = (data.len() as u32).to_be_bytes();
    writer.write_all(&len).await.map_err(map_io_error)?;
    writer.write_all(&data).await.map_err(map_io_error)?;
    Ok(())
}

/// Read one length-prefixed bincode frame.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> anyhow::Result<Message> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await.map_err(map_io_error)?;
    let len = u32::from_be_bytes(len_buf);
    if len == 0 {
        return Err(anyhow::anyhow!("invalid message length: 0"));
    }
    if len > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "message too large: {len} bytes (max: {MAX_FRAME_SIZE})"
        ));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await.map_err(map_io_error)?;
    bincode::deserialize(&buf).map_err(|e| anyhow::anyhow!("deserialization error: {e}"))
}

pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        write_frame(&mut self.stream, &msg).await
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        read_frame(&mut self.stream).await
    }
}

fn map_io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::BrokenPipe => {
            anyhow::anyhow!("connection closed by peer")
        }
        std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("connection reset by peer"),
        _ => anyhow::anyhow!("io error: {e}"),
    }
}
