use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::READ_DEADLINE;
use crate::error::LinkError;
use crate::transport::Link;

/// TCP implementation of [`Link`].
///
/// Reads go through a small buffer so the byte-at-a-time codec does not
/// turn every byte into a syscall; the deadline still applies per
/// `recv_byte` call, matching a socket read timeout.
pub struct TcpLink {
    stream: BufReader<TcpStream>,
    read_deadline: Duration,
}

impl TcpLink {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream: BufReader::new(stream),
            read_deadline: READ_DEADLINE,
        }
    }

    pub fn with_deadline(stream: TcpStream, read_deadline: Duration) -> Self {
        Self {
            stream: BufReader::new(stream),
            read_deadline,
        }
    }

    /// Connect to the server and wrap the stream with default deadlines.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, LinkError> {
        let stream = TcpStream::connect(addr).await.map_err(LinkError::Io)?;
        Ok(Self::new(stream))
    }

    fn map_read_err(err: io::Error) -> LinkError {
        match err.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::ConnectionReset => LinkError::Closed,
            _ => LinkError::Io(err),
        }
    }

    fn map_write_err(err: io::Error) -> LinkError {
        match err.kind() {
            io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset => LinkError::Closed,
            _ => LinkError::Io(err),
        }
    }
}

#[async_trait::async_trait]
impl Link for TcpLink {
    async fn recv_byte(&mut self) -> Result<u8, LinkError> {
        match timeout(self.read_deadline, self.stream.read_u8()).await {
            Err(_) => Err(LinkError::TimedOut),
            Ok(Err(e)) => Err(Self::map_read_err(e)),
            Ok(Ok(byte)) => Ok(byte),
        }
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.stream
            .get_mut()
            .write_all(bytes)
            .await
            .map_err(Self::map_write_err)?;
        self.stream
            .get_mut()
            .flush()
            .await
            .map_err(Self::map_write_err)
    }

    fn read_deadline(&self) -> Duration {
        self.read_deadline
    }

    fn set_read_deadline(&mut self, deadline: Duration) {
        self.read_deadline = deadline;
    }
}
