use tokio::time::Duration;

use crate::error::LinkError;

/// A bidirectional byte stream with deadline-bounded reads.
///
/// The codec consumes links one byte at a time; each read waits at most the
/// link's per-read deadline so the receive loop can re-check cancellation
/// and account idle time. The deadline is adjustable because the liveness
/// probe waits under a shorter one.
#[async_trait::async_trait]
pub trait Link: Send {
    /// Read a single byte, waiting at most the per-read deadline.
    async fn recv_byte(&mut self) -> Result<u8, LinkError>;

    /// Write the whole buffer to the peer.
    async fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError>;

    /// Current per-read deadline.
    fn read_deadline(&self) -> Duration;

    /// Adjust the per-read deadline for subsequent reads.
    fn set_read_deadline(&mut self, deadline: Duration);
}

pub mod in_memory;
pub mod tcp;
