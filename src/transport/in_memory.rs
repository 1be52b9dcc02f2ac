use std::collections::VecDeque;

use tokio::task::yield_now;
use tokio::time::Duration;

use crate::config::READ_DEADLINE;
use crate::error::LinkError;
use crate::transport::Link;

enum Event {
    Byte(u8),
    /// One read's worth of silence.
    Stall,
}

/// Scripted in-memory [`Link`] for deterministic receive tests.
///
/// The script is a flat sequence of bytes, one-shot stalls (each surfaces
/// as a single deadline miss without any real waiting) and an optional
/// end-of-stream marker. Once the script runs dry the link either stalls
/// forever or, after [`then_eof`](Self::then_eof), reports a closed stream.
/// Everything sent through the link is captured for assertions.
pub struct InMemoryLink {
    script: VecDeque<Event>,
    sent: Vec<Vec<u8>>,
    read_deadline: Duration,
    eof_when_dry: bool,
}

impl InMemoryLink {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            sent: Vec::new(),
            read_deadline: READ_DEADLINE,
            eof_when_dry: false,
        }
    }

    /// Append inbound bytes to the script.
    pub fn feed(mut self, bytes: &[u8]) -> Self {
        self.script.extend(bytes.iter().copied().map(Event::Byte));
        self
    }

    /// Append one deadline miss to the script.
    pub fn stall(mut self) -> Self {
        self.script.push_back(Event::Stall);
        self
    }

    /// Append `n` deadline misses to the script.
    pub fn stalls(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.script.push_back(Event::Stall);
        }
        self
    }

    /// End the stream once the script runs dry.
    pub fn then_eof(mut self) -> Self {
        self.eof_when_dry = true;
        self
    }

    /// Everything sent so far, one entry per `send` call.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// How many times a frame equal to `bytes` was sent.
    pub fn sent_count(&self, bytes: &[u8]) -> usize {
        self.sent.iter().filter(|frame| frame.as_slice() == bytes).count()
    }
}

impl Default for InMemoryLink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Link for InMemoryLink {
    async fn recv_byte(&mut self) -> Result<u8, LinkError> {
        // yield so spawned receivers stay cooperative even on a dry script
        yield_now().await;
        match self.script.pop_front() {
            Some(Event::Byte(b)) => Ok(b),
            Some(Event::Stall) => Err(LinkError::TimedOut),
            None if self.eof_when_dry => Err(LinkError::Closed),
            None => Err(LinkError::TimedOut),
        }
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn read_deadline(&self) -> Duration {
        self.read_deadline
    }

    fn set_read_deadline(&mut self, deadline: Duration) {
        self.read_deadline = deadline;
    }
}
