use tokio::time::Duration;

/// Shortest allowed nickname.
pub const MIN_NICK_LEN: usize = 3;
/// Longest allowed nickname; also bounds how far a nickname scan may read.
pub const MAX_NICK_LEN: usize = 8;
/// Stones per player in a turn word.
pub const STONES_PER_PLAYER: usize = 5;

/// Default deadline for a single byte read.
pub const READ_DEADLINE: Duration = Duration::from_millis(500);

/// Deadline for the OK answer to a liveness probe.
pub const ALIVE_DEADLINE: Duration = Duration::from_secs(2);

/// Default cumulative idle budget before a liveness probe is mandatory.
pub const MAX_IDLE: Duration = Duration::from_secs(120);

/// Default number of recoverable failures tolerated per wait.
pub const MAX_ATTEMPTS: u32 = 10;
