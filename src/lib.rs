mod client;
mod codec;
mod config;
mod error;
mod logging;
mod protocol;
mod receiver;
mod task;
pub mod transport;

pub use client::*;
pub use codec::decode;
pub use config::*;
pub use error::*;
pub use logging::init_logging;
pub use protocol::*;
pub use receiver::*;
pub use task::*;
pub use transport::in_memory::InMemoryLink;
pub use transport::tcp::TcpLink;
pub use transport::Link;
