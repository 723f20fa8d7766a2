mod ai;
mod board;
mod common;
mod config;
mod game;
mod layout;
mod logging;
mod player;
pub mod player_node;
pub mod protocol;
pub mod relay;
mod ship;
pub mod transport;

pub use ai::*;
pub use board::*;
pub use common::*;
pub use config::*;
pub use game::*;
pub use layout::*;
pub use logging::init_logging;
pub use player::*;
pub use player_node::*;
pub use protocol::*;
pub use relay::Relay;
pub use ship::*;
pub use transport::tcp::TcpTransport;
