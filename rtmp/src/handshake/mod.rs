mod client;
mod define;
mod digest;
mod errors;
mod server;
mod utils;

pub use self::client::ClientHandshake;
pub use self::define::{ClientHandshakeState, ServerHandshakeState, RTMP_HANDSHAKE_SIZE};
pub use self::errors::*;
pub use self::server::HandshakeServer;
