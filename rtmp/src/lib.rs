pub mod channels;
pub mod chunk;
pub mod config;
pub mod handshake;
mod macros;
pub mod media;
pub mod messages;
pub mod netconnection;
pub mod netstream;
pub mod protocol_control_messages;
pub mod session;
mod subscriber;
pub mod url;
pub mod user_control_messages;

pub use channels::{PlayProducer, PublishProducer, ReleaseProducer, UniqueID};
pub use config::{RtmpConfig, SlowSubscriberPolicy};
pub use media::{FrameKind, MediaSink, MediaSource, SourceFrame};
pub use session::{ClientSession, Session, SessionError};
pub use subscriber::SubscriberClosed;
pub use url::{RtmpUrl, UrlError};
