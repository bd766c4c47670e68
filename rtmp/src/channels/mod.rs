use tokio::sync::{mpsc, oneshot};

use crate::media::{MediaSink, MediaSource};

pub type UniqueID = uuid::Uuid;

/// A publish request handed off by a session to whatever owns the stream
/// catalogue; `response` carries back a `PublishHandle` wrapping the sink the
/// session forwards audio/video/metadata into, or nothing if the name is
/// already taken.
pub struct PublishRequest {
	pub app_name: String,
	pub stream_name: String,
	pub response: oneshot::Sender<Option<PublishHandle>>,
}

pub struct PublishHandle {
	pub uid: UniqueID,
	pub sink: Box<dyn MediaSink + Send>,
}

pub type PublishProducer = mpsc::Sender<PublishRequest>;
pub type PublishConsumer = mpsc::Receiver<PublishRequest>;

/// A play request handed off by a session to whatever owns the stream
/// catalogue; `response` carries back the `MediaSource` the session pulls
/// frames from, or nothing if the stream doesn't exist.
pub struct PlayRequest {
	pub app_name: String,
	pub stream_name: String,
	pub response: oneshot::Sender<Option<Box<dyn MediaSource + Send>>>,
}

pub type PlayProducer = mpsc::Sender<PlayRequest>;
pub type PlayConsumer = mpsc::Receiver<PlayRequest>;

/// A `releaseStream` request handed off by a session to whatever owns the
/// stream catalogue; `response` carries back whether a publisher registered
/// under `app_name`/`stream_name` was found and torn down.
pub struct ReleaseRequest {
	pub app_name: String,
	pub stream_name: String,
	pub response: oneshot::Sender<bool>,
}

pub type ReleaseProducer = mpsc::Sender<ReleaseRequest>;
pub type ReleaseConsumer = mpsc::Receiver<ReleaseRequest>;
