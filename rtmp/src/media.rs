use amf0::Amf0Value;
use async_trait::async_trait;
use bytes::Bytes;

/// Which kind of frame a `MediaSource` handed back from `next_frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
	Audio,
	Video,
}

/// A single frame produced by a `MediaSource`, timestamped relative to the
/// previous frame the source returned (the session accumulates these into
/// absolute timestamps before chunking them out).
#[derive(Debug, Clone)]
pub struct SourceFrame {
	pub kind: FrameKind,
	pub dts_delta_ms: u32,
	pub payload: Bytes,
	/// Whether this frame is a sync point an output can safely resume from.
	/// Always `true` for audio. Used by the slow-subscriber policy (§5) to
	/// decide which queued frame to drop first.
	pub is_keyframe: bool,
}

/// The host-side sink a published stream's audio/video/metadata is forwarded
/// to. Implementations own whatever stream catalogue, recording, or
/// transcoding pipeline sits behind a publish; the core only knows this
/// trait boundary.
#[async_trait]
pub trait MediaSink {
	async fn on_publish(&mut self, stream_path: &str, args: &Amf0Value) -> Result<(), String>;
	async fn on_audio(&mut self, abs_ts_ms: u32, avcc_payload: Bytes) -> Result<(), String>;
	async fn on_video(&mut self, abs_ts_ms: u32, avcc_payload: Bytes) -> Result<(), String>;
	async fn on_metadata(&mut self, amf_object: Amf0Value) -> Result<(), String>;
	async fn on_close(&mut self, reason: &str);
}

/// The host-side source a played stream's frames are pulled from.
#[async_trait]
pub trait MediaSource {
	async fn audio_config(&mut self) -> Option<Bytes>;
	async fn video_config(&mut self) -> Option<Bytes>;
	async fn next_frame(&mut self) -> Result<Option<SourceFrame>, String>;
}
