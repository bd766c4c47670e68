/// What a subscriber's frame channel does once it fills up (§5 "slow
/// subscriber" handling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlowSubscriberPolicy {
	/// Drop the oldest non-keyframe frame to make room for the new one; if
	/// every queued frame is a keyframe, drop the oldest anyway.
	DropOldestNonKeyframe,
	/// Close the subscriber outright (`NetStream.Play.Stop`) instead of
	/// dropping frames.
	Close,
}

/// Config surface the session reads at construction time. `listen_addr` is a
/// host concern (the core accepts an already-bound transport) and isn't part
/// of this struct.
#[derive(Debug, Clone)]
pub struct RtmpConfig {
	/// Outbound chunk size the server negotiates with `SetChunkSize` after connect.
	pub chunk_size: u32,
	/// Ceiling the chunk decoder enforces on a peer's own `SetChunkSize`.
	pub max_chunk_size: u32,
	/// Ceiling on a single reassembled message's length.
	pub max_message_length: u32,
	/// Window size advertised via `WindowAcknowledgementSize`/`SetPeerBandwidth`.
	pub window_ack_size: u32,
	/// Whether the connection survives its publisher/subscriber ending.
	pub keep_alive: bool,
	/// Depth of a subscriber's bounded frame channel before the slow-subscriber
	/// policy kicks in.
	pub subscriber_channel_depth: usize,
	/// What to do once a subscriber's frame channel is full.
	pub slow_subscriber_policy: SlowSubscriberPolicy,
}

impl Default for RtmpConfig {
	fn default() -> Self {
		Self {
			chunk_size: 65536,
			max_chunk_size: 16 * 1024 * 1024,
			max_message_length: 16 * 1024 * 1024,
			window_ack_size: 2_500_000,
			keep_alive: false,
			subscriber_channel_depth: 8,
			slow_subscriber_policy: SlowSubscriberPolicy::DropOldestNonKeyframe,
		}
	}
}
