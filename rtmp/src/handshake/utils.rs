use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, truncated to 32 bits. Used as the
/// handshake `time`/`time2` fields; RTMP only ever compares these modulo
/// 2^32 so truncation is harmless.
pub fn current_time() -> u32 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis() as u32)
		.unwrap_or(0)
}
