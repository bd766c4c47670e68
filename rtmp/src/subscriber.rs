use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::config::SlowSubscriberPolicy;
use crate::media::{MediaSource, SourceFrame};

/// Why a subscriber's frame channel stopped producing frames.
#[derive(Debug, Clone)]
pub enum SubscriberClosed {
	/// The `MediaSource` ran out of frames on its own.
	SourceEnded,
	/// The `MediaSource` returned an error.
	SourceError(String),
	/// The subscriber fell behind and the channel's policy is `Close`.
	SlowConsumer,
}

/// Bounded frame queue sitting between a `MediaSource`'s producer task and
/// the session writer (§5). When full, applies the configured
/// slow-subscriber policy instead of growing without bound or blocking the
/// producer.
pub struct SubscriberChannel {
	queue: Mutex<VecDeque<SourceFrame>>,
	notify: Notify,
	capacity: usize,
	policy: SlowSubscriberPolicy,
	closed: Mutex<Option<SubscriberClosed>>,
	/// Set by the session when it tears down, so the producer task stops
	/// pulling from the source instead of running forever unconsumed (§5
	/// cancellation).
	cancelled: AtomicBool,
}

impl SubscriberChannel {
	pub fn new(capacity: usize, policy: SlowSubscriberPolicy) -> Arc<Self> {
		Arc::new(Self {
			queue: Mutex::new(VecDeque::with_capacity(capacity)),
			notify: Notify::new(),
			capacity,
			policy,
			closed: Mutex::new(None),
			cancelled: AtomicBool::new(false),
		})
	}

	/// Tell the producer task to stop at its next opportunity.
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Relaxed);
	}

	fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Relaxed)
	}

	/// Push a newly produced frame, applying the slow-subscriber policy if
	/// the channel is already at capacity. Returns `false` once the `Close`
	/// policy has fired; the producer task should stop pulling from the
	/// source when it sees that.
	async fn push(&self, frame: SourceFrame) -> bool {
		let mut queue = self.queue.lock().await;

		if queue.len() >= self.capacity {
			match self.policy {
				SlowSubscriberPolicy::Close => {
					drop(queue);
					self.mark_closed(SubscriberClosed::SlowConsumer).await;
					return false;
				}
				SlowSubscriberPolicy::DropOldestNonKeyframe => match queue.iter().position(|f| !f.is_keyframe) {
					Some(idx) => {
						queue.remove(idx);
					}
					None => {
						// Every queued frame is a keyframe; drop the oldest
						// one anyway rather than growing unbounded.
						queue.pop_front();
					}
				},
			}
		}

		queue.push_back(frame);
		drop(queue);
		self.notify.notify_one();
		true
	}

	async fn mark_closed(&self, reason: SubscriberClosed) {
		let mut closed = self.closed.lock().await;
		if closed.is_none() {
			*closed = Some(reason);
		}
		drop(closed);
		self.notify.notify_one();
	}

	/// Pop the next queued frame, or `None` once the channel is closed and
	/// drained. Draining always takes priority over reporting closed, so a
	/// subscriber sees every frame the producer managed to queue before it
	/// stopped.
	pub async fn recv(&self) -> Option<SourceFrame> {
		loop {
			{
				let mut queue = self.queue.lock().await;
				if let Some(frame) = queue.pop_front() {
					return Some(frame);
				}
			}

			if self.closed.lock().await.is_some() {
				return None;
			}

			self.notify.notified().await;
		}
	}

	/// Why the channel closed, once `recv` has returned `None`.
	pub async fn close_reason(&self) -> Option<SubscriberClosed> {
		self.closed.lock().await.clone()
	}
}

/// Drives a `MediaSource` into a `SubscriberChannel` until the source ends,
/// errors, or the channel's `Close` policy fires. Runs as its own task so a
/// slow subscriber's socket writes never block the source from producing.
pub async fn pump(mut source: Box<dyn MediaSource + Send>, channel: Arc<SubscriberChannel>) {
	loop {
		if channel.is_cancelled() {
			break;
		}

		match source.next_frame().await {
			Ok(Some(frame)) => {
				if !channel.push(frame).await {
					break;
				}
			}
			Ok(None) => {
				channel.mark_closed(SubscriberClosed::SourceEnded).await;
				break;
			}
			Err(e) => {
				channel.mark_closed(SubscriberClosed::SourceError(e)).await;
				break;
			}
		}
	}
}
