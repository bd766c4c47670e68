//! End-to-end session lifecycle tests driven entirely in-process over
//! `tokio::io::duplex`, exercising `Session`/`ClientSession` against mock
//! `MediaSink`/`MediaSource` implementations instead of a spawned `ffmpeg`.

use std::sync::{Arc, Mutex};

use amf0::Amf0Value;
use async_trait::async_trait;
use bytes::Bytes;
use rtmp::{ClientSession, FrameKind, MediaSink, MediaSource, RtmpConfig, Session, SourceFrame};
use tokio::sync::mpsc;

#[derive(Default)]
struct RecordedPublish {
	stream_path: Option<String>,
	got_audio: bool,
	got_video: bool,
	got_metadata: bool,
	closed_reason: Option<String>,
}

struct RecordingSink {
	record: Arc<Mutex<RecordedPublish>>,
}

#[async_trait]
impl MediaSink for RecordingSink {
	async fn on_publish(&mut self, stream_path: &str, _args: &Amf0Value) -> Result<(), String> {
		self.record.lock().unwrap().stream_path = Some(stream_path.to_string());
		Ok(())
	}

	async fn on_audio(&mut self, _abs_ts_ms: u32, _avcc_payload: Bytes) -> Result<(), String> {
		self.record.lock().unwrap().got_audio = true;
		Ok(())
	}

	async fn on_video(&mut self, _abs_ts_ms: u32, _avcc_payload: Bytes) -> Result<(), String> {
		self.record.lock().unwrap().got_video = true;
		Ok(())
	}

	async fn on_metadata(&mut self, _amf_object: Amf0Value) -> Result<(), String> {
		self.record.lock().unwrap().got_metadata = true;
		Ok(())
	}

	async fn on_close(&mut self, reason: &str) {
		self.record.lock().unwrap().closed_reason = Some(reason.to_string());
	}
}

/// A `MediaSource` that hands out one config blob per kind, then a fixed
/// number of frames, then signals end-of-stream.
struct ScriptedSource {
	audio_config: Option<Bytes>,
	video_config: Option<Bytes>,
	remaining_frames: Vec<SourceFrame>,
}

impl ScriptedSource {
	fn with_frames(count: usize) -> Self {
		let remaining_frames = (0..count)
			.map(|i| SourceFrame {
				kind: if i % 2 == 0 { FrameKind::Video } else { FrameKind::Audio },
				dts_delta_ms: 33,
				payload: Bytes::from_static(b"frame"),
				is_keyframe: i % 2 == 0,
			})
			.collect();

		Self {
			audio_config: Some(Bytes::from_static(b"audio-config")),
			video_config: Some(Bytes::from_static(b"video-config")),
			remaining_frames,
		}
	}
}

#[async_trait]
impl MediaSource for ScriptedSource {
	async fn audio_config(&mut self) -> Option<Bytes> {
		self.audio_config.take()
	}

	async fn video_config(&mut self) -> Option<Bytes> {
		self.video_config.take()
	}

	async fn next_frame(&mut self) -> Result<Option<SourceFrame>, String> {
		if self.remaining_frames.is_empty() {
			Ok(None)
		} else {
			Ok(Some(self.remaining_frames.remove(0)))
		}
	}
}

#[derive(Default)]
struct CollectedPlay {
	stream_path: Option<String>,
	audio_frames: usize,
	video_frames: usize,
}

struct CollectingSink {
	record: Arc<Mutex<CollectedPlay>>,
}

#[async_trait]
impl MediaSink for CollectingSink {
	async fn on_publish(&mut self, stream_path: &str, _args: &Amf0Value) -> Result<(), String> {
		self.record.lock().unwrap().stream_path = Some(stream_path.to_string());
		Ok(())
	}

	async fn on_audio(&mut self, _abs_ts_ms: u32, _avcc_payload: Bytes) -> Result<(), String> {
		self.record.lock().unwrap().audio_frames += 1;
		Ok(())
	}

	async fn on_video(&mut self, _abs_ts_ms: u32, _avcc_payload: Bytes) -> Result<(), String> {
		self.record.lock().unwrap().video_frames += 1;
		Ok(())
	}

	async fn on_metadata(&mut self, _amf_object: Amf0Value) -> Result<(), String> {
		Ok(())
	}

	async fn on_close(&mut self, _reason: &str) {}
}

#[tokio::test]
async fn test_publish_reaches_sink() {
	let (client_stream, server_stream) = tokio::io::duplex(64 * 1024);

	let (publish_producer, mut publish_consumer) = mpsc::channel(1);
	let (play_producer, _play_consumer) = mpsc::channel(1);
	let (release_producer, _release_consumer) = mpsc::channel(1);

	let record = Arc::new(Mutex::new(RecordedPublish::default()));
	let record_clone = record.clone();

	let host = tokio::spawn(async move {
		let req = publish_consumer.recv().await.expect("session never asked to publish");
		assert_eq!(req.app_name, "live");
		assert_eq!(req.stream_name, "stream-key");

		let sink: Box<dyn MediaSink + Send> = Box::new(RecordingSink { record: record_clone });
		let _ = req.response.send(Some(rtmp::channels::PublishHandle {
			uid: rtmp::UniqueID::new_v4(),
			sink,
		}));
	});

	let server = tokio::spawn(async move {
		let mut session = Session::new(server_stream, RtmpConfig::default(), publish_producer, play_producer, release_producer);
		session.run().await
	});

	let client = tokio::spawn(async move {
		let mut client = ClientSession::new(client_stream, RtmpConfig::default());
		client.handshake().await.expect("handshake failed");
		client.connect("live", "rtmp://localhost/live").await.expect("connect failed");
		client.create_stream().await.expect("createStream failed");

		let mut source = ScriptedSource::with_frames(4);
		client.publish("stream-key", &mut source).await.expect("publish failed");
	});

	client.await.expect("client task panicked");
	host.await.expect("host task panicked");

	// The client never sends `deleteStream` before its duplex half drops, so
	// from the server's point of view the publisher just vanished mid-stream;
	// `run()` reports that as an unclean end (`is_publishing` was still set).
	let ran_clean = server.await.expect("server task panicked").expect("session errored");
	assert!(!ran_clean);

	let record = record.lock().unwrap();
	assert_eq!(record.stream_path.as_deref(), Some("live/stream-key"));
	assert!(record.got_audio);
	assert!(record.got_video);
	assert_eq!(record.closed_reason.as_deref(), Some("session ended"));
}

#[tokio::test]
async fn test_publish_rejected_when_name_taken() {
	let (client_stream, server_stream) = tokio::io::duplex(64 * 1024);

	let (publish_producer, mut publish_consumer) = mpsc::channel(1);
	let (play_producer, _play_consumer) = mpsc::channel(1);
	let (release_producer, _release_consumer) = mpsc::channel(1);

	let host = tokio::spawn(async move {
		let req = publish_consumer.recv().await.expect("session never asked to publish");
		let _ = req.response.send(None);
	});

	let server = tokio::spawn(async move {
		let mut session = Session::new(server_stream, RtmpConfig::default(), publish_producer, play_producer, release_producer);
		session.run().await
	});

	let client = tokio::spawn(async move {
		let mut client = ClientSession::new(client_stream, RtmpConfig::default());
		client.handshake().await.expect("handshake failed");
		client.connect("live", "rtmp://localhost/live").await.expect("connect failed");
		client.create_stream().await.expect("createStream failed");

		let mut source = ScriptedSource::with_frames(1);
		client.publish("stream-key", &mut source).await
	});

	host.await.expect("host task panicked");
	let publish_result = client.await.expect("client task panicked");
	assert!(publish_result.is_err(), "publish should have failed once BadName was returned");

	// The server side surfaces the same rejection as a non-clean session end.
	let ran_clean = server.await.expect("server task panicked");
	assert!(matches!(ran_clean, Err(rtmp::SessionError::BadName(_))));
}

#[tokio::test]
async fn test_play_forwards_frames_to_sink() {
	let (client_stream, server_stream) = tokio::io::duplex(64 * 1024);

	let (publish_producer, _publish_consumer) = mpsc::channel(1);
	let (play_producer, mut play_consumer) = mpsc::channel(1);
	let (release_producer, _release_consumer) = mpsc::channel(1);

	let host = tokio::spawn(async move {
		let req = play_consumer.recv().await.expect("session never asked to play");
		assert_eq!(req.app_name, "live");
		assert_eq!(req.stream_name, "stream-key");

		let source: Box<dyn MediaSource + Send> = Box::new(ScriptedSource::with_frames(6));
		let _ = req.response.send(Some(source));
	});

	let server = tokio::spawn(async move {
		let mut session = Session::new(server_stream, RtmpConfig::default(), publish_producer, play_producer, release_producer);
		session.run().await
	});

	let record = Arc::new(Mutex::new(CollectedPlay::default()));
	let record_clone = record.clone();

	let client = tokio::spawn(async move {
		let mut client = ClientSession::new(client_stream, RtmpConfig::default());
		client.handshake().await.expect("handshake failed");
		client.connect("live", "rtmp://localhost/live").await.expect("connect failed");
		client.create_stream().await.expect("createStream failed");

		let mut sink = CollectingSink { record: record_clone };
		// The scripted source above ends on its own (`next_frame` -> None),
		// which the server answers with `NetStream.Play.Complete`; `play`
		// returns once it sees that code.
		client.play("stream-key", &mut sink).await.expect("play failed");
	});

	host.await.expect("host task panicked");
	client.await.expect("client task panicked");
	server.abort();

	let record = record.lock().unwrap();
	assert_eq!(record.stream_path.as_deref(), Some("stream-key"));
	assert!(record.video_frames > 0);
	assert!(record.audio_frames > 0);
}

/// S5: a stale `cam` registration left behind by a publisher that has
/// already finished sending frames blocks a second publisher from taking the
/// same name, until `releaseStream` tears the registration down.
#[tokio::test]
async fn test_release_stream_allows_republish() {
	let (client_a, server_a) = tokio::io::duplex(64 * 1024);
	let (client_b, server_b) = tokio::io::duplex(64 * 1024);

	let (publish_producer, mut publish_consumer) = mpsc::channel::<rtmp::channels::PublishRequest>(4);
	let (play_producer, _play_consumer) = mpsc::channel(1);
	let (release_producer, mut release_consumer) = mpsc::channel::<rtmp::channels::ReleaseRequest>(4);

	let registered: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
	let registered_clone = registered.clone();

	let host = tokio::spawn(async move {
		loop {
			tokio::select! {
				req = publish_consumer.recv() => {
					let Some(req) = req else { break };
					let mut current = registered_clone.lock().unwrap();
					if current.is_some() {
						let _ = req.response.send(None);
					} else {
						*current = Some(req.stream_name.clone());
						drop(current);
						let sink: Box<dyn MediaSink + Send> = Box::new(RecordingSink {
							record: Arc::new(Mutex::new(RecordedPublish::default())),
						});
						let _ = req.response.send(Some(rtmp::channels::PublishHandle { uid: rtmp::UniqueID::new_v4(), sink }));
					}
				}
				req = release_consumer.recv() => {
					let Some(req) = req else { break };
					let mut current = registered_clone.lock().unwrap();
					let released = current.as_deref() == Some(req.stream_name.as_str());
					if released {
						*current = None;
					}
					let _ = req.response.send(released);
				}
			}
		}
	});

	let server_a_task = tokio::spawn({
		let mut session = Session::new(
			server_a,
			RtmpConfig::default(),
			publish_producer.clone(),
			play_producer.clone(),
			release_producer.clone(),
		);
		async move { session.run().await }
	});

	let client_a_task = tokio::spawn(async move {
		let mut client = ClientSession::new(client_a, RtmpConfig::default());
		client.handshake().await.expect("handshake failed");
		client.connect("live", "rtmp://localhost/live").await.expect("connect failed");
		client.create_stream().await.expect("createStream failed");

		let mut source = ScriptedSource::with_frames(2);
		client.publish("cam", &mut source).await.expect("publisher A should win the race for the name");
	});

	client_a_task.await.expect("client A task panicked");
	server_a_task.await.expect("server A task panicked").ok();

	// A's session is done, but nothing told the host to forget "cam" yet.
	assert_eq!(registered.lock().unwrap().as_deref(), Some("cam"));

	let server_b_task = tokio::spawn({
		let mut session = Session::new(server_b, RtmpConfig::default(), publish_producer, play_producer, release_producer);
		async move { session.run().await }
	});

	let client_b_task = tokio::spawn(async move {
		let mut client = ClientSession::new(client_b, RtmpConfig::default());
		client.handshake().await.expect("handshake failed");
		client.connect("live", "rtmp://localhost/live").await.expect("connect failed");
		client.create_stream().await.expect("createStream failed");

		client.release_stream("cam").await.expect("releaseStream should succeed against the stale registration");

		let mut source = ScriptedSource::with_frames(1);
		client.publish("cam", &mut source).await.expect("publisher B should now be able to take the name");
	});

	client_b_task.await.expect("client B task panicked");
	server_b_task.await.expect("server B task panicked").ok();

	assert_eq!(registered.lock().unwrap().as_deref(), Some("cam"));

	host.abort();
}
