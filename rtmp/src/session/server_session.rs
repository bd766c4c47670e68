use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use amf0::Amf0Value;
use bytes::Bytes;
use bytesio::bytes_writer::BytesWriter;
use bytesio::bytesio::{AsyncReadWrite, BytesIO};
use bytesio::bytesio_errors::BytesIOError;
use tokio::sync::oneshot;

use super::define::RtmpCommand;
use super::errors::SessionError;
use crate::channels::{PlayProducer, PlayRequest, PublishProducer, PublishRequest, ReleaseProducer, ReleaseRequest};
use crate::chunk::{ChunkDecoder, ChunkEncoder};
use crate::config::RtmpConfig;
use crate::handshake::{HandshakeServer, ServerHandshakeState};
use crate::media::{FrameKind, MediaSink, MediaSource};
use crate::messages::{MessageParser, RtmpMessageData};
use crate::netconnection::NetConnection;
use crate::netstream::NetStreamWriter;
use crate::protocol_control_messages::ProtocolControlMessagesWriter;
use crate::subscriber::{self, SubscriberChannel, SubscriberClosed};
use crate::user_control_messages::EventMessagesWriter;
use crate::{channels, handshake};

/// RTMP message stream ids are assigned from a single monotonic counter
/// shared across every connection, starting past the well-known low ids
/// (0 is the control stream). Mirrors the reference server's global
/// `gstreamid` counter.
static NEXT_STREAM_ID: AtomicU32 = AtomicU32::new(64);

/// Short poll interval used for the socket read while a subscriber is being
/// served, so the session notices newly available frames from the
/// `MediaSource` without blocking on the next client command.
const PLAY_POLL_INTERVAL: Duration = Duration::from_millis(50);
const COMMAND_READ_TIMEOUT: Duration = Duration::from_millis(2500);

pub struct Session<S: AsyncReadWrite> {
	/// When you connect via rtmp, you specify the app name in the url, e.g.
	/// `rtmp://localhost:1935/live/xyz` has app name `live` and stream name
	/// `xyz`. A single connection may publish or play multiple stream names
	/// under the same app, each with its own `message_stream_id`.
	app_name: Option<String>,

	/// Unique id issued by the host once a publish is accepted.
	uid: Option<channels::UniqueID>,

	/// Used to read and write data.
	io: BytesIO<S>,

	/// Sometimes the handshake reads more bytes than it needs; this flag
	/// means we already have a chunk ready to parse and should not read more
	/// data from the stream this iteration.
	skip_read: bool,

	chunk_decoder: ChunkDecoder,
	chunk_encoder: ChunkEncoder,

	/// The `message_stream_id` this session is currently bound to, either as
	/// a publisher or a subscriber.
	stream_id: u32,

	publish_sink: Option<Box<dyn MediaSink + Send>>,
	is_publishing: bool,
	publish_request_producer: PublishProducer,
	published_name: Option<String>,

	/// Frame queue fed by a background task pulling from the attached
	/// `MediaSource` (§5); absent unless a `play` is in progress.
	subscriber_channel: Option<Arc<SubscriberChannel>>,
	/// Running absolute timestamp accumulated from each frame's
	/// `dts_delta_ms` (§6), reset to zero at the start of every `play`.
	play_abs_timestamp: u32,
	is_playing: bool,
	play_request_producer: PlayProducer,
	release_request_producer: ReleaseProducer,

	config: RtmpConfig,

	/// Total bytes read from the peer, for Window-Ack-Size accounting.
	read_seq: u64,
	/// Total bytes written to the peer.
	write_seq: u64,
	last_ack_sent: u64,
	in_bandwidth: u32,
	/// Last `Acknowledgement` value the peer sent us, for observability only.
	acked_write: u32,
}

impl<S: AsyncReadWrite> Session<S> {
	pub fn new(
		stream: S,
		config: RtmpConfig,
		publish_request_producer: PublishProducer,
		play_request_producer: PlayProducer,
		release_request_producer: ReleaseProducer,
	) -> Self {
		let io = BytesIO::new(stream);
		let in_bandwidth = config.window_ack_size;

		Self {
			uid: None,
			app_name: None,
			io,
			skip_read: false,
			chunk_decoder: ChunkDecoder::with_max_message_length(config.max_message_length as usize),
			chunk_encoder: ChunkEncoder::default(),
			stream_id: 0,
			publish_sink: None,
			is_publishing: false,
			publish_request_producer,
			published_name: None,
			subscriber_channel: None,
			play_abs_timestamp: 0,
			is_playing: false,
			play_request_producer,
			release_request_producer,
			config,
			read_seq: 0,
			write_seq: 0,
			last_ack_sent: 0,
			in_bandwidth,
			acked_write: 0,
		}
	}

	pub fn uid(&self) -> Option<channels::UniqueID> {
		self.uid
	}

	/// Run the session to completion. Returns `true` if the connection ended
	/// because every attached publisher/subscriber finished cleanly (vs. the
	/// peer simply vanishing mid-stream).
	pub async fn run(&mut self) -> Result<bool, SessionError> {
		let mut handshaker = HandshakeServer::default();
		while !self.do_handshake(&mut handshaker).await? {}
		drop(handshaker);

		tracing::debug!("handshake complete");

		while match self.do_ready().await {
			Ok(v) => v,
			Err(SessionError::BytesIO(BytesIOError::ClientClosed)) => {
				tracing::debug!("client closed the connection");
				false
			}
			Err(e) => return Err(e),
		} {}

		if let Some(sink) = self.publish_sink.as_mut() {
			sink.on_close("session ended").await;
		}

		Ok(!self.is_publishing)
	}

	async fn do_handshake(&mut self, handshaker: &mut HandshakeServer) -> Result<bool, SessionError> {
		let mut bytes_len = 0;

		while bytes_len < handshake::RTMP_HANDSHAKE_SIZE {
			let buf = self.io.read_timeout(COMMAND_READ_TIMEOUT).await?;
			bytes_len += buf.len();
			self.read_seq += buf.len() as u64;
			handshaker.extend_data(&buf[..]);
		}

		let mut writer = BytesWriter::default();
		handshaker.handshake(&mut writer)?;
		self.write_data(writer.dispose()).await?;

		if handshaker.state() == ServerHandshakeState::Finish {
			let over_read = handshaker.extract_remaining_bytes();

			if !over_read.is_empty() {
				self.skip_read = true;
				self.chunk_decoder.extend_data(&over_read[..]);
			}

			self.send_initial_control_messages().await?;

			Ok(true)
		} else {
			Ok(false)
		}
	}

	/// The second stage of the session: read data, turn it into messages,
	/// dispatch them, and — once a subscriber is attached — interleave
	/// pulling frames from its `MediaSource`.
	async fn do_ready(&mut self) -> Result<bool, SessionError> {
		if self.skip_read {
			self.skip_read = false;
		} else if self.is_playing {
			self.poll_play_iteration().await?;
		} else {
			let data = self.io.read_timeout(COMMAND_READ_TIMEOUT).await?;
			self.read_seq += data.len() as u64;
			self.chunk_decoder.extend_data(&data[..]);
		}

		self.parse_chunks().await?;
		self.maybe_send_ack().await?;

		Ok(true)
	}

	/// While a subscriber is attached, race a short socket poll against the
	/// next frame from the source so the writer stays responsive to both the
	/// peer (closeStream, deleteStream) and the media pipeline.
	async fn poll_play_iteration(&mut self) -> Result<(), SessionError> {
		tokio::select! {
			data = self.io.read_timeout(PLAY_POLL_INTERVAL) => {
				match data {
					Ok(data) => {
						self.read_seq += data.len() as u64;
						self.chunk_decoder.extend_data(&data[..]);
						Ok(())
					}
					Err(BytesIOError::Timeout) => Ok(()),
					Err(e) => Err(e.into()),
				}
			}
			frame = Self::next_channel_frame(&self.subscriber_channel), if self.subscriber_channel.is_some() => {
				self.forward_channel_frame(frame).await
			}
		}
	}

	async fn next_channel_frame(channel: &Option<Arc<SubscriberChannel>>) -> Option<crate::media::SourceFrame> {
		channel.as_ref().expect("guarded by is_some").recv().await
	}

	async fn forward_channel_frame(&mut self, frame: Option<crate::media::SourceFrame>) -> Result<(), SessionError> {
		let Some(frame) = frame else {
			let channel = self.subscriber_channel.as_ref().expect("guarded by is_some");
			return match channel.close_reason().await {
				Some(SubscriberClosed::SourceError(e)) => {
					self.is_playing = false;
					self.subscriber_channel = None;
					Err(SessionError::Source(e))
				}
				Some(SubscriberClosed::SlowConsumer) => self.finish_play("NetStream.Play.Stop").await,
				Some(SubscriberClosed::SourceEnded) | None => self.finish_play("NetStream.Play.Complete").await,
			};
		};

		self.play_abs_timestamp = self.play_abs_timestamp.wrapping_add(frame.dts_delta_ms);

		let msg_type_id = match frame.kind {
			FrameKind::Audio => crate::messages::MessageTypeID::Audio,
			FrameKind::Video => crate::messages::MessageTypeID::Video,
		};
		let cs_id = match frame.kind {
			FrameKind::Audio => crate::chunk::DefinedChunkStreamID::Audio as u32,
			FrameKind::Video => crate::chunk::DefinedChunkStreamID::Video as u32,
		};

		let mut writer = BytesWriter::default();
		self.chunk_encoder.write_chunk(
			&mut writer,
			crate::chunk::Chunk::new(cs_id, self.play_abs_timestamp, msg_type_id, self.stream_id, frame.payload),
		)?;
		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	async fn finish_play(&mut self, code: &str) -> Result<(), SessionError> {
		self.is_playing = false;
		self.subscriber_channel = None;

		let mut writer = BytesWriter::default();
		NetStreamWriter::write_on_status(&self.chunk_encoder, &mut writer, 0.0, "status", code, "")?;
		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	async fn parse_chunks(&mut self) -> Result<(), SessionError> {
		while let Some(chunk) = self.chunk_decoder.read_chunk()? {
			let timestamp = chunk.message_header.timestamp;
			let msg_stream_id = chunk.message_header.msg_stream_id;

			if let Some(msg) = MessageParser::parse(chunk)? {
				self.process_messages(msg, msg_stream_id, timestamp).await?;
			}
		}

		Ok(())
	}

	async fn process_messages(&mut self, rtmp_msg: RtmpMessageData, stream_id: u32, timestamp: u32) -> Result<(), SessionError> {
		match rtmp_msg {
			RtmpMessageData::Amf0Command {
				command_name,
				transaction_id,
				command_object,
				others,
			} => {
				self.on_amf0_command_message(stream_id, command_name, transaction_id, command_object, others)
					.await?
			}
			RtmpMessageData::SetChunkSize { chunk_size } => {
				self.on_set_chunk_size(chunk_size as usize)?;
			}
			RtmpMessageData::WindowAckSize { size } => {
				self.in_bandwidth = size;
			}
			RtmpMessageData::SetPeerBandwidth { size, limit_type } => {
				tracing::trace!(size, limit_type, "peer advertised bandwidth");
			}
			RtmpMessageData::Acknowledgement { sequence_number } => {
				self.acked_write = sequence_number;
				tracing::trace!(sequence_number, "peer acknowledged bytes written");
			}
			RtmpMessageData::AudioData { data } => {
				self.on_audio(stream_id, timestamp, data).await?;
			}
			RtmpMessageData::VideoData { data } => {
				self.on_video(stream_id, timestamp, data).await?;
			}
			RtmpMessageData::AmfData { data } => {
				self.on_metadata(stream_id, data).await?;
			}
		}

		Ok(())
	}

	/// Send `Acknowledgement` once we've read past the negotiated window.
	async fn maybe_send_ack(&mut self) -> Result<(), SessionError> {
		if self.in_bandwidth == 0 {
			return Ok(());
		}

		if self.read_seq.saturating_sub(self.last_ack_sent) >= self.in_bandwidth as u64 {
			let mut writer = BytesWriter::default();
			ProtocolControlMessagesWriter::write_acknowledgement(&self.chunk_encoder, &mut writer, self.read_seq as u32)?;
			self.write_data(writer.dispose()).await?;
			self.last_ack_sent = self.read_seq;
		}

		Ok(())
	}

	async fn send_initial_control_messages(&mut self) -> Result<(), SessionError> {
		let mut writer = BytesWriter::default();
		ProtocolControlMessagesWriter::write_set_chunk_size(&self.chunk_encoder, &mut writer, self.config.chunk_size)?;
		self.chunk_encoder.set_chunk_size(self.config.chunk_size as usize);
		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	async fn on_audio(&mut self, stream_id: u32, timestamp: u32, data: Bytes) -> Result<(), SessionError> {
		if stream_id != self.stream_id || !self.is_publishing {
			return Err(SessionError::UnknownStreamID(stream_id));
		}

		let Some(sink) = self.publish_sink.as_mut() else {
			return Err(SessionError::PublisherDropped);
		};

		sink.on_audio(timestamp, data).await.map_err(SessionError::Sink)
	}

	async fn on_video(&mut self, stream_id: u32, timestamp: u32, data: Bytes) -> Result<(), SessionError> {
		if stream_id != self.stream_id || !self.is_publishing {
			return Err(SessionError::UnknownStreamID(stream_id));
		}

		let Some(sink) = self.publish_sink.as_mut() else {
			return Err(SessionError::PublisherDropped);
		};

		sink.on_video(timestamp, data).await.map_err(SessionError::Sink)
	}

	async fn on_metadata(&mut self, stream_id: u32, data: Bytes) -> Result<(), SessionError> {
		if stream_id != self.stream_id || !self.is_publishing {
			return Err(SessionError::UnknownStreamID(stream_id));
		}

		let Some(sink) = self.publish_sink.as_mut() else {
			return Err(SessionError::PublisherDropped);
		};

		let mut amf_reader = amf0::Amf0Reader::new(data);
		let value = amf_reader.read_all().map_err(|e| SessionError::Message(e.into()))?;
		let object = value.into_iter().next().unwrap_or(Amf0Value::Null);

		sink.on_metadata(object).await.map_err(SessionError::Sink)
	}

	async fn on_amf0_command_message(
		&mut self,
		stream_id: u32,
		command_name: Amf0Value,
		transaction_id: Amf0Value,
		command_object: Amf0Value,
		others: Vec<Amf0Value>,
	) -> Result<(), SessionError> {
		let cmd = RtmpCommand::from(match command_name {
			Amf0Value::String(ref s) => s.as_str(),
			_ => "",
		});

		let transaction_id = match transaction_id {
			Amf0Value::Number(number) => number,
			_ => 0.0,
		};

		let obj = match command_object {
			Amf0Value::Object(obj) => obj,
			_ => HashMap::new(),
		};

		match cmd {
			RtmpCommand::Connect => self.on_command_connect(transaction_id, obj).await?,
			RtmpCommand::CreateStream => self.on_command_create_stream(transaction_id).await?,
			RtmpCommand::DeleteStream => self.on_command_delete_stream(transaction_id, others).await?,
			RtmpCommand::Publish => self.on_command_publish(transaction_id, stream_id, others).await?,
			RtmpCommand::Play => self.on_command_play(transaction_id, stream_id, others).await?,
			RtmpCommand::CloseStream => self.on_command_delete_stream(transaction_id, others).await?,
			RtmpCommand::ReleaseStream => self.on_command_release_stream(transaction_id, others).await?,
			RtmpCommand::FCPublish | RtmpCommand::FCUnpublish | RtmpCommand::GetStreamLength => {
				self.on_command_generic_ack(transaction_id).await?;
			}
			RtmpCommand::Unknown(name) => {
				tracing::debug!(command = %name, "ignoring unrecognized command");
			}
		}

		Ok(())
	}

	fn on_set_chunk_size(&mut self, chunk_size: usize) -> Result<(), SessionError> {
		if chunk_size as u32 > self.config.max_chunk_size {
			return Err(SessionError::InvalidChunkSize(chunk_size));
		}

		if self.chunk_decoder.update_max_chunk_size(chunk_size) {
			Ok(())
		} else {
			Err(SessionError::InvalidChunkSize(chunk_size))
		}
	}

	async fn on_command_connect(&mut self, transaction_id: f64, command_obj: HashMap<String, Amf0Value>) -> Result<(), SessionError> {
		let mut writer = BytesWriter::default();

		ProtocolControlMessagesWriter::write_window_acknowledgement_size(&self.chunk_encoder, &mut writer, self.config.window_ack_size)?;

		ProtocolControlMessagesWriter::write_set_peer_bandwidth(
			&self.chunk_encoder,
			&mut writer,
			self.config.window_ack_size,
			2, // dynamic
		)?;

		EventMessagesWriter::write_stream_begin(&self.chunk_encoder, &mut writer, 0)?;

		let app_name = match command_obj.get("app") {
			Some(Amf0Value::String(app)) => app,
			_ => return Err(SessionError::NoAppName),
		};

		self.app_name = Some(app_name.to_owned());

		let object_encoding = match command_obj.get("objectEncoding") {
			Some(Amf0Value::Number(n)) => *n,
			_ => 0.0,
		};

		// Every mainstream encoder/decoder in the wild (OBS, ffmpeg,
		// nginx-rtmp, SRS) only ever speaks AMF0 for commands regardless of
		// what it advertises here, so we always answer in AMF0 — we just
		// echo the numeric value back for clients that branch on it.
		NetConnection::write_connect_response(
			&self.chunk_encoder,
			&mut writer,
			transaction_id,
			"FMS/3,0,1,123",
			31.0,
			"NetConnection.Connect.Success",
			"status",
			"Connection Succeeded.",
			object_encoding,
		)?;

		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	async fn on_command_create_stream(&mut self, transaction_id: f64) -> Result<(), SessionError> {
		let new_stream_id = NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed);

		let mut writer = BytesWriter::default();
		NetConnection::write_create_stream_response(&self.chunk_encoder, &mut writer, transaction_id, new_stream_id as f64)?;
		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	async fn on_command_delete_stream(&mut self, transaction_id: f64, others: Vec<Amf0Value>) -> Result<(), SessionError> {
		let mut writer = BytesWriter::default();

		let stream_id = match others.first() {
			Some(Amf0Value::Number(stream_id)) => *stream_id,
			_ => 0.0,
		} as u32;

		if self.stream_id == stream_id {
			if self.is_publishing {
				if let Some(mut sink) = self.publish_sink.take() {
					sink.on_close("deleteStream").await;
				}
				self.is_publishing = false;
				self.published_name = None;
			}

			if self.is_playing {
				self.is_playing = false;
				self.subscriber_channel = None;
			}
		}

		NetStreamWriter::write_on_status(
			&self.chunk_encoder,
			&mut writer,
			transaction_id,
			"status",
			"NetStream.DeleteStream.Suceess",
			"",
		)?;

		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	/// Asks the host to unpublish the named stream. Unlike `publish`/`play`,
	/// the host does not have to be reachable for us to answer at all: a
	/// missing name or a channel failure both just produce `_error`, and the
	/// connection stays open (§7 `Rejected` handling).
	async fn on_command_release_stream(&mut self, transaction_id: f64, others: Vec<Amf0Value>) -> Result<(), SessionError> {
		let stream_name = match others.first() {
			Some(Amf0Value::String(name)) => name.clone(),
			_ => {
				let mut writer = BytesWriter::default();
				NetConnection::write_release_stream_error(
					&self.chunk_encoder,
					&mut writer,
					transaction_id,
					"NetConnection.Call.Failed",
					"missing stream name",
				)?;
				self.write_data(writer.dispose()).await?;
				return Ok(());
			}
		};

		let Some(app_name) = self.app_name.clone() else {
			let mut writer = BytesWriter::default();
			NetConnection::write_release_stream_error(
				&self.chunk_encoder,
				&mut writer,
				transaction_id,
				"NetConnection.Call.Failed",
				"not connected",
			)?;
			self.write_data(writer.dispose()).await?;
			return Ok(());
		};

		let (response, waiter) = oneshot::channel();

		if self
			.release_request_producer
			.send(ReleaseRequest {
				app_name,
				stream_name: stream_name.clone(),
				response,
			})
			.await
			.is_err()
		{
			return Err(SessionError::ReleaseStreamDenied);
		}

		let released = waiter.await.map_err(|_| SessionError::ReleaseStreamDenied)?;

		let mut writer = BytesWriter::default();
		if released {
			NetConnection::write_release_stream_result(&self.chunk_encoder, &mut writer, transaction_id)?;
		} else {
			NetConnection::write_release_stream_error(
				&self.chunk_encoder,
				&mut writer,
				transaction_id,
				"NetConnection.Call.Failed",
				"stream not published",
			)?;
		}
		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	/// `FCPublish`/`FCUnpublish`/`getStreamLength` aren't acted on; a few
	/// legacy encoders stall waiting for a response before continuing, so we
	/// answer them the same shape as a `releaseStream` success.
	async fn on_command_generic_ack(&mut self, transaction_id: f64) -> Result<(), SessionError> {
		let mut writer = BytesWriter::default();
		NetConnection::write_release_stream_result(&self.chunk_encoder, &mut writer, transaction_id)?;
		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	async fn on_command_publish(&mut self, transaction_id: f64, stream_id: u32, others: Vec<Amf0Value>) -> Result<(), SessionError> {
		if self.is_publishing {
			return Err(SessionError::AlreadyPublishing);
		}

		let stream_name = match others.first() {
			Some(Amf0Value::String(val)) => val.clone(),
			_ => return Err(SessionError::NoStreamName),
		};

		let Some(app_name) = self.app_name.clone() else {
			return Err(SessionError::NoAppName);
		};

		let (response, waiter) = oneshot::channel();

		if self
			.publish_request_producer
			.send(PublishRequest {
				app_name: app_name.clone(),
				stream_name: stream_name.clone(),
				response,
			})
			.await
			.is_err()
		{
			return Err(SessionError::PublishRequestDenied);
		}

		let handle = waiter.await.map_err(|_| SessionError::PublishRequestDenied)?;

		let Some(handle) = handle else {
			let mut writer = BytesWriter::default();
			NetStreamWriter::write_on_status(
				&self.chunk_encoder,
				&mut writer,
				transaction_id,
				"error",
				"NetStream.Publish.BadName",
				"stream name already in use",
			)?;
			self.write_data(writer.dispose()).await?;
			return Err(SessionError::BadName(stream_name));
		};

		self.uid = Some(handle.uid);
		self.publish_sink = Some(handle.sink);
		self.is_publishing = true;
		self.stream_id = stream_id;
		self.published_name = Some(stream_name.clone());

		let args = Amf0Value::Object(HashMap::new());
		let stream_path = format!("{}/{}", app_name, stream_name);
		if let Some(sink) = self.publish_sink.as_mut() {
			sink.on_publish(&stream_path, &args).await.map_err(SessionError::Sink)?;
		}

		let mut writer = BytesWriter::default();
		EventMessagesWriter::write_stream_begin(&self.chunk_encoder, &mut writer, stream_id)?;

		NetStreamWriter::write_on_status(
			&self.chunk_encoder,
			&mut writer,
			transaction_id,
			"status",
			"NetStream.Publish.Start",
			"",
		)?;

		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	async fn on_command_play(&mut self, transaction_id: f64, stream_id: u32, others: Vec<Amf0Value>) -> Result<(), SessionError> {
		let stream_name = match others.first() {
			Some(Amf0Value::String(val)) => val.clone(),
			_ => return Err(SessionError::NoStreamName),
		};

		let Some(app_name) = self.app_name.clone() else {
			return Err(SessionError::NoAppName);
		};

		let (response, waiter) = oneshot::channel();

		if self
			.play_request_producer
			.send(PlayRequest {
				app_name,
				stream_name,
				response,
			})
			.await
			.is_err()
		{
			return Err(SessionError::PlayRequestDenied);
		}

		let source = waiter.await.map_err(|_| SessionError::PlayRequestDenied)?;

		let Some(mut source) = source else {
			let mut writer = BytesWriter::default();
			NetStreamWriter::write_on_status(
				&self.chunk_encoder,
				&mut writer,
				transaction_id,
				"error",
				"NetStream.Play.StreamNotFound",
				"stream not found",
			)?;
			self.write_data(writer.dispose()).await?;
			return Ok(());
		};

		self.stream_id = stream_id;
		self.is_playing = true;
		self.play_abs_timestamp = 0;

		let mut writer = BytesWriter::default();

		EventMessagesWriter::write_stream_is_recorded(&self.chunk_encoder, &mut writer, stream_id)?;
		EventMessagesWriter::write_stream_begin(&self.chunk_encoder, &mut writer, stream_id)?;

		NetStreamWriter::write_on_status(&self.chunk_encoder, &mut writer, transaction_id, "status", "NetStream.Play.Reset", "")?;
		NetStreamWriter::write_on_status(&self.chunk_encoder, &mut writer, transaction_id, "status", "NetStream.Play.Start", "")?;

		if let Some(config) = source.video_config().await {
			self.chunk_encoder.write_chunk(
				&mut writer,
				crate::chunk::Chunk::new(
					crate::chunk::DefinedChunkStreamID::Video as u32,
					0,
					crate::messages::MessageTypeID::Video,
					stream_id,
					config,
				),
			)?;
		}

		if let Some(config) = source.audio_config().await {
			self.chunk_encoder.write_chunk(
				&mut writer,
				crate::chunk::Chunk::new(
					crate::chunk::DefinedChunkStreamID::Audio as u32,
					0,
					crate::messages::MessageTypeID::Audio,
					stream_id,
					config,
				),
			)?;
		}

		self.write_data(writer.dispose()).await?;

		let channel = SubscriberChannel::new(self.config.subscriber_channel_depth, self.config.slow_subscriber_policy);
		tokio::spawn(subscriber::pump(source, channel.clone()));
		self.subscriber_channel = Some(channel);

		Ok(())
	}

	async fn write_data(&mut self, data: Bytes) -> Result<(), SessionError> {
		if !data.is_empty() {
			self.write_seq += data.len() as u64;
			self.io.write_timeout(data, Duration::from_secs(2)).await?;
		}

		Ok(())
	}
}

impl<S: AsyncReadWrite> Drop for Session<S> {
	fn drop(&mut self) {
		if let Some(channel) = &self.subscriber_channel {
			channel.cancel();
		}
	}
}
