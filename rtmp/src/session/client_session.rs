use std::collections::HashMap;
use std::time::Duration;

use amf0::{Amf0Value, Amf0Writer};
use bytes::Bytes;
use bytesio::bytes_writer::BytesWriter;
use bytesio::bytesio::{AsyncReadWrite, BytesIO};

use super::errors::SessionError;
use crate::chunk::{Chunk, ChunkDecoder, ChunkEncoder, DefinedChunkStreamID};
use crate::config::RtmpConfig;
use crate::handshake::ClientHandshake;
use crate::media::{FrameKind, MediaSink, MediaSource};
use crate::messages::{MessageParser, MessageTypeID, RtmpMessageData};
use crate::protocol_control_messages::ProtocolControlMessagesWriter;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Client-role driver: connect, createStream, then publish or play. The
/// server never needs a client to perform anything beyond the commands it
/// itself recognizes (§4.3), so this mirrors `Session`'s message dispatch in
/// reverse — it sends commands and interprets `_result`/`onStatus` replies
/// instead of answering them.
pub struct ClientSession<S: AsyncReadWrite> {
	io: BytesIO<S>,
	chunk_decoder: ChunkDecoder,
	chunk_encoder: ChunkEncoder,
	config: RtmpConfig,
	stream_id: u32,
	next_transaction_id: f64,
	/// Running absolute timestamp accumulated from each frame's
	/// `dts_delta_ms` (§6), reset to zero at the start of `publish`.
	publish_abs_timestamp: u32,
}

impl<S: AsyncReadWrite> ClientSession<S> {
	pub fn new(stream: S, config: RtmpConfig) -> Self {
		Self {
			io: BytesIO::new(stream),
			chunk_decoder: ChunkDecoder::with_max_message_length(config.max_message_length as usize),
			chunk_encoder: ChunkEncoder::default(),
			config,
			stream_id: 0,
			next_transaction_id: 1.0,
			publish_abs_timestamp: 0,
		}
	}

	pub async fn handshake(&mut self) -> Result<(), SessionError> {
		let mut handshaker = ClientHandshake::default();
		let mut writer = BytesWriter::default();
		handshaker.handshake(&mut writer)?;
		self.write_data(writer.dispose()).await?;

		loop {
			let data = self.io.read_timeout(READ_TIMEOUT).await?;
			handshaker.extend_data(&data[..]);

			let mut writer = BytesWriter::default();
			handshaker.handshake(&mut writer)?;
			self.write_data(writer.dispose()).await?;

			if handshaker.state() == crate::handshake::ClientHandshakeState::Finish {
				let over_read = handshaker.extract_remaining_bytes();
				if !over_read.is_empty() {
					self.chunk_decoder.extend_data(&over_read[..]);
				}
				break;
			}
		}

		Ok(())
	}

	pub async fn connect(&mut self, app: &str, tc_url: &str) -> Result<(), SessionError> {
		let txid = self.next_txid();
		let mut amf0_writer = BytesWriter::default();

		Amf0Writer::write_string(&mut amf0_writer, "connect")?;
		Amf0Writer::write_number(&mut amf0_writer, txid)?;
		Amf0Writer::write_object(
			&mut amf0_writer,
			&HashMap::from([
				("app".to_string(), Amf0Value::String(app.to_string())),
				("type".to_string(), Amf0Value::String("nonprivate".to_string())),
				("flashVer".to_string(), Amf0Value::String("FMLE/3.0".to_string())),
				("tcUrl".to_string(), Amf0Value::String(tc_url.to_string())),
				("objectEncoding".to_string(), Amf0Value::Number(0.0)),
			]),
		)?;

		self.write_command(amf0_writer).await?;
		self.await_result(txid).await?;

		Ok(())
	}

	pub async fn create_stream(&mut self) -> Result<u32, SessionError> {
		let txid = self.next_txid();
		let mut amf0_writer = BytesWriter::default();

		Amf0Writer::write_string(&mut amf0_writer, "createStream")?;
		Amf0Writer::write_number(&mut amf0_writer, txid)?;
		Amf0Writer::write_null(&mut amf0_writer)?;

		self.write_command(amf0_writer).await?;
		let (_, others) = self.await_result(txid).await?;

		let stream_id = match others.first() {
			Some(Amf0Value::Number(n)) => *n as u32,
			_ => return Err(SessionError::UnknownStreamID(0)),
		};

		self.stream_id = stream_id;
		Ok(stream_id)
	}

	/// Asks the peer to unpublish `stream_name`, so this session can then
	/// `publish` the same name itself (§4.4.7/S5). Not every server honors
	/// `releaseStream` from an arbitrary peer; a rejection surfaces as
	/// `ReleaseStreamDenied` rather than tearing down the connection.
	pub async fn release_stream(&mut self, stream_name: &str) -> Result<(), SessionError> {
		let txid = self.next_txid();
		let mut amf0_writer = BytesWriter::default();

		Amf0Writer::write_string(&mut amf0_writer, "releaseStream")?;
		Amf0Writer::write_number(&mut amf0_writer, txid)?;
		Amf0Writer::write_null(&mut amf0_writer)?;
		Amf0Writer::write_string(&mut amf0_writer, stream_name)?;

		self.write_command(amf0_writer).await?;

		match self.await_result(txid).await {
			Ok(_) => Ok(()),
			Err(SessionError::ConnectRequestDenied) => Err(SessionError::ReleaseStreamDenied),
			Err(e) => Err(e),
		}
	}

	/// Publish `stream_name` under the app given to `connect`, pulling
	/// frames from `source` until it signals end-of-stream.
	pub async fn publish(&mut self, stream_name: &str, source: &mut (dyn MediaSource + Send)) -> Result<(), SessionError> {
		let txid = self.next_txid();
		let mut amf0_writer = BytesWriter::default();

		Amf0Writer::write_string(&mut amf0_writer, "publish")?;
		Amf0Writer::write_number(&mut amf0_writer, txid)?;
		Amf0Writer::write_null(&mut amf0_writer)?;
		Amf0Writer::write_string(&mut amf0_writer, stream_name)?;
		Amf0Writer::write_string(&mut amf0_writer, "live")?;

		self.write_command(amf0_writer).await?;
		self.await_status(txid, SessionError::PublishRequestDenied).await?;

		self.publish_abs_timestamp = 0;

		if let Some(config) = source.video_config().await {
			self.write_frame(FrameKind::Video, 0, config).await?;
		}
		if let Some(config) = source.audio_config().await {
			self.write_frame(FrameKind::Audio, 0, config).await?;
		}

		while let Some(frame) = source.next_frame().await.map_err(SessionError::Source)? {
			self.publish_abs_timestamp = self.publish_abs_timestamp.wrapping_add(frame.dts_delta_ms);
			self.write_frame(frame.kind, self.publish_abs_timestamp, frame.payload).await?;
		}

		Ok(())
	}

	/// Play `stream_name`, forwarding every audio/video/metadata message into
	/// `sink` until the peer signals the stream ended or the connection
	/// closes.
	pub async fn play(&mut self, stream_name: &str, sink: &mut (dyn MediaSink + Send)) -> Result<(), SessionError> {
		let txid = self.next_txid();
		let mut amf0_writer = BytesWriter::default();

		Amf0Writer::write_string(&mut amf0_writer, "play")?;
		Amf0Writer::write_number(&mut amf0_writer, txid)?;
		Amf0Writer::write_null(&mut amf0_writer)?;
		Amf0Writer::write_string(&mut amf0_writer, stream_name)?;

		self.write_command(amf0_writer).await?;

		let stream_path = stream_name.to_string();
		sink.on_publish(&stream_path, &Amf0Value::Null).await.map_err(SessionError::Sink)?;

		loop {
			let data = self.io.read_timeout(READ_TIMEOUT).await?;
			self.chunk_decoder.extend_data(&data[..]);

			while let Some(chunk) = self.chunk_decoder.read_chunk()? {
				let timestamp = chunk.message_header.timestamp;

				match MessageParser::parse(chunk)? {
					Some(RtmpMessageData::AudioData { data }) => {
						sink.on_audio(timestamp, data).await.map_err(SessionError::Sink)?;
					}
					Some(RtmpMessageData::VideoData { data }) => {
						sink.on_video(timestamp, data).await.map_err(SessionError::Sink)?;
					}
					Some(RtmpMessageData::AmfData { data }) => {
						let mut amf_reader = amf0::Amf0Reader::new(data);
						if let Ok(values) = amf_reader.read_all() {
							if let Some(value) = values.into_iter().next() {
								sink.on_metadata(value).await.map_err(SessionError::Sink)?;
							}
						}
					}
					Some(RtmpMessageData::Amf0Command {
						command_name, command_object, ..
					}) => {
						if matches!(&command_name, Amf0Value::String(s) if s == "onStatus") {
							if let Amf0Value::Object(obj) = command_object {
								if matches!(obj.get("level"), Some(Amf0Value::String(l)) if l == "error") {
									return Err(SessionError::PlayRequestDenied);
								}
								if matches!(obj.get("code"), Some(Amf0Value::String(c)) if c == "NetStream.Play.Complete") {
									return Ok(());
								}
							}
						}
					}
					_ => {}
				}
			}
		}
	}

	async fn write_frame(&mut self, kind: FrameKind, timestamp: u32, payload: Bytes) -> Result<(), SessionError> {
		let (cs_id, msg_type_id) = match kind {
			FrameKind::Audio => (DefinedChunkStreamID::Audio as u32, MessageTypeID::Audio),
			FrameKind::Video => (DefinedChunkStreamID::Video as u32, MessageTypeID::Video),
		};

		let mut writer = BytesWriter::default();
		self.chunk_encoder
			.write_chunk(&mut writer, Chunk::new(cs_id, timestamp, msg_type_id, self.stream_id, payload))?;
		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	async fn write_command(&mut self, amf0_writer: BytesWriter) -> Result<(), SessionError> {
		let mut writer = BytesWriter::default();
		self.chunk_encoder.write_chunk(
			&mut writer,
			Chunk::new(
				DefinedChunkStreamID::Command as u32,
				0,
				MessageTypeID::CommandAMF0,
				self.stream_id,
				amf0_writer.dispose(),
			),
		)?;
		self.write_data(writer.dispose()).await?;

		Ok(())
	}

	/// Reads messages until a `_result`/`_error`/`onStatus` command carrying
	/// the given transaction id arrives, returning its command object and
	/// trailing positional arguments.
	async fn await_result(&mut self, txid: f64) -> Result<(Amf0Value, Vec<Amf0Value>), SessionError> {
		loop {
			let data = self.io.read_timeout(READ_TIMEOUT).await?;
			self.chunk_decoder.extend_data(&data[..]);

			while let Some(chunk) = self.chunk_decoder.read_chunk()? {
				if let Some(msg) = MessageParser::parse(chunk)? {
					match msg {
						RtmpMessageData::Amf0Command {
							command_name,
							transaction_id,
							command_object,
							others,
						} => {
							let received_txid = match transaction_id {
								Amf0Value::Number(n) => n,
								_ => 0.0,
							};

							if received_txid == txid {
								if matches!(&command_name, Amf0Value::String(s) if s == "_error") {
									return Err(SessionError::ConnectRequestDenied);
								}
								return Ok((command_object, others));
							}
						}
						RtmpMessageData::SetChunkSize { chunk_size } => {
							self.chunk_decoder.update_max_chunk_size(chunk_size as usize);
						}
						_ => {}
					}
				}
			}
		}
	}

	/// Like `await_result`, but also rejects an `onStatus` reply whose
	/// `level` is `"error"` (the shape `publish`/`play` rejections take,
	/// as opposed to `connect`/`createStream`'s `_error` command name).
	async fn await_status(&mut self, txid: f64, denied: SessionError) -> Result<(), SessionError> {
		let (command_object, _) = self.await_result(txid).await?;

		if let Amf0Value::Object(obj) = command_object {
			if matches!(obj.get("level"), Some(Amf0Value::String(level)) if level == "error") {
				return Err(denied);
			}
		}

		Ok(())
	}

	fn next_txid(&mut self) -> f64 {
		let id = self.next_transaction_id;
		self.next_transaction_id += 1.0;
		id
	}

	async fn write_data(&mut self, data: Bytes) -> Result<(), SessionError> {
		if !data.is_empty() {
			self.io.write_timeout(data, Duration::from_secs(2)).await?;
		}

		Ok(())
	}
}
