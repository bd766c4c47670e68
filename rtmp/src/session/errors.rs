use std::fmt;

use amf0::Amf0WriteError;
use bytesio::bytesio_errors::BytesIOError;

use crate::channels::UniqueID;
use crate::chunk::{ChunkDecodeError, ChunkEncodeError};
use crate::handshake::HandshakeError;
use crate::macros::from_error;
use crate::messages::MessageError;
use crate::netconnection::NetConnectionError;
use crate::netstream::NetStreamError;
use crate::protocol_control_messages::ProtocolControlMessageError;
use crate::user_control_messages::EventMessagesError;

#[derive(Debug)]
pub enum SessionError {
	BytesIO(BytesIOError),
	Handshake(HandshakeError),
	Message(MessageError),
	Amf0Write(Amf0WriteError),
	ChunkDecode(ChunkDecodeError),
	ChunkEncode(ChunkEncodeError),
	ProtocolControlMessage(ProtocolControlMessageError),
	NetStream(NetStreamError),
	NetConnection(NetConnectionError),
	EventMessages(EventMessagesError),
	UnknownStreamID(u32),
	PublisherDisconnected(UniqueID),
	NoAppName,
	NoStreamName,
	PublishRequestDenied,
	ConnectRequestDenied,
	PlayRequestDenied,
	PublisherDropped,
	InvalidChunkSize(usize),
	/// A publish was rejected by the host because the name is already taken.
	BadName(String),
	/// The peer tried to `publish` twice on the same session without an
	/// intervening `deleteStream`/`closeStream`.
	AlreadyPublishing,
	/// A `releaseStream` referenced a name this session has no authority over.
	ReleaseStreamDenied,
	/// A `MediaSink` call returned an application-level failure.
	Sink(String),
	/// A `MediaSource` call returned an application-level failure.
	Source(String),
}

from_error!(SessionError, Self::BytesIO, BytesIOError);
from_error!(SessionError, Self::Handshake, HandshakeError);
from_error!(SessionError, Self::Message, MessageError);
from_error!(SessionError, Self::Amf0Write, Amf0WriteError);
from_error!(SessionError, Self::ChunkDecode, ChunkDecodeError);
from_error!(SessionError, Self::ChunkEncode, ChunkEncodeError);
from_error!(SessionError, Self::ProtocolControlMessage, ProtocolControlMessageError);
from_error!(SessionError, Self::NetStream, NetStreamError);
from_error!(SessionError, Self::NetConnection, NetConnectionError);
from_error!(SessionError, Self::EventMessages, EventMessagesError);

impl fmt::Display for SessionError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::BytesIO(error) => write!(f, "bytesio error: {}", error),
			Self::Handshake(error) => write!(f, "handshake error: {}", error),
			Self::Message(error) => write!(f, "message error: {}", error),
			Self::Amf0Write(error) => write!(f, "amf0 write error: {}", error),
			Self::ChunkDecode(error) => write!(f, "chunk decode error: {}", error),
			Self::ChunkEncode(error) => write!(f, "chunk encode error: {}", error),
			Self::ProtocolControlMessage(error) => {
				write!(f, "protocol control message error: {}", error)
			}
			Self::NetStream(error) => write!(f, "netstream error: {}", error),
			Self::NetConnection(error) => write!(f, "netconnection error: {}", error),
			Self::EventMessages(error) => write!(f, "event messages error: {}", error),
			Self::UnknownStreamID(id) => write!(f, "unknown stream id: {}", id),
			Self::PublisherDisconnected(name) => write!(f, "publisher disconnected: {}", name),
			Self::NoAppName => write!(f, "no app name"),
			Self::NoStreamName => write!(f, "no stream name"),
			Self::PublishRequestDenied => write!(f, "publish request denied"),
			Self::ConnectRequestDenied => write!(f, "connect request denied"),
			Self::PlayRequestDenied => write!(f, "play request denied"),
			Self::PublisherDropped => write!(f, "publisher dropped"),
			Self::InvalidChunkSize(size) => write!(f, "invalid chunk size: {}", size),
			Self::BadName(name) => write!(f, "bad name: {}", name),
			Self::AlreadyPublishing => write!(f, "already publishing"),
			Self::ReleaseStreamDenied => write!(f, "release stream denied"),
			Self::Sink(msg) => write!(f, "media sink error: {}", msg),
			Self::Source(msg) => write!(f, "media source error: {}", msg),
		}
	}
}
