use byteorder::{BigEndian, WriteBytesExt};
use bytes::Bytes;
use bytesio::bytes_writer::BytesWriter;

use super::errors::ProtocolControlMessageError;
use crate::chunk::{Chunk, ChunkEncoder};
use crate::messages::MessageTypeID;

pub struct ProtocolControlMessagesWriter;

impl ProtocolControlMessagesWriter {
	pub fn write_set_chunk_size(
		encoder: &ChunkEncoder,
		writer: &mut BytesWriter,
		chunk_size: u32, // 31 bits
	) -> Result<(), ProtocolControlMessageError> {
		// According to spec the first bit must be 0.
		let chunk_size = chunk_size & 0x7FFFFFFF;

		encoder.write_chunk(
			writer,
			Chunk::new(
				2, // chunk stream must be 2
				0, // timestamps are ignored
				MessageTypeID::SetChunkSize,
				0, // message stream id is ignored
				Bytes::from(chunk_size.to_be_bytes().to_vec()),
			),
		)?;

		Ok(())
	}

	pub fn write_window_acknowledgement_size(
		encoder: &ChunkEncoder,
		writer: &mut BytesWriter,
		window_size: u32,
	) -> Result<(), ProtocolControlMessageError> {
		encoder.write_chunk(
			writer,
			Chunk::new(
				2,
				0,
				MessageTypeID::WindowAcknowledgementSize,
				0,
				Bytes::from(window_size.to_be_bytes().to_vec()),
			),
		)?;

		Ok(())
	}

	pub fn write_set_peer_bandwidth(
		encoder: &ChunkEncoder,
		writer: &mut BytesWriter,
		window_size: u32,
		limit_type: u8,
	) -> Result<(), ProtocolControlMessageError> {
		let mut data = Vec::new();
		data.write_u32::<BigEndian>(window_size).expect("write to vec cannot fail");
		data.write_u8(limit_type).expect("write to vec cannot fail");

		encoder.write_chunk(writer, Chunk::new(2, 0, MessageTypeID::SetPeerBandwidth, 0, Bytes::from(data)))?;

		Ok(())
	}

	pub fn write_acknowledgement(
		encoder: &ChunkEncoder,
		writer: &mut BytesWriter,
		sequence_number: u32,
	) -> Result<(), ProtocolControlMessageError> {
		encoder.write_chunk(
			writer,
			Chunk::new(
				2,
				0,
				MessageTypeID::Acknowledgement,
				0,
				Bytes::from(sequence_number.to_be_bytes().to_vec()),
			),
		)?;

		Ok(())
	}
}
