use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;

use super::errors::ProtocolControlMessageError;

pub struct ProtocolControlMessageReader;

impl ProtocolControlMessageReader {
	pub fn read_set_chunk_size(data: Bytes) -> Result<u32, ProtocolControlMessageError> {
		let mut cursor = Cursor::new(data);
		let chunk_size = cursor.read_u32::<BigEndian>()?;

		Ok(chunk_size)
	}

	pub fn read_window_acknowledgement_size(data: Bytes) -> Result<u32, ProtocolControlMessageError> {
		let mut cursor = Cursor::new(data);
		let size = cursor.read_u32::<BigEndian>()?;

		Ok(size)
	}

	/// Returns `(window_size, limit_type)`. `limit_type` is 0 (hard), 1
	/// (soft) or 2 (dynamic); see §4.4.6.
	pub fn read_set_peer_bandwidth(data: Bytes) -> Result<(u32, u8), ProtocolControlMessageError> {
		let mut cursor = Cursor::new(data);
		let size = cursor.read_u32::<BigEndian>()?;
		let limit_type = cursor.read_u8()?;

		Ok((size, limit_type))
	}

	pub fn read_acknowledgement(data: Bytes) -> Result<u32, ProtocolControlMessageError> {
		let mut cursor = Cursor::new(data);
		let sequence_number = cursor.read_u32::<BigEndian>()?;

		Ok(sequence_number)
	}
}
