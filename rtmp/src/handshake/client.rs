use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Bytes, BytesMut};
use bytesio::bytes_reader::BytesReader;
use bytesio::bytes_writer::BytesWriter;
use rand::Rng;

use super::define::{ClientHandshakeState, RtmpVersion, RTMP_HANDSHAKE_SIZE};
use super::errors::HandshakeError;

/// Client-side driver for the RTMP simple handshake (RTMP Spec 1.0 - 5.2):
/// write C0/C1, read S0/S1/S2, echo C2. The digest/complex handshake is a
/// server-only concern here; no deployed RTMP server requires a client to
/// perform it, since the server always accepts a plain 1536-byte C2.
pub struct ClientHandshake {
	reader: BytesReader,
	state: ClientHandshakeState,
	s1_bytes: Bytes,
}

impl Default for ClientHandshake {
	fn default() -> Self {
		Self {
			reader: BytesReader::new(BytesMut::default()),
			state: ClientHandshakeState::WriteC0C1,
			s1_bytes: Bytes::new(),
		}
	}
}

impl ClientHandshake {
	pub fn extend_data(&mut self, data: &[u8]) {
		self.reader.extend_from_slice(data);
	}

	pub fn state(&self) -> ClientHandshakeState {
		self.state
	}

	pub fn extract_remaining_bytes(&mut self) -> BytesMut {
		self.reader.extract_remaining_bytes()
	}

	/// Drives the handshake as far as the currently buffered data allows.
	/// Call repeatedly as more bytes arrive until `state()` is `Finish`.
	pub fn handshake(&mut self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		loop {
			match self.state {
				ClientHandshakeState::WriteC0C1 => {
					self.write_c0(writer)?;
					self.write_c1(writer)?;
					self.state = ClientHandshakeState::ReadS0S1S2;
					break;
				}
				ClientHandshakeState::ReadS0S1S2 => {
					if !self.try_read_s0_s1_s2()? {
						break;
					}
					self.state = ClientHandshakeState::WriteC2;
				}
				ClientHandshakeState::WriteC2 => {
					self.write_c2(writer)?;
					self.state = ClientHandshakeState::Finish;
					break;
				}
				ClientHandshakeState::Finish => break,
			}
		}

		Ok(())
	}

	fn write_c0(&self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		writer.write_u8(RtmpVersion::Version3 as u8)?;

		Ok(())
	}

	fn write_c1(&self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		writer.write_u32::<BigEndian>(0)?;
		writer.write_u32::<BigEndian>(0)?;

		let mut rng = rand::thread_rng();
		for _ in 0..1528 {
			writer.write_u8(rng.gen())?;
		}

		Ok(())
	}

	/// Returns `Ok(true)` once S0+S1+S2 have all been consumed, `Ok(false)`
	/// if more data is needed.
	fn try_read_s0_s1_s2(&mut self) -> Result<bool, HandshakeError> {
		let needed = 1 + RTMP_HANDSHAKE_SIZE + RTMP_HANDSHAKE_SIZE;
		if self.reader.len() < needed {
			return Ok(false);
		}

		// S0: version byte, ignored beyond requiring a read.
		self.reader.read_bytes(1)?;

		// S1: time(4) + zero(4) + random(1528), echoed verbatim in C2.
		self.s1_bytes = self.reader.read_bytes(RTMP_HANDSHAKE_SIZE)?.freeze();

		// S2: echo of our C1; we don't validate its content.
		self.reader.read_bytes(RTMP_HANDSHAKE_SIZE)?;

		Ok(true)
	}

	fn write_c2(&self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		writer.write_all(&self.s1_bytes[..])?;

		Ok(())
	}
}
