use std::io::Write;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::{Bytes, BytesMut};
use bytesio::bytes_reader::BytesReader;
use bytesio::bytes_writer::BytesWriter;
use rand::Rng;

use super::define::{RtmpVersion, SchemaVersion, ServerHandshakeState};
use super::digest::DigestProcessor;
use super::errors::HandshakeError;
use super::{define, utils};

/// Simple Handshake Server - RTMP Spec 1.0 - 5.2
pub struct SimpleHandshakeServer {
	version: RtmpVersion,
	requested_version: RtmpVersion,

	reader: BytesReader,

	state: ServerHandshakeState,

	c1_bytes: Bytes,
	c1_timestamp: u32,
}

impl Default for SimpleHandshakeServer {
	fn default() -> Self {
		Self {
			reader: BytesReader::new(BytesMut::default()),
			state: ServerHandshakeState::ReadC0C1,
			c1_bytes: Bytes::new(),
			c1_timestamp: 0,
			version: RtmpVersion::Unknown,
			requested_version: RtmpVersion::Unknown,
		}
	}
}

/// Complex Handshake Server. There isn't a great canonical spec for this;
/// https://blog.csdn.net/win_lin/article/details/13006803 is the best
/// writeup available.
pub struct ComplexHandshakeServer {
	version: RtmpVersion,
	requested_version: RtmpVersion,

	reader: BytesReader,

	state: ServerHandshakeState,
	schema_version: SchemaVersion,

	c1_digest: Bytes,
	c1_timestamp: u32,
	c1_version: u32,
}

impl Default for ComplexHandshakeServer {
	fn default() -> Self {
		Self {
			reader: BytesReader::new(BytesMut::default()),
			state: ServerHandshakeState::ReadC0C1,
			c1_digest: Bytes::default(),
			c1_timestamp: 0,
			version: RtmpVersion::Unknown,
			requested_version: RtmpVersion::Unknown,
			c1_version: 0,
			schema_version: SchemaVersion::Schema0,
		}
	}
}

impl SimpleHandshakeServer {
	pub fn extend_data(&mut self, data: &[u8]) {
		self.reader.extend_from_slice(data);
	}

	pub fn handshake(&mut self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		loop {
			match self.state {
				ServerHandshakeState::ReadC0C1 => {
					self.read_c0()?;
					self.read_c1()?;
					self.state = ServerHandshakeState::WriteS0S1S2;
				}
				ServerHandshakeState::WriteS0S1S2 => {
					self.write_s0(writer)?;
					self.write_s1(writer)?;
					self.write_s2(writer)?;
					self.state = ServerHandshakeState::ReadC2;
					break;
				}
				ServerHandshakeState::ReadC2 => {
					self.read_c2()?;
					self.state = ServerHandshakeState::Finish;
				}
				ServerHandshakeState::Finish => {
					break;
				}
			}
		}

		Ok(())
	}

	fn read_c0(&mut self) -> Result<(), HandshakeError> {
		// In C0 this identifies the RTMP version requested by the client; we
		// only support version 3 and always answer with it regardless.
		let requested_version = self.reader.read_u8()?;
		self.requested_version = match requested_version {
			3 => RtmpVersion::Version3,
			_ => RtmpVersion::Unknown,
		};
		self.version = RtmpVersion::Version3;

		Ok(())
	}

	fn read_c1(&mut self) -> Result<(), HandshakeError> {
		// Time (4 bytes), may be 0 or arbitrary.
		self.c1_timestamp = self.reader.read_u32::<BigEndian>()?;
		// Zero (4 bytes), MUST be all 0s; we don't enforce that.
		self.reader.read_u32::<BigEndian>()?;
		// Random data (1528 bytes), echoed back verbatim in S2.
		self.c1_bytes = self.reader.read_bytes(1528)?.freeze();

		Ok(())
	}

	fn read_c2(&mut self) -> Result<(), HandshakeError> {
		// A compliant server MUST NOT validate C2 content; many clients send
		// something other than a strict echo of S1. Read and discard.
		self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE)?;

		Ok(())
	}

	fn write_s0(&self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		writer.write_u8(self.version as u8)?;

		Ok(())
	}

	fn write_s1(&self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		writer.write_u32::<BigEndian>(utils::current_time())?;
		writer.write_u32::<BigEndian>(0)?;

		let mut rng = rand::thread_rng();
		for _ in 0..1528 {
			writer.write_u8(rng.gen())?;
		}

		Ok(())
	}

	fn write_s2(&self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		// Time field of S2 carries C1's timestamp back to the client.
		writer.write_u32::<BigEndian>(self.c1_timestamp)?;
		// Time2 is when we read C1/S1 - approximated as "now".
		writer.write_u32::<BigEndian>(utils::current_time())?;
		writer.write_all(&self.c1_bytes[..])?;

		Ok(())
	}
}

impl ComplexHandshakeServer {
	pub fn extend_data(&mut self, data: &[u8]) {
		self.reader.extend_from_slice(data);
	}

	pub fn handshake(&mut self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		loop {
			match self.state {
				ServerHandshakeState::ReadC0C1 => {
					self.read_c0()?;
					self.read_c1()?;
					self.state = ServerHandshakeState::WriteS0S1S2;
				}
				ServerHandshakeState::WriteS0S1S2 => {
					self.write_s0(writer)?;
					self.write_s1(writer)?;
					self.write_s2(writer)?;
					self.state = ServerHandshakeState::ReadC2;
					break;
				}
				ServerHandshakeState::ReadC2 => {
					self.read_c2()?;
					self.state = ServerHandshakeState::Finish;
				}
				ServerHandshakeState::Finish => {
					break;
				}
			}
		}

		Ok(())
	}

	fn read_c0(&mut self) -> Result<(), HandshakeError> {
		let requested_version = self.reader.read_u8()?;
		self.requested_version = match requested_version {
			3 => RtmpVersion::Version3,
			_ => RtmpVersion::Unknown,
		};
		self.version = RtmpVersion::Version3;

		Ok(())
	}

	fn read_c1(&mut self) -> Result<(), HandshakeError> {
		let c1_bytes = self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE)?.freeze();

		self.c1_timestamp = (&c1_bytes[0..4]).read_u32::<BigEndian>()?;
		self.c1_version = (&c1_bytes[4..8]).read_u32::<BigEndian>()?;

		let data_digest = DigestProcessor::new(c1_bytes, Bytes::from_static(define::RTMP_CLIENT_KEY_FIRST_HALF.as_bytes()));

		let (c1_digest_data, schema_version) = data_digest.read_digest()?;

		self.c1_digest = c1_digest_data;
		self.schema_version = schema_version;

		Ok(())
	}

	fn read_c2(&mut self) -> Result<(), HandshakeError> {
		self.reader.read_bytes(define::RTMP_HANDSHAKE_SIZE)?;

		Ok(())
	}

	fn write_s0(&self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		writer.write_u8(self.version as u8)?;

		Ok(())
	}

	fn write_s1(&self, main_writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		let mut writer = BytesWriter::default();
		writer.write_u32::<BigEndian>(utils::current_time())?;
		writer.write_u32::<BigEndian>(define::RTMP_SERVER_VERSION)?;

		let mut rng = rand::thread_rng();
		for _ in 0..define::RTMP_HANDSHAKE_SIZE - define::TIME_VERSION_LENGTH {
			writer.write_u8(rng.gen())?;
		}

		let data_digest = DigestProcessor::new(writer.dispose(), Bytes::from_static(define::RTMP_SERVER_KEY_FIRST_HALF.as_bytes()));

		let (first, second, third) = data_digest.generate_and_fill_digest(self.schema_version)?;

		// Not flushed until the handshake completes, so this is safe to build
		// incrementally.
		main_writer.write_all(&first)?;
		main_writer.write_all(&second)?;
		main_writer.write_all(&third)?;

		Ok(())
	}

	fn write_s2(&self, main_writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		let mut writer = BytesWriter::default();

		writer.write_u32::<BigEndian>(utils::current_time())?;
		writer.write_u32::<BigEndian>(self.c1_timestamp)?;

		let mut rng = rand::thread_rng();
		for _ in 0..define::RTMP_HANDSHAKE_SIZE - define::TIME_VERSION_LENGTH {
			writer.write_u8(rng.gen())?;
		}

		// Digest of C1's digest produces the key used to sign S2's payload.
		let key_digest = DigestProcessor::new(Bytes::new(), Bytes::from_static(&define::RTMP_SERVER_KEY));

		let data = &writer.dispose()[..define::RTMP_HANDSHAKE_SIZE - define::RTMP_DIGEST_LENGTH];

		let data_digest = DigestProcessor::new(Bytes::new(), key_digest.make_digest(&self.c1_digest, &[])?);
		let digest = data_digest.make_digest(data, &[])?;

		main_writer.write_all(data)?;
		main_writer.write_all(&digest)?;

		Ok(())
	}
}

// Order of messages:
// Client -> C0 -> Server
// Client -> C1 -> Server
// Client <- S0 <- Server
// Client <- S1 <- Server
// Client <- S2 <- Server
// Client -> C2 -> Server
pub struct HandshakeServer {
	simple_handshaker: SimpleHandshakeServer,
	complex_handshaker: ComplexHandshakeServer,
	is_complex: bool,
	saved_data: BytesMut,
}

impl Default for HandshakeServer {
	fn default() -> Self {
		Self {
			simple_handshaker: SimpleHandshakeServer::default(),
			complex_handshaker: ComplexHandshakeServer::default(),
			// Attempt the complex handshake first; fall back to simple if the
			// client's C1 doesn't validate against either digest schema.
			is_complex: true,
			saved_data: BytesMut::default(),
		}
	}
}

impl HandshakeServer {
	pub fn extend_data(&mut self, data: &[u8]) {
		if self.is_complex {
			self.complex_handshaker.extend_data(data);
			// Kept around in case we need to replay into the simple handshaker.
			self.saved_data.extend_from_slice(data);
		} else {
			self.simple_handshaker.extend_data(data);
		}
	}

	pub fn state(&mut self) -> ServerHandshakeState {
		if self.is_complex {
			self.complex_handshaker.state
		} else {
			self.simple_handshaker.state
		}
	}

	pub fn extract_remaining_bytes(&mut self) -> BytesMut {
		if self.is_complex {
			self.complex_handshaker.reader.extract_remaining_bytes()
		} else {
			self.simple_handshaker.reader.extract_remaining_bytes()
		}
	}

	pub fn handshake(&mut self, writer: &mut BytesWriter) -> Result<(), HandshakeError> {
		if self.is_complex {
			let result = self.complex_handshaker.handshake(writer);
			if result.is_err() {
				self.is_complex = false;

				let data = self.saved_data.clone();
				self.extend_data(&data[..]);

				self.simple_handshaker.handshake(writer)?;
			}
		} else {
			self.simple_handshaker.handshake(writer)?;
		}

		Ok(())
	}
}
