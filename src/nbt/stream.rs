//! Sequential byte streams with big-endian helpers.
//!
//! Every typed helper is built on top of the single-byte primitives
//! (`read_byte`, `peek_byte`, `write_byte`), so a stream over any medium
//! only has to implement those.

use std::borrow::Cow;
use std::io::Write;

use byteorder::{BigEndian, ByteOrder};

use crate::{StoreError, StoreResult};

pub trait ByteRead {
	/// Reads the next byte, failing with [StoreError::OutOfRange] when no bytes remain.
	fn read_byte(&mut self) -> StoreResult<u8>;

	/// Returns the next byte without advancing.
	fn peek_byte(&mut self) -> StoreResult<u8>;

	fn read_array<const N: usize>(&mut self) -> StoreResult<[u8; N]> {
		let mut buf = [0u8; N];
		for byte in buf.iter_mut() {
			*byte = self.read_byte()?;
		}
		Ok(buf)
	}

	fn read_bytes(&mut self, count: usize) -> StoreResult<Vec<u8>> {
		// The declared count is not trusted for preallocation.
		let mut bytes = Vec::with_capacity(count.min(4096));
		for _ in 0..count {
			bytes.push(self.read_byte()?);
		}
		Ok(bytes)
	}

	fn read_i8(&mut self) -> StoreResult<i8> {
		Ok(self.read_byte()? as i8)
	}

	fn read_u16(&mut self) -> StoreResult<u16> {
		Ok(BigEndian::read_u16(&self.read_array::<2>()?))
	}

	fn read_i16(&mut self) -> StoreResult<i16> {
		Ok(BigEndian::read_i16(&self.read_array::<2>()?))
	}

	fn read_i32(&mut self) -> StoreResult<i32> {
		Ok(BigEndian::read_i32(&self.read_array::<4>()?))
	}

	fn read_i64(&mut self) -> StoreResult<i64> {
		Ok(BigEndian::read_i64(&self.read_array::<8>()?))
	}

	fn read_f32(&mut self) -> StoreResult<f32> {
		Ok(f32::from_bits(BigEndian::read_u32(&self.read_array::<4>()?)))
	}

	fn read_f64(&mut self) -> StoreResult<f64> {
		Ok(f64::from_bits(BigEndian::read_u64(&self.read_array::<8>()?)))
	}

	/// Reads a `u16` length-prefixed string in Java's modified UTF-8.
	fn read_string(&mut self) -> StoreResult<String> {
		let length = self.read_u16()? as usize;
		let bytes = self.read_bytes(length)?;
		cesu8::from_java_cesu8(&bytes)
			.map(Cow::into_owned)
			.map_err(|_| StoreError::FormatError(format!("String of {length} bytes is not valid modified UTF-8.")))
	}
}

pub trait ByteWrite {
	fn write_byte(&mut self, byte: u8) -> StoreResult<()>;

	fn write_bytes(&mut self, bytes: &[u8]) -> StoreResult<()> {
		bytes.iter().try_for_each(|&byte| self.write_byte(byte))
	}

	fn write_i8(&mut self, value: i8) -> StoreResult<()> {
		self.write_byte(value as u8)
	}

	fn write_u16(&mut self, value: u16) -> StoreResult<()> {
		let mut buf = [0u8; 2];
		BigEndian::write_u16(&mut buf, value);
		self.write_bytes(&buf)
	}

	fn write_i16(&mut self, value: i16) -> StoreResult<()> {
		let mut buf = [0u8; 2];
		BigEndian::write_i16(&mut buf, value);
		self.write_bytes(&buf)
	}

	fn write_i32(&mut self, value: i32) -> StoreResult<()> {
		let mut buf = [0u8; 4];
		BigEndian::write_i32(&mut buf, value);
		self.write_bytes(&buf)
	}

	fn write_i64(&mut self, value: i64) -> StoreResult<()> {
		let mut buf = [0u8; 8];
		BigEndian::write_i64(&mut buf, value);
		self.write_bytes(&buf)
	}

	fn write_f32(&mut self, value: f32) -> StoreResult<()> {
		let mut buf = [0u8; 4];
		BigEndian::write_u32(&mut buf, value.to_bits());
		self.write_bytes(&buf)
	}

	fn write_f64(&mut self, value: f64) -> StoreResult<()> {
		let mut buf = [0u8; 8];
		BigEndian::write_u64(&mut buf, value.to_bits());
		self.write_bytes(&buf)
	}

	/// The length prefix counts encoded bytes, not chars.
	fn write_string(&mut self, value: &str) -> StoreResult<()> {
		let encoded = cesu8::to_java_cesu8(value);
		let length: u16 = encoded.len().try_into()
			.map_err(|_| StoreError::FormatError(format!("String of {} bytes does not fit a u16 length.", encoded.len())))?;
		self.write_u16(length)?;
		self.write_bytes(&encoded)
	}
}

/// An in-memory byte buffer with a single read/write position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
	buffer: Vec<u8>,
	position: usize,
	eof: bool,
}

impl ByteCursor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_vec(buffer: Vec<u8>) -> Self {
		Self {
			buffer,
			position: 0,
			eof: false,
		}
	}

	pub fn position(&self) -> usize {
		self.position
	}

	/// Moves the cursor. Positions past the end are clamped to the end.
	pub fn set_position(&mut self, position: usize) {
		self.position = position.min(self.buffer.len());
		self.eof = false;
	}

	/// Returns true after a read ran past the end of the buffer.
	pub fn is_eof(&self) -> bool {
		self.eof
	}

	pub fn remaining(&self) -> usize {
		self.buffer.len() - self.position
	}

	pub fn len(&self) -> usize {
		self.buffer.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buffer.is_empty()
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.buffer
	}

	pub fn into_inner(self) -> Vec<u8> {
		self.buffer
	}

	/// Discards the buffer and rewinds.
	pub fn clear(&mut self) {
		self.buffer.clear();
		self.position = 0;
		self.eof = false;
	}
}

impl From<Vec<u8>> for ByteCursor {
	fn from(value: Vec<u8>) -> Self {
		Self::from_vec(value)
	}
}

impl ByteRead for ByteCursor {
	fn read_byte(&mut self) -> StoreResult<u8> {
		let byte = self.peek_byte()?;
		self.position += 1;
		Ok(byte)
	}

	fn peek_byte(&mut self) -> StoreResult<u8> {
		match self.buffer.get(self.position) {
			Some(&byte) => Ok(byte),
			None => {
				self.eof = true;
				Err(StoreError::OutOfRange(format!("No bytes remain at position {}.", self.position)))
			}
		}
	}
}

impl ByteWrite for ByteCursor {
	fn write_byte(&mut self, byte: u8) -> StoreResult<()> {
		if self.position < self.buffer.len() {
			self.buffer[self.position] = byte;
		} else {
			self.buffer.push(byte);
		}
		self.position += 1;
		Ok(())
	}
}

/// Adapts any [Write] (a file, a compressor) into a [ByteWrite].
pub struct WriteStream<W: Write> {
	writer: W,
	written: usize,
}

impl<W: Write> WriteStream<W> {
	pub fn new(writer: W) -> Self {
		Self {
			writer,
			written: 0,
		}
	}

	/// The number of bytes written so far.
	pub fn written(&self) -> usize {
		self.written
	}

	pub fn get_mut(&mut self) -> &mut W {
		&mut self.writer
	}

	pub fn finish(self) -> W {
		self.writer
	}
}

impl<W: Write> ByteWrite for WriteStream<W> {
	fn write_byte(&mut self, byte: u8) -> StoreResult<()> {
		self.write_bytes(&[byte])
	}

	fn write_bytes(&mut self, bytes: &[u8]) -> StoreResult<()> {
		self.writer.write_all(bytes)?;
		self.written += bytes.len();
		Ok(())
	}
}
