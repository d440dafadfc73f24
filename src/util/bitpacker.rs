// Copyright 2019 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Operations that allow packing bits from primitives into a bitvec.
//! Slower, but easier to follow and modify than a lot of bit twiddling.
//! Bits are stored most-significant-bit first, matching the big-endian
//! digit packing used throughout the share codec.

use bitvec::prelude::{BitVec, Msb0};

use crate::error::{Error, ErrorKind};

/// Simple struct that wraps a bitvec and defines packing/unpacking operations on it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitPacker {
	bv: BitVec<u8, Msb0>,
}

impl BitPacker {
	/// Create a new, empty bitpacker
	pub fn new() -> Self {
		BitPacker { bv: BitVec::new() }
	}

	/// Append num_bits of zero padding to the internal bitvec
	pub fn append_padding(&mut self, num_bits: u8) {
		for _ in 0..num_bits {
			self.bv.push(false);
		}
	}

	/// Append each element of a u8 slice (8 bits each) to the bitvec
	pub fn append_vec_u8(&mut self, data: &[u8]) -> Result<(), Error> {
		for &byte in data {
			self.append_u8(byte, 8)?;
		}
		Ok(())
	}

	/// Append the low num_bits bits of a u32 to the bitvec. num_bits must be <= 32
	pub fn append_u32(&mut self, val: u32, num_bits: u8) -> Result<(), Error> {
		if num_bits > 32 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 32".to_string(),
			))?;
		}
		self.append_bits(u64::from(val), num_bits);
		Ok(())
	}

	/// Append the low num_bits bits of a u16 to the bitvec. num_bits must be <= 16
	pub fn append_u16(&mut self, val: u16, num_bits: u8) -> Result<(), Error> {
		if num_bits > 16 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 16".to_string(),
			))?;
		}
		self.append_bits(u64::from(val), num_bits);
		Ok(())
	}

	/// Append the low num_bits bits of a u8 to the bitvec. num_bits must be <= 8
	pub fn append_u8(&mut self, val: u8, num_bits: u8) -> Result<(), Error> {
		if num_bits > 8 {
			return Err(ErrorKind::BitVec(
				"number of bits to pack must be <= 8".to_string(),
			))?;
		}
		self.append_bits(u64::from(val), num_bits);
		Ok(())
	}

	fn append_bits(&mut self, val: u64, num_bits: u8) {
		for i in (0..num_bits).rev() {
			self.bv.push((val >> i) & 1 == 1);
		}
	}

	/// Return length of internal bit vector
	pub fn len(&self) -> usize {
		self.bv.len()
	}

	/// True if the bitpacker holds no bits
	pub fn is_empty(&self) -> bool {
		self.bv.is_empty()
	}

	fn read_bits(&self, pos: usize, num_bits: usize) -> Result<u64, Error> {
		if pos + num_bits > self.bv.len() {
			return Err(ErrorKind::BitVec(format!(
				"Attempt to read {} bits at position {}, but bitvec length is {}",
				num_bits,
				pos,
				self.bv.len(),
			)))?;
		}
		let mut val: u64 = 0;
		for bit in self.bv[pos..pos + num_bits].iter() {
			val = (val << 1) | (*bit as u64);
		}
		Ok(val)
	}

	/// Read num_bits bits starting at pos as a u8. num_bits must be <= 8
	pub fn get_u8(&self, pos: usize, num_bits: usize) -> Result<u8, Error> {
		if num_bits > 8 {
			return Err(ErrorKind::BitVec(
				"number of bits to read must be <= 8".to_string(),
			))?;
		}
		Ok(self.read_bits(pos, num_bits)? as u8)
	}

	/// Read num_bits bits starting at pos as a u16. num_bits must be <= 16
	pub fn get_u16(&self, pos: usize, num_bits: usize) -> Result<u16, Error> {
		if num_bits > 16 {
			return Err(ErrorKind::BitVec(
				"number of bits to read must be <= 16".to_string(),
			))?;
		}
		Ok(self.read_bits(pos, num_bits)? as u16)
	}

	/// Read num_bits bits starting at pos as a u32. num_bits must be <= 32
	pub fn get_u32(&self, pos: usize, num_bits: usize) -> Result<u32, Error> {
		if num_bits > 32 {
			return Err(ErrorKind::BitVec(
				"number of bits to read must be <= 32".to_string(),
			))?;
		}
		Ok(self.read_bits(pos, num_bits)? as u32)
	}

	/// Read num_bytes bytes starting at bit position pos
	pub fn get_vec_u8(&self, pos: usize, num_bytes: usize) -> Result<Vec<u8>, Error> {
		let mut retval = Vec::with_capacity(num_bytes);
		for i in 0..num_bytes {
			retval.push(self.get_u8(pos + i * 8, 8)?);
		}
		Ok(retval)
	}

	/// Truncate the bitvec to the half-open range [start, end)
	pub fn split_out(&mut self, start: usize, end: usize) {
		self.bv = self.bv[start..end].to_bitvec();
	}

	/// Remove num_bits leading bits, which must all be unset. Used to strip the
	/// zero-padding inserted between the share metadata and the share value.
	pub fn remove_padding(&mut self, num_bits: usize) -> Result<(), Error> {
		if self.bv[..num_bits].any() {
			return Err(ErrorKind::Padding)?;
		}
		self.bv = self.bv[num_bits..].to_bitvec();
		Ok(())
	}

	/// Pad the bitvec at the end with zero bits until its length is a
	/// multiple of chunk_bits.
	pub fn normalize(&mut self, chunk_bits: usize) {
		let rem = self.bv.len() % chunk_bits;
		if rem != 0 {
			self.append_padding((chunk_bits - rem) as u8);
		}
	}
}
