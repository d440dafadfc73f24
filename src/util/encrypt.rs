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

//! Master secret encryption: a four-round Feistel cipher keyed by
//! PBKDF2-HMAC-SHA256, binding the master secret to a passphrase and
//! to the identifier/extendable/iteration-exponent share parameters.

use crate::error::Error;
use zeroize::Zeroizing;

#[cfg(feature = "ring_pbkdf2")]
use ring::{digest, pbkdf2};
#[cfg(feature = "ring_pbkdf2")]
use std::num::NonZeroU32;

#[cfg(feature = "rust_crypto_pbkdf2")]
use hmac::Hmac;
#[cfg(feature = "rust_crypto_pbkdf2")]
use pbkdf2::pbkdf2;
#[cfg(feature = "rust_crypto_pbkdf2")]
use sha2::Sha256;

/// Customization string used in the Feistel salt for non-extendable shares.
const CUSTOMIZATION_STRING: &[u8] = b"shamir";

/// Config Struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterSecretEncConfig {
	/// The base number of iterations to use in PBKDF2 (at iteration_exponent 0)
	pub base_iteration_count: u32,
	/// The number of rounds to use in the Feistel cipher
	pub round_count: u8,
	/// The customization string used in the PBKDF2 salt for non-extendable shares
	pub customization_string: Vec<u8>,
}

impl Default for MasterSecretEncConfig {
	fn default() -> Self {
		MasterSecretEncConfig {
			base_iteration_count: 10000,
			round_count: 4,
			customization_string: CUSTOMIZATION_STRING.to_vec(),
		}
	}
}

impl MasterSecretEncConfig {
	/// Just use defaults for now
	pub fn new() -> Self {
		MasterSecretEncConfig {
			..Default::default()
		}
	}
}

/// Struct, so that config values are held
pub struct MasterSecretEnc {
	pub config: MasterSecretEncConfig,
}

impl Default for MasterSecretEnc {
	fn default() -> Self {
		MasterSecretEnc {
			config: MasterSecretEncConfig::new(),
		}
	}
}

impl MasterSecretEnc {
	/// Create a new encoder with all defaults
	pub fn new() -> Result<MasterSecretEnc, Error> {
		Ok(MasterSecretEnc {
			config: MasterSecretEncConfig::new(),
		})
	}

	/// Encrypt a master secret into its EMS ciphertext of the same length.
	/// `extendable` removes the identifier from the PBKDF2 salt, allowing
	/// shares from unrelated generations to decrypt under the same
	/// passphrase.
	pub fn encrypt(
		&self,
		master_secret: &[u8],
		passphrase: &str,
		iteration_exponent: u8,
		identifier: u16,
		extendable: bool,
	) -> Vec<u8> {
		let mut l = Zeroizing::new(master_secret[..master_secret.len() / 2].to_vec());
		let mut r = Zeroizing::new(master_secret[master_secret.len() / 2..].to_vec());
		let salt = self.get_salt(identifier, extendable);
		for i in 0..self.config.round_count {
			let f = self.round_function(i, passphrase, iteration_exponent, &salt, &r);
			let new_r = Zeroizing::new(self.xor(&l, &f));
			l = r;
			r = new_r;
		}
		let mut out = r.to_vec();
		out.append(&mut l.to_vec());
		out
	}

	/// Inverse of `encrypt`, given matching parameters.
	pub fn decrypt(
		&self,
		enc_master_secret: &[u8],
		passphrase: &str,
		iteration_exponent: u8,
		identifier: u16,
		extendable: bool,
	) -> Vec<u8> {
		let mut l = Zeroizing::new(enc_master_secret[..enc_master_secret.len() / 2].to_vec());
		let mut r = Zeroizing::new(enc_master_secret[enc_master_secret.len() / 2..].to_vec());
		let salt = self.get_salt(identifier, extendable);
		for i in (0..self.config.round_count).rev() {
			let f = self.round_function(i, passphrase, iteration_exponent, &salt, &r);
			let new_r = Zeroizing::new(self.xor(&l, &f));
			l = r;
			r = new_r;
		}
		let mut out = r.to_vec();
		out.append(&mut l.to_vec());
		out
	}

	fn get_salt(&self, identifier: u16, extendable: bool) -> Vec<u8> {
		if extendable {
			return vec![];
		}
		let mut retval = self.config.customization_string.clone();
		retval.extend_from_slice(&identifier.to_be_bytes());
		retval
	}

	/// the round function used internally by the Feistel cipher:
	/// PBKDF2-HMAC-SHA256(key = byte(i) || passphrase, salt = salt || R,
	/// iterations = (base_iteration_count << e) / round_count, dkLen = |R|)
	fn round_function(&self, i: u8, passphrase: &str, e: u8, salt: &[u8], r: &[u8]) -> Vec<u8> {
		let iterations =
			(u64::from(self.config.base_iteration_count) << e) / u64::from(self.config.round_count);
		let out_length = r.len();
		let mut full_salt = salt.to_owned();
		full_salt.extend_from_slice(r);
		let mut password = vec![i];
		password.extend_from_slice(passphrase.as_bytes());
		self.pbkdf2_derive(iterations as u32, &full_salt, &password, out_length)
	}

	#[cfg(feature = "rust_crypto_pbkdf2")]
	fn pbkdf2_derive(
		&self,
		iterations: u32,
		salt: &[u8],
		password: &[u8],
		out_length: usize,
	) -> Vec<u8> {
		let mut out = vec![0; out_length];
		let _ = pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut out);
		out
	}

	// Ring implementation of round function
	#[cfg(feature = "ring_pbkdf2")]
	fn pbkdf2_derive(
		&self,
		iterations: u32,
		salt: &[u8],
		password: &[u8],
		out_length: usize,
	) -> Vec<u8> {
		let mut out = vec![0; out_length];
		pbkdf2::derive(
			&digest::SHA256,
			NonZeroU32::new(iterations).expect("iteration count must be nonzero"),
			salt,
			password,
			&mut out,
		);
		out
	}

	// xor values in both arrays, up to length of b
	fn xor(&self, a: &[u8], b: &[u8]) -> Vec<u8> {
		let mut retval = vec![0; b.len()];
		for i in 0..b.len() {
			retval[i] = a[i] ^ b[i];
		}
		retval
	}
}
