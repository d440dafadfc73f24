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

//! `thresh39`: threshold secret sharing for long-lived cryptographic
//! material.
//!
//! Two interoperable families are implemented:
//!
//! - **Classic polynomial sharing** ([`classic`]) over a large prime field:
//!   a single-level threshold split with an optional KDF pre-step.
//! - **Two-tier mnemonic sharing** ([`shamir`], SLIP-39 compatible): a
//!   master secret is Feistel-encrypted under a passphrase, split into
//!   group secrets, and each group secret split again into member shares,
//!   encoded as checksum-protected sequences of words from the canonical
//!   [`wordlist`].
//!
//! The crate is a pure computational core: no file I/O, no CLI, no
//! network access. Callers own persistence and transport; this crate only
//! ever consumes and produces byte strings, integers and word lists.

#[macro_use]
extern crate lazy_static;

pub mod classic;
pub mod error;
pub mod field;
pub mod shamir;
pub mod util;
pub mod wordlist;

pub use crate::classic::{combine_prime, derive_secret, split_prime, KdfOutput, KdfSpec};
pub use crate::error::{Error, ErrorKind};
pub use crate::shamir::{combine_mnemonics, generate_mnemonics, generate_mnemonics_random, GroupShare, Share};
pub use crate::util::encrypt::MasterSecretEnc;
pub use crate::wordlist::{index_to_word, word_to_index};

/// Encrypt a master secret into its EMS ciphertext, per §4.D: a four-round
/// Feistel cipher keyed by PBKDF2-HMAC-SHA256 over the passphrase and the
/// identifier/extendable/iteration-exponent share parameters.
pub fn encrypt_ms(
	ms: &[u8],
	passphrase: &str,
	identifier: u16,
	extendable: bool,
	iteration_exponent: u8,
) -> Result<Vec<u8>, Error> {
	let enc = MasterSecretEnc::new()?;
	Ok(enc.encrypt(ms, passphrase, iteration_exponent, identifier, extendable))
}

/// Inverse of [`encrypt_ms`], given matching parameters.
pub fn decrypt_ms(
	ems: &[u8],
	passphrase: &str,
	identifier: u16,
	extendable: bool,
	iteration_exponent: u8,
) -> Result<Vec<u8>, Error> {
	let enc = MasterSecretEnc::new()?;
	Ok(enc.decrypt(ems, passphrase, iteration_exponent, identifier, extendable))
}
