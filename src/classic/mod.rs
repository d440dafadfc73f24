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

//! The classic, single-level Shamir's Secret Sharing path: a polynomial
//! split/combine over a large prime field, with an optional key-derivation
//! pre-step for turning arbitrary input bytes into a field element.

use crate::error::{Error, ErrorKind};
use crate::util;

use num_bigint::{BigInt, BigUint, RandBigInt, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::{thread_rng, RngCore};
use sha2::{Digest, Sha256};

#[cfg(feature = "ring_pbkdf2")]
use ring::{digest, pbkdf2 as ring_pbkdf2};
#[cfg(feature = "ring_pbkdf2")]
use std::num::NonZeroU32;

#[cfg(feature = "rust_crypto_pbkdf2")]
use hmac::Hmac;
#[cfg(feature = "rust_crypto_pbkdf2")]
use pbkdf2::pbkdf2;

/// The modulus used when the caller doesn't supply their own: the Mersenne
/// prime 2^2203 - 1.
pub fn default_prime() -> BigUint {
	(BigUint::one() << 2203u32) - BigUint::one()
}

/// A key-derivation pre-step, applied to caller-supplied bytes before they
/// are encoded as the integer secret handed to `split_prime`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdfSpec {
	/// A single deterministic SHA-256 digest of the input.
	Sha256,
	/// PBKDF2-HMAC-SHA256 with the given iteration count and a fresh,
	/// randomly generated 16-byte salt.
	Pbkdf2 { iterations: u32 },
}

/// Output of a KDF pre-step: the derived integer, plus the salt that must
/// be recorded by the caller (the file layer) to repeat the derivation.
/// `None` for the deterministic `Sha256` spec.
pub struct KdfOutput {
	/// The derived secret, reduced to an integer
	pub secret: BigUint,
	/// The salt used, if any (only present for `Pbkdf2`)
	pub salt: Option<[u8; 16]>,
}

/// Apply a KDF pre-step to `input`, producing an integer strictly less
/// than `prime`.
pub fn derive_secret(input: &[u8], spec: &KdfSpec, prime: &BigUint) -> Result<KdfOutput, Error> {
	let (bytes, salt) = match spec {
		KdfSpec::Sha256 => {
			let mut hasher = Sha256::new();
			hasher.update(input);
			(hasher.finalize().to_vec(), None)
		}
		KdfSpec::Pbkdf2 { iterations } => {
			let mut salt = [0u8; 16];
			thread_rng().fill_bytes(&mut salt);
			let out_len = ((prime.bits() + 7) / 8) as usize;
			let derived = pbkdf2_derive(*iterations, &salt, input, out_len);
			(derived, Some(salt))
		}
	};

	let secret = BigUint::from_bytes_be(&bytes);
	if &secret >= prime {
		return Err(ErrorKind::Argument(
			"KDF output does not fit below the supplied prime".to_string(),
		))?;
	}

	Ok(KdfOutput { secret, salt })
}

#[cfg(feature = "rust_crypto_pbkdf2")]
fn pbkdf2_derive(iterations: u32, salt: &[u8], password: &[u8], out_length: usize) -> Vec<u8> {
	let mut out = vec![0; out_length];
	let _ = pbkdf2::<Hmac<sha2::Sha256>>(password, salt, iterations, &mut out);
	out
}

#[cfg(feature = "ring_pbkdf2")]
fn pbkdf2_derive(iterations: u32, salt: &[u8], password: &[u8], out_length: usize) -> Vec<u8> {
	let mut out = vec![0; out_length];
	ring_pbkdf2::derive(
		&digest::SHA256,
		NonZeroU32::new(iterations).expect("iteration count must be nonzero"),
		salt,
		password,
		&mut out,
	);
	out
}

/// Split `secret` into `n` shares, `k` of which are required to reconstruct
/// it, as points on a degree-(k-1) polynomial over the field Z/pZ.
pub fn split_prime(
	secret: &BigUint,
	k: u8,
	n: u8,
	prime: &BigUint,
) -> Result<Vec<(u8, BigUint)>, Error> {
	if k == 0 || k > n {
		return Err(ErrorKind::Argument(format!(
			"Threshold must be between 1 and the share count ({})",
			n
		)))?;
	}
	if n == 0 {
		return Err(ErrorKind::Argument("Share count must be at least 1".to_string()))?;
	}
	if secret >= prime {
		return Err(ErrorKind::Argument(
			"Secret must be strictly less than the prime modulus".to_string(),
		))?;
	}

	let mut rng = thread_rng();
	let mut coeffs: Vec<BigUint> = vec![secret.clone()];
	for _ in 1..k {
		coeffs.push(rng.gen_biguint_below(prime));
	}

	let shares = (1..=n)
		.map(|x| {
			let y = evaluate_at(&coeffs, x, prime);
			(x, y)
		})
		.collect();

	Ok(shares)
}

/// Horner's method evaluation of a polynomial with coefficients `coeffs`
/// (lowest degree first) at `x`, modulo `prime`.
fn evaluate_at(coeffs: &[BigUint], x: u8, prime: &BigUint) -> BigUint {
	let x = BigUint::from(x);
	let mut acc = BigUint::zero();
	for c in coeffs.iter().rev() {
		acc = (acc * &x + c) % prime;
	}
	acc
}

/// Recover the secret at x = 0 from a set of `(x, y)` shares via Lagrange
/// interpolation, given the prime modulus the shares were generated under.
pub fn combine_prime(shares: &[(u8, BigUint)], prime: &BigUint) -> Result<BigUint, Error> {
	if shares.is_empty() {
		return Err(ErrorKind::Argument("Share set must not be empty.".to_string()))?;
	}

	for i in 0..shares.len() {
		for j in (i + 1)..shares.len() {
			if shares[i].0 == shares[j].0 {
				return Err(ErrorKind::Arithmetic(
					"Duplicate share index supplied to interpolation".to_string(),
				))?;
			}
		}
	}

	let mut secret = BigUint::zero();

	for (i, (xi, yi)) in shares.iter().enumerate() {
		let mut num = BigUint::one();
		let mut den = BigUint::one();
		let xi_big = BigUint::from(*xi);

		for (j, (xj, _)) in shares.iter().enumerate() {
			if i == j {
				continue;
			}
			let xj_big = BigUint::from(*xj);
			// numerator *= (0 - xj) = -xj (mod p); denominator *= (xi - xj) (mod p)
			num = (num * modsub(prime, prime, &xj_big)) % prime;
			den = (den * modsub(prime, &xi_big, &xj_big)) % prime;
		}

		let den_inv = mod_inverse(&den, prime).ok_or_else(|| {
			ErrorKind::Arithmetic("Share x-coordinates are not invertible modulo the prime".to_string())
		})?;

		let term = (yi * num % prime) * den_inv % prime;
		secret = (secret + term) % prime;
	}

	Ok(secret)
}

/// Modular inverse of `a` modulo `m` via the extended Euclidean algorithm.
/// `None` if `a` and `m` are not coprime (implies a duplicate or zero x
/// coordinate upstream).
fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
	let a_int = a.to_bigint().expect("BigUint always converts to BigInt");
	let m_int = m.to_bigint().expect("BigUint always converts to BigInt");
	let egcd = a_int.extended_gcd(&m_int);
	if egcd.gcd != BigInt::one() && egcd.gcd != -BigInt::one() {
		return None;
	}
	let mut x = egcd.x % &m_int;
	if x.is_negative() {
		x += &m_int;
	}
	x.to_biguint()
}

/// a - b (mod p), assuming 0 <= a, b < p
fn modsub(prime: &BigUint, a: &BigUint, b: &BigUint) -> BigUint {
	if a >= b {
		(a - b) % prime
	} else {
		(prime - (b - a)) % prime
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;

	#[test]
	fn split_combine_round_trip() -> Result<(), Error> {
		let prime = default_prime();
		let secret = BigUint::from_bytes_be(&util::fill_vec_rand(32));
		let shares = split_prime(&secret, 3, 5, &prime)?;
		let recovered = combine_prime(&shares[0..3], &prime)?;
		assert_eq!(secret, recovered);
		let recovered = combine_prime(&shares[1..4], &prime)?;
		assert_eq!(secret, recovered);
		Ok(())
	}

	#[test]
	fn insufficient_shares_give_wrong_answer_not_error() -> Result<(), Error> {
		// Below threshold, combine still runs (no digest layer here) but the
		// result is not the original secret.
		let prime = default_prime();
		let secret = BigUint::from(12345u32);
		let shares = split_prime(&secret, 3, 5, &prime)?;
		let recovered = combine_prime(&shares[0..2], &prime)?;
		assert_ne!(secret, recovered);
		Ok(())
	}

	#[test]
	fn rejects_bad_threshold() {
		let prime = default_prime();
		let secret = BigUint::from(1u32);
		assert!(split_prime(&secret, 0, 5, &prime).is_err());
		assert!(split_prime(&secret, 6, 5, &prime).is_err());
	}

	#[test]
	fn rejects_secret_too_large() {
		let prime = BigUint::from(101u32);
		let secret = BigUint::from(500u32);
		assert!(split_prime(&secret, 2, 3, &prime).is_err());
	}

	#[test]
	fn rejects_duplicate_x() {
		let prime = default_prime();
		let shares = vec![(1u8, BigUint::from(2u32)), (1u8, BigUint::from(3u32))];
		assert!(combine_prime(&shares, &prime).is_err());
	}

	#[test]
	fn classic_kdf_round_trip() -> Result<(), Error> {
		let prime = (BigUint::one() << 256u32) - BigUint::from(189u32);
		let a = derive_secret(b"passphrase", &KdfSpec::Sha256, &prime)?;
		let b = derive_secret(b"passphrase", &KdfSpec::Sha256, &prime)?;
		// deterministic KDF always derives the same integer
		assert_eq!(a.secret, b.secret);
		assert!(a.salt.is_none());

		let shares = split_prime(&a.secret, 3, 5, &prime)?;
		let recovered = combine_prime(&shares[1..4], &prime)?;
		assert_eq!(a.secret, recovered);

		let p1 = derive_secret(b"passphrase", &KdfSpec::Pbkdf2 { iterations: 1000 }, &prime)?;
		let p2 = derive_secret(b"passphrase", &KdfSpec::Pbkdf2 { iterations: 1000 }, &prime)?;
		// random salt each time means different derived integers
		assert_ne!(p1.secret, p2.secret);
		assert!(p1.salt.is_some());
		assert_ne!(p1.salt, p2.salt);
		Ok(())
	}

	#[test]
	fn every_k_subset_recovers_and_k_minus_one_varies() -> Result<(), Error> {
		let prime = default_prime();
		let secret = BigUint::from_bytes_be(&util::fill_vec_rand(16));
		let shares = split_prime(&secret, 4, 6, &prime)?;
		// check a handful of k-subsets
		let mut rng = rand::thread_rng();
		for _ in 0..10 {
			let mut idxs: Vec<usize> = (0..shares.len()).collect();
			// simple shuffle via repeated swaps
			for i in (1..idxs.len()).rev() {
				let j = rng.gen_range(0..=i);
				idxs.swap(i, j);
			}
			let subset: Vec<_> = idxs[0..4].iter().map(|&i| shares[i].clone()).collect();
			let recovered = combine_prime(&subset, &prime)?;
			assert_eq!(secret, recovered);
		}
		Ok(())
	}
}
