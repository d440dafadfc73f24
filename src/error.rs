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

//! Error types for the thresh39 crate

use failure::{Backtrace, Context, Fail};
use std::env;
use std::fmt::{self, Display};

/// Error definition
#[derive(Debug, Fail)]
pub struct Error {
	inner: Context<ErrorKind>,
}

/// All ways a split/combine call can fail.
#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	/// Configuration error, with details
	#[fail(display = "Configuration Error: {}", _0)]
	Config(String),

	/// threshold/count out of range; 1-of-N with N>1; MS length odd or < 16;
	/// non-ASCII passphrase; iteration_exponent outside 0..15
	#[fail(display = "Argument Error: {}", _0)]
	Argument(String),

	/// unknown word; length < 20; padding bits > 8; value integer overflows
	/// declared byte length; group_count < group_threshold
	#[fail(display = "Mnemonic Error: {}", _0)]
	Mnemonic(String),

	/// HMAC digest check failed after interpolation: detects tampered or
	/// mismatched shares
	#[fail(display = "Digest Error: {}", _0)]
	Digest(String),

	/// Invalid usage of BitPacker.add_uX (num_bits longer than the size of uX)
	#[fail(display = "BitVec Error: {}", _0)]
	BitVec(String),

	/// RS1024 verification failed
	#[fail(display = "Checksum Validation Error: {}", _0)]
	Checksum(String),

	/// shares disagree on common parameters, or on group parameters within a group
	#[fail(display = "Inconsistent Shares Error: {}", _0)]
	InconsistentShares(String),

	/// fewer than group_threshold complete groups; a group short of its member_threshold
	#[fail(display = "Insufficient Shares Error: {}", _0)]
	InsufficientShares(String),

	/// division by zero during interpolation (implies duplicate x coordinates)
	#[fail(display = "Arithmetic Error: {}", _0)]
	Arithmetic(String),

	/// reserved for the external I/O layer; the core never raises this itself
	#[fail(display = "I/O Input Error: {}", _0)]
	IoInput(String),

	/// Invalid usage of BitPacker.remove_padding (num_bits contained set bits)
	#[fail(display = "Padding Error: All padding bits must be 0")]
	Padding,
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let show_bt = match env::var("RUST_BACKTRACE") {
			Ok(r) => r == "1",
			Err(_) => false,
		};
		let backtrace = match self.backtrace() {
			Some(b) => format!("{}", b),
			None => String::from("Unknown"),
		};
		let inner_output = format!("{}", self.inner,);
		let backtrace_output = format!("\n Backtrace: {}", backtrace);
		let mut output = inner_output;
		if show_bt {
			output.push_str(&backtrace_output);
		}
		Display::fmt(&output, f)
	}
}

impl Error {
	/// get kind
	pub fn kind(&self) -> ErrorKind {
		self.inner.get_context().clone()
	}
	/// get cause string
	pub fn cause_string(&self) -> String {
		match self.cause() {
			Some(k) => format!("{}", k),
			None => "Unknown".to_string(),
		}
	}
	/// get cause
	pub fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}
	/// get backtrace
	pub fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}
