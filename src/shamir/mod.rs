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

//! The two-tier, SLIP-39 compatible mnemonic secret sharing scheme: a
//! share splitter/recoverer operating over GF(256), wrapped in the
//! group/member mnemonic encoding defined by `sssmc39_scheme`.

pub mod share;
pub mod splitter;
pub mod sssmc39_scheme;

pub use self::share::Share;
pub use self::splitter::{Splitter, SplitterConfig};
pub use self::sssmc39_scheme::{
	combine_mnemonics, generate_mnemonics, generate_mnemonics_random, GroupShare,
};
