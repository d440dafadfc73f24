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

//! The canonical 1024-word list and word/index lookup helpers.
//!
//! Every word is unique and every 4-character prefix is unique, so a
//! caller may transcribe either the full word or just its first four
//! characters; lookups are case-insensitive and ignore surrounding
//! whitespace.

use std::collections::HashMap;

lazy_static! {
	/// The ordered word list. A word's position is its 10-bit digit value.
	static ref WORDLIST: Vec<String> = include_str!("wordlists/en.txt")
		.split_whitespace()
		.map(|s| s.into())
		.collect();
	/// Full word (lowercase) -> index
	static ref WORD_INDEX_MAP: HashMap<String, usize> = {
		let mut m = HashMap::new();
		for (i, w) in WORDLIST.iter().enumerate() {
			m.insert(w.clone(), i);
		}
		m
	};
	/// 4-character prefix -> index. Every prefix is unique across the list by construction.
	static ref PREFIX_INDEX_MAP: HashMap<String, usize> = {
		let mut m = HashMap::new();
		for (i, w) in WORDLIST.iter().enumerate() {
			let prefix: String = w.chars().take(4).collect();
			m.insert(prefix, i);
		}
		m
	};
}

/// Number of words in the list (the field radix, 1024).
pub fn len() -> usize {
	WORDLIST.len()
}

/// Look up a word's 10-bit index. Accepts the full word or a unique
/// 4-character prefix, case-insensitively, with surrounding whitespace
/// trimmed. Returns `None` if the word is not recognized.
pub fn word_to_index(word: &str) -> Option<usize> {
	let normalized = word.trim().to_lowercase();
	if let Some(i) = WORD_INDEX_MAP.get(&normalized) {
		return Some(*i);
	}
	if normalized.chars().count() == 4 {
		if let Some(i) = PREFIX_INDEX_MAP.get(&normalized) {
			return Some(*i);
		}
	}
	None
}

/// Look up the word at a given 10-bit index.
pub fn index_to_word(index: usize) -> Option<&'static str> {
	WORDLIST.get(index).map(|s| s.as_str())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn wordlist_has_1024_unique_entries() {
		assert_eq!(len(), 1024);
		let unique: HashSet<&String> = WORDLIST.iter().collect();
		assert_eq!(unique.len(), 1024);
	}

	#[test]
	fn every_four_char_prefix_is_unique() {
		let prefixes: HashSet<String> = WORDLIST.iter().map(|w| w.chars().take(4).collect()).collect();
		assert_eq!(prefixes.len(), 1024);
	}

	#[test]
	fn lookup_is_case_insensitive_and_trims_whitespace() {
		let i = word_to_index("academic").unwrap();
		assert_eq!(word_to_index("  ACADEMIC  "), Some(i));
		assert_eq!(word_to_index("Academic"), Some(i));
	}

	#[test]
	fn four_char_prefix_is_a_valid_alias() {
		let i = word_to_index("academic").unwrap();
		assert_eq!(word_to_index("acad"), Some(i));
	}

	#[test]
	fn unknown_word_returns_none() {
		assert_eq!(word_to_index("notarealword"), None);
	}

	#[test]
	fn round_trips_through_index() {
		for i in 0..len() {
			let w = index_to_word(i).unwrap();
			assert_eq!(word_to_index(w), Some(i));
		}
	}
}
