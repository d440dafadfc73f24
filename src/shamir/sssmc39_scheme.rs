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

//! Functions and structs that specifically define the two-tier group/member
//! mnemonic scheme on top of the raw share splitter.

use super::{Share, Splitter};
use crate::error::{Error, ErrorKind};

use std::collections::BTreeMap;
use std::fmt;

use crate::util;

/// Struct for returned shares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupShare {
	/// Group id
	pub group_id: u16,
	/// whether this is an extendable-backup group
	pub extendable: bool,
	/// iteration exponent
	pub iteration_exponent: u8,
	/// group index
	pub group_index: u8,
	/// group threshold
	pub group_threshold: u8,
	/// number of group shares
	pub group_count: u8,
	/// member threshold:
	pub member_threshold: u8,
	/// Member shares for the group
	pub member_shares: Vec<Share>,
}

impl fmt::Display for GroupShare {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		writeln!(
			f,
			"Group {} of {} - {} of {} shares required: ",
			self.group_index + 1,
			self.group_count,
			self.member_threshold,
			self.member_shares.len()
		)?;
		for s in &self.member_shares {
			for w in s.to_mnemonic().unwrap() {
				write!(f, "{} ", w)?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

impl GroupShare {
	/// return list of mnemonics
	pub fn mnemonic_list(&self) -> Result<Vec<Vec<String>>, Error> {
		let mut ret_vec = vec![];
		for s in &self.member_shares {
			ret_vec.push(s.to_mnemonic()?);
		}
		Ok(ret_vec)
	}

	/// return list of mnemonics as space separated strings
	pub fn mnemonic_list_flat(&self) -> Result<Vec<String>, Error> {
		let mut ret_vec = vec![];
		for s in &self.member_shares {
			ret_vec.push(s.to_mnemonic()?.iter().fold(String::new(), |mut acc, s| {
				acc.push_str(s);
				acc.push(' ');
				acc
			}))
		}
		Ok(ret_vec)
	}

	/// decode member shares to single share
	pub fn decode_shares(&mut self) -> Result<Share, Error> {
		let sp = Splitter::new(None);
		sp.recover_secret(&self.member_shares, self.member_threshold)
	}
}

/// Split a master secret into mnemonic shares
/// group_threshold: The number of groups required to reconstruct the master secret
/// groups: A list of (member_threshold, member_count) pairs for each group, where member_count
/// is the number of shares to generate for the group and member_threshold is the number of
/// members required to reconstruct the group secret.
/// master_secret: The master secret to split.
/// passphrase: The passphrase used to encrypt the master secret.
/// iteration_exponent: The iteration exponent.
/// extendable: whether the resulting shares form an extendable backup group.
/// return: List of mnemonics.
pub fn generate_mnemonics(
	group_threshold: u8,
	groups: &[(u8, u8)],
	master_secret: &[u8],
	passphrase: &str,
	iteration_exponent: u8,
	extendable: bool,
) -> Result<Vec<GroupShare>, Error> {
	// Generate a 'proto share' so to speak, with identifer generated and group data filled
	let mut proto_share = Share::new()?;
	proto_share.extendable = extendable;
	proto_share.group_threshold = group_threshold;
	proto_share.group_count = groups.len() as u8;

	if master_secret.len() * 8 < proto_share.config.min_strength_bits as usize {
		return Err(ErrorKind::Argument(format!(
			"The length of the master secret ({} bytes) must be at least {} bytes.",
			master_secret.len(),
			(f64::from(proto_share.config.min_strength_bits) / 8f64).ceil(),
		)))?;
	}

	if master_secret.len() % 2 != 0 {
		return Err(ErrorKind::Argument(
			"The length of the master secret in bytes must be an even number".to_string(),
		))?;
	}

	if !passphrase.bytes().all(|c| (32..=126).contains(&c)) {
		return Err(ErrorKind::Argument(
			"The passphrase must contain only printable ASCII characters (code points 32-126)."
				.to_string(),
		))?;
	}

	if iteration_exponent > 15 {
		return Err(ErrorKind::Argument(format!(
			"The iteration exponent ({}) must be between 0 and 15.",
			iteration_exponent,
		)))?;
	}

	if group_threshold as usize > groups.len() {
		return Err(ErrorKind::Argument(format!(
			"The requested group threshold ({}) must not exceed the number of groups ({}).",
			group_threshold,
			groups.len()
		)))?;
	}

	for &(member_threshold, member_count) in groups {
		if member_threshold == 1 && member_count > 1 {
			return Err(ErrorKind::Argument(format!(
				"A group with a member count of {} cannot have a member threshold of 1.",
				member_count,
			)))?;
		}
	}

	let encoder = util::encrypt::MasterSecretEnc::new()?;

	let encrypted_master_secret = encoder.encrypt(
		master_secret,
		passphrase,
		iteration_exponent,
		proto_share.identifier,
		extendable,
	);

	let sp = Splitter::new(None);

	let group_shares = sp.split_secret(
		&proto_share,
		group_threshold,
		groups.len() as u8,
		&encrypted_master_secret,
	)?;

	let mut retval: Vec<GroupShare> = vec![];

	let gs_len = group_shares.len();
	for (i, elem) in group_shares.into_iter().enumerate() {
		proto_share.group_index = i as u8;
		proto_share.group_threshold = group_threshold;
		proto_share.group_count = gs_len as u8;
		let (member_threshold, member_count) = groups[i];
		let member_shares = sp.split_secret(
			&proto_share,
			member_threshold,
			member_count,
			&elem.share_value,
		)?;
		retval.push(GroupShare {
			group_id: proto_share.identifier,
			extendable,
			iteration_exponent,
			group_index: i as u8,
			group_threshold,
			group_count: gs_len as u8,
			member_threshold,
			member_shares,
		});
	}

	Ok(retval)
}

/// As `generate_mnemonics`, but generates a fresh random master secret of
/// the requested strength rather than taking one from the caller.
pub fn generate_mnemonics_random(
	group_threshold: u8,
	groups: &[(u8, u8)],
	strength_bits: u16,
	passphrase: &str,
	iteration_exponent: u8,
	extendable: bool,
) -> Result<Vec<GroupShare>, Error> {
	let proto_share = Share::new()?;
	if strength_bits < proto_share.config.min_strength_bits {
		return Err(ErrorKind::Argument(format!(
			"The requested strength of the master secret({} bits) must be at least {} bits.",
			strength_bits, proto_share.config.min_strength_bits,
		)))?;
	}
	if strength_bits % 16 != 0 {
		return Err(ErrorKind::Argument(format!(
			"The requested strength of the master secret({} bits) must be a multiple of 16 bits.",
			strength_bits,
		)))?;
	}
	generate_mnemonics(
		group_threshold,
		groups,
		&util::fill_vec_rand(strength_bits as usize / 8),
		passphrase,
		iteration_exponent,
		extendable,
	)
}

/// Combines mnemonic shares to obtain the master secret which was previously split using
/// Shamir's secret sharing scheme.
/// mnemonics: List of mnemonics.
/// passphrase: The passphrase used to encrypt the master secret.
/// return: The master secret.
pub fn combine_mnemonics(mnemonics: &[Vec<String>], passphrase: &str) -> Result<Vec<u8>, Error> {
	let group_shares = decode_mnemonics(mnemonics)?;
	let mut shares = vec![];
	for mut gs in group_shares {
		shares.push(gs.decode_shares()?);
	}
	let sp = Splitter::new(None);
	// restore proper member index for groups
	let shares = shares
		.into_iter()
		.map(|mut s| {
			s.member_index = s.group_index;
			s
		})
		.collect::<Vec<_>>();
	let ems = sp.recover_secret(&shares, shares[0].group_threshold)?;
	let encoder = util::encrypt::MasterSecretEnc::new()?;
	let dms = encoder.decrypt(
		&ems.share_value,
		passphrase,
		ems.iteration_exponent,
		ems.identifier,
		ems.extendable,
	);
	Ok(dms)
}

/// Decodes all Mnemonics to a list of shares and performs error checking
fn decode_mnemonics(mnemonics: &[Vec<String>]) -> Result<Vec<GroupShare>, Error> {
	let mut shares = vec![];
	if mnemonics.is_empty() {
		return Err(ErrorKind::Mnemonic(
			"List of mnemonics is empty.".to_string(),
		))?;
	}
	let check_len = mnemonics[0].len();
	for m in mnemonics {
		if m.len() != check_len {
			return Err(ErrorKind::InconsistentShares(
				"Invalid set of mnemonics. All mnemonics must have the same length.".to_string(),
			))?;
		}
		shares.push(Share::from_mnemonic(m)?);
	}

	let check_share = shares[0].clone();
	for s in shares.iter() {
		if s.identifier != check_share.identifier
			|| s.extendable != check_share.extendable
			|| s.iteration_exponent != check_share.iteration_exponent
		{
			return Err(ErrorKind::InconsistentShares(format!(
				"Invalid set of mnemonics. All mnemonics must begin with the same {} words. \
				 (Identifier, extendable flag and iteration exponent must be the same).",
				s.config.id_exp_length_words,
			)))?;
		}
		if s.group_threshold != check_share.group_threshold {
			return Err(ErrorKind::InconsistentShares(
				"Invalid set of mnemonics. All mnemonics must have the same group threshold"
					.to_string(),
			))?;
		}
		if s.group_count != check_share.group_count {
			return Err(ErrorKind::InconsistentShares(
				"Invalid set of mnemonics. All mnemonics must have the same group count"
					.to_string(),
			))?;
		}
	}

	// Bucket shares by group, then by member index within the group: a
	// repeated member index (e.g. the same mnemonic supplied twice) keeps
	// only the most recently seen copy.
	let mut group_member_map: BTreeMap<u8, BTreeMap<u8, Share>> = BTreeMap::new();
	for s in shares {
		group_member_map
			.entry(s.group_index)
			.or_insert_with(BTreeMap::new)
			.insert(s.member_index, s);
	}

	let mut group_index_map: BTreeMap<u8, GroupShare> = BTreeMap::new();
	for (group_index, member_map) in group_member_map {
		let member_shares: Vec<Share> = member_map.into_iter().map(|(_, s)| s).collect();
		let member_threshold = member_shares[0].member_threshold;
		let group_share = GroupShare {
			group_id: check_share.identifier,
			extendable: check_share.extendable,
			group_index,
			group_threshold: check_share.group_threshold,
			iteration_exponent: check_share.iteration_exponent,
			group_count: check_share.group_count,
			member_threshold,
			member_shares,
		};
		group_index_map.insert(group_index, group_share);
	}

	// Only groups that have at least member_threshold distinct members are usable.
	let groups: Vec<GroupShare> = group_index_map
		.into_iter()
		.map(|g| g.1)
		.filter(|g| g.member_shares.len() >= g.member_threshold as usize)
		.collect();

	if groups.len() != check_share.group_threshold as usize {
		return Err(ErrorKind::InsufficientShares(format!(
			"Exactly {} complete groups are required to reconstruct the secret, but {} were \
			 supplied.",
			check_share.group_threshold,
			groups.len(),
		)))?;
	}

	// TODO: Should probably return info making problem mnemonics easier to identify
	for g in groups.iter() {
		if g.member_shares.len() < g.member_threshold as usize {
			return Err(ErrorKind::InsufficientShares(format!(
				"Insufficient number of mnemonics (Group {}). At least {} mnemonics \
				 are required.",
				g.group_index, g.member_threshold,
			)))?;
		}
		let test_share = g.member_shares[0].clone();
		for ms in g.member_shares.iter() {
			if test_share.member_threshold != ms.member_threshold {
				return Err(ErrorKind::InconsistentShares(
					"Mismatching member thresholds".to_string(),
				))?;
			}
		}
	}

	Ok(groups)
}
