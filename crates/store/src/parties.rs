use uyap_protocol::PartyRecord;

use crate::file_type::turkish_lowercase;

const PLAINTIFF_LABELS: &[&str] = &["davacı", "davaci", "plaintiff"];
const DEFENDANT_LABELS: &[&str] = &["davalı", "davali", "defendant"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
	Plaintiff,
	Defendant,
}

impl PartyRole {
	/// Classifies a free-text capacity. Other capacities (witness, intervener,
	/// ...) have no role in the case file.
	pub fn from_capacity(capacity: &str) -> Option<Self> {
		let capacity = turkish_lowercase(capacity.trim());
		if PLAINTIFF_LABELS.contains(&capacity.as_str()) {
			Some(PartyRole::Plaintiff)
		} else if DEFENDANT_LABELS.contains(&capacity.as_str()) {
			Some(PartyRole::Defendant)
		} else {
			None
		}
	}
}

/// Case-file columns filled from the party list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyAssignment {
	pub client_name: Option<String>,
	pub opponent_name: Option<String>,
	pub opponent_lawyer: Option<String>,
	/// Parties not used for any column.
	pub dropped: usize,
}

/// Takes the first plaintiff as the client and the first defendant as the
/// opponent. Every other party is counted as dropped.
pub fn assign_parties(parties: &[PartyRecord]) -> PartyAssignment {
	let mut assignment = PartyAssignment::default();

	for party in parties {
		match PartyRole::from_capacity(&party.capacity) {
			Some(PartyRole::Plaintiff) if assignment.client_name.is_none() => {
				assignment.client_name = Some(party.name.clone());
			}
			Some(PartyRole::Defendant) if assignment.opponent_name.is_none() => {
				assignment.opponent_name = Some(party.name.clone());
				assignment.opponent_lawyer = party.lawyer.clone().filter(|l| !l.trim().is_empty());
			}
			_ => assignment.dropped += 1,
		}
	}

	assignment
}
