use serde::{Deserialize, Serialize};

/// Case-file category used by the case-management store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
	Hukuk,
	Ceza,
	Icra,
	Idari,
	/// Anything the portal labels differently, including an empty label.
	#[default]
	Diger,
}

impl FileType {
	/// Maps a portal jurisdiction label ("Hukuk", "İCRA", ...) to a category.
	pub fn from_jurisdiction(label: &str) -> Self {
		match turkish_lowercase(label.trim()).as_str() {
			"hukuk" => FileType::Hukuk,
			"ceza" => FileType::Ceza,
			"icra" => FileType::Icra,
			"idari" | "idare" => FileType::Idari,
			_ => FileType::Diger,
		}
	}

	/// Parses a stored value; unknown values read as [`FileType::Diger`].
	pub fn from_stored(value: &str) -> Self {
		match value {
			"hukuk" => FileType::Hukuk,
			"ceza" => FileType::Ceza,
			"icra" => FileType::Icra,
			"idari" => FileType::Idari,
			_ => FileType::Diger,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			FileType::Hukuk => "hukuk",
			FileType::Ceza => "ceza",
			FileType::Icra => "icra",
			FileType::Idari => "idari",
			FileType::Diger => "diger",
		}
	}
}

impl std::fmt::Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Lowercases with Turkish dotted/dotless `i` rules.
pub fn turkish_lowercase(value: &str) -> String {
	value
		.chars()
		.flat_map(|c| match c {
			'I' => vec!['ı'],
			'İ' => vec!['i'],
			c => c.to_lowercase().collect(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_portal_labels() {
		assert_eq!(FileType::from_jurisdiction("Hukuk"), FileType::Hukuk);
		assert_eq!(FileType::from_jurisdiction(" CEZA "), FileType::Ceza);
		assert_eq!(FileType::from_jurisdiction("İcra"), FileType::Icra);
		assert_eq!(FileType::from_jurisdiction("İDARİ"), FileType::Idari);
		assert_eq!(FileType::from_jurisdiction("Arabuluculuk"), FileType::Diger);
		assert_eq!(FileType::from_jurisdiction(""), FileType::Diger);
	}

	#[test]
	fn dotless_i_is_not_folded() {
		assert_eq!(turkish_lowercase("DAVALI"), "davalı");
		assert_eq!(turkish_lowercase("İSTANBUL"), "istanbul");
	}

	#[test]
	fn stored_values_round_trip() {
		for kind in [
			FileType::Hukuk,
			FileType::Ceza,
			FileType::Icra,
			FileType::Idari,
			FileType::Diger,
		] {
			assert_eq!(FileType::from_stored(kind.as_str()), kind);
		}
	}
}
