use serde::{Deserialize, Serialize};

use crate::records::{DocumentRecord, ExpenseRecord, PartyRecord};

/// Header fields of a case-file detail page.
///
/// Empty strings mean the portal did not show the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
	#[serde(default, alias = "esas_no")]
	pub case_number: String,
	#[serde(default, alias = "mahkeme")]
	pub court: String,
	#[serde(default, alias = "yargi_turu")]
	pub jurisdiction_type: String,
	#[serde(default, alias = "yargi_birimi")]
	pub jurisdiction_unit: String,
	#[serde(default, alias = "durum")]
	pub status: String,
	#[serde(default, alias = "acilis_tarihi")]
	pub opening_date: String,
	/// Case year, taken from the page or the `YYYY/N` case number.
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "yil")]
	pub year: Option<i32>,
}

impl BasicInfo {
	/// Returns the explicit year, falling back to the case-number prefix.
	pub fn effective_year(&self) -> Option<i32> {
		self.year.or_else(|| year_from_case_number(&self.case_number))
	}
}

/// Extracts the year from a `YYYY/N` case number.
pub fn year_from_case_number(case_number: &str) -> Option<i32> {
	let (prefix, _) = case_number.trim().split_once('/')?;
	if prefix.len() != 4 {
		return None;
	}
	prefix.parse().ok()
}

/// Attempted versus parsed row counts for one scraped section.
///
/// Scraping is best-effort: rows that fail to parse are skipped and only
/// show up here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeStats {
	pub attempted: usize,
	pub parsed: usize,
}

impl ScrapeStats {
	pub fn skipped(&self) -> usize {
		self.attempted.saturating_sub(self.parsed)
	}

	pub fn record(&mut self, parsed: bool) {
		self.attempted += 1;
		if parsed {
			self.parsed += 1;
		}
	}
}

/// Everything scraped from a case-file detail page.
///
/// This is also the on-disk bundle format accepted by `uyap import --bundle`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailBundle {
	#[serde(default)]
	pub basic_info: BasicInfo,
	#[serde(default, alias = "taraflar")]
	pub parties: Vec<PartyRecord>,
	#[serde(default, alias = "masraflar")]
	pub expenses: Vec<ExpenseRecord>,
	#[serde(default, alias = "evraklar")]
	pub documents: Vec<DocumentRecord>,
	#[serde(default)]
	pub stats: BundleStats,
}

/// Per-section scrape counts carried alongside a [`DetailBundle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleStats {
	pub parties: ScrapeStats,
	pub expenses: ScrapeStats,
	pub documents: ScrapeStats,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn year_from_slash_case_number() {
		assert_eq!(year_from_case_number("2024/123"), Some(2024));
		assert_eq!(year_from_case_number(" 2019/7 "), Some(2019));
		assert_eq!(year_from_case_number("24/123"), None);
		assert_eq!(year_from_case_number("2024-123"), None);
		assert_eq!(year_from_case_number(""), None);
	}

	#[test]
	fn explicit_year_wins() {
		let info = BasicInfo {
			case_number: "2024/123".into(),
			year: Some(2023),
			..Default::default()
		};
		assert_eq!(info.effective_year(), Some(2023));

		let derived = BasicInfo {
			case_number: "2022/9".into(),
			..Default::default()
		};
		assert_eq!(derived.effective_year(), Some(2022));
	}

	#[test]
	fn stats_count_skips() {
		let mut stats = ScrapeStats::default();
		stats.record(true);
		stats.record(false);
		stats.record(true);
		assert_eq!(stats.attempted, 3);
		assert_eq!(stats.parsed, 2);
		assert_eq!(stats.skipped(), 1);
	}

	#[test]
	fn bundle_parses_portal_keys() {
		let bundle: DetailBundle = serde_json::from_value(serde_json::json!({
			"basic_info": {
				"esas_no": "2024/123",
				"mahkeme": "Test Mahkemesi",
				"yargi_turu": "Hukuk"
			},
			"taraflar": [
				{ "ad": "Ahmet Yılmaz", "sifat": "Davacı" }
			],
			"masraflar": [
				{ "tur": "Harç", "tutar": 500.0, "tarih": "01.01.2024", "odendi": false }
			]
		}))
		.unwrap();

		assert_eq!(bundle.basic_info.case_number, "2024/123");
		assert_eq!(bundle.parties[0].capacity, "Davacı");
		assert_eq!(bundle.expenses[0].amount, 500.0);
		assert!(bundle.documents.is_empty());
	}
}
