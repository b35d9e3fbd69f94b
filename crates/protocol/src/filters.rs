use serde::{Deserialize, Serialize};

use crate::detail::ScrapeStats;
use crate::records::CaseFileRecord;

/// Optional filters applied to the detailed search form before querying.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
	/// Jurisdiction type as labelled in the portal dropdown (e.g. "Hukuk").
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "yargi_turu")]
	pub jurisdiction_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "baslangic_tarihi")]
	pub start_date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "bitis_tarihi")]
	pub end_date: Option<String>,
	/// Free-text query typed into the search box.
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "arama")]
	pub search: Option<String>,
}

impl SearchFilters {
	pub fn jurisdiction_type(&self) -> Option<&str> {
		non_empty(&self.jurisdiction_type)
	}

	pub fn start_date(&self) -> Option<&str> {
		non_empty(&self.start_date)
	}

	pub fn end_date(&self) -> Option<&str> {
		non_empty(&self.end_date)
	}

	pub fn search(&self) -> Option<&str> {
		non_empty(&self.search)
	}

	pub fn is_empty(&self) -> bool {
		self.jurisdiction_type().is_none()
			&& self.start_date().is_none()
			&& self.end_date().is_none()
			&& self.search().is_none()
	}
}

/// Rows parsed from one search, with the per-row scrape counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
	pub records: Vec<CaseFileRecord>,
	pub stats: ScrapeStats,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
