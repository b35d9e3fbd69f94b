use std::path::Path;

use serde::{Deserialize, Serialize};

/// One row of the case-file search results table.
///
/// Identity is [`case_number`](Self::case_number). The `id` is a synthetic
/// label built from the row position and the scrape time; it is not stable
/// across searches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseFileRecord {
	/// Synthetic label, `uyap_file_{row}_{unix_secs}`.
	#[serde(default)]
	pub id: String,
	/// Case number in `YYYY/N` form (esas no).
	#[serde(alias = "esas_no")]
	pub case_number: String,
	/// Court name.
	#[serde(default, alias = "mahkeme")]
	pub court: String,
	/// Jurisdiction type as shown by the portal (e.g. "Hukuk").
	#[serde(default, alias = "yargi_turu")]
	pub jurisdiction_type: String,
	/// Jurisdiction unit. The results table shows the court here.
	#[serde(default, alias = "yargi_birimi")]
	pub jurisdiction_unit: String,
	/// Case status, "Aktif" when the column is missing.
	#[serde(default, alias = "durum")]
	pub status: String,
	/// Opening date, verbatim.
	#[serde(default, alias = "acilis_tarihi")]
	pub opening_date: String,
	/// Free-text parties summary.
	#[serde(default, alias = "taraflar")]
	pub parties: String,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "davali")]
	pub defendant: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "davaci")]
	pub plaintiff: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "konu")]
	pub subject: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "son_islem")]
	pub last_action: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "durusma_tarihi")]
	pub next_hearing: Option<String>,
}

/// A party to a case, as listed on the "Taraflar" tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyRecord {
	#[serde(alias = "ad")]
	pub name: String,
	/// Free-text role label (e.g. "Davacı", "Davalı").
	#[serde(default, alias = "sifat")]
	pub capacity: String,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "tc_no")]
	pub identity_number: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "adres")]
	pub address: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "avukat")]
	pub lawyer: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "avukat_baro_no")]
	pub lawyer_bar_number: Option<String>,
}

/// A court expense, as listed on the "Masraflar" tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
	#[serde(alias = "tur")]
	pub expense_type: String,
	/// Amount after localized currency parsing, see [`crate::parse_amount`].
	#[serde(alias = "tutar")]
	pub amount: f64,
	#[serde(default, alias = "tarih")]
	pub date: String,
	#[serde(default, alias = "odendi", alias = "is_paid")]
	pub paid: bool,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "aciklama")]
	pub description: Option<String>,
}

/// Document metadata, as listed on the "Evraklar" tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
	#[serde(alias = "ad")]
	pub name: String,
	#[serde(default, alias = "tarih")]
	pub date: String,
	#[serde(default, skip_serializing_if = "Option::is_none", alias = "boyut")]
	pub size: Option<String>,
	/// Derived from the extension of [`name`](Self::name).
	#[serde(default, rename = "type", alias = "tur")]
	pub kind: DocumentKind,
	/// Page the document was listed on.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	/// Absolute download link, when the row carried one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub download_url: Option<String>,
}

impl DocumentRecord {
	/// Builds a record and classifies its kind from the file name.
	pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
		let name = name.into();
		let kind = DocumentKind::from_filename(&name);
		Self {
			name,
			date: date.into(),
			kind,
			..Default::default()
		}
	}

	/// The stored kind, or the one implied by the file name when the record
	/// came without a type (saved bundles often omit it).
	pub fn effective_kind(&self) -> DocumentKind {
		match self.kind {
			DocumentKind::Unknown => DocumentKind::from_filename(&self.name),
			kind => kind,
		}
	}
}

/// Closed set of document types derived from file extensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
	#[serde(rename = "PDF")]
	Pdf,
	Word,
	Excel,
	Image,
	Archive,
	#[default]
	Unknown,
}

impl DocumentKind {
	/// Classifies a file name by its extension, case-insensitively.
	pub fn from_filename(name: &str) -> Self {
		let ext = Path::new(name)
			.extension()
			.and_then(|ext| ext.to_str())
			.map(str::to_ascii_lowercase);

		match ext.as_deref() {
			Some("pdf") => DocumentKind::Pdf,
			Some("doc" | "docx") => DocumentKind::Word,
			Some("xls" | "xlsx") => DocumentKind::Excel,
			Some("jpg" | "jpeg" | "png") => DocumentKind::Image,
			Some("zip") => DocumentKind::Archive,
			_ => DocumentKind::Unknown,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			DocumentKind::Pdf => "PDF",
			DocumentKind::Word => "Word",
			DocumentKind::Excel => "Excel",
			DocumentKind::Image => "Image",
			DocumentKind::Archive => "Archive",
			DocumentKind::Unknown => "Unknown",
		}
	}
}

impl std::fmt::Display for DocumentKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classifies_known_extensions() {
		assert_eq!(DocumentKind::from_filename("test.pdf"), DocumentKind::Pdf);
		assert_eq!(DocumentKind::from_filename("test.docx"), DocumentKind::Word);
		assert_eq!(DocumentKind::from_filename("test.doc"), DocumentKind::Word);
		assert_eq!(DocumentKind::from_filename("test.xlsx"), DocumentKind::Excel);
		assert_eq!(DocumentKind::from_filename("test.jpg"), DocumentKind::Image);
		assert_eq!(DocumentKind::from_filename("scan.PNG"), DocumentKind::Image);
		assert_eq!(DocumentKind::from_filename("bundle.zip"), DocumentKind::Archive);
	}

	#[test]
	fn unknown_and_missing_extensions() {
		assert_eq!(DocumentKind::from_filename("test.unknown"), DocumentKind::Unknown);
		assert_eq!(DocumentKind::from_filename("README"), DocumentKind::Unknown);
		assert_eq!(DocumentKind::from_filename(""), DocumentKind::Unknown);
	}

	#[test]
	fn kind_serializes_with_display_names() {
		let doc = DocumentRecord::new("Dilekçe.PDF", "01.01.2024");
		let json = serde_json::to_value(&doc).unwrap();
		assert_eq!(json["type"], "PDF");
		assert_eq!(json["name"], "Dilekçe.PDF");
	}

	#[test]
	fn missing_type_falls_back_to_extension() {
		let doc: DocumentRecord =
			serde_json::from_str(r#"{"name": "Dilekce.pdf", "date": "01.01.2024"}"#).unwrap();
		assert_eq!(doc.kind, DocumentKind::Unknown);
		assert_eq!(doc.effective_kind(), DocumentKind::Pdf);

		let typed: DocumentRecord = serde_json::from_str(r#"{"name": "scan", "type": "Image"}"#).unwrap();
		assert_eq!(typed.effective_kind(), DocumentKind::Image);
	}

	#[test]
	fn search_row_accepts_portal_keys() {
		let record: CaseFileRecord = serde_json::from_value(serde_json::json!({
			"id": "uyap_file_0_1700000000",
			"esas_no": "2024/123",
			"mahkeme": "İstanbul 1. Asliye Hukuk Mahkemesi",
			"yargi_turu": "Hukuk",
			"durum": "Aktif"
		}))
		.unwrap();

		assert_eq!(record.case_number, "2024/123");
		assert_eq!(record.court, "İstanbul 1. Asliye Hukuk Mahkemesi");
		assert_eq!(record.jurisdiction_type, "Hukuk");
		assert!(record.defendant.is_none());
	}
}
