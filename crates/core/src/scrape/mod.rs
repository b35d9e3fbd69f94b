//! Record extraction from rendered portal HTML.
//!
//! Parsers are pure functions over a page snapshot. Scraping is best-effort:
//! a row that fails to parse is logged and skipped, and shows up in the
//! returned [`ScrapeStats`] as attempted but not parsed.


use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;
use uyap_protocol::{
	BasicInfo, CaseFileRecord, DocumentRecord, ExpenseRecord, PartyRecord, ScrapeStats,
	SearchResults, parse_amount,
};

use crate::error::{Error, Result};
use crate::selectors;

/// Status reported for a results row without a status column.
pub const DEFAULT_STATUS: &str = "Aktif";

fn selector(css: &str) -> Result<Selector> {
	Selector::parse(css).map_err(|e| Error::InvalidSelector(format!("{css}: {e}")))
}

/// Text content with runs of whitespace collapsed to single spaces.
fn text_of(element: ElementRef<'_>) -> String {
	element
		.text()
		.flat_map(str::split_whitespace)
		.collect::<Vec<_>>()
		.join(" ")
}

fn first_text(element: ElementRef<'_>, sel: &Selector) -> Option<String> {
	element.select(sel).next().map(text_of)
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}

/// Parses the search results grid.
///
/// Only the first results table is read and its first row is treated as the
/// header. Rows with fewer than four cells are skipped. `scraped_at` is the
/// unix time used in the synthetic record ids.
pub fn parse_search_results(html: &str, scraped_at: u64) -> Result<SearchResults> {
	let document = Html::parse_document(html);
	let table_sel = selector(selectors::RESULTS_TABLE)?;
	let row_sel = selector(selectors::ROW)?;
	let cell_sel = selector(selectors::CELL)?;

	let mut results = SearchResults::default();
	let Some(table) = document.select(&table_sel).next() else {
		warn!(target = "uyap.scrape", "results table not found");
		return Ok(results);
	};

	for (index, row) in table.select(&row_sel).skip(1).enumerate() {
		let cells: Vec<String> = row.select(&cell_sel).map(text_of).collect();
		if cells.len() < 4 || cells[0].is_empty() {
			debug!(target = "uyap.scrape", row = index, cells = cells.len(), "skipping results row");
			results.stats.record(false);
			continue;
		}

		let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
		let status = non_empty(cells.get(3).cloned()).unwrap_or_else(|| DEFAULT_STATUS.to_string());

		results.records.push(CaseFileRecord {
			id: format!("uyap_file_{index}_{scraped_at}"),
			case_number: cell(0),
			court: cell(1),
			jurisdiction_type: cell(2),
			jurisdiction_unit: cell(1),
			status,
			opening_date: cell(4),
			parties: cell(5),
			..Default::default()
		});
		results.stats.record(true);
	}

	Ok(results)
}

/// Parses the header block of a detail page.
///
/// Values come from the cell following each `td.info-label`. `case_number` is
/// used when the page does not show one. The year falls back to the prefix of
/// the case number.
pub fn parse_basic_info(html: &str, case_number: &str) -> Result<BasicInfo> {
	let document = Html::parse_document(html);
	let label_sel = selector(selectors::INFO_LABEL)?;

	let mut info = BasicInfo::default();
	for label in document.select(&label_sel) {
		let Some(value) = label.next_siblings().find_map(ElementRef::wrap) else {
			continue;
		};
		let value = text_of(value);
		if value.is_empty() {
			continue;
		}

		match InfoField::from_label(&text_of(label)) {
			Some(InfoField::CaseNumber) => info.case_number = value,
			Some(InfoField::Court) => info.court = value,
			Some(InfoField::JurisdictionType) => info.jurisdiction_type = value,
			Some(InfoField::JurisdictionUnit) => info.jurisdiction_unit = value,
			Some(InfoField::Status) => info.status = value,
			Some(InfoField::OpeningDate) => info.opening_date = value,
			Some(InfoField::Year) => info.year = value.trim().parse().ok(),
			None => {}
		}
	}

	if info.case_number.is_empty() {
		info.case_number = case_number.trim().to_string();
	}
	if info.year.is_none() {
		info.year = info.effective_year();
	}

	Ok(info)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoField {
	CaseNumber,
	Court,
	JurisdictionType,
	JurisdictionUnit,
	Status,
	OpeningDate,
	Year,
}

impl InfoField {
	fn from_label(label: &str) -> Option<Self> {
		let label = fold_turkish(label.trim().trim_end_matches(':').trim());
		let field = match label.as_str() {
			"esas no" | "esas numarasi" | "dosya no" => InfoField::CaseNumber,
			"mahkeme" | "mahkeme adi" => InfoField::Court,
			"yargi turu" => InfoField::JurisdictionType,
			"yargi birimi" => InfoField::JurisdictionUnit,
			"durum" | "dosya durumu" => InfoField::Status,
			"acilis tarihi" => InfoField::OpeningDate,
			"yil" => InfoField::Year,
			_ => return None,
		};
		Some(field)
	}
}

/// Lowercases and maps Turkish letters to ASCII so labels compare reliably.
fn fold_turkish(value: &str) -> String {
	value
		.chars()
		.map(|c| match c {
			'ı' | 'I' | 'İ' | 'i' => 'i',
			'ş' | 'Ş' => 's',
			'ğ' | 'Ğ' => 'g',
			'ü' | 'Ü' => 'u',
			'ö' | 'Ö' => 'o',
			'ç' | 'Ç' => 'c',
			c => c.to_ascii_lowercase(),
		})
		.collect()
}

/// Parses the parties tab. Name and capacity are required per entry.
pub fn parse_parties(html: &str) -> Result<(Vec<PartyRecord>, ScrapeStats)> {
	let document = Html::parse_document(html);
	let item_sel = selector(selectors::PARTY_ITEM)?;
	let name_sel = selector(selectors::PARTY_NAME)?;
	let capacity_sel = selector(selectors::PARTY_CAPACITY)?;
	let identity_sel = selector(selectors::PARTY_IDENTITY)?;
	let address_sel = selector(selectors::PARTY_ADDRESS)?;
	let lawyer_sel = selector(selectors::PARTY_LAWYER)?;
	let bar_sel = selector(selectors::PARTY_LAWYER_BAR)?;

	let mut parties = Vec::new();
	let mut stats = ScrapeStats::default();

	for item in document.select(&item_sel) {
		let name = non_empty(first_text(item, &name_sel));
		let capacity = non_empty(first_text(item, &capacity_sel));
		let (Some(name), Some(capacity)) = (name, capacity) else {
			warn!(target = "uyap.scrape", "party entry without name or capacity, skipping");
			stats.record(false);
			continue;
		};

		parties.push(PartyRecord {
			name,
			capacity,
			identity_number: non_empty(first_text(item, &identity_sel)),
			address: non_empty(first_text(item, &address_sel)),
			lawyer: non_empty(first_text(item, &lawyer_sel)),
			lawyer_bar_number: non_empty(first_text(item, &bar_sel)),
		});
		stats.record(true);
	}

	Ok((parties, stats))
}

/// Parses the expenses table: type, amount, date, then optional paid flag
/// and description. The first row is the header.
pub fn parse_expenses(html: &str) -> Result<(Vec<ExpenseRecord>, ScrapeStats)> {
	let document = Html::parse_document(html);
	let table_sel = selector(selectors::EXPENSE_TABLE)?;
	let row_sel = selector(selectors::ROW)?;
	let cell_sel = selector(selectors::CELL)?;

	let mut expenses = Vec::new();
	let mut stats = ScrapeStats::default();
	let Some(table) = document.select(&table_sel).next() else {
		debug!(target = "uyap.scrape", "expense table not found");
		return Ok((expenses, stats));
	};

	for row in table.select(&row_sel).skip(1) {
		let cells: Vec<String> = row.select(&cell_sel).map(text_of).collect();
		if cells.len() < 3 {
			stats.record(false);
			continue;
		}

		let Some(amount) = parse_amount(&cells[1]) else {
			warn!(target = "uyap.scrape", amount = %cells[1], "unparseable expense amount, skipping");
			stats.record(false);
			continue;
		};

		expenses.push(ExpenseRecord {
			expense_type: cells[0].clone(),
			amount,
			date: cells[2].clone(),
			paid: cells.get(3).is_some_and(|c| is_paid_marker(c)),
			description: non_empty(cells.get(4).cloned()),
		});
		stats.record(true);
	}

	Ok((expenses, stats))
}

fn is_paid_marker(cell: &str) -> bool {
	matches!(
		fold_turkish(cell.trim()).as_str(),
		"evet" | "odendi" | "odenmis" | "yes" | "paid" | "true"
	)
}

/// Parses the documents tab.
///
/// Name, date and a download link are required. Relative links are resolved
/// against `page_url`, which is also recorded as the listing URL.
pub fn parse_documents(html: &str, page_url: Option<&str>) -> Result<(Vec<DocumentRecord>, ScrapeStats)> {
	let document = Html::parse_document(html);
	let item_sel = selector(selectors::DOCUMENT_ITEM)?;
	let name_sel = selector(selectors::DOCUMENT_NAME)?;
	let date_sel = selector(selectors::DOCUMENT_DATE)?;
	let size_sel = selector(selectors::DOCUMENT_SIZE)?;
	let link_sel = selector(selectors::DOCUMENT_LINK)?;

	let base = page_url.and_then(|u| Url::parse(u).ok());

	let mut documents = Vec::new();
	let mut stats = ScrapeStats::default();

	for item in document.select(&item_sel) {
		let name = non_empty(first_text(item, &name_sel));
		let date = first_text(item, &date_sel);
		let href = item
			.select(&link_sel)
			.next()
			.and_then(|a| a.value().attr("href"))
			.map(str::trim)
			.filter(|h| !h.is_empty());

		let (Some(name), Some(date), Some(href)) = (name, date, href) else {
			warn!(target = "uyap.scrape", "document entry incomplete, skipping");
			stats.record(false);
			continue;
		};

		let download_url = match &base {
			Some(base) => base.join(href).map(String::from).unwrap_or_else(|_| href.to_string()),
			None => href.to_string(),
		};

		let mut record = DocumentRecord::new(name, date);
		record.size = non_empty(first_text(item, &size_sel));
		record.url = page_url.map(str::to_string);
		record.download_url = Some(download_url);
		documents.push(record);
		stats.record(true);
	}

	Ok((documents, stats))
}
