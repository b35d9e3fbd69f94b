//! Record types exchanged between the portal scraper, the case store and the CLI.
//!
//! Everything here is a plain data carrier: records are produced once per
//! scrape call, serialized into command output or a bundle file, and consumed
//! by the importer.
//!
//! # Main Types
//!
//! - [`CaseFileRecord`] - One row of the case-file search results table
//! - [`DetailBundle`] - Everything scraped from a case-file detail page
//! - [`SearchFilters`] - Optional filters applied before a search
//! - [`ImportOptions`] / [`ImportOutcome`] - Input and result of an import

mod amount;
mod detail;
mod filters;
mod import;
mod records;

pub use amount::parse_amount;
pub use detail::{BasicInfo, BundleStats, DetailBundle, ScrapeStats, year_from_case_number};
pub use filters::{SearchFilters, SearchResults};
pub use import::{
	ExpenseConflict, ImportAction, ImportCounts, ImportErrorKind, ImportOptions, ImportOutcome,
};
pub use records::{CaseFileRecord, DocumentKind, DocumentRecord, ExpenseRecord, PartyRecord};
