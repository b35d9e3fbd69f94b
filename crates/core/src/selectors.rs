//! Portal DOM selectors.
//!
//! These are third-party details of a DevExtreme-based site and break without
//! notice when the portal is redeployed. Keep every portal-specific selector
//! here so a breakage is a one-file fix.

/// Navigation menu entries. Their count drives the login heuristic.
pub const MENU_ITEM: &str = ".dx-menu-item";

/// Home page tile holding the "Detaylı" (detailed search) entry.
pub const DETAILED_SEARCH_TILE: &str = ".dx-box-item div";
pub const DETAILED_SEARCH_TEXT: &str = "Detaylı";

pub const DROPDOWN_BUTTON: &str = ".dx-dropdowneditor-button";
pub const DROPDOWN_OPTION: &str = ".dx-item-content";

pub const START_DATE_INPUT: &str = "input[placeholder*='Başlangıç']";
pub const END_DATE_INPUT: &str = "input[placeholder*='Bitiş']";
pub const SEARCH_INPUT: &str = "input[placeholder*='Arama']";

pub const SUBMIT_BUTTON: &str = ".dx-button-content span, button";
pub const SUBMIT_TEXT: &str = "Sorgula";

/// Search results grid. Only the first matching table is read and its first
/// row is the header.
pub const RESULTS_TABLE: &str = "table.dx-datagrid-table";
pub const ROW: &str = "tr";
pub const CELL: &str = "td";

/// Detail page label cells; the value is the next `td`.
pub const INFO_LABEL: &str = "td.info-label";

/// Tab headers, matched by text.
pub const TAB_HEADER: &str = "span";
pub const PARTIES_TAB: &[&str] = &["Taraflar", "Parties"];
pub const EXPENSES_TAB: &[&str] = &["Masraflar", "Expenses"];
pub const DOCUMENTS_TAB: &[&str] = &["Evraklar", "Documents"];

pub const PARTY_ITEM: &str = "div.party-info";
pub const PARTY_NAME: &str = "span.party-name";
pub const PARTY_CAPACITY: &str = "span.party-capacity";
pub const PARTY_IDENTITY: &str = "span.party-identity";
pub const PARTY_ADDRESS: &str = "span.party-address";
pub const PARTY_LAWYER: &str = "span.party-lawyer";
pub const PARTY_LAWYER_BAR: &str = "span.party-lawyer-bar";

pub const EXPENSE_TABLE: &str = "table.expense-table";

pub const DOCUMENT_ITEM: &str = "div.document-item";
pub const DOCUMENT_NAME: &str = "span.doc-name";
pub const DOCUMENT_DATE: &str = "span.doc-date";
pub const DOCUMENT_SIZE: &str = "span.doc-size";
pub const DOCUMENT_LINK: &str = "a[href*='download']";
