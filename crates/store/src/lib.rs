//! Local case-management store and the UYAP import reconciler.
//!
//! # Main Types
//!
//! - [`CaseStore`] - SQLite database of case files, expenses and documents
//! - [`FileType`] - Case-file category derived from the portal's jurisdiction type
//! - [`ImportError`] - Why an import was rejected

mod error;
mod file_type;
mod parties;
mod store;

pub use error::{Error, ImportError, Result};
pub use file_type::FileType;
pub use parties::{PartyAssignment, PartyRole, assign_parties};
pub use store::{CaseStore, StoredCase, StoredDocument, StoredExpense};
