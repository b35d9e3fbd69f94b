//! uyap: browser automation for the UYAP lawyer portal.
//!
//! The portal has no API; records are read from the rendered pages of a
//! browser the user logs into with e-signature hardware.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use uyap::{DriverConfig, SearchFilters, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> uyap::Result<()> {
//!     let sessions = Arc::new(SessionManager::chrome(DriverConfig::default()));
//!
//!     let filters = SearchFilters {
//!         jurisdiction_type: Some("Hukuk".into()),
//!         ..Default::default()
//!     };
//!     let results = sessions.search_files_with_filters(&filters).await?;
//!     for record in &results.records {
//!         let bundle = sessions
//!             .get_file_complete_details(&record.id, &record.case_number)
//!             .await?;
//!         println!("{}: {} documents", record.case_number, bundle.documents.len());
//!     }
//!
//!     sessions.cleanup().await;
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`SessionManager`] - Shared, lazily started portal session
//! - [`PortalDriver`] - One browser tab driven through the portal
//! - [`PortalPage`] / [`BrowserLauncher`] - Browser seams, implemented for Chromium by [`ChromeLauncher`]
//! - [`DriverConfig`] - Endpoints, directories and timing

mod artifacts;
mod driver;
mod error;
mod js;
mod session;

pub mod chrome;
pub mod config;
pub mod files;
pub mod page;
pub mod scrape;
pub mod selectors;

#[cfg(test)]
mod testing;

pub use artifacts::{CollectedArtifacts, collect_failure_artifacts};
pub use chrome::{ChromeLauncher, ShutdownMode};
pub use config::{DriverConfig, DuplicateHandling};
pub use driver::{PortalDriver, menu_items_indicate_login};
pub use error::{Error, Result};
pub use page::{BrowserLauncher, PortalPage};
pub use session::SessionManager;
pub use uyap_protocol::{
	BasicInfo, CaseFileRecord, DetailBundle, DocumentKind, DocumentRecord, ExpenseRecord,
	PartyRecord, ScrapeStats, SearchFilters, SearchResults,
};
