//! Shared access to one portal session.
//!
//! A [`SessionManager`] is built once at startup and shared by reference
//! (typically `Arc<SessionManager>`). It starts the [`PortalDriver`] on first
//! use and serialises every operation through a single async mutex, so the
//! portal tab is never driven by two callers at once.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{info, warn};
use uyap_protocol::{DetailBundle, DocumentRecord, SearchFilters, SearchResults};

use crate::chrome::ChromeLauncher;
use crate::config::DriverConfig;
use crate::driver::PortalDriver;
use crate::error::{Error, Result};
use crate::page::BrowserLauncher;

pub struct SessionManager {
	config: DriverConfig,
	launcher: Box<dyn BrowserLauncher>,
	driver: Mutex<Option<PortalDriver>>,
}

impl SessionManager {
	pub fn new(config: DriverConfig, launcher: impl BrowserLauncher + 'static) -> Self {
		Self {
			config,
			launcher: Box::new(launcher),
			driver: Mutex::new(None),
		}
	}

	/// Manager backed by a real Chromium browser.
	pub fn chrome(config: DriverConfig) -> Self {
		Self::new(config, ChromeLauncher)
	}

	pub fn config(&self) -> &DriverConfig {
		&self.config
	}

	/// Whether a driver is currently held.
	pub async fn is_started(&self) -> bool {
		self.driver.lock().await.is_some()
	}

	/// Starts the driver if needed and waits for a manual login.
	///
	/// Returns `Ok(false)` when login did not complete within the configured
	/// timeout. Errors only when no browser could be obtained.
	pub async fn ensure_connection(&self) -> Result<bool> {
		let mut slot = self.driver.lock().await;
		self.connect(&mut slot).await
	}

	async fn connect(&self, slot: &mut Option<PortalDriver>) -> Result<bool> {
		if slot.is_none() {
			info!(target = "uyap.session", "starting portal session");
			let driver = PortalDriver::start(self.config.clone(), self.launcher.as_ref()).await?;
			*slot = Some(driver);
		}
		let Some(driver) = slot.as_mut() else {
			return Ok(false);
		};

		if driver.is_logged_in().await {
			return Ok(true);
		}
		if !driver.wait_for_login(self.config.login_timeout()).await {
			warn!(target = "uyap.session", "login not completed");
			return Ok(false);
		}
		Ok(driver.is_logged_in().await)
	}

	async fn connected<'a>(&self, slot: &'a mut Option<PortalDriver>) -> Result<&'a mut PortalDriver> {
		if !self.connect(slot).await? {
			return Err(Error::NotConnected);
		}
		slot.as_mut().ok_or(Error::NotConnected)
	}

	/// Opens detailed search and runs it with `filters`.
	pub async fn search_files_with_filters(&self, filters: &SearchFilters) -> Result<SearchResults> {
		let mut slot = self.driver.lock().await;
		let driver = self.connected(&mut slot).await?;
		driver.navigate_to_file_search().await?;
		driver.search_files(filters).await
	}

	/// Collects the detail bundle of a case listed in the current results.
	pub async fn get_file_complete_details(&self, file_id: &str, case_number: &str) -> Result<DetailBundle> {
		let mut slot = self.driver.lock().await;
		let driver = self.connected(&mut slot).await?;
		driver.get_file_details(file_id, case_number).await
	}

	/// Downloads each document into `target_folder`, returning the paths that
	/// were saved. Individual failures are logged by the driver and skipped.
	pub async fn download_file_documents(
		&self,
		documents: &[DocumentRecord],
		target_folder: &Path,
	) -> Result<Vec<PathBuf>> {
		let mut slot = self.driver.lock().await;
		let driver = self.connected(&mut slot).await?;

		let mut saved = Vec::new();
		for document in documents {
			if let Some(path) = driver.download_document(document, target_folder).await? {
				saved.push(path);
			}
		}
		info!(
			target = "uyap.session",
			requested = documents.len(),
			saved = saved.len(),
			"documents downloaded"
		);
		Ok(saved)
	}

	/// Closes the browser session. The next operation starts a fresh one.
	pub async fn cleanup(&self) {
		let driver = self.driver.lock().await.take();
		if let Some(mut driver) = driver {
			driver.close().await;
			info!(target = "uyap.session", "portal session released");
		}
	}
}
