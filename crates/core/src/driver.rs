//! The portal driver: one browser tab, portal navigation, record extraction.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uyap_protocol::{DetailBundle, DocumentRecord, ScrapeStats, SearchFilters, SearchResults};

use crate::artifacts::collect_failure_artifacts;
use crate::config::DriverConfig;
use crate::error::{Error, Result};
use crate::files::{place_download, sanitize_filename, wait_for_download};
use crate::page::{BrowserLauncher, PortalPage};
use crate::{js, scrape, selectors};

/// Interval between checks while waiting for an element to show up.
const ELEMENT_POLL: Duration = Duration::from_millis(250);

/// Login heuristic: an authenticated session shows more navigation menu
/// entries than the anonymous landing page.
///
/// This is an observation about the current portal, not a guarantee. A portal
/// redesign can make it report either state wrongly.
pub fn menu_items_indicate_login(menu_items: usize, threshold: usize) -> bool {
	menu_items > threshold
}

fn unix_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}

/// Drives a single browser session against the portal.
///
/// Operations other than [`close`](Self::close) fail with
/// [`Error::NotConnected`] once the driver has been closed.
pub struct PortalDriver {
	config: DriverConfig,
	page: Option<Box<dyn PortalPage>>,
	logged_in: bool,
}

impl PortalDriver {
	/// Obtains a browser through `launcher` and opens the portal.
	///
	/// The download directory is configured on a best-effort basis; the portal
	/// must load for the driver to be returned.
	pub async fn start(config: DriverConfig, launcher: &dyn BrowserLauncher) -> Result<Self> {
		let page = launcher.launch(&config).await?;

		if let Err(e) = page.set_download_dir(&config.downloads_dir).await {
			warn!(target = "uyap.driver", error = %e, "could not set download directory");
		}

		if let Err(e) = page.goto(&config.portal_url).await {
			let _ = page.close().await;
			return Err(e);
		}
		tokio::time::sleep(DriverConfig::ms(config.page_settle_ms)).await;

		info!(target = "uyap.driver", url = %config.portal_url, "portal opened");
		Ok(Self::with_page(config, page))
	}

	/// Wraps a page that is already open.
	pub fn with_page(config: DriverConfig, page: Box<dyn PortalPage>) -> Self {
		Self {
			config,
			page: Some(page),
			logged_in: false,
		}
	}

	pub fn config(&self) -> &DriverConfig {
		&self.config
	}

	pub fn is_open(&self) -> bool {
		self.page.is_some()
	}

	/// Result of the most recent login check.
	pub fn session_active(&self) -> bool {
		self.logged_in && self.page.is_some()
	}

	fn page(&self) -> Result<&dyn PortalPage> {
		self.page.as_deref().ok_or(Error::NotConnected)
	}

	/// Checks the login heuristic, waiting a bounded time for the menu to render.
	///
	/// Returns `false` when the menu never appears.
	pub async fn is_logged_in(&mut self) -> bool {
		let Ok(page) = self.page() else {
			return false;
		};

		let deadline = Instant::now() + DriverConfig::ms(self.config.login_check_ms);
		let menu_items = loop {
			match page.count(selectors::MENU_ITEM).await {
				Ok(n) if n > 0 => break n,
				Ok(_) => {}
				Err(e) => debug!(target = "uyap.driver", error = %e, "menu lookup failed"),
			}
			if Instant::now() >= deadline {
				warn!(target = "uyap.driver", "login state could not be determined");
				self.logged_in = false;
				return false;
			}
			tokio::time::sleep(ELEMENT_POLL).await;
		};

		let logged_in = menu_items_indicate_login(menu_items, self.config.login_menu_threshold);
		debug!(target = "uyap.driver", menu_items, logged_in, "login check");
		self.logged_in = logged_in;
		logged_in
	}

	/// Polls the login check until it passes or `timeout` elapses.
	///
	/// Login is performed by a person with e-signature hardware; a timeout is
	/// an expected outcome and returns `false`.
	pub async fn wait_for_login(&mut self, timeout: Duration) -> bool {
		info!(target = "uyap.driver", timeout_ms = timeout.as_millis() as u64, "waiting for e-signature login");
		let deadline = Instant::now() + timeout;
		loop {
			if self.is_logged_in().await {
				info!(target = "uyap.driver", "login detected");
				return true;
			}
			if Instant::now() >= deadline {
				error!(target = "uyap.driver", "login wait timed out");
				return false;
			}
			tokio::time::sleep(DriverConfig::ms(self.config.login_poll_ms)).await;
		}
	}

	/// Opens the detailed search page from the portal home.
	pub async fn navigate_to_file_search(&self) -> Result<()> {
		self.click_text_when_ready(
			selectors::DETAILED_SEARCH_TILE,
			&[selectors::DETAILED_SEARCH_TEXT],
			"detailed search",
		)
		.await?;
		tokio::time::sleep(DriverConfig::ms(self.config.page_settle_ms)).await;
		info!(target = "uyap.driver", "detailed search opened");
		Ok(())
	}

	/// Applies `filters`, submits the search and parses the results grid.
	///
	/// A filter that cannot be applied yields an empty result. Unparseable
	/// rows are skipped and counted in the returned stats.
	pub async fn search_files(&self, filters: &SearchFilters) -> Result<SearchResults> {
		let result = self.search_inner(filters).await;
		if let Err(e) = &result {
			error!(target = "uyap.driver", error = %e, "search failed");
			self.capture_failure("search").await;
		}
		result
	}

	async fn search_inner(&self, filters: &SearchFilters) -> Result<SearchResults> {
		let page = self.page()?;

		if let Err(e) = self.apply_filters(filters).await {
			error!(target = "uyap.driver", error = %e, "filters could not be applied");
			return Ok(SearchResults::default());
		}

		self.click_text_when_ready(selectors::SUBMIT_BUTTON, &[selectors::SUBMIT_TEXT], "search button")
			.await?;
		tokio::time::sleep(DriverConfig::ms(self.config.search_settle_ms)).await;

		let html = page.content().await?;
		let results = scrape::parse_search_results(&html, unix_now())?;
		info!(
			target = "uyap.driver",
			found = results.records.len(),
			skipped = results.stats.skipped(),
			"search complete"
		);
		Ok(results)
	}

	async fn apply_filters(&self, filters: &SearchFilters) -> Result<()> {
		let page = self.page()?;

		if let Some(kind) = filters.jurisdiction_type() {
			self.wait_for_selector(selectors::DROPDOWN_BUTTON).await?;
			page.click(selectors::DROPDOWN_BUTTON).await?;
			self.click_text_when_ready(selectors::DROPDOWN_OPTION, &[kind], "jurisdiction option")
				.await?;
			tokio::time::sleep(DriverConfig::ms(self.config.tab_settle_ms)).await;
		}

		let inputs = [
			(filters.start_date(), selectors::START_DATE_INPUT),
			(filters.end_date(), selectors::END_DATE_INPUT),
			(filters.search(), selectors::SEARCH_INPUT),
		];
		for (value, selector) in inputs {
			if let Some(value) = value {
				page.fill(selector, value).await?;
			}
		}

		Ok(())
	}

	/// Opens the detail page of `case_number` from the results grid and
	/// collects basic info, parties, expenses and documents.
	///
	/// Fails only when the detail page cannot be opened; each section is
	/// best-effort and may come back empty.
	pub async fn get_file_details(&self, file_id: &str, case_number: &str) -> Result<DetailBundle> {
		let result = self.details_inner(file_id, case_number).await;
		if let Err(e) = &result {
			error!(target = "uyap.driver", case_number, error = %e, "details failed");
			self.capture_failure("details").await;
		}
		result
	}

	async fn details_inner(&self, file_id: &str, case_number: &str) -> Result<DetailBundle> {
		let page = self.page()?;

		let opened = js::as_bool(&page.evaluate(&js::click_detail_link(case_number)).await?);
		if !opened {
			return Err(Error::DetailUnavailable {
				case_number: case_number.to_string(),
			});
		}
		tokio::time::sleep(DriverConfig::ms(self.config.page_settle_ms)).await;

		let html = page.content().await?;
		let mut bundle = DetailBundle {
			basic_info: scrape::parse_basic_info(&html, case_number)?,
			..Default::default()
		};

		if let Some(html) = self.open_tab(selectors::PARTIES_TAB).await {
			(bundle.parties, bundle.stats.parties) = section("parties", scrape::parse_parties(&html));
		}
		if let Some(html) = self.open_tab(selectors::EXPENSES_TAB).await {
			(bundle.expenses, bundle.stats.expenses) = section("expenses", scrape::parse_expenses(&html));
		}
		if let Some(html) = self.open_tab(selectors::DOCUMENTS_TAB).await {
			let page_url = page.url().await.ok().filter(|u| !u.is_empty());
			(bundle.documents, bundle.stats.documents) =
				section("documents", scrape::parse_documents(&html, page_url.as_deref()));
		}

		if let Err(e) = page.go_back().await {
			warn!(target = "uyap.driver", error = %e, "could not navigate back to results");
		}
		tokio::time::sleep(DriverConfig::ms(self.config.back_settle_ms)).await;

		info!(
			target = "uyap.driver",
			file_id,
			case_number,
			parties = bundle.parties.len(),
			expenses = bundle.expenses.len(),
			documents = bundle.documents.len(),
			"details collected"
		);
		Ok(bundle)
	}

	/// Clicks a detail tab and returns the page HTML once it has settled.
	async fn open_tab(&self, names: &[&str]) -> Option<String> {
		let page = self.page().ok()?;
		match page.evaluate(&js::click_by_text(selectors::TAB_HEADER, names)).await {
			Ok(v) if js::as_bool(&v) => {}
			Ok(_) => {
				warn!(target = "uyap.driver", tab = names[0], "tab not found");
				return None;
			}
			Err(e) => {
				warn!(target = "uyap.driver", tab = names[0], error = %e, "tab click failed");
				return None;
			}
		}
		tokio::time::sleep(DriverConfig::ms(self.config.tab_settle_ms)).await;

		match page.content().await {
			Ok(html) => Some(html),
			Err(e) => {
				warn!(target = "uyap.driver", tab = names[0], error = %e, "tab content unavailable");
				None
			}
		}
	}

	/// Clicks the download link of `document` and moves the finished file into
	/// `target_folder` under its sanitized name.
	///
	/// Returns `Ok(None)` when the link is missing, the download times out, or
	/// the file cannot be moved.
	pub async fn download_document(
		&self,
		document: &DocumentRecord,
		target_folder: &Path,
	) -> Result<Option<PathBuf>> {
		let page = self.page()?;
		let filename = sanitize_filename(&document.name);

		let Some(url) = document.download_url.as_deref() else {
			warn!(target = "uyap.driver", document = %document.name, "document has no download link");
			return Ok(None);
		};

		match page.evaluate(&js::click_anchor_with_href(url)).await {
			Ok(v) if js::as_bool(&v) => {}
			Ok(_) => {
				warn!(target = "uyap.driver", document = %document.name, "download link not on page");
				return Ok(None);
			}
			Err(e) => {
				error!(target = "uyap.driver", document = %document.name, error = %e, "download click failed");
				return Ok(None);
			}
		}

		let Some(finished) = wait_for_download(
			&self.config.downloads_dir,
			&filename,
			DriverConfig::ms(self.config.download_timeout_ms),
			DriverConfig::ms(self.config.download_poll_ms),
		)
		.await
		else {
			error!(target = "uyap.driver", document = %document.name, "download timed out");
			return Ok(None);
		};

		match place_download(&finished, target_folder, &filename, self.config.duplicate_handling) {
			Ok(path) => {
				info!(target = "uyap.driver", path = %path.display(), "document downloaded");
				Ok(Some(path))
			}
			Err(e) => {
				error!(target = "uyap.driver", document = %document.name, error = %e, "could not place download");
				Ok(None)
			}
		}
	}

	/// Releases the browser session. Idempotent and never fails.
	pub async fn close(&mut self) {
		self.logged_in = false;
		let Some(page) = self.page.take() else {
			return;
		};
		match page.close().await {
			Ok(()) => info!(target = "uyap.driver", "browser session closed"),
			Err(e) => error!(target = "uyap.driver", error = %e, "error while closing browser session"),
		}
	}

	async fn wait_for_selector(&self, selector: &str) -> Result<()> {
		let page = self.page()?;
		let deadline = Instant::now() + DriverConfig::ms(self.config.element_wait_ms);
		loop {
			if page.count(selector).await? > 0 {
				return Ok(());
			}
			if Instant::now() >= deadline {
				return Err(Error::Timeout {
					ms: self.config.element_wait_ms,
					condition: format!("selector {selector}"),
				});
			}
			tokio::time::sleep(ELEMENT_POLL).await;
		}
	}

	async fn click_text_when_ready(&self, candidates: &str, needles: &[&str], what: &str) -> Result<()> {
		let page = self.page()?;
		let script = js::click_by_text(candidates, needles);
		let deadline = Instant::now() + DriverConfig::ms(self.config.element_wait_ms);
		loop {
			if js::as_bool(&page.evaluate(&script).await?) {
				return Ok(());
			}
			if Instant::now() >= deadline {
				return Err(Error::not_found(what));
			}
			tokio::time::sleep(ELEMENT_POLL).await;
		}
	}

	async fn capture_failure(&self, operation: &str) {
		if !self.config.screenshot_on_error {
			return;
		}
		let Some(page) = self.page.as_deref() else {
			return;
		};
		let collected = collect_failure_artifacts(page, &self.config.screenshot_dir, operation).await;
		if !collected.is_empty() {
			info!(
				target = "uyap.driver",
				screenshot = ?collected.screenshot,
				html = ?collected.html,
				"saved failure artifacts"
			);
		}
	}
}

/// Unwraps a best-effort section parse, logging skipped rows.
fn section<T>(name: &str, parsed: Result<(Vec<T>, ScrapeStats)>) -> (Vec<T>, ScrapeStats) {
	match parsed {
		Ok((items, stats)) => {
			if stats.skipped() > 0 {
				warn!(target = "uyap.driver", section = name, skipped = stats.skipped(), "rows skipped");
			}
			(items, stats)
		}
		Err(e) => {
			warn!(target = "uyap.driver", section = name, error = %e, "section could not be parsed");
			(Vec::new(), ScrapeStats::default())
		}
	}
}
