//! Driver configuration.
//!
//! Every field has a default matching the portal's observed behavior, so an
//! empty JSON object is a valid configuration. Durations are milliseconds.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Portal entry point.
pub const DEFAULT_PORTAL_URL: &str = "https://avukatbeta.uyap.gov.tr";

/// Remote debugging address of a user-started browser to attach to.
pub const DEFAULT_DEBUGGER_ADDRESS: &str = "localhost:9222";

/// Configuration for [`PortalDriver`](crate::PortalDriver) and the browser launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
	pub portal_url: String,
	/// `host:port` of an already running browser with remote debugging enabled.
	pub debugger_address: String,
	/// Browser binary to launch when attaching fails. Auto-detected when unset.
	pub chrome_executable: Option<PathBuf>,
	/// Run a launched browser headless. Login needs a visible window, so this is
	/// only useful for tests against a pre-authenticated profile.
	pub headless: bool,
	/// Where the browser saves downloads before they are moved to a target folder.
	pub downloads_dir: PathBuf,
	/// Save a screenshot and the page HTML when a scrape fails.
	pub screenshot_on_error: bool,
	pub screenshot_dir: PathBuf,

	/// Upper bound on waiting for an element to appear.
	pub element_wait_ms: u64,
	/// Upper bound on waiting for the navigation menu during a login check.
	pub login_check_ms: u64,
	pub login_timeout_ms: u64,
	pub login_poll_ms: u64,
	/// More than this many navigation menu items counts as logged in.
	pub login_menu_threshold: usize,

	/// Settle delay after opening the portal or a detail page.
	pub page_settle_ms: u64,
	/// Settle delay after submitting a search.
	pub search_settle_ms: u64,
	/// Settle delay after switching a detail tab or opening a dropdown.
	pub tab_settle_ms: u64,
	/// Settle delay after navigating back from a detail page.
	pub back_settle_ms: u64,

	pub download_timeout_ms: u64,
	pub download_poll_ms: u64,
	pub duplicate_handling: DuplicateHandling,

	/// Endpoint probes after launching a browser before giving up.
	pub max_retries: u32,
	pub retry_delay_ms: u64,
}

impl Default for DriverConfig {
	fn default() -> Self {
		Self {
			portal_url: DEFAULT_PORTAL_URL.to_string(),
			debugger_address: DEFAULT_DEBUGGER_ADDRESS.to_string(),
			chrome_executable: None,
			headless: false,
			downloads_dir: PathBuf::from("uploads").join("uyap"),
			screenshot_on_error: true,
			screenshot_dir: PathBuf::from("error_screenshots"),
			element_wait_ms: 30_000,
			login_check_ms: 10_000,
			login_timeout_ms: 300_000,
			login_poll_ms: 2_000,
			login_menu_threshold: 3,
			page_settle_ms: 3_000,
			search_settle_ms: 5_000,
			tab_settle_ms: 2_000,
			back_settle_ms: 2_000,
			download_timeout_ms: 60_000,
			download_poll_ms: 1_000,
			duplicate_handling: DuplicateHandling::Rename,
			max_retries: 3,
			retry_delay_ms: 2_000,
		}
	}
}

impl DriverConfig {
	pub fn login_timeout(&self) -> Duration {
		Duration::from_millis(self.login_timeout_ms)
	}

	pub(crate) fn ms(value: u64) -> Duration {
		Duration::from_millis(value)
	}
}

/// What to do when a downloaded document already exists in the target folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateHandling {
	/// Keep the existing file and report it as the result.
	Skip,
	/// Replace the existing file.
	Overwrite,
	/// Save under `name (1).ext`, `name (2).ext`, ...
	#[default]
	Rename,
}
