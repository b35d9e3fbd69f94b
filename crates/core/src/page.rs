//! Browser seams.
//!
//! [`PortalPage`] is the subset of page operations the driver needs, and
//! [`BrowserLauncher`] produces one. Production code uses the Chromium
//! implementations in [`crate::chrome`]; tests use a scripted in-memory page.

use std::path::Path;

use async_trait::async_trait;

use crate::config::DriverConfig;
use crate::error::Result;

/// A single controlled browser tab.
#[async_trait]
pub trait PortalPage: Send + Sync {
	/// Navigates to `url` and waits for the load event.
	async fn goto(&self, url: &str) -> Result<()>;

	/// Returns the current page URL.
	async fn url(&self) -> Result<String>;

	/// Returns the full rendered HTML of the page.
	async fn content(&self) -> Result<String>;

	/// Evaluates a JavaScript expression and returns its JSON value.
	async fn evaluate(&self, expression: &str) -> Result<serde_json::Value>;

	/// Clicks the first element matching the CSS `selector`.
	async fn click(&self, selector: &str) -> Result<()>;

	/// Replaces the value of the first input matching `selector` with `text`.
	async fn fill(&self, selector: &str, text: &str) -> Result<()>;

	/// Counts elements matching the CSS `selector`.
	async fn count(&self, selector: &str) -> Result<usize>;

	/// Navigates one step back in history.
	async fn go_back(&self) -> Result<()>;

	/// Directs browser downloads into `dir`.
	async fn set_download_dir(&self, dir: &Path) -> Result<()>;

	/// Saves a full-page PNG screenshot to `path`.
	async fn screenshot_to_file(&self, path: &Path) -> Result<()>;

	/// Releases the browser connection. Must tolerate repeated calls.
	async fn close(&self) -> Result<()>;
}

/// Obtains a [`PortalPage`], attaching to or launching a browser.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
	async fn launch(&self, config: &DriverConfig) -> Result<Box<dyn PortalPage>>;
}
