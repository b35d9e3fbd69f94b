//! Failure diagnostics.
//!
//! When a scrape fails and screenshots are enabled, the page state at the time
//! of failure is saved as a PNG plus the rendered HTML. Collection never
//! fails the caller: problems are logged and the original error is reported.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::page::PortalPage;

/// Paths written by [`collect_failure_artifacts`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectedArtifacts {
	pub screenshot: Option<PathBuf>,
	pub html: Option<PathBuf>,
}

impl CollectedArtifacts {
	pub fn is_empty(&self) -> bool {
		self.screenshot.is_none() && self.html.is_none()
	}
}

/// Saves `<operation>-<millis>-failure.{png,html}` into `dir`.
pub async fn collect_failure_artifacts(
	page: &dyn PortalPage,
	dir: &Path,
	operation: &str,
) -> CollectedArtifacts {
	let mut collected = CollectedArtifacts::default();

	let timestamp = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis())
		.unwrap_or(0);

	if let Err(e) = std::fs::create_dir_all(dir) {
		warn!(target = "uyap.driver", "Failed to create screenshot directory: {}", e);
		return collected;
	}

	let screenshot_path = dir.join(format!("{operation}-{timestamp}-failure.png"));
	match page.screenshot_to_file(&screenshot_path).await {
		Ok(()) => collected.screenshot = Some(screenshot_path),
		Err(e) => warn!(target = "uyap.driver", "Failed to capture screenshot: {}", e),
	}

	let html_path = dir.join(format!("{operation}-{timestamp}-failure.html"));
	match page.content().await {
		Ok(html) => match std::fs::write(&html_path, html) {
			Ok(()) => collected.html = Some(html_path),
			Err(e) => warn!(target = "uyap.driver", "Failed to write HTML file: {}", e),
		},
		Err(e) => warn!(target = "uyap.driver", "Failed to capture HTML content: {}", e),
	}

	debug!(
		target = "uyap.driver",
		"Collected failure artifacts in {}: {:?}",
		dir.display(),
		collected
	);
	collected
}
