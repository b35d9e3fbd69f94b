//! Locating a debuggable Chromium: `/json/version` probing and binary lookup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// `/json/version` response subset from Chrome DevTools Protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpVersionInfo {
	#[serde(rename = "webSocketDebuggerUrl")]
	pub web_socket_debugger_url: String,
	#[serde(rename = "Browser")]
	pub browser: Option<String>,
}

/// Splits a `host:port` debugger address, defaulting the host to localhost.
pub fn parse_debugger_address(address: &str) -> Option<(String, u16)> {
	let address = address.trim();
	let address = address
		.strip_prefix("http://")
		.or_else(|| address.strip_prefix("ws://"))
		.unwrap_or(address)
		.trim_end_matches('/');

	let (host, port) = match address.rsplit_once(':') {
		Some((host, port)) => (host, port),
		None => ("localhost", address),
	};
	let port = port.parse().ok()?;
	let host = if host.is_empty() { "localhost" } else { host };
	Some((host.to_string(), port))
}

/// Resolves CDP version metadata from `/json/version` at `address`.
pub async fn fetch_cdp_endpoint(address: &str) -> Result<CdpVersionInfo> {
	let (host, port) = parse_debugger_address(address)
		.ok_or_else(|| Error::BrowserLaunch(format!("invalid debugger address: {address}")))?;

	let client = reqwest::Client::builder()
		.timeout(Duration::from_millis(400))
		.build()
		.map_err(|e| Error::BrowserLaunch(format!("Failed to create HTTP client: {e}")))?;
	let mut last_error = "no response".to_string();

	let mut urls = vec![format!("http://{host}:{port}/json/version")];
	if host == "localhost" {
		urls.push(format!("http://127.0.0.1:{port}/json/version"));
		urls.push(format!("http://[::1]:{port}/json/version"));
	}

	for url in urls {
		let response = match client.get(&url).send().await {
			Ok(r) => r,
			Err(e) => {
				last_error = e.to_string();
				continue;
			}
		};

		if !response.status().is_success() {
			last_error = format!("unexpected status {}", response.status());
			continue;
		}

		let info: CdpVersionInfo = response
			.json()
			.await
			.map_err(|e| Error::BrowserLaunch(format!("Failed to parse CDP response: {e}")))?;
		debug!(target = "uyap.chrome", url = %url, browser = ?info.browser, "discovered CDP endpoint");
		return Ok(info);
	}

	Err(Error::BrowserLaunch(format!(
		"no browser with remote debugging at {address}: {last_error}"
	)))
}

/// Finds an installed Chromium-family browser.
pub fn find_chrome_executable() -> Option<PathBuf> {
	let candidates: Vec<String> = if cfg!(target_os = "macos") {
		vec![
			"/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
			"/Applications/Chromium.app/Contents/MacOS/Chromium",
			"/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
		]
		.into_iter()
		.map(str::to_string)
		.collect()
	} else if cfg!(target_os = "windows") {
		windows_browser_candidates()
	} else {
		vec![
			"google-chrome-stable",
			"google-chrome",
			"chromium-browser",
			"chromium",
			"/usr/bin/google-chrome-stable",
			"/usr/bin/google-chrome",
			"/usr/bin/chromium-browser",
			"/usr/bin/chromium",
			"/snap/bin/chromium",
		]
		.into_iter()
		.map(str::to_string)
		.collect()
	};

	for candidate in candidates {
		if candidate.starts_with('/') || candidate.contains('\\') || candidate.contains(':') {
			if Path::new(&candidate).exists() {
				return Some(PathBuf::from(candidate));
			}
		} else if let Ok(path) = which::which(&candidate) {
			return Some(path);
		}
	}

	None
}

fn windows_browser_candidates() -> Vec<String> {
	let mut candidates = Vec::new();

	let mut roots = Vec::new();
	for key in ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"] {
		if let Ok(value) = std::env::var(key) {
			roots.push(PathBuf::from(value));
		}
	}
	if roots.is_empty() {
		roots.push(PathBuf::from(r"C:\Program Files"));
		roots.push(PathBuf::from(r"C:\Program Files (x86)"));
	}

	let suffixes: &[&[&str]] = &[
		&["Google", "Chrome", "Application", "chrome.exe"],
		&["Microsoft", "Edge", "Application", "msedge.exe"],
		&["Chromium", "Application", "chrome.exe"],
	];

	for root in roots {
		for suffix in suffixes {
			let mut path = root.clone();
			for component in *suffix {
				path.push(component);
			}
			candidates.push(path.to_string_lossy().to_string());
		}
	}

	candidates.extend(["chrome.exe", "msedge.exe"].map(str::to_string));
	candidates
}
