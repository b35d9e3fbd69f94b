//! Chromium over CDP.
//!
//! [`ChromeLauncher`] first attaches to a browser the user already started with
//! remote debugging (so an existing e-signature login is reused) and only
//! launches a fresh instance when nothing answers at the debugger address.

mod discovery;

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{
	SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use discovery::{CdpVersionInfo, fetch_cdp_endpoint, find_chrome_executable, parse_debugger_address};

use crate::config::DriverConfig;
use crate::error::{Error, Result};
use crate::js;
use crate::page::{BrowserLauncher, PortalPage};

/// What [`PortalPage::close`] does to the browser process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShutdownMode {
	/// Close the browser we launched.
	#[default]
	CloseBrowser,
	/// Drop the CDP connection and leave a user-started browser running.
	KeepBrowserAlive,
}

/// Production [`BrowserLauncher`]: attach first, launch as a fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeLauncher;

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
	async fn launch(&self, config: &DriverConfig) -> Result<Box<dyn PortalPage>> {
		match fetch_cdp_endpoint(&config.debugger_address).await {
			Ok(info) => {
				info!(
					target = "uyap.chrome",
					address = %config.debugger_address,
					browser = ?info.browser,
					"attaching to running browser"
				);
				match ChromePage::connect(&info, ShutdownMode::KeepBrowserAlive, None).await {
					Ok(page) => return Ok(Box::new(page)),
					Err(err) => warn!(target = "uyap.chrome", error = %err, "attach failed, launching a new browser"),
				}
			}
			Err(err) => debug!(target = "uyap.chrome", error = %err, "no running browser to attach to"),
		}

		let page = launch_fresh(config).await?;
		info!(target = "uyap.chrome", "launched new browser session");
		Ok(Box::new(page))
	}
}

/// A browser we spawned. Dropping it kills the process before its profile
/// directory is removed.
struct LaunchedProcess {
	child: Child,
	_profile_dir: tempfile::TempDir,
}

impl Drop for LaunchedProcess {
	fn drop(&mut self) {
		if let Err(e) = self.child.kill() {
			debug!(target = "uyap.chrome", error = %e, "browser process already gone");
		}
		let _ = self.child.wait();
	}
}

struct Connection {
	browser: Browser,
	launched: Option<LaunchedProcess>,
}

/// A [`PortalPage`] backed by one Chromium tab.
pub struct ChromePage {
	page: Page,
	connection: Mutex<Option<Connection>>,
	handler_task: JoinHandle<()>,
	shutdown: ShutdownMode,
}

impl ChromePage {
	async fn connect(
		info: &CdpVersionInfo,
		shutdown: ShutdownMode,
		launched: Option<LaunchedProcess>,
	) -> Result<Self> {
		let (browser, mut handler) = Browser::connect(info.web_socket_debugger_url.clone())
			.await
			.map_err(|e| Error::BrowserLaunch(format!("CDP connect failed: {e}")))?;

		let handler_task = tokio::spawn(async move {
			while let Some(event) = handler.next().await {
				if let Err(e) = event {
					warn!(target = "uyap.chrome", "CDP handler event error: {}", e);
				}
			}
		});

		let page = match browser.new_page("about:blank").await {
			Ok(page) => page,
			Err(e) => {
				handler_task.abort();
				return Err(Error::BrowserLaunch(format!("could not open a tab: {e}")));
			}
		};

		Ok(Self {
			page,
			connection: Mutex::new(Some(Connection { browser, launched })),
			handler_task,
			shutdown,
		})
	}
}

async fn launch_fresh(config: &DriverConfig) -> Result<ChromePage> {
	let executable = config
		.chrome_executable
		.clone()
		.or_else(find_chrome_executable)
		.ok_or_else(|| Error::BrowserLaunch("no Chrome/Chromium executable found".into()))?;

	let (_, port) = parse_debugger_address(&config.debugger_address).ok_or_else(|| {
		Error::BrowserLaunch(format!("invalid debugger address: {}", config.debugger_address))
	})?;

	let profile_dir = tempfile::Builder::new().prefix("uyap-profile-").tempdir()?;
	let args = launch_args(port, profile_dir.path(), config.headless);

	debug!(target = "uyap.chrome", executable = %executable.display(), ?args, "spawning browser");
	let child = Command::new(&executable)
		.args(&args)
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.spawn()
		.map_err(|e| Error::BrowserLaunch(format!("failed to spawn {}: {e}", executable.display())))?;

	let launched = LaunchedProcess {
		child,
		_profile_dir: profile_dir,
	};

	let attempts = config.max_retries.max(1);
	let mut last_error = None;
	for attempt in 1..=attempts {
		tokio::time::sleep(DriverConfig::ms(config.retry_delay_ms)).await;
		match fetch_cdp_endpoint(&config.debugger_address).await {
			Ok(info) => {
				return ChromePage::connect(&info, ShutdownMode::CloseBrowser, Some(launched)).await;
			}
			Err(err) => {
				debug!(target = "uyap.chrome", attempt, error = %err, "browser endpoint not ready");
				last_error = Some(err);
			}
		}
	}

	drop(launched);
	Err(last_error.unwrap_or_else(|| Error::BrowserLaunch("browser did not start".into())))
}

fn launch_args(port: u16, profile_dir: &Path, headless: bool) -> Vec<String> {
	let mut args = vec![
		format!("--remote-debugging-port={port}"),
		format!("--user-data-dir={}", profile_dir.display()),
		"--start-maximized".to_string(),
		"--disable-popup-blocking".to_string(),
		"--disable-notifications".to_string(),
		"--no-first-run".to_string(),
		"--no-default-browser-check".to_string(),
	];
	if headless {
		args.push("--headless=new".to_string());
	}
	args
}

#[async_trait]
impl PortalPage for ChromePage {
	async fn goto(&self, url: &str) -> Result<()> {
		self.page.goto(url).await.map_err(Error::browser)?;
		Ok(())
	}

	async fn url(&self) -> Result<String> {
		Ok(self.page.url().await.map_err(Error::browser)?.unwrap_or_default())
	}

	async fn content(&self) -> Result<String> {
		self.page.content().await.map_err(Error::browser)
	}

	async fn evaluate(&self, expression: &str) -> Result<serde_json::Value> {
		let result = self.page.evaluate(expression).await.map_err(Error::browser)?;
		// `undefined` has no JSON value
		Ok(result
			.into_value::<serde_json::Value>()
			.unwrap_or(serde_json::Value::Null))
	}

	async fn click(&self, selector: &str) -> Result<()> {
		let element = self
			.page
			.find_element(selector)
			.await
			.map_err(|_| Error::not_found(selector))?;
		element.click().await.map_err(Error::browser)?;
		Ok(())
	}

	async fn fill(&self, selector: &str, text: &str) -> Result<()> {
		if !js::as_bool(&self.evaluate(&js::clear_input(selector)).await?) {
			return Err(Error::not_found(selector));
		}
		let element = self
			.page
			.find_element(selector)
			.await
			.map_err(|_| Error::not_found(selector))?;
		element.click().await.map_err(Error::browser)?;
		element.type_str(text).await.map_err(Error::browser)?;
		Ok(())
	}

	async fn count(&self, selector: &str) -> Result<usize> {
		let value = self.evaluate(&js::count(selector)).await?;
		Ok(value.as_u64().unwrap_or(0) as usize)
	}

	async fn go_back(&self) -> Result<()> {
		self.evaluate("window.history.back()").await?;
		Ok(())
	}

	async fn set_download_dir(&self, dir: &Path) -> Result<()> {
		std::fs::create_dir_all(dir)?;
		let dir: PathBuf = std::path::absolute(dir)?;

		let params = SetDownloadBehaviorParams::builder()
			.behavior(SetDownloadBehaviorBehavior::Allow)
			.download_path(dir.to_string_lossy().to_string())
			.build()
			.map_err(Error::Browser)?;

		let guard = self.connection.lock().await;
		let connection = guard.as_ref().ok_or(Error::NotConnected)?;
		connection.browser.execute(params).await.map_err(Error::browser)?;
		debug!(target = "uyap.chrome", dir = %dir.display(), "download directory set");
		Ok(())
	}

	async fn screenshot_to_file(&self, path: &Path) -> Result<()> {
		let params = ScreenshotParams::builder().full_page(true).build();
		self.page
			.save_screenshot(params, path)
			.await
			.map_err(Error::browser)?;
		Ok(())
	}

	async fn close(&self) -> Result<()> {
		let Some(mut connection) = self.connection.lock().await.take() else {
			return Ok(());
		};

		match self.shutdown {
			ShutdownMode::KeepBrowserAlive => {
				debug!(target = "uyap.chrome", "detaching from browser");
			}
			ShutdownMode::CloseBrowser => {
				if let Err(e) = connection.browser.close().await {
					warn!(target = "uyap.chrome", "browser close failed: {}", e);
				}
				let _ = connection.browser.wait().await;
				drop(connection.launched.take());
			}
		}

		self.handler_task.abort();
		Ok(())
	}
}

impl Drop for ChromePage {
	fn drop(&mut self) {
		self.handler_task.abort();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn launch_args_carry_port_and_profile() {
		let args = launch_args(9222, Path::new("/tmp/profile"), false);
		assert!(args.contains(&"--remote-debugging-port=9222".to_string()));
		assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
		assert!(args.contains(&"--disable-popup-blocking".to_string()));
		assert!(!args.iter().any(|a| a.starts_with("--headless")));
	}

	#[cfg(target_os = "linux")]
	#[test]
	fn dropped_launch_kills_process_and_removes_profile() {
		let child = Command::new("sleep").arg("30").spawn().unwrap();
		let pid = child.id();
		let profile = tempfile::tempdir().unwrap();
		let profile_path = profile.path().to_path_buf();

		drop(LaunchedProcess {
			child,
			_profile_dir: profile,
		});

		assert!(!Path::new(&format!("/proc/{pid}")).exists());
		assert!(!profile_path.exists());
	}

	#[test]
	fn headless_flag_is_opt_in() {
		let args = launch_args(9333, Path::new("/tmp/p"), true);
		assert!(args.contains(&"--headless=new".to_string()));
	}
}
