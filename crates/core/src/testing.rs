//! Browser-free test doubles for [`PortalPage`] and [`BrowserLauncher`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::DriverConfig;
use crate::error::{Error, Result};
use crate::page::{BrowserLauncher, PortalPage};

/// A call made against a [`MockPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
	Goto(String),
	Click(String),
	Fill(String, String),
	GoBack,
	SetDownloadDir(PathBuf),
	Screenshot(PathBuf),
	Close,
}

#[derive(Debug, Clone)]
enum Effect {
	None,
	/// Replace the page HTML, keeping the old one for `go_back`.
	Navigate(String),
	/// Replace the page HTML in place (tab switch).
	Show(String),
	/// Drop a finished download on disk.
	WriteFile(PathBuf, Vec<u8>),
}

#[derive(Debug, Clone)]
struct Rule {
	needle: String,
	result: Value,
	effect: Effect,
}

#[derive(Debug, Default)]
struct MockState {
	url: String,
	html: String,
	history: Vec<String>,
	counts: HashMap<String, usize>,
	rules: Vec<Rule>,
	actions: Vec<MockAction>,
	evaluations: usize,
	fail_goto: bool,
}

/// Scripted page. Clones share state, so a test keeps a handle after giving
/// the page to a driver.
///
/// Evaluated scripts are matched against registered rules by substring; the
/// first match wins and unmatched scripts evaluate to `false`.
#[derive(Debug, Clone, Default)]
pub struct MockPage {
	state: Arc<Mutex<MockState>>,
}

impl MockPage {
	pub fn new(url: &str, html: &str) -> Self {
		let page = Self::default();
		{
			let mut state = page.lock();
			state.url = url.to_string();
			state.html = html.to_string();
		}
		page
	}

	fn lock(&self) -> MutexGuard<'_, MockState> {
		self.state.lock().unwrap_or_else(|e| e.into_inner())
	}

	fn rule(self, needle: &str, result: Value, effect: Effect) -> Self {
		self.lock().rules.push(Rule {
			needle: needle.to_string(),
			result,
			effect,
		});
		self
	}

	/// Scripts containing `needle` evaluate to `result`.
	pub fn on_evaluate(self, needle: &str, result: Value) -> Self {
		self.rule(needle, result, Effect::None)
	}

	/// Scripts containing `needle` succeed and load `html` as a new page.
	pub fn on_click_navigate(self, needle: &str, html: &str) -> Self {
		self.rule(needle, Value::Bool(true), Effect::Navigate(html.to_string()))
	}

	/// Scripts containing `needle` succeed and swap the page HTML.
	pub fn on_click_show(self, needle: &str, html: &str) -> Self {
		self.rule(needle, Value::Bool(true), Effect::Show(html.to_string()))
	}

	/// Scripts containing `needle` succeed and write `bytes` to `path`.
	pub fn on_click_download(self, needle: &str, path: &Path, bytes: &[u8]) -> Self {
		self.rule(
			needle,
			Value::Bool(true),
			Effect::WriteFile(path.to_path_buf(), bytes.to_vec()),
		)
	}

	pub fn with_count(self, selector: &str, count: usize) -> Self {
		self.set_count(selector, count);
		self
	}

	pub fn set_count(&self, selector: &str, count: usize) {
		self.lock().counts.insert(selector.to_string(), count);
	}

	pub fn failing_goto(self) -> Self {
		self.lock().fail_goto = true;
		self
	}

	pub fn actions(&self) -> Vec<MockAction> {
		self.lock().actions.clone()
	}

	pub fn evaluations(&self) -> usize {
		self.lock().evaluations
	}

	pub fn html(&self) -> String {
		self.lock().html.clone()
	}

	pub fn is_closed(&self) -> bool {
		self.lock().actions.contains(&MockAction::Close)
	}
}

#[async_trait]
impl PortalPage for MockPage {
	async fn goto(&self, url: &str) -> Result<()> {
		let mut state = self.lock();
		if state.fail_goto {
			return Err(Error::Browser(format!("navigation to {url} failed")));
		}
		state.actions.push(MockAction::Goto(url.to_string()));
		state.url = url.to_string();
		Ok(())
	}

	async fn url(&self) -> Result<String> {
		Ok(self.lock().url.clone())
	}

	async fn content(&self) -> Result<String> {
		Ok(self.lock().html.clone())
	}

	async fn evaluate(&self, expression: &str) -> Result<Value> {
		let mut state = self.lock();
		state.evaluations += 1;
		let Some(rule) = state
			.rules
			.iter()
			.find(|r| expression.contains(&r.needle))
			.cloned()
		else {
			return Ok(Value::Bool(false));
		};

		match rule.effect {
			Effect::None => {}
			Effect::Navigate(html) => {
				let previous = std::mem::replace(&mut state.html, html);
				state.history.push(previous);
			}
			Effect::Show(html) => state.html = html,
			Effect::WriteFile(path, bytes) => std::fs::write(&path, bytes)?,
		}
		Ok(rule.result)
	}

	async fn click(&self, selector: &str) -> Result<()> {
		self.lock().actions.push(MockAction::Click(selector.to_string()));
		Ok(())
	}

	async fn fill(&self, selector: &str, text: &str) -> Result<()> {
		self.lock()
			.actions
			.push(MockAction::Fill(selector.to_string(), text.to_string()));
		Ok(())
	}

	async fn count(&self, selector: &str) -> Result<usize> {
		Ok(self.lock().counts.get(selector).copied().unwrap_or(0))
	}

	async fn go_back(&self) -> Result<()> {
		let mut state = self.lock();
		state.actions.push(MockAction::GoBack);
		if let Some(previous) = state.history.pop() {
			state.html = previous;
		}
		Ok(())
	}

	async fn set_download_dir(&self, dir: &Path) -> Result<()> {
		self.lock().actions.push(MockAction::SetDownloadDir(dir.to_path_buf()));
		Ok(())
	}

	async fn screenshot_to_file(&self, path: &Path) -> Result<()> {
		std::fs::write(path, b"\x89PNG")?;
		self.lock().actions.push(MockAction::Screenshot(path.to_path_buf()));
		Ok(())
	}

	async fn close(&self) -> Result<()> {
		self.lock().actions.push(MockAction::Close);
		Ok(())
	}
}

/// Hands out clones of one [`MockPage`] and counts launches.
#[derive(Debug, Clone, Default)]
pub struct MockLauncher {
	page: MockPage,
	launches: Arc<AtomicUsize>,
	fail: Arc<AtomicBool>,
	delay: Duration,
}

impl MockLauncher {
	pub fn new(page: MockPage) -> Self {
		Self {
			page,
			..Default::default()
		}
	}

	/// Sleeps before each launch so concurrent callers overlap.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	pub fn set_failing(&self, fail: bool) {
		self.fail.store(fail, Ordering::SeqCst);
	}

	pub fn launches(&self) -> usize {
		self.launches.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl BrowserLauncher for MockLauncher {
	async fn launch(&self, _config: &DriverConfig) -> Result<Box<dyn PortalPage>> {
		tokio::time::sleep(self.delay).await;
		if self.fail.load(Ordering::SeqCst) {
			return Err(Error::BrowserLaunch("no browser available".into()));
		}
		self.launches.fetch_add(1, Ordering::SeqCst);
		Ok(Box::new(self.page.clone()))
	}
}

/// A config with every delay and timeout zeroed and all paths under `root`.
pub fn instant_config(root: &Path) -> DriverConfig {
	DriverConfig {
		portal_url: "https://portal.test".into(),
		downloads_dir: root.join("downloads"),
		screenshot_dir: root.join("screenshots"),
		element_wait_ms: 0,
		login_check_ms: 0,
		login_timeout_ms: 0,
		login_poll_ms: 0,
		page_settle_ms: 0,
		search_settle_ms: 0,
		tab_settle_ms: 0,
		back_settle_ms: 0,
		download_timeout_ms: 0,
		download_poll_ms: 0,
		retry_delay_ms: 0,
		..Default::default()
	}
}
