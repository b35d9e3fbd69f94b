use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// No browser could be attached to or launched.
	#[error("browser launch failed: {0}")]
	BrowserLaunch(String),

	/// A CDP call against a live browser failed.
	#[error("browser error: {0}")]
	Browser(String),

	/// The session is closed, or login never completed.
	#[error("not connected to the portal (browser closed or login not completed)")]
	NotConnected,

	#[error("element not found: {what}")]
	ElementNotFound { what: String },

	#[error("invalid selector: {0}")]
	InvalidSelector(String),

	/// The detail page for a case could not be opened.
	#[error("detail page unavailable for case {case_number}")]
	DetailUnavailable { case_number: String },

	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	#[error("could not move download to {path}")]
	Download {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl Error {
	pub(crate) fn browser(err: impl std::fmt::Display) -> Self {
		Error::Browser(err.to_string())
	}

	pub(crate) fn not_found(what: impl Into<String>) -> Self {
		Error::ElementNotFound { what: what.into() }
	}
}
