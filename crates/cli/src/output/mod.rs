//! Result envelope printed on stdout by every command.
//!
//! A successful run carries `data`, a failed one carries `error` with a
//! stable [`ErrorCode`]. Both report `command`, `schemaVersion` and the run
//! time. Downloads list the saved files under `artifacts`.
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": false,
//!   "command": "import",
//!   "error": { "code": "CONFLICT", "message": "case file 2024/123 already exists" },
//!   "timings": { "durationMs": 412 }
//! }
//! ```


use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uyap_protocol::DocumentKind;

/// Bumped on breaking changes to the envelope.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// TOON, compact and easy for agents to read
	#[default]
	Toon,
	/// Pretty-printed JSON
	Json,
	/// One JSON object per line
	Ndjson,
	/// Plain text for terminals
	Text,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,

	pub ok: bool,

	/// Subcommand name: search, details, download or import.
	pub command: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub artifacts: Vec<Artifact>,

	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,

	/// Structured context, e.g. the rejected import outcome.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Failure classes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// No browser answered at the debugger address and none could be started
	BrowserLaunchFailed,
	/// Login did not complete or the session was closed
	NotConnected,
	/// A portal element the scraper relies on was missing
	SelectorNotFound,
	DetailUnavailable,
	Timeout,
	/// Import input was incomplete
	ValidationFailed,
	/// The case file already exists and overwrite was off
	Conflict,
	PersistenceFailed,
	IoError,
	InvalidInput,
	InternalError,
}

impl ErrorCode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorCode::BrowserLaunchFailed => "BROWSER_LAUNCH_FAILED",
			ErrorCode::NotConnected => "NOT_CONNECTED",
			ErrorCode::SelectorNotFound => "SELECTOR_NOT_FOUND",
			ErrorCode::DetailUnavailable => "DETAIL_UNAVAILABLE",
			ErrorCode::Timeout => "TIMEOUT",
			ErrorCode::ValidationFailed => "VALIDATION_FAILED",
			ErrorCode::Conflict => "CONFLICT",
			ErrorCode::PersistenceFailed => "PERSISTENCE_FAILED",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		}
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

/// A document saved into the target folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
	pub path: PathBuf,

	/// Classified from the file name.
	pub kind: DocumentKind,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub size_bytes: Option<u64>,
}

impl Artifact {
	pub fn download(path: PathBuf) -> Self {
		let kind = path
			.file_name()
			.and_then(|name| name.to_str())
			.map_or(DocumentKind::Unknown, DocumentKind::from_filename);
		let size_bytes = std::fs::metadata(&path).ok().map(|m| m.len());
		Self { path, kind, size_bytes }
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
	pub level: DiagnosticLevel,
	pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
	Info,
	Warning,
}

/// Collects a command's outcome. The clock starts when the builder is made.
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	started: Instant,
	artifacts: Vec<Artifact>,
	diagnostics: Vec<Diagnostic>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			started: Instant::now(),
			artifacts: Vec::new(),
			diagnostics: Vec::new(),
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn command_error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn artifacts(mut self, artifacts: impl IntoIterator<Item = Artifact>) -> Self {
		self.artifacts.extend(artifacts);
		self
	}

	pub fn diagnostic(mut self, level: DiagnosticLevel, message: impl Into<String>) -> Self {
		self.diagnostics.push(Diagnostic {
			level,
			message: message.into(),
		});
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			schema_version: Some(SCHEMA_VERSION),
			ok: self.error.is_none() && self.data.is_some(),
			command: self.command,
			data: self.data,
			error: self.error,
			timings: Some(self.started.elapsed().into()),
			artifacts: self.artifacts,
			diagnostics: self.diagnostics,
		}
	}
}

pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	let rendered = match format {
		OutputFormat::Toon => serde_json::to_value(result).map(|value| toon::encode(&value, None)),
		OutputFormat::Json => serde_json::to_string_pretty(result),
		OutputFormat::Ndjson => serde_json::to_string(result),
		OutputFormat::Text => {
			print_text(result);
			return;
		}
	};
	match rendered {
		Ok(text) => println!("{text}"),
		Err(err) => tracing::error!(target = "uyap.cli", error = %err, "could not serialize result"),
	}
}

fn print_text<T: Serialize>(result: &CommandResult<T>) {
	let mut out = io::stdout().lock();

	match (&result.data, &result.error) {
		(_, Some(error)) => {
			let _ = writeln!(out, "{}: {}", error.code, error.message);
		}
		(Some(data), None) => {
			if let Ok(json) = serde_json::to_string_pretty(data) {
				let _ = writeln!(out, "{json}");
			}
		}
		(None, None) => {}
	}

	for diagnostic in &result.diagnostics {
		let level = match diagnostic.level {
			DiagnosticLevel::Info => "note",
			DiagnosticLevel::Warning => "warning",
		};
		let _ = writeln!(out, "{level}: {}", diagnostic.message);
	}

	for artifact in &result.artifacts {
		let _ = writeln!(out, "saved {} ({})", artifact.path.display(), artifact.kind.as_str());
	}
}

/// Human-readable failure line on stderr, printed alongside the envelope.
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("error[{}]: {}", error.code, error.message);
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadData {
	pub case_number: String,
	pub target: PathBuf,
	/// Documents listed on the detail page.
	pub requested: usize,
	pub saved: Vec<PathBuf>,
}
