use std::path::PathBuf;

use thiserror::Error;
use uyap_protocol::{ImportErrorKind, ImportOutcome};

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Driver(#[from] uyap::Error),

	#[error(transparent)]
	Store(#[from] uyap_store::Error),

	/// The store rejected an import. The outcome carries the reason.
	#[error("import failed: {}", .0.error.as_deref().unwrap_or("unknown reason"))]
	Import(ImportOutcome),

	#[error("could not read config {path}")]
	Config {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},

	#[error("invalid input: {0}")]
	InvalidInput(String),
}

impl CliError {
	/// Maps the failure onto the envelope's error block.
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			CliError::Driver(err) => driver_error(err),
			CliError::Store(uyap_store::Error::Sqlite(err)) => (ErrorCode::PersistenceFailed, err.to_string(), None),
			CliError::Store(uyap_store::Error::Io(err)) => (ErrorCode::IoError, err.to_string(), None),
			CliError::Import(outcome) => {
				let code = match outcome.error_kind {
					Some(ImportErrorKind::Validation) => ErrorCode::ValidationFailed,
					Some(ImportErrorKind::Conflict) => ErrorCode::Conflict,
					Some(ImportErrorKind::Persistence) => ErrorCode::PersistenceFailed,
					None => ErrorCode::InternalError,
				};
				let message = outcome.error.clone().unwrap_or_else(|| self.to_string());
				(code, message, serde_json::to_value(outcome).ok())
			}
			CliError::Config { path, source } => (
				ErrorCode::InvalidInput,
				format!("Could not read config {}: {source:#}", path.display()),
				Some(serde_json::json!({ "path": path })),
			),
			CliError::InvalidInput(msg) => (ErrorCode::InvalidInput, msg.clone(), None),
		};

		CommandError {
			code,
			message,
			details,
		}
	}
}

fn driver_error(err: &uyap::Error) -> (ErrorCode, String, Option<serde_json::Value>) {
	use uyap::Error;

	match err {
		Error::BrowserLaunch(msg) => (ErrorCode::BrowserLaunchFailed, msg.clone(), None),
		Error::NotConnected => (ErrorCode::NotConnected, err.to_string(), None),
		Error::ElementNotFound { what } => (
			ErrorCode::SelectorNotFound,
			format!("Portal element not found: {what}"),
			Some(serde_json::json!({ "element": what })),
		),
		Error::DetailUnavailable { case_number } => (
			ErrorCode::DetailUnavailable,
			err.to_string(),
			Some(serde_json::json!({ "case_number": case_number })),
		),
		Error::Timeout { ms, condition } => (
			ErrorCode::Timeout,
			format!("Timeout after {ms}ms waiting for: {condition}"),
			Some(serde_json::json!({ "timeout_ms": ms, "condition": condition })),
		),
		Error::Download { path, source } => (
			ErrorCode::IoError,
			format!("Could not move download to {}: {source}", path.display()),
			Some(serde_json::json!({ "path": path })),
		),
		Error::Io(io) => (ErrorCode::IoError, io.to_string(), None),
		Error::Browser(_) | Error::InvalidSelector(_) | Error::Json(_) => (ErrorCode::InternalError, err.to_string(), None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn driver_errors_map_to_codes() {
		let cases = [
			(uyap::Error::BrowserLaunch("no chrome".into()), ErrorCode::BrowserLaunchFailed),
			(uyap::Error::NotConnected, ErrorCode::NotConnected),
			(
				uyap::Error::ElementNotFound {
					what: "detailed search".into(),
				},
				ErrorCode::SelectorNotFound,
			),
			(
				uyap::Error::DetailUnavailable {
					case_number: "2024/1".into(),
				},
				ErrorCode::DetailUnavailable,
			),
			(
				uyap::Error::Timeout {
					ms: 10,
					condition: "menu".into(),
				},
				ErrorCode::Timeout,
			),
			(uyap::Error::Browser("socket closed".into()), ErrorCode::InternalError),
		];

		for (err, code) in cases {
			assert_eq!(CliError::from(err).to_command_error().code, code);
		}
	}

	#[test]
	fn rejected_import_carries_outcome() {
		let outcome = ImportOutcome::failed(ImportErrorKind::Conflict, "case file 2024/1 already exists");
		let err = CliError::Import(outcome).to_command_error();

		assert_eq!(err.code, ErrorCode::Conflict);
		assert_eq!(err.message, "case file 2024/1 already exists");
		assert_eq!(err.details.unwrap()["success"], false);
	}

	#[test]
	fn validation_failure_code() {
		let outcome = ImportOutcome::failed(ImportErrorKind::Validation, "case number is required");
		assert_eq!(CliError::Import(outcome).to_command_error().code, ErrorCode::ValidationFailed);
	}
}
