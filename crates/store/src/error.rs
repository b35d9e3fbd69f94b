use thiserror::Error;
use uyap_protocol::ImportErrorKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure opening or reading the store.
#[derive(Debug, Error)]
pub enum Error {
	#[error("database error: {0}")]
	Sqlite(#[from] rusqlite::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Failure importing one detail bundle. Nothing is written when this is returned.
#[derive(Debug, Error)]
pub enum ImportError {
	#[error("{0}")]
	Validation(String),

	#[error("case file {case_number} already exists")]
	Conflict { case_number: String },

	#[error("could not save case file: {0}")]
	Persistence(#[from] rusqlite::Error),
}

impl ImportError {
	pub fn kind(&self) -> ImportErrorKind {
		match self {
			ImportError::Validation(_) => ImportErrorKind::Validation,
			ImportError::Conflict { .. } => ImportErrorKind::Conflict,
			ImportError::Persistence(_) => ImportErrorKind::Persistence,
		}
	}
}
