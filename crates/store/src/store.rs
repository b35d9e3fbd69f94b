//! SQLite-backed case-file store.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use serde::Serialize;
use tracing::{debug, info, warn};
use uyap_protocol::{
	BasicInfo, DetailBundle, DocumentKind, DocumentRecord, ExpenseConflict, ExpenseRecord,
	ImportAction, ImportCounts, ImportOptions, ImportOutcome,
};

use crate::error::{ImportError, Result};
use crate::file_type::FileType;
use crate::parties::{PartyAssignment, assign_parties};

const SCHEMA: &str = r#"
	PRAGMA foreign_keys = ON;

	CREATE TABLE IF NOT EXISTS case_files (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		owner_id INTEGER NOT NULL,
		case_number TEXT NOT NULL,
		file_type TEXT NOT NULL,
		courthouse TEXT NOT NULL,
		jurisdiction_unit TEXT NOT NULL DEFAULT '',
		status TEXT NOT NULL DEFAULT '',
		opening_date TEXT NOT NULL DEFAULT '',
		year INTEGER,
		client_name TEXT,
		opponent_name TEXT,
		opponent_lawyer TEXT,
		created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
		updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
		UNIQUE(owner_id, case_number)
	);

	CREATE TABLE IF NOT EXISTS expenses (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		case_id INTEGER NOT NULL REFERENCES case_files(id) ON DELETE CASCADE,
		expense_type TEXT NOT NULL,
		amount REAL NOT NULL,
		date TEXT NOT NULL,
		is_paid INTEGER NOT NULL DEFAULT 0,
		description TEXT
	);

	CREATE TABLE IF NOT EXISTS documents (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		case_id INTEGER NOT NULL REFERENCES case_files(id) ON DELETE CASCADE,
		name TEXT NOT NULL,
		date TEXT NOT NULL,
		size TEXT,
		kind TEXT NOT NULL,
		url TEXT,
		download_url TEXT
	);

	CREATE INDEX IF NOT EXISTS idx_expenses_case ON expenses(case_id);
	CREATE INDEX IF NOT EXISTS idx_documents_case ON documents(case_id);
"#;

const CASE_COLUMNS: &str = "id, owner_id, case_number, file_type, courthouse, jurisdiction_unit, \
	status, opening_date, year, client_name, opponent_name, opponent_lawyer";

/// A persisted case file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCase {
	pub id: i64,
	pub owner_id: i64,
	pub case_number: String,
	pub file_type: FileType,
	pub courthouse: String,
	pub jurisdiction_unit: String,
	pub status: String,
	pub opening_date: String,
	pub year: Option<i32>,
	pub client_name: Option<String>,
	pub opponent_name: Option<String>,
	pub opponent_lawyer: Option<String>,
}

impl StoredCase {
	fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
		let file_type: String = row.get(3)?;
		Ok(Self {
			id: row.get(0)?,
			owner_id: row.get(1)?,
			case_number: row.get(2)?,
			file_type: FileType::from_stored(&file_type),
			courthouse: row.get(4)?,
			jurisdiction_unit: row.get(5)?,
			status: row.get(6)?,
			opening_date: row.get(7)?,
			year: row.get(8)?,
			client_name: row.get(9)?,
			opponent_name: row.get(10)?,
			opponent_lawyer: row.get(11)?,
		})
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredExpense {
	pub id: i64,
	pub case_id: i64,
	pub expense_type: String,
	pub amount: f64,
	pub date: String,
	pub is_paid: bool,
	pub description: Option<String>,
}

/// Document metadata row. The file itself is never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredDocument {
	pub id: i64,
	pub case_id: i64,
	pub name: String,
	pub date: String,
	pub size: Option<String>,
	pub kind: DocumentKind,
	pub url: Option<String>,
	pub download_url: Option<String>,
}

fn kind_from_stored(value: &str) -> DocumentKind {
	[
		DocumentKind::Pdf,
		DocumentKind::Word,
		DocumentKind::Excel,
		DocumentKind::Image,
		DocumentKind::Archive,
	]
	.into_iter()
	.find(|kind| kind.as_str() == value)
	.unwrap_or_default()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
	matches!(
		err,
		rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
	)
}

/// Case files, expenses and document metadata, scoped per owner.
pub struct CaseStore {
	conn: Connection,
}

impl CaseStore {
	/// Opens (creating if needed) the database at `path`.
	pub fn open(path: &Path) -> Result<Self> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent)?;
		}
		let store = Self::init(Connection::open(path)?)?;
		debug!(target = "uyap.store", path = %path.display(), "case store opened");
		Ok(store)
	}

	pub fn open_in_memory() -> Result<Self> {
		Self::init(Connection::open_in_memory()?)
	}

	fn init(conn: Connection) -> Result<Self> {
		conn.execute_batch(SCHEMA)?;
		Ok(Self { conn })
	}

	pub fn find_case(&self, owner_id: i64, case_number: &str) -> Result<Option<StoredCase>> {
		let sql = format!("SELECT {CASE_COLUMNS} FROM case_files WHERE owner_id = ?1 AND case_number = ?2");
		let case = self
			.conn
			.query_row(&sql, params![owner_id, case_number.trim()], StoredCase::from_row)
			.optional()?;
		Ok(case)
	}

	pub fn expenses_for_case(&self, case_id: i64) -> Result<Vec<StoredExpense>> {
		let mut stmt = self.conn.prepare(
			"SELECT id, case_id, expense_type, amount, date, is_paid, description \
			 FROM expenses WHERE case_id = ?1 ORDER BY id",
		)?;
		let rows = stmt.query_map(params![case_id], |row| {
			Ok(StoredExpense {
				id: row.get(0)?,
				case_id: row.get(1)?,
				expense_type: row.get(2)?,
				amount: row.get(3)?,
				date: row.get(4)?,
				is_paid: row.get(5)?,
				description: row.get(6)?,
			})
		})?;
		Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
	}

	pub fn documents_for_case(&self, case_id: i64) -> Result<Vec<StoredDocument>> {
		let mut stmt = self.conn.prepare(
			"SELECT id, case_id, name, date, size, kind, url, download_url \
			 FROM documents WHERE case_id = ?1 ORDER BY id",
		)?;
		let rows = stmt.query_map(params![case_id], |row| {
			let kind: String = row.get(5)?;
			Ok(StoredDocument {
				id: row.get(0)?,
				case_id: row.get(1)?,
				name: row.get(2)?,
				date: row.get(3)?,
				size: row.get(4)?,
				kind: kind_from_stored(&kind),
				url: row.get(6)?,
				download_url: row.get(7)?,
			})
		})?;
		Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
	}

	/// Imports `bundle` for `owner_id`, reporting failures in the outcome.
	pub fn import_bundle(&mut self, owner_id: i64, bundle: &DetailBundle, options: &ImportOptions) -> ImportOutcome {
		match self.try_import_bundle(owner_id, bundle, options) {
			Ok(outcome) => outcome,
			Err(err) => {
				warn!(
					target = "uyap.store",
					case_number = %bundle.basic_info.case_number,
					error = %err,
					"import failed"
				);
				ImportOutcome::failed(err.kind(), err.to_string())
			}
		}
	}

	/// Imports `bundle` in a single transaction.
	///
	/// The UNIQUE(owner, case number) constraint decides between create and
	/// conflict; with `overwrite_existing` the existing row is updated in place.
	/// On any error the transaction is rolled back and nothing is written.
	pub fn try_import_bundle(
		&mut self,
		owner_id: i64,
		bundle: &DetailBundle,
		options: &ImportOptions,
	) -> std::result::Result<ImportOutcome, ImportError> {
		if !options.include_basic_info {
			return Err(ImportError::Validation(
				"basic info is required to import a case file".into(),
			));
		}
		let case_number = bundle.basic_info.case_number.trim();
		if case_number.is_empty() {
			return Err(ImportError::Validation("case number is required".into()));
		}

		let parties = if options.include_parties {
			assign_parties(&bundle.parties)
		} else {
			PartyAssignment::default()
		};
		if parties.dropped > 0 {
			warn!(
				target = "uyap.store",
				case_number,
				dropped = parties.dropped,
				"parties without a plaintiff or defendant role were not imported"
			);
		}

		let row = CaseRow::new(owner_id, case_number, &bundle.basic_info, &parties);
		let tx = self.conn.transaction()?;

		let (case_file_id, action) = match row.insert(&tx) {
			Ok(id) => (id, ImportAction::Created),
			Err(err) if is_unique_violation(&err) => {
				if !options.overwrite_existing {
					return Err(ImportError::Conflict {
						case_number: case_number.to_string(),
					});
				}
				(row.update(&tx)?, ImportAction::Updated)
			}
			Err(err) => return Err(err.into()),
		};

		let mut counts = ImportCounts {
			parties_dropped: parties.dropped,
			..Default::default()
		};
		if options.include_expenses {
			counts.expenses = insert_expenses(&tx, case_file_id, &bundle.expenses, options.expense_conflict)?;
		}
		if options.include_documents {
			counts.documents = insert_documents(&tx, case_file_id, &bundle.documents)?;
		}

		tx.commit()?;
		info!(
			target = "uyap.store",
			case_number,
			case_file_id,
			?action,
			expenses = counts.expenses,
			documents = counts.documents,
			"case file imported"
		);
		Ok(ImportOutcome::succeeded(case_file_id, action, counts))
	}
}

/// Column values written for a case file.
struct CaseRow<'a> {
	owner_id: i64,
	case_number: &'a str,
	file_type: FileType,
	info: &'a BasicInfo,
	year: Option<i32>,
	parties: &'a PartyAssignment,
}

impl<'a> CaseRow<'a> {
	fn new(owner_id: i64, case_number: &'a str, info: &'a BasicInfo, parties: &'a PartyAssignment) -> Self {
		Self {
			owner_id,
			case_number,
			file_type: FileType::from_jurisdiction(&info.jurisdiction_type),
			info,
			year: info.effective_year(),
			parties,
		}
	}

	fn insert(&self, tx: &Transaction<'_>) -> rusqlite::Result<i64> {
		tx.query_row(
			"INSERT INTO case_files (owner_id, case_number, file_type, courthouse, jurisdiction_unit, \
			 status, opening_date, year, client_name, opponent_name, opponent_lawyer) \
			 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) RETURNING id",
			params![
				self.owner_id,
				self.case_number,
				self.file_type.as_str(),
				self.info.court,
				self.info.jurisdiction_unit,
				self.info.status,
				self.info.opening_date,
				self.year,
				self.parties.client_name,
				self.parties.opponent_name,
				self.parties.opponent_lawyer,
			],
			|row| row.get(0),
		)
	}

	/// Party columns keep their stored value when no party was imported.
	fn update(&self, tx: &Transaction<'_>) -> rusqlite::Result<i64> {
		tx.query_row(
			"UPDATE case_files SET file_type = ?3, courthouse = ?4, jurisdiction_unit = ?5, \
			 status = ?6, opening_date = ?7, year = ?8, \
			 client_name = COALESCE(?9, client_name), \
			 opponent_name = COALESCE(?10, opponent_name), \
			 opponent_lawyer = COALESCE(?11, opponent_lawyer), \
			 updated_at = CURRENT_TIMESTAMP \
			 WHERE owner_id = ?1 AND case_number = ?2 RETURNING id",
			params![
				self.owner_id,
				self.case_number,
				self.file_type.as_str(),
				self.info.court,
				self.info.jurisdiction_unit,
				self.info.status,
				self.info.opening_date,
				self.year,
				self.parties.client_name,
				self.parties.opponent_name,
				self.parties.opponent_lawyer,
			],
			|row| row.get(0),
		)
	}
}

fn insert_expenses(
	tx: &Transaction<'_>,
	case_id: i64,
	expenses: &[ExpenseRecord],
	conflict: ExpenseConflict,
) -> rusqlite::Result<usize> {
	match conflict {
		// No lookup of earlier rows: a re-import adds the same expenses again.
		ExpenseConflict::CreateNew => {}
	}

	let mut stmt = tx.prepare(
		"INSERT INTO expenses (case_id, expense_type, amount, date, is_paid, description) \
		 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
	)?;
	for expense in expenses {
		stmt.execute(params![
			case_id,
			expense.expense_type,
			expense.amount,
			expense.date,
			expense.paid,
			expense.description,
		])?;
	}
	Ok(expenses.len())
}

fn insert_documents(tx: &Transaction<'_>, case_id: i64, documents: &[DocumentRecord]) -> rusqlite::Result<usize> {
	let mut stmt = tx.prepare(
		"INSERT INTO documents (case_id, name, date, size, kind, url, download_url) \
		 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
	)?;
	for document in documents {
		stmt.execute(params![
			case_id,
			document.name,
			document.date,
			document.size,
			document.effective_kind().as_str(),
			document.url,
			document.download_url,
		])?;
	}
	Ok(documents.len())
}
