use serde::{Deserialize, Serialize};

/// What to do when an imported expense looks like one already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseConflict {
	/// Always insert a new row. Re-importing the same case duplicates expenses.
	#[default]
	CreateNew,
}

/// Which parts of a [`DetailBundle`](crate::DetailBundle) to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
	pub include_basic_info: bool,
	pub include_parties: bool,
	pub include_expenses: bool,
	pub include_documents: bool,
	/// Update an existing case file instead of failing with a conflict.
	pub overwrite_existing: bool,
	pub expense_conflict: ExpenseConflict,
}

impl Default for ImportOptions {
	fn default() -> Self {
		Self {
			include_basic_info: true,
			include_parties: false,
			include_expenses: false,
			include_documents: false,
			overwrite_existing: false,
			expense_conflict: ExpenseConflict::CreateNew,
		}
	}
}

/// Whether an import created a new case file or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
	Created,
	Updated,
}

/// Machine-checkable failure category of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportErrorKind {
	/// Missing basic info or case number.
	Validation,
	/// A case file with the same number already exists and overwrite was off.
	Conflict,
	/// The database rejected a write; nothing was persisted.
	Persistence,
}

/// Row counts written by a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
	pub expenses: usize,
	pub documents: usize,
	/// Parties that matched neither the plaintiff nor the defendant labels.
	pub parties_dropped: usize,
}

/// Structured result of importing one bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub case_file_id: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub action: Option<ImportAction>,
	#[serde(default)]
	pub counts: ImportCounts,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_kind: Option<ImportErrorKind>,
	/// Human-readable failure message.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ImportOutcome {
	pub fn succeeded(case_file_id: i64, action: ImportAction, counts: ImportCounts) -> Self {
		Self {
			success: true,
			case_file_id: Some(case_file_id),
			action: Some(action),
			counts,
			error_kind: None,
			error: None,
		}
	}

	pub fn failed(kind: ImportErrorKind, message: impl Into<String>) -> Self {
		Self {
			success: false,
			case_file_id: None,
			action: None,
			counts: ImportCounts::default(),
			error_kind: Some(kind),
			error: Some(message.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn options_default_to_basic_info_only() {
		let options: ImportOptions = serde_json::from_str("{}").unwrap();
		assert!(options.include_basic_info);
		assert!(!options.include_parties);
		assert!(!options.overwrite_existing);
		assert_eq!(options.expense_conflict, ExpenseConflict::CreateNew);
	}

	#[test]
	fn expense_conflict_uses_kebab_case() {
		let options: ImportOptions =
			serde_json::from_str(r#"{"include_expenses": true, "expense_conflict": "create-new"}"#)
				.unwrap();
		assert!(options.include_expenses);
		assert_eq!(options.expense_conflict, ExpenseConflict::CreateNew);
	}

	#[test]
	fn failed_outcome_serializes_kind() {
		let outcome = ImportOutcome::failed(ImportErrorKind::Conflict, "case file 2024/1 already exists");
		let json = serde_json::to_value(&outcome).unwrap();
		assert_eq!(json["success"], false);
		assert_eq!(json["error_kind"], "conflict");
		assert!(json.get("case_file_id").is_none());
	}
}
