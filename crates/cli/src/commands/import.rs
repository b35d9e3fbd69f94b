use std::path::Path;

use anyhow::Context;
use tracing::info;
use uyap::SessionManager;
use uyap_protocol::DetailBundle;
use uyap_store::CaseStore;

use super::fetch_bundle;
use crate::cli::ImportArgs;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::{DiagnosticLevel, OutputFormat, ResultBuilder, print_result};

pub async fn execute(args: &ImportArgs, config: CliConfig, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("import");

	let bundle = match (&args.bundle, &args.case_number) {
		(Some(path), _) => read_bundle(path)?,
		(None, Some(case_number)) => {
			let manager = SessionManager::chrome(config.driver);
			let bundle = fetch_bundle(&manager, case_number, None).await;
			manager.cleanup().await;
			bundle?
		}
		(None, None) => return Err(CliError::InvalidInput("a case number or --bundle is required".into())),
	};

	let database = args.db.clone().unwrap_or(config.database);
	let owner_id = args.owner.unwrap_or(config.owner_id);
	let mut store = CaseStore::open(&database)?;
	let outcome = store.import_bundle(owner_id, &bundle, &args.options());

	if !outcome.success {
		return Err(CliError::Import(outcome));
	}
	info!(
		target = "uyap.cli",
		db = %database.display(),
		owner_id,
		case_file_id = ?outcome.case_file_id,
		"case file imported"
	);

	let mut builder = builder;
	if outcome.counts.parties_dropped > 0 {
		builder = builder.diagnostic(
			DiagnosticLevel::Warning,
			format!(
				"{} parties were neither plaintiff nor defendant and were not imported",
				outcome.counts.parties_dropped
			),
		);
	}

	let result = builder.data(outcome).build();
	print_result(&result, format);
	Ok(())
}

fn read_bundle(path: &Path) -> Result<DetailBundle> {
	std::fs::read_to_string(path)
		.context("read failed")
		.and_then(|text| serde_json::from_str(&text).context("not a detail bundle"))
		.map_err(|err| CliError::InvalidInput(format!("bundle {}: {err:#}", path.display())))
}
