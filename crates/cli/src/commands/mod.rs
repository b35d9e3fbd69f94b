mod details;
mod download;
mod import;
mod search;

use tracing::info;
use uyap::SessionManager;
use uyap_protocol::{DetailBundle, SearchFilters};

use crate::cli::{Cli, Commands};
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::OutputFormat;

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let mut config = CliConfig::load(cli.config.as_deref())?;

	match cli.command {
		Commands::Search(args) => {
			args.browser.apply(&mut config.driver);
			search::execute(&args, config, format).await
		}
		Commands::Details(args) => {
			args.browser.apply(&mut config.driver);
			details::execute(&args, config, format).await
		}
		Commands::Download(args) => {
			args.browser.apply(&mut config.driver);
			download::execute(&args, config, format).await
		}
		Commands::Import(args) => {
			args.browser.apply(&mut config.driver);
			import::execute(&args, config, format).await
		}
	}
}

/// Finds `case_number` through a detailed search and collects its detail bundle.
///
/// Result ids are not stable across searches, so `file_id` only labels the
/// request; the first row with a matching case number is opened.
pub(crate) async fn fetch_bundle(
	manager: &SessionManager,
	case_number: &str,
	file_id: Option<&str>,
) -> Result<DetailBundle> {
	let filters = SearchFilters {
		search: Some(case_number.to_string()),
		..Default::default()
	};
	let results = manager.search_files_with_filters(&filters).await?;

	let wanted = case_number.trim();
	let record = results
		.records
		.iter()
		.find(|record| record.case_number.trim() == wanted)
		.ok_or_else(|| uyap::Error::DetailUnavailable {
			case_number: wanted.to_string(),
		})?;

	let file_id = file_id.unwrap_or(&record.id);
	info!(target = "uyap.cli", case_number = wanted, file_id, "opening case file");
	let bundle = manager.get_file_complete_details(file_id, &record.case_number).await?;
	Ok(bundle)
}
