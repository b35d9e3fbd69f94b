use uyap::SessionManager;

use crate::cli::SearchArgs;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{DiagnosticLevel, OutputFormat, ResultBuilder, print_result};

pub async fn execute(args: &SearchArgs, config: CliConfig, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("search");
	let manager = SessionManager::chrome(config.driver);
	let results = manager.search_files_with_filters(&args.filters()).await;
	manager.cleanup().await;
	let results = results?;

	let mut builder = builder.diagnostic(
		DiagnosticLevel::Info,
		format!("{} case files found", results.records.len()),
	);
	if results.stats.skipped() > 0 {
		builder = builder.diagnostic(
			DiagnosticLevel::Warning,
			format!("{} result rows could not be parsed", results.stats.skipped()),
		);
	}

	let result = builder.data(results).build();
	print_result(&result, format);
	Ok(())
}
