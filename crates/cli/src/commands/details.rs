use uyap::SessionManager;

use super::fetch_bundle;
use crate::cli::DetailsArgs;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, print_result};

pub async fn execute(args: &DetailsArgs, config: CliConfig, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("details");
	let manager = SessionManager::chrome(config.driver);
	let bundle = fetch_bundle(&manager, &args.case_number, args.file_id.as_deref()).await;
	manager.cleanup().await;

	let result = builder.data(bundle?).build();
	print_result(&result, format);
	Ok(())
}
