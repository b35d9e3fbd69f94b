use tracing::warn;
use uyap::SessionManager;

use super::fetch_bundle;
use crate::cli::DownloadArgs;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{Artifact, DiagnosticLevel, DownloadData, OutputFormat, ResultBuilder, print_result};

pub async fn execute(args: &DownloadArgs, config: CliConfig, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("download");
	let manager = SessionManager::chrome(config.driver);
	let saved = download_all(&manager, args).await;
	manager.cleanup().await;
	let (requested, saved) = saved?;

	let mut builder = builder.artifacts(saved.iter().cloned().map(Artifact::download));
	let missing = requested.saturating_sub(saved.len());
	if missing > 0 {
		warn!(target = "uyap.cli", missing, "some documents were not downloaded");
		builder = builder.diagnostic(
			DiagnosticLevel::Warning,
			format!("{missing} of {requested} documents could not be downloaded"),
		);
	}

	let result = builder
		.data(DownloadData {
			case_number: args.case_number.clone(),
			target: args.target.clone(),
			requested,
			saved,
		})
		.build();
	print_result(&result, format);
	Ok(())
}

async fn download_all(manager: &SessionManager, args: &DownloadArgs) -> Result<(usize, Vec<std::path::PathBuf>)> {
	let bundle = fetch_bundle(manager, &args.case_number, None).await?;
	let saved = manager.download_file_documents(&bundle.documents, &args.target).await?;
	Ok((bundle.documents.len(), saved))
}
