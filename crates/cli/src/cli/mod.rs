#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uyap::DriverConfig;
use uyap_protocol::{ExpenseConflict, ImportOptions, SearchFilters};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// Case-file scraper for the UYAP lawyer portal.
#[derive(Parser, Debug)]
#[command(name = "uyap")]
#[command(about = "Search, inspect, download and import UYAP case files")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v progress, -vv debug plus CDP warnings, -vvv everything)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: toon (default), json, ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
	pub format: OutputFormat,

	/// Config file (defaults to $XDG_CONFIG_HOME/uyap/config.json)
	#[arg(long, global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run a detailed case-file search.
	Search(SearchArgs),
	/// Collect the full detail bundle of one case file.
	Details(DetailsArgs),
	/// Download every document of one case file.
	Download(DownloadArgs),
	/// Import a case file into the local database.
	Import(ImportArgs),
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Search(_) => "search",
			Commands::Details(_) => "details",
			Commands::Download(_) => "download",
			Commands::Import(_) => "import",
		}
	}
}

/// Browser settings that override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct BrowserArgs {
	/// Remote debugging address of a running browser (host:port)
	#[arg(long, value_name = "ADDR")]
	pub debugger_address: Option<String>,

	/// Browser binary to launch when attaching fails
	#[arg(long, value_name = "PATH")]
	pub chrome: Option<PathBuf>,

	/// Launch the browser headless
	#[arg(long)]
	pub headless: bool,

	/// Where the browser saves downloads
	#[arg(long, value_name = "DIR")]
	pub downloads_dir: Option<PathBuf>,
}

impl BrowserArgs {
	pub fn apply(&self, config: &mut DriverConfig) {
		if let Some(address) = &self.debugger_address {
			config.debugger_address = address.clone();
		}
		if let Some(chrome) = &self.chrome {
			config.chrome_executable = Some(chrome.clone());
		}
		if self.headless {
			config.headless = true;
		}
		if let Some(dir) = &self.downloads_dir {
			config.downloads_dir = dir.clone();
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
	/// Jurisdiction type as shown in the portal dropdown (e.g. Hukuk)
	#[arg(long, value_name = "TYPE")]
	pub jurisdiction: Option<String>,

	/// First opening date (dd.mm.yyyy)
	#[arg(long, value_name = "DATE")]
	pub start_date: Option<String>,

	/// Last opening date (dd.mm.yyyy)
	#[arg(long, value_name = "DATE")]
	pub end_date: Option<String>,

	/// Free-text search
	#[arg(long, value_name = "TEXT")]
	pub query: Option<String>,

	#[command(flatten)]
	pub browser: BrowserArgs,
}

impl SearchArgs {
	pub fn filters(&self) -> SearchFilters {
		SearchFilters {
			jurisdiction_type: self.jurisdiction.clone(),
			start_date: self.start_date.clone(),
			end_date: self.end_date.clone(),
			search: self.query.clone(),
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct DetailsArgs {
	/// Case number (esas no), e.g. 2024/123
	#[arg(value_name = "CASE_NUMBER")]
	pub case_number: String,

	/// Result id from an earlier search, recorded with the request
	#[arg(long, value_name = "ID")]
	pub file_id: Option<String>,

	#[command(flatten)]
	pub browser: BrowserArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
	#[arg(value_name = "CASE_NUMBER")]
	pub case_number: String,

	/// Folder the documents are moved into
	#[arg(long, value_name = "DIR")]
	pub target: PathBuf,

	#[command(flatten)]
	pub browser: BrowserArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
	/// Case number to scrape from the portal before importing
	#[arg(value_name = "CASE_NUMBER", required_unless_present = "bundle", conflicts_with = "bundle")]
	pub case_number: Option<String>,

	/// Import a saved detail bundle (JSON) instead of scraping
	#[arg(long, value_name = "FILE")]
	pub bundle: Option<PathBuf>,

	/// Skip basic case information (the import is then rejected)
	#[arg(long)]
	pub no_basic_info: bool,

	/// Fill client and opponent from the parties tab
	#[arg(long)]
	pub parties: bool,

	#[arg(long)]
	pub expenses: bool,

	/// Store document metadata
	#[arg(long)]
	pub documents: bool,

	/// Update the case file when it already exists
	#[arg(long)]
	pub overwrite: bool,

	#[arg(long, value_enum, default_value = "create-new")]
	pub expense_conflict: ExpenseConflictArg,

	/// Database file (overrides the config)
	#[arg(long, value_name = "PATH")]
	pub db: Option<PathBuf>,

	/// Owner id (overrides the config)
	#[arg(long, value_name = "ID")]
	pub owner: Option<i64>,

	#[command(flatten)]
	pub browser: BrowserArgs,
}

impl ImportArgs {
	pub fn options(&self) -> ImportOptions {
		ImportOptions {
			include_basic_info: !self.no_basic_info,
			include_parties: self.parties,
			include_expenses: self.expenses,
			include_documents: self.documents,
			overwrite_existing: self.overwrite,
			expense_conflict: self.expense_conflict.into(),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExpenseConflictArg {
	/// Always insert new expense rows
	#[default]
	CreateNew,
}

impl From<ExpenseConflictArg> for ExpenseConflict {
	fn from(arg: ExpenseConflictArg) -> Self {
		match arg {
			ExpenseConflictArg::CreateNew => ExpenseConflict::CreateNew,
		}
	}
}
