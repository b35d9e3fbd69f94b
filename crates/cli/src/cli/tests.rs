use std::path::PathBuf;

use clap::Parser;

use super::*;

#[test]
fn parse_search_filters() {
	let args = vec![
		"uyap",
		"search",
		"--jurisdiction",
		"Hukuk",
		"--start-date",
		"01.01.2024",
		"--query",
		"2024/123",
	];
	let cli = Cli::try_parse_from(args).unwrap();

	match cli.command {
		Commands::Search(args) => {
			let filters = args.filters();
			assert_eq!(filters.jurisdiction_type(), Some("Hukuk"));
			assert_eq!(filters.start_date(), Some("01.01.2024"));
			assert_eq!(filters.end_date(), None);
			assert_eq!(filters.search(), Some("2024/123"));
		}
		_ => panic!("Expected Search command"),
	}
}

#[test]
fn global_flags_after_subcommand() {
	let cli = Cli::try_parse_from(["uyap", "details", "2024/1", "-vv", "-f", "json", "--config", "/tmp/c.json"]).unwrap();

	assert_eq!(cli.verbose, 2);
	assert_eq!(cli.format, OutputFormat::Json);
	assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
	assert_eq!(cli.command.name(), "details");
}

#[test]
fn default_format_is_toon() {
	let cli = Cli::try_parse_from(["uyap", "search"]).unwrap();
	assert_eq!(cli.format, OutputFormat::Toon);
}

#[test]
fn download_requires_target() {
	assert!(Cli::try_parse_from(["uyap", "download", "2024/1"]).is_err());

	let cli = Cli::try_parse_from(["uyap", "download", "2024/1", "--target", "out"]).unwrap();
	match cli.command {
		Commands::Download(args) => assert_eq!(args.target, PathBuf::from("out")),
		_ => panic!("Expected Download command"),
	}
}

#[test]
fn import_needs_case_number_or_bundle() {
	assert!(Cli::try_parse_from(["uyap", "import"]).is_err());
	assert!(Cli::try_parse_from(["uyap", "import", "2024/1", "--bundle", "b.json"]).is_err());
	assert!(Cli::try_parse_from(["uyap", "import", "--bundle", "b.json"]).is_ok());
}

#[test]
fn import_flags_build_options() {
	let cli = Cli::try_parse_from([
		"uyap",
		"import",
		"2024/1",
		"--parties",
		"--expenses",
		"--overwrite",
		"--owner",
		"4",
	])
	.unwrap();

	match cli.command {
		Commands::Import(args) => {
			let options = args.options();
			assert!(options.include_basic_info);
			assert!(options.include_parties);
			assert!(options.include_expenses);
			assert!(!options.include_documents);
			assert!(options.overwrite_existing);
			assert_eq!(options.expense_conflict, ExpenseConflict::CreateNew);
			assert_eq!(args.owner, Some(4));
		}
		_ => panic!("Expected Import command"),
	}
}

#[test]
fn import_defaults_to_basic_info_only() {
	let cli = Cli::try_parse_from(["uyap", "import", "--bundle", "b.json"]).unwrap();
	match cli.command {
		Commands::Import(args) => assert_eq!(args.options(), ImportOptions::default()),
		_ => panic!("Expected Import command"),
	}
}

#[test]
fn browser_args_override_config() {
	let cli = Cli::try_parse_from([
		"uyap",
		"search",
		"--debugger-address",
		"127.0.0.1:9333",
		"--headless",
		"--downloads-dir",
		"dl",
	])
	.unwrap();

	let Commands::Search(args) = cli.command else {
		panic!("Expected Search command");
	};
	let mut config = DriverConfig::default();
	args.browser.apply(&mut config);

	assert_eq!(config.debugger_address, "127.0.0.1:9333");
	assert!(config.headless);
	assert_eq!(config.downloads_dir, PathBuf::from("dl"));
	assert!(config.chrome_executable.is_none());
}
