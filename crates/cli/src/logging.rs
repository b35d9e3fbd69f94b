use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Our events are tagged with a `uyap.*` target field (chrome, driver, files,
/// session, store, cli, config) and filtered by crate. CDP traffic from
/// chromiumoxide is only shown from `-vv` on.
fn default_filter(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "error,chromiumoxide=off",
		1 => "warn,uyap=info,uyap_store=info,uyap_cli=info,chromiumoxide=off",
		2 => "info,uyap=debug,uyap_store=debug,uyap_cli=debug,chromiumoxide=warn",
		_ => "debug",
	}
}

/// Logs go to stderr so stdout stays a clean result envelope. `RUST_LOG`
/// overrides the verbosity flag.
pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr.with_max_level(tracing::Level::TRACE))
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_level_parses() {
		for verbosity in 0..4 {
			assert!(EnvFilter::try_new(default_filter(verbosity)).is_ok(), "level {verbosity}");
		}
	}

	#[test]
	fn cdp_noise_hidden_until_very_verbose() {
		assert!(default_filter(0).contains("chromiumoxide=off"));
		assert!(default_filter(1).contains("chromiumoxide=off"));
		assert!(default_filter(1).contains("uyap_store=info"));
		assert!(!default_filter(2).contains("chromiumoxide=off"));
	}
}
