use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

/// `uyap --help` colors: section headings stand out in bold green, flags and
/// `CASE_NUMBER`-style placeholders in cyan.
pub fn cli_styles() -> Styles {
	let heading = AnsiColor::Green.on_default().bold();
	let accent = AnsiColor::Cyan.on_default();

	Styles::styled()
		.header(heading)
		.usage(heading)
		.literal(accent)
		.placeholder(accent)
		.valid(accent)
		.invalid(AnsiColor::Yellow.on_default().bold())
		.error(AnsiColor::Red.on_default().bold())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn headings_are_bold() {
		let styles = cli_styles();
		assert!(styles.get_header().get_effects().contains(clap::builder::styling::Effects::BOLD));
		assert_eq!(styles.get_literal().get_fg_color(), Some(AnsiColor::Cyan.into()));
	}
}
