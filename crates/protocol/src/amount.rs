/// Parses a localized currency string such as `1.250,50 ₺` into a number.
///
/// Currency markers (`₺`, `TL`, `TRY`) and whitespace are stripped. When a comma
/// is present it is the decimal separator and any dots are thousands
/// separators; otherwise the remaining text is parsed as-is.
pub fn parse_amount(raw: &str) -> Option<f64> {
	let mut cleaned: String = raw
		.replace('₺', "")
		.replace("TRY", "")
		.replace("TL", "")
		.chars()
		.filter(|c| !c.is_whitespace())
		.collect();

	if cleaned.contains(',') {
		cleaned = cleaned.replace('.', "").replace(',', ".");
	}

	if cleaned.is_empty() {
		return None;
	}

	cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decimal_comma_with_symbol() {
		assert_eq!(parse_amount("500,00 ₺"), Some(500.0));
		assert_eq!(parse_amount("₺42,5"), Some(42.5));
	}

	#[test]
	fn thousands_dots_are_dropped() {
		assert_eq!(parse_amount("1.250,50 TL"), Some(1250.5));
		assert_eq!(parse_amount("12.000.000,00"), Some(12_000_000.0));
	}

	#[test]
	fn plain_numbers_pass_through() {
		assert_eq!(parse_amount("500"), Some(500.0));
		assert_eq!(parse_amount("  75.25 "), Some(75.25));
	}

	#[test]
	fn garbage_is_rejected() {
		assert_eq!(parse_amount(""), None);
		assert_eq!(parse_amount("₺"), None);
		assert_eq!(parse_amount("ücretsiz"), None);
	}
}
