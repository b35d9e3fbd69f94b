//! JavaScript snippets evaluated in the portal page.
//!
//! The portal's widgets are located by visible text, which CSS cannot express.
//! Each click helper evaluates to `true` when it found and clicked an element.

pub fn escape(value: &str) -> String {
	value
		.replace('\\', "\\\\")
		.replace('\'', "\\'")
		.replace('\n', "\\n")
		.replace('\r', "\\r")
}

/// Interprets an evaluation result as a found/clicked flag.
pub fn as_bool(value: &serde_json::Value) -> bool {
	value.as_bool().unwrap_or(false)
}

pub fn count(selector: &str) -> String {
	let selector = escape(selector);
	format!("document.querySelectorAll('{selector}').length")
}

/// Clears the value of the first input matching `selector`.
pub fn clear_input(selector: &str) -> String {
	let selector = escape(selector);
	format!(
		r#"(() => {{
				const el = document.querySelector('{selector}');
				if (!el) return false;
				el.value = '';
				el.dispatchEvent(new Event('input', {{ bubbles: true }}));
				return true;
			}})()"#
	)
}

/// Clicks the element matching `candidates` whose text contains any of `needles`.
///
/// Nested matches are common (a wrapper div contains the label div), so the
/// candidate with the shortest text wins.
pub fn click_by_text(candidates: &str, needles: &[&str]) -> String {
	let candidates = escape(candidates);
	let needles = needles
		.iter()
		.map(|n| format!("'{}'", escape(n)))
		.collect::<Vec<_>>()
		.join(", ");
	format!(
		r#"(() => {{
				const needles = [{needles}];
				let best = null;
				for (const el of document.querySelectorAll('{candidates}')) {{
					const text = (el.textContent || '').trim();
					if (!needles.some(n => text.includes(n))) continue;
					if (!best || text.length < best.text.length) best = {{ el, text }};
				}}
				if (!best) return false;
				best.el.click();
				return true;
			}})()"#
	)
}

/// Clicks the detail link in the row whose cell text is exactly `case_number`.
///
/// Cells are matched whole so `2024/1` does not open the row of `2024/12`.
///
/// The link sits in a cell after the case-number cell and is marked either by a
/// `title` containing "Detay" or a `detail` class.
pub fn click_detail_link(case_number: &str) -> String {
	let case_number = escape(case_number.trim());
	format!(
		r#"(() => {{
				for (const td of document.querySelectorAll('td')) {{
					if ((td.textContent || '').trim() !== '{case_number}') continue;
					let sibling = td.nextElementSibling;
					while (sibling) {{
						const link = sibling.querySelector("a[title*='Detay'], a[class*='detail']");
						if (link) {{ link.click(); return true; }}
						sibling = sibling.nextElementSibling;
					}}
				}}
				return false;
			}})()"#
	)
}

/// Clicks the anchor whose `href` attribute equals `href`, resolved or raw.
pub fn click_anchor_with_href(href: &str) -> String {
	let href = escape(href);
	format!(
		r#"(() => {{
				const target = '{href}';
				for (const a of document.querySelectorAll('a[href]')) {{
					if (a.getAttribute('href') === target || a.href === target) {{
						a.click();
						return true;
					}}
				}}
				return false;
			}})()"#
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn escapes_quotes_and_backslashes() {
		assert_eq!(escape(r"a'b\c"), r"a\'b\\c");
		assert_eq!(escape("line\nbreak"), "line\\nbreak");
	}

	#[test]
	fn click_by_text_embeds_all_needles() {
		let script = click_by_text("span", &["Taraflar", "Parties"]);
		assert!(script.contains("['Taraflar', 'Parties']"));
		assert!(script.contains("querySelectorAll('span')"));
	}

	#[test]
	fn detail_link_script_is_escaped() {
		let script = click_detail_link("2024/1'23");
		assert!(script.contains(r"2024/1\'23"));
	}

	#[test]
	fn detail_link_matches_whole_cell() {
		let script = click_detail_link(" 2024/1 ");
		assert!(script.contains("(td.textContent || '').trim() !== '2024/1'"));
		assert!(!script.contains(".includes("));
	}

	#[test]
	fn as_bool_treats_non_bools_as_false() {
		assert!(as_bool(&serde_json::json!(true)));
		assert!(!as_bool(&serde_json::json!("true")));
		assert!(!as_bool(&serde_json::Value::Null));
	}
}
