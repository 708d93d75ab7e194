//! Point insertion into an HTML byte stream.
//!
//! Three places are recognised, all case-insensitive:
//! - the first `</head>`: stylesheets and, unless injecting at end of file, scripts
//! - the last `</body>`: scripts when injecting at end of file
//! - the first `<body ...>` opening tag: data attributes
//!
//! The document is not parsed. Bytes outside the insertion points are copied verbatim.

use super::{Injection, resources::escape_attribute};
use lazy_static::lazy_static;
use regex::bytes::Regex;

lazy_static! {
	static ref HEAD_CLOSE: Regex = Regex::new(r"(?i-u)</head\s*>").unwrap();
	static ref BODY_OPEN: Regex = Regex::new(r"(?i-u)<body(?:\s[^>]*)?>").unwrap();
	static ref BODY_CLOSE: Regex = Regex::new(r"(?i-u)</body\s*>").unwrap();
}

/// Why a document was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftFailure {
	MissingHead,
	MissingBodyEnd,
}

impl std::fmt::Display for SoftFailure {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			SoftFailure::MissingHead => "no </head> found",
			SoftFailure::MissingBodyEnd => "no </body> found",
		})
	}
}

/// Returns the document with all tags of `injection` inserted.
///
/// Tags already present in the document are skipped, so injecting twice gives
/// the same result as injecting once. If a required insertion point is missing,
/// nothing is inserted at all.
pub fn inject(html: &[u8], injection: &Injection) -> Result<Vec<u8>, SoftFailure> {
	let head_close = HEAD_CLOSE.find(html).ok_or(SoftFailure::MissingHead)?;

	let body_close = if injection.inject_at_eof && !injection.resources.javascript.is_empty() {
		Some(BODY_CLOSE.find_iter(html).last().ok_or(SoftFailure::MissingBodyEnd)?)
	} else {
		None
	};

	let missing = |tag: &String| !contains(html, tag.as_bytes());

	let mut head_tags: Vec<String> = injection.resources.stylesheet_tags().filter(missing).collect();
	let script_tags: Vec<String> = injection.resources.script_tags().filter(missing).collect();

	// (position, bytes); a stable sort keeps the order of equal positions
	let mut insertions: Vec<(usize, Vec<u8>)> = Vec::new();

	match body_close {
		Some(body_close) => {
			if !script_tags.is_empty() {
				insertions.push((body_close.start(), script_tags.concat().into_bytes()));
			}
		}
		None => head_tags.extend(script_tags),
	}

	if !head_tags.is_empty() {
		insertions.push((head_close.start(), head_tags.concat().into_bytes()));
	}

	if !injection.data_attributes.is_empty() {
		match BODY_OPEN.find(html) {
			Some(body_open) => {
				let tag = body_open.as_bytes();
				let attributes: String = injection
					.data_attributes
					.iter()
					.filter(|(name, _)| !contains(tag, format!("data-{name}=").as_bytes()))
					.map(|(name, value)| format!(r#" data-{name}="{}""#, escape_attribute(value)))
					.collect();
				if !attributes.is_empty() {
					insertions.push((body_open.start() + "<body".len(), attributes.into_bytes()));
				}
			}
			None => log::debug!("no <body> found, skipping data attributes"),
		}
	}

	insertions.sort_by_key(|(position, _)| *position);

	let extra: usize = insertions.iter().map(|(_, bytes)| bytes.len()).sum();
	let mut result = Vec::with_capacity(html.len() + extra);
	let mut cursor = 0;
	for (position, bytes) in insertions {
		result.extend_from_slice(&html[cursor..position]);
		result.extend_from_slice(&bytes);
		cursor = position;
	}
	result.extend_from_slice(&html[cursor..]);

	Ok(result)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
	needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ResourceList;
	use pretty_assertions::assert_eq;

	const PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>Map</title></head>\n<body class=\"map\"><div id=\"map\"></div></body>\n</html>\n";

	fn injection(inject_at_eof: bool) -> Injection {
		Injection::new(
			ResourceList::new(vec!["/j1.js".into(), "/j2.js".into()], vec!["/s1.css".into(), "/s2.css".into()]),
			inject_at_eof,
		)
	}

	fn run(html: &str, injection: &Injection) -> String {
		String::from_utf8(inject(html.as_bytes(), injection).unwrap()).unwrap()
	}

	fn position(html: &str, needle: &str) -> usize {
		html.find(needle).unwrap_or_else(|| panic!("'{needle}' not found in:\n{html}"))
	}

	#[test]
	fn head_injection() {
		let html = run(PAGE, &injection(false));
		assert_eq!(
			html,
			concat!(
				"<!DOCTYPE html>\n<html>\n<head><title>Map</title>",
				r#"<link rel="stylesheet" href="/s1.css">"#,
				r#"<link rel="stylesheet" href="/s2.css">"#,
				r#"<script src="/j1.js"></script>"#,
				r#"<script src="/j2.js"></script>"#,
				"</head>\n<body class=\"map\"><div id=\"map\"></div></body>\n</html>\n"
			)
		);
	}

	#[test]
	fn end_of_file_injection() {
		let html = run(PAGE, &injection(true));

		let head_end = position(&html, "</head>");
		assert!(position(&html, "/s1.css") < position(&html, "/s2.css"));
		assert!(position(&html, "/s2.css") < head_end);

		let content = position(&html, "<div id=\"map\"></div>");
		assert!(content < position(&html, "/j1.js"));
		assert!(position(&html, "/j1.js") < position(&html, "/j2.js"));
		assert!(html.contains(r#"<script src="/j2.js"></script></body>"#));
	}

	#[test]
	fn is_idempotent() {
		for eof in [false, true] {
			let injection = injection(eof);
			let once = run(PAGE, &injection);
			let twice = run(&once, &injection);
			assert_eq!(once, twice);
		}
	}

	#[test]
	fn case_insensitive_markers() {
		let html = run("<HTML><HEAD></HEAD ><BODY>x</BODY></HTML>", &injection(true));
		assert!(html.contains(r#"<link rel="stylesheet" href="/s2.css"></HEAD >"#));
		assert!(html.contains(r#"<script src="/j2.js"></script></BODY>"#));
	}

	#[test]
	fn scripts_go_before_last_body_end() {
		let page = "<html><head></head><body><pre>&lt;/body&gt; </body> in text</pre></body></html>";
		let html = run(page, &injection(true));
		assert!(html.ends_with(r#"<script src="/j2.js"></script></body></html>"#));
	}

	#[test]
	fn missing_head_is_a_soft_failure() {
		let page = b"<html><body>no head here</body></html>";
		assert_eq!(inject(page, &injection(false)), Err(SoftFailure::MissingHead));
		assert_eq!(inject(page, &injection(true)), Err(SoftFailure::MissingHead));
	}

	#[test]
	fn missing_body_end_only_matters_at_eof() {
		let page = "<html><head></head><body>unterminated";
		assert_eq!(inject(page.as_bytes(), &injection(true)), Err(SoftFailure::MissingBodyEnd));
		assert!(run(page, &injection(false)).contains(r#"<script src="/j2.js"></script></head>"#));
	}

	#[test]
	fn head_is_not_confused_with_header() {
		let page = "<html><head></head><body><header>x</header></body></html>";
		let html = run(page, &injection(false));
		assert!(html.starts_with(r#"<html><head><link rel="stylesheet" href="/s1.css">"#));
		assert!(html.contains("<header>x</header>"));
	}

	#[test]
	fn data_attributes() {
		let injection = injection(false).with_data_attributes(vec![
			("nextzen-api-key".into(), "abc\"123".into()),
			("nextzen-style-url".into(), "/tangram/refill-style.zip".into()),
		]);
		let html = run(PAGE, &injection);
		assert!(html.contains(
			r#"<body data-nextzen-api-key="abc&quot;123" data-nextzen-style-url="/tangram/refill-style.zip" class="map">"#
		));

		// applying again does not duplicate the attributes
		assert_eq!(run(&html, &injection), html);
	}

	#[test]
	fn data_attributes_without_body_are_skipped() {
		let injection = Injection::new(ResourceList::default(), false)
			.with_data_attributes(vec![("nextzen-api-key".into(), "abc".into())]);
		assert_eq!(run("<head></head>", &injection), "<head></head>");
	}

	#[test]
	fn body_prefix_tags_are_not_body() {
		let injection = Injection::new(ResourceList::default(), false)
			.with_data_attributes(vec![("k".into(), "v".into())]);
		let html = run("<head></head><bodyguard></bodyguard><body></body>", &injection);
		assert_eq!(html, r#"<head></head><bodyguard></bodyguard><body data-k="v"></body>"#);
	}

	#[test]
	fn non_utf8_bytes_are_preserved() {
		let mut page = b"<html><head></head><body>".to_vec();
		page.extend_from_slice(&[0xff, 0xfe, 0x00]);
		page.extend_from_slice(b"</body></html>");

		let result = inject(&page, &injection(true)).unwrap();
		assert!(result.windows(3).any(|w| w == [0xff, 0xfe, 0x00]));
	}

	#[test]
	fn empty_injection_keeps_document() {
		let injection = Injection::new(ResourceList::default(), true);
		assert_eq!(run(PAGE, &injection), PAGE);
	}
}
