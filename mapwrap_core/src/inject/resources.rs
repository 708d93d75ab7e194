use crate::url::{is_absolute_url, join};

/// Ordered script and stylesheet URLs of one provider.
///
/// The order is the load order. Lists are never deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceList {
	pub javascript: Vec<String>,
	pub stylesheets: Vec<String>,
}

impl ResourceList {
	pub fn new(javascript: Vec<String>, stylesheets: Vec<String>) -> ResourceList {
		ResourceList {
			javascript,
			stylesheets,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.javascript.is_empty() && self.stylesheets.is_empty()
	}

	/// Moves every relative URL below `prefix`. Absolute URLs stay untouched.
	pub fn with_prefix(&self, prefix: &str) -> ResourceList {
		let map = |urls: &[String]| -> Vec<String> {
			urls
				.iter()
				.map(|url| {
					if is_absolute_url(url) {
						url.clone()
					} else {
						join(prefix, url)
					}
				})
				.collect()
		};

		ResourceList {
			javascript: map(&self.javascript),
			stylesheets: map(&self.stylesheets),
		}
	}

	pub fn stylesheet_tags(&self) -> impl Iterator<Item = String> + '_ {
		self.stylesheets.iter().map(|url| stylesheet_tag(url))
	}

	pub fn script_tags(&self) -> impl Iterator<Item = String> + '_ {
		self.javascript.iter().map(|url| script_tag(url))
	}
}

pub fn stylesheet_tag(url: &str) -> String {
	format!(r#"<link rel="stylesheet" href="{}">"#, escape_attribute(url))
}

pub fn script_tag(url: &str) -> String {
	format!(r#"<script src="{}"></script>"#, escape_attribute(url))
}

/// Escapes a value for use inside a double-quoted HTML attribute.
pub fn escape_attribute(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'"' => escaped.push_str("&quot;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			_ => escaped.push(c),
		}
	}
	escaped
}
