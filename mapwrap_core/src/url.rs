//! URL path helpers.
//!
//! Providers describe their resources relative to their own root
//! (`/javascript/leaflet.js`). These helpers move such paths below a mount
//! prefix and back again, so the rest of the crate never has to care where a
//! provider is mounted.

use crate::ConfigError;
use anyhow::{Result, ensure};

/// Joins a mount prefix and a path with exactly one separating slash.
///
/// Trailing slashes of `prefix` and leading slashes of `path` are dropped. The
/// result always starts with `/`. An empty (or root) prefix returns `path`
/// itself with a leading slash.
///
/// ```
/// use mapwrap_core::join;
/// assert_eq!(join("/x/", "/y"), "/x/y");
/// assert_eq!(join("x/", "/y"), "/x/y");
/// assert_eq!(join("", "y"), "/y");
/// ```
pub fn join(prefix: &str, path: &str) -> String {
	let prefix = prefix.trim_end_matches('/');
	let path = path.trim_start_matches('/');

	if prefix.is_empty() {
		return format!("/{path}");
	}

	if prefix.starts_with('/') {
		format!("{prefix}/{path}")
	} else {
		format!("/{prefix}/{path}")
	}
}

/// Canonical form of a mount prefix: `""` for the root, otherwise `/a/b`
/// without trailing slash and without empty segments.
pub fn normalize_prefix(prefix: &str) -> String {
	let segments: Vec<&str> = prefix.trim().split('/').filter(|s| !s.is_empty()).collect();
	if segments.is_empty() {
		String::new()
	} else {
		format!("/{}", segments.join("/"))
	}
}

/// Like [`normalize_prefix`], but rejects prefixes that can not be part of a route.
pub fn parse_prefix(prefix: &str) -> Result<String, ConfigError> {
	let invalid = |reason| ConfigError::InvalidPrefix {
		prefix: prefix.to_owned(),
		reason,
	};

	if prefix.contains(['?', '#']) {
		return Err(invalid("must not contain a query or fragment"));
	}
	if prefix.contains(['{', '}', '*', ':']) {
		return Err(invalid("must not contain route wildcards"));
	}
	if prefix.trim().contains(char::is_whitespace) {
		return Err(invalid("must not contain whitespace"));
	}

	Ok(normalize_prefix(prefix))
}

/// `true` for URLs that point somewhere else and must never be prefixed.
pub fn is_absolute_url(url: &str) -> bool {
	url.starts_with("//") || url.contains("://") || url.starts_with("data:")
}

/// An absolute URL path, always starting with `/`.
#[derive(Clone, PartialOrd, PartialEq, Eq, Hash, Debug)]
pub struct Url {
	pub str: String,
}

impl Url {
	pub fn new(url: String) -> Url {
		let str = if url.starts_with('/') { url } else { format!("/{url}") };
		Url { str }
	}

	/// Segment-wise prefix test: `/maps/v1/x` starts with `/maps/v1`, `/maps/v10` does not.
	pub fn starts_with(&self, prefix: &Url) -> bool {
		let prefix = prefix.str.trim_end_matches('/');
		match self.str.strip_prefix(prefix) {
			Some(rest) => rest.is_empty() || rest.starts_with('/'),
			None => false,
		}
	}

	/// Removes `prefix` from the leading segments of the path.
	///
	/// Only the beginning of the path is considered. Occurrences of the prefix
	/// further down the path are kept as they are.
	pub fn strip_prefix(&self, prefix: &Url) -> Result<Url> {
		ensure!(
			self.starts_with(prefix),
			"url '{}' does not start with prefix '{}'",
			self.str,
			prefix.str
		);

		let prefix = prefix.str.trim_end_matches('/');
		Ok(Url::from(&self.str[prefix.len()..]))
	}

	/// Path relative to the root, without the leading slash.
	pub fn relative(&self) -> &str {
		&self.str[1..]
	}
}

impl std::fmt::Display for Url {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.str)
	}
}

impl From<&str> for Url {
	fn from(s: &str) -> Self {
		Url::new(s.to_owned())
	}
}
