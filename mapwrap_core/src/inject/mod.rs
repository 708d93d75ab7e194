//! Resource injection into HTML responses.
//!
//! [`append_resources`] wraps a router with a middleware that buffers the
//! complete response body, inserts `<link>`/`<script>` tags (see [`html`]) and
//! forwards the result. Buffering is required because tags may have to go in
//! front of content the wrapped handler already produced; pages are small, so
//! the body is captured without a size limit.
//!
//! Responses are passed through untouched when
//! - the status is not 2xx,
//! - the content type is set and is not HTML,
//! - the body is content-encoded,
//! - no insertion point can be found.

pub mod html;
mod resources;

pub use html::SoftFailure;
pub use resources::{ResourceList, escape_attribute, script_tag, stylesheet_tag};

use crate::response::{error_500, format_error_chain};
use axum::{
	Router,
	body::{Body, to_bytes},
	extract::{Request, State},
	http::{HeaderMap, HeaderValue, header},
	middleware::{Next, from_fn_with_state},
	response::Response,
};
use std::sync::Arc;

/// Everything one injector inserts into a page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Injection {
	/// Final URLs, already moved below the mount prefix.
	pub resources: ResourceList,
	/// Put scripts in front of `</body>` instead of `</head>`.
	pub inject_at_eof: bool,
	/// `data-*` attributes added to the `<body>` tag, names without the `data-` prefix.
	pub data_attributes: Vec<(String, String)>,
}

impl Injection {
	pub fn new(resources: ResourceList, inject_at_eof: bool) -> Injection {
		Injection {
			resources,
			inject_at_eof,
			data_attributes: Vec::new(),
		}
	}

	pub fn with_data_attributes(mut self, data_attributes: Vec<(String, String)>) -> Injection {
		self.data_attributes = data_attributes;
		self
	}
}

/// Wraps `next` so that its HTML responses carry the tags of `injection`.
///
/// Wrapping an already wrapped router appends the new tags after the existing
/// ones, which is what makes dependency order deterministic.
pub fn append_resources(next: Router, injection: Injection) -> Router {
	next.layer(from_fn_with_state(Arc::new(injection), inject_resources))
}

async fn inject_resources(State(injection): State<Arc<Injection>>, request: Request, next: Next) -> Response<Body> {
	let path = request.uri().path().to_owned();
	let response = next.run(request).await;

	if !response.status().is_success() {
		log::trace!("not injecting into '{path}': status {}", response.status());
		return response;
	}
	if !is_html(response.headers()) {
		log::trace!("not injecting into '{path}': not html");
		return response;
	}
	if response.headers().contains_key(header::CONTENT_ENCODING) {
		log::debug!("not injecting into '{path}': body is content-encoded");
		return response;
	}

	let (mut parts, body) = response.into_parts();

	let bytes = match to_bytes(body, usize::MAX).await {
		Ok(bytes) => bytes,
		Err(err) => {
			let err = anyhow::Error::new(err).context(format!("reading response body of '{path}'"));
			log::warn!("send 500 for request '{path}':\n{}", format_error_chain(&err));
			return error_500();
		}
	};

	match html::inject(&bytes, &injection) {
		Ok(html) => {
			if parts.headers.contains_key(header::CONTENT_LENGTH) {
				parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(html.len()));
			}
			Response::from_parts(parts, Body::from(html))
		}
		Err(reason) => {
			log::debug!("not injecting into '{path}': {reason}");
			Response::from_parts(parts, Body::from(bytes))
		}
	}
}

fn is_html(headers: &HeaderMap) -> bool {
	match headers.get(header::CONTENT_TYPE).and_then(|value| value.to_str().ok()) {
		None => true,
		Some(content_type) => {
			let content_type = content_type.trim_start().to_ascii_lowercase();
			content_type.starts_with("text/html") || content_type.starts_with("application/xhtml+xml")
		}
	}
}
