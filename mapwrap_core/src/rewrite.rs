//! Request rewriting middleware.
//!
//! [`rewrite_request_handler`] runs a rewrite function on every request before
//! it reaches the wrapped router. If the function fails the request is answered
//! with a 500 and the router is never called.
//!
//! [`strip_prefix_handler`] is the rewrite used for mounting: it removes a mount
//! prefix from the leading path segments, so the wrapped router can be written
//! as if it was mounted at `/`.

use crate::{
	response::{error_500, format_error_chain},
	url::{Url, parse_prefix},
};
use anyhow::{Context, Result};
use axum::{
	Router,
	body::Body,
	extract::{Request, State},
	http::{Uri, uri::PathAndQuery},
	middleware::{Next, from_fn_with_state},
	response::Response,
};
use std::sync::Arc;
use tower::Layer;

type RewriteFn = dyn Fn(Request) -> Result<Request> + Send + Sync;

#[derive(Clone)]
struct RewriteState {
	rewrite: Arc<RewriteFn>,
}

/// Wraps `next` so that `rewrite` is applied to every request first.
///
/// The rewrite runs before `next` does its routing, so `next` matches its
/// routes against the rewritten path.
pub fn rewrite_request_handler<F>(next: Router, rewrite: F) -> Router
where
	F: Fn(Request) -> Result<Request> + Send + Sync + 'static,
{
	let state = RewriteState {
		rewrite: Arc::new(rewrite),
	};
	// `Router::layer` would only run after `next` picked a route
	Router::new().fallback_service(from_fn_with_state(state, rewrite_request).layer(next))
}

async fn rewrite_request(State(state): State<RewriteState>, request: Request, next: Next) -> Response<Body> {
	let path = request.uri().path().to_owned();
	match (state.rewrite)(request) {
		Ok(request) => next.run(request).await,
		Err(err) => {
			log::warn!("send 500 for request '{path}', rewrite failed:\n{}", format_error_chain(&err));
			error_500()
		}
	}
}

/// Wraps `next` so that it sees request paths without `prefix`.
///
/// A root prefix returns `next` unchanged.
pub fn strip_prefix_handler(next: Router, prefix: &str) -> Result<Router> {
	let prefix = parse_prefix(prefix)?;
	if prefix.is_empty() {
		return Ok(next);
	}

	let prefix = Url::new(prefix);
	Ok(rewrite_request_handler(next, move |request| {
		strip_request_prefix(request, &prefix)
	}))
}

/// Removes `prefix` from the beginning of the request path, keeping the query string.
pub fn strip_request_prefix(request: Request, prefix: &Url) -> Result<Request> {
	let (mut parts, body) = request.into_parts();

	let path = Url::from(parts.uri.path()).strip_prefix(prefix)?;
	let path_and_query = match parts.uri.query() {
		Some(query) => format!("{path}?{query}"),
		None => path.to_string(),
	};

	let mut uri = parts.uri.into_parts();
	uri.path_and_query = Some(
		path_and_query
			.parse::<PathAndQuery>()
			.with_context(|| format!("parsing rewritten path '{path_and_query}'"))?,
	);
	parts.uri = Uri::from_parts(uri)?;

	Ok(Request::from_parts(parts, body))
}
