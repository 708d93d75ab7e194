//! Route table with `ServeMux`-like patterns.
//!
//! Patterns ending in `/` claim their whole subtree, all other patterns match
//! exactly. Explicit routes win over subtrees, so assets registered at
//! `/maps/javascript/leaflet.js` are served even when a page claims `/maps/`.
//!
//! Unlike `axum::Router`, registering a pattern twice is reported as a
//! [`ConfigError`] instead of a panic.

use crate::{ConfigError, response::error_404};
use axum::{Router, body::Body, extract::Request, response::Response, routing::future::RouteFuture};
use std::{
	collections::BTreeSet,
	convert::Infallible,
	fmt,
	task::{Context, Poll},
};
use tower::Service;

#[derive(Default)]
pub struct Mux {
	router: Router,
	patterns: BTreeSet<String>,
}

impl Mux {
	pub fn new() -> Mux {
		Mux::default()
	}

	/// Registers `handler` for `pattern`.
	///
	/// The handler receives the unmodified request path.
	pub fn handle(&mut self, pattern: &str, handler: Router) -> Result<(), ConfigError> {
		check_pattern(pattern)?;

		if self.patterns.contains(pattern) {
			return Err(ConfigError::DuplicateRoute(pattern.to_owned()));
		}
		self.patterns.insert(pattern.to_owned());

		log::trace!("register route '{pattern}'");

		let handler = Mounted(handler);
		let router = std::mem::take(&mut self.router);
		self.router = if pattern.ends_with('/') {
			router
				.route_service(pattern, handler.clone())
				.route_service(&format!("{pattern}{{*rest}}"), handler)
		} else {
			router.route_service(pattern, handler)
		};

		Ok(())
	}

	pub fn contains(&self, pattern: &str) -> bool {
		self.patterns.contains(pattern)
	}

	/// Registered patterns in lexicographic order.
	pub fn patterns(&self) -> impl Iterator<Item = &str> {
		self.patterns.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	/// Freezes the table. Unmatched requests get a 404.
	pub fn into_router(self) -> Router {
		self.router.fallback(not_found)
	}
}

impl fmt::Debug for Mux {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mux").field("patterns", &self.patterns).finish_non_exhaustive()
	}
}

async fn not_found() -> Response<Body> {
	error_404()
}

fn check_pattern(pattern: &str) -> Result<(), ConfigError> {
	let invalid = |reason| ConfigError::InvalidRoute {
		pattern: pattern.to_owned(),
		reason,
	};

	if !pattern.starts_with('/') {
		return Err(invalid("must start with '/'"));
	}
	if pattern.contains(['{', '}']) {
		return Err(invalid("must not contain captures"));
	}
	if pattern.split('/').any(|segment| segment.starts_with([':', '*'])) {
		return Err(invalid("segments must not start with ':' or '*'"));
	}
	if pattern.contains(['?', '#']) {
		return Err(invalid("must not contain a query or fragment"));
	}
	Ok(())
}

/// A router mounted at a fixed route.
///
/// `Router::route_service` refuses plain routers because it assumes nesting was
/// intended. Here the full path is wanted, so the router is wrapped.
#[derive(Clone)]
struct Mounted(Router);

impl Service<Request> for Mounted {
	type Response = Response<Body>;
	type Error = Infallible;
	type Future = RouteFuture<Infallible>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Service::<Request>::poll_ready(&mut self.0, cx)
	}

	fn call(&mut self, request: Request) -> Self::Future {
		self.0.call(request)
	}
}
