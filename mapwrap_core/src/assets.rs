//! Embedded asset bundles.
//!
//! An [`AssetBundle`] is a fixed list of files compiled into the binary, each
//! addressed by its path relative to the bundle root (`javascript/leaflet.js`).
//! [`append_asset_handlers`] registers one route per asset below a mount prefix.
//! The handler behind those routes only ever sees root-relative paths, because
//! it is wrapped with [`strip_prefix_handler`].

use crate::{
	ConfigError, Mux,
	mime::guess_mime,
	response::{error_404, ok_data},
	rewrite::strip_prefix_handler,
	url::{Url, join, parse_prefix},
};
use anyhow::{Context, Result};
use axum::{Router, body::Body, extract::State, http::Uri, response::Response, routing::get};
use std::collections::HashSet;

/// A single file of a bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Asset {
	/// Path relative to the bundle root, without leading slash.
	pub path: &'static str,
	pub content: &'static [u8],
}

impl Asset {
	pub fn mime(&self) -> String {
		guess_mime(self.path)
	}
}

/// A named, fixed set of embedded files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetBundle {
	name: &'static str,
	assets: &'static [Asset],
}

impl AssetBundle {
	pub const fn new(name: &'static str, assets: &'static [Asset]) -> AssetBundle {
		AssetBundle { name, assets }
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn len(&self) -> usize {
		self.assets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.assets.is_empty()
	}

	/// Asset paths in bundle order.
	pub fn names(&self) -> impl Iterator<Item = &'static str> {
		self.assets.iter().map(|asset| asset.path)
	}

	pub fn iter(&self) -> impl Iterator<Item = &'static Asset> {
		self.assets.iter()
	}

	/// Looks up an asset. Leading slashes are ignored.
	pub fn get(&self, path: &str) -> Option<&'static Asset> {
		let path = path.trim_start_matches('/');
		self.assets.iter().find(|asset| asset.path == path)
	}

	/// Checks that the bundle is not empty and has no duplicate or empty files.
	pub fn check(&self) -> Result<(), ConfigError> {
		let invalid = |reason: String| ConfigError::InvalidBundle {
			bundle: self.name.to_owned(),
			reason,
		};

		if self.assets.is_empty() {
			return Err(invalid(String::from("no assets")));
		}

		let mut seen = HashSet::new();
		for asset in self.assets {
			if !seen.insert(asset.path) {
				return Err(invalid(format!("'{}' is listed twice", asset.path)));
			}
			if asset.content.is_empty() {
				return Err(invalid(format!("'{}' is empty", asset.path)));
			}
		}
		Ok(())
	}

	/// Fails with [`ConfigError::MissingAsset`] unless `path` is part of the bundle.
	pub fn require(&self, path: &str) -> Result<&'static Asset, ConfigError> {
		self.get(path).ok_or_else(|| ConfigError::MissingAsset {
			bundle: self.name.to_owned(),
			path: path.trim_start_matches('/').to_owned(),
		})
	}
}

/// Serves the bundle from the root: `GET /css/leaflet.css` returns `css/leaflet.css`.
pub fn asset_router(bundle: AssetBundle) -> Router {
	Router::new().fallback(get(serve_asset)).with_state(bundle)
}

async fn serve_asset(uri: Uri, State(bundle): State<AssetBundle>) -> Response<Body> {
	let url = Url::from(uri.path());
	log::debug!("handle asset request: {}{url}", bundle.name);

	match bundle.get(url.relative()) {
		Some(asset) => {
			log::trace!("send asset '{}' ({} bytes)", asset.path, asset.content.len());
			ok_data(asset.content, &asset.mime())
		}
		None => {
			log::debug!("send 404 to asset request: {url}");
			error_404()
		}
	}
}

/// Registers a route for every asset of `bundle` below `prefix`.
///
/// Fails on the first route that is already taken; routes registered before
/// that stay registered.
pub fn append_asset_handlers(mux: &mut Mux, bundle: AssetBundle, prefix: &str) -> Result<()> {
	let prefix = parse_prefix(prefix)?;
	bundle.check()?;
	let handler = strip_prefix_handler(asset_router(bundle), &prefix)?;

	log::debug!(
		"registering {} assets of '{}' at '{}/'",
		bundle.len(),
		bundle.name,
		prefix
	);

	for path in bundle.names() {
		let route = join(&prefix, path);
		mux
			.handle(&route, handler.clone())
			.with_context(|| format!("registering asset '{path}' of '{}'", bundle.name))?;
	}

	Ok(())
}
