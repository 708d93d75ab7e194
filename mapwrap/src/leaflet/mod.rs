//! Leaflet provider.
//!
//! Injects the Leaflet library (and optionally its hash and fullscreen plugins)
//! into map pages and serves the bundled files.
//!
//! ```rust
//! use axum::{Router, response::Html, routing::get};
//! use mapwrap::{LeafletOptions, leaflet};
//! use mapwrap_core::Mux;
//!
//! let mut options = LeafletOptions::default();
//! options.set_prefix("/maps");
//!
//! let page = Router::new().fallback(get(|| async { Html("<html><head></head><body></body></html>") }));
//!
//! let mut mux = Mux::new();
//! mux.handle("/", leaflet::append_resources_handler(page, &options)).unwrap();
//! leaflet::append_asset_handlers(&mut mux, &options).unwrap();
//! assert!(mux.contains("/maps/javascript/leaflet.js"));
//! ```

pub mod assets;

use anyhow::Result;
use axum::Router;
use mapwrap_core::{AssetBundle, Mux, Provider, ResourceList, provider, url::parse_prefix};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LeafletOptions {
	/// Mount prefix of the Leaflet assets.
	pub prefix: String,

	/// Put the scripts in front of `</body>` instead of `</head>`.
	pub append_javascript_at_eof: bool,

	/// Use the single bundle that contains Leaflet and all plugins.
	pub rollup_assets: bool,

	/// Keep the map view in the URL fragment (leaflet-hash).
	pub enable_hash: bool,

	/// Add a fullscreen control (leaflet.fullscreen).
	pub enable_fullscreen: bool,
}

impl Default for LeafletOptions {
	fn default() -> Self {
		LeafletOptions {
			prefix: String::from("/"),
			append_javascript_at_eof: false,
			rollup_assets: false,
			enable_hash: false,
			enable_fullscreen: false,
		}
	}
}

impl LeafletOptions {
	pub fn set_prefix(&mut self, prefix: &str) {
		self.prefix = prefix.to_owned();
	}

	pub fn validate(&self) -> Result<()> {
		parse_prefix(&self.prefix)?;
		Ok(())
	}
}

impl Provider for LeafletOptions {
	fn name(&self) -> &str {
		"leaflet"
	}

	fn prefix(&self) -> &str {
		&self.prefix
	}

	fn resources(&self) -> ResourceList {
		if self.rollup_assets {
			return ResourceList::new(
				vec![assets::ROLLUP_JAVASCRIPT.to_owned()],
				vec![assets::ROLLUP_STYLESHEET.to_owned()],
			);
		}

		let mut resources = ResourceList::new(vec![assets::JAVASCRIPT.to_owned()], vec![assets::STYLESHEET.to_owned()]);

		if self.enable_hash {
			resources.javascript.push(assets::HASH_JAVASCRIPT.to_owned());
		}
		if self.enable_fullscreen {
			resources.javascript.push(assets::FULLSCREEN_JAVASCRIPT.to_owned());
			resources.stylesheets.push(assets::FULLSCREEN_STYLESHEET.to_owned());
		}

		resources
	}

	fn inject_at_eof(&self) -> bool {
		self.append_javascript_at_eof
	}

	fn assets(&self) -> AssetBundle {
		assets::bundle()
	}
}

/// Wraps `next` so that its HTML responses load Leaflet.
pub fn append_resources_handler(next: Router, options: &LeafletOptions) -> Router {
	provider::append_resources_handler(next, options)
}

/// Registers all Leaflet assets below `options.prefix`.
pub fn append_asset_handlers(mux: &mut Mux, options: &LeafletOptions) -> Result<()> {
	provider::append_asset_handlers(mux, options)
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{body::Body, extract::Request, http::StatusCode, response::Html, routing::get};
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use tower::ServiceExt as _;

	const PAGE: &str = "<html><head><title>map</title></head><body><div id=\"map\"></div></body></html>";

	async fn get_page(options: &LeafletOptions) -> String {
		let page = Router::new().fallback(get(|| async { Html(PAGE) }));
		let app = append_resources_handler(page, options);
		let req = Request::builder().uri("/").body(Body::empty()).unwrap();
		let res = app.oneshot(req).await.unwrap();
		let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
		String::from_utf8(bytes.to_vec()).unwrap()
	}

	#[test]
	fn defaults() {
		let options = LeafletOptions::default();
		assert_eq!(options.prefix, "/");
		assert!(!options.append_javascript_at_eof);
		assert_eq!(
			options.resources(),
			ResourceList::new(vec!["javascript/leaflet.js".into()], vec!["css/leaflet.css".into()])
		);
	}

	#[rstest]
	#[case(false, false, &["javascript/leaflet.js"], &["css/leaflet.css"])]
	#[case(true, false, &["javascript/leaflet.js", "javascript/leaflet-hash.js"], &["css/leaflet.css"])]
	#[case(
		false,
		true,
		&["javascript/leaflet.js", "javascript/leaflet.fullscreen.min.js"],
		&["css/leaflet.css", "css/leaflet.fullscreen.css"]
	)]
	fn plugins(#[case] hash: bool, #[case] fullscreen: bool, #[case] javascript: &[&str], #[case] stylesheets: &[&str]) {
		let options = LeafletOptions {
			enable_hash: hash,
			enable_fullscreen: fullscreen,
			..Default::default()
		};
		let resources = options.resources();
		assert_eq!(resources.javascript, javascript);
		assert_eq!(resources.stylesheets, stylesheets);
	}

	#[test]
	fn rollup_replaces_everything() {
		let options = LeafletOptions {
			rollup_assets: true,
			enable_hash: true,
			enable_fullscreen: true,
			..Default::default()
		};
		assert_eq!(
			options.resources(),
			ResourceList::new(
				vec!["javascript/leaflet.rollup.js".into()],
				vec!["css/leaflet.rollup.css".into()]
			)
		);
	}

	#[tokio::test]
	async fn injects_below_prefix() {
		let mut options = LeafletOptions::default();
		options.set_prefix("/maps/");
		let html = get_page(&options).await;
		assert!(html.contains(concat!(
			r#"<link rel="stylesheet" href="/maps/css/leaflet.css">"#,
			r#"<script src="/maps/javascript/leaflet.js"></script></head>"#
		)));
	}

	#[tokio::test]
	async fn injects_at_eof() {
		let options = LeafletOptions {
			append_javascript_at_eof: true,
			..Default::default()
		};
		let html = get_page(&options).await;
		assert!(html.contains(r#"<link rel="stylesheet" href="/css/leaflet.css"></head>"#));
		assert!(html.contains(r#"<script src="/javascript/leaflet.js"></script></body>"#));
	}

	#[tokio::test]
	async fn serves_assets() {
		let mut mux = Mux::new();
		let mut options = LeafletOptions::default();
		options.set_prefix("/maps");
		append_asset_handlers(&mut mux, &options).unwrap();
		assert_eq!(mux.len(), assets::bundle().len());

		let req = Request::builder()
			.uri("/maps/css/leaflet.css")
			.body(Body::empty())
			.unwrap();
		let res = mux.into_router().oneshot(req).await.unwrap();
		assert_eq!(res.status(), StatusCode::OK);
		assert_eq!(res.headers()["content-type"], "text/css; charset=utf-8");
		let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
		assert_eq!(bytes.as_ref(), assets::bundle().get("css/leaflet.css").unwrap().content);
	}

	#[test]
	fn validate() {
		assert!(LeafletOptions::default().validate().is_ok());
		let mut options = LeafletOptions::default();
		options.set_prefix("/maps/{id}");
		assert!(options.validate().is_err());
	}

	#[test]
	fn from_yaml() {
		let options: LeafletOptions = serde_yaml_ng::from_str("prefix: /maps\nenable_hash: true\n").unwrap();
		assert_eq!(options.prefix, "/maps");
		assert!(options.enable_hash);
		assert!(!options.rollup_assets);

		assert!(serde_yaml_ng::from_str::<LeafletOptions>("hash: true").is_err());
	}
}
