//! Tangram provider.
//!
//! Tangram renders vector tiles as a Leaflet layer, so by default the Leaflet
//! provider is stacked below it: Leaflet's tags are injected first and its
//! assets are registered first. The Nextzen parameters a page needs to set up
//! the layer are passed as `data-nextzen-*` attributes of the `<body>` tag.

pub mod assets;

use crate::LeafletOptions;
use anyhow::Result;
use axum::Router;
use mapwrap_core::{
	AssetBundle, Mux, Provider, ResourceList, provider,
	url::{is_absolute_url, join, parse_prefix},
};
use serde::Deserialize;

pub const DEFAULT_STYLE_URL: &str = "/tangram/refill-style.zip";
pub const DEFAULT_TILE_URL: &str = "https://tile.nextzen.org/tilezen/vector/v1/512/all/{z}/{x}/{y}.mvt";

/// Parameters of the Nextzen vector tile service.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct NextzenOptions {
	pub api_key: String,

	/// Scene file. Relative URLs are moved below the Tangram prefix.
	pub style_url: String,

	pub tile_url: String,
}

impl Default for NextzenOptions {
	fn default() -> Self {
		NextzenOptions {
			api_key: String::new(),
			style_url: String::from(DEFAULT_STYLE_URL),
			tile_url: String::from(DEFAULT_TILE_URL),
		}
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TangramOptions {
	/// Mount prefix of the Tangram assets.
	pub prefix: String,

	/// Put the scripts in front of `</body>` instead of `</head>`.
	pub append_javascript_at_eof: bool,

	/// Tangram ships no separate bundle, the minified build is used either way.
	pub rollup_assets: bool,

	/// Load the unminified build.
	pub debug: bool,

	/// Inject Leaflet's resources before Tangram's.
	pub include_leaflet_resources: bool,

	/// Register Leaflet's assets next to Tangram's.
	pub include_leaflet_assets: bool,

	pub leaflet: LeafletOptions,

	pub nextzen: NextzenOptions,
}

impl Default for TangramOptions {
	fn default() -> Self {
		TangramOptions {
			prefix: String::from("/"),
			append_javascript_at_eof: false,
			rollup_assets: false,
			debug: false,
			include_leaflet_resources: true,
			include_leaflet_assets: true,
			leaflet: LeafletOptions::default(),
			nextzen: NextzenOptions::default(),
		}
	}
}

impl TangramOptions {
	/// Sets the prefix of Tangram and of the nested Leaflet options.
	pub fn set_prefix(&mut self, prefix: &str) {
		self.prefix = prefix.to_owned();
		self.leaflet.set_prefix(prefix);
	}

	pub fn validate(&self) -> Result<()> {
		parse_prefix(&self.prefix)?;
		self.leaflet.validate()
	}

	/// Style URL as the page sees it.
	pub fn style_url(&self) -> String {
		let style_url = or_default(&self.nextzen.style_url, DEFAULT_STYLE_URL);
		if is_absolute_url(style_url) {
			style_url.to_owned()
		} else {
			join(&self.prefix, style_url)
		}
	}

	pub fn tile_url(&self) -> &str {
		or_default(&self.nextzen.tile_url, DEFAULT_TILE_URL)
	}

	fn warn_on_defaults(&self) {
		if self.nextzen.api_key.is_empty() {
			log::warn!("no Nextzen API key configured, tile requests will probably be refused");
		}
		if self.nextzen.style_url.is_empty() {
			log::warn!("empty style URL, using '{DEFAULT_STYLE_URL}'");
		}
		if self.nextzen.tile_url.is_empty() {
			log::warn!("empty tile URL, using '{DEFAULT_TILE_URL}'");
		}
	}
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
	if value.is_empty() { default } else { value }
}

impl Provider for TangramOptions {
	fn name(&self) -> &str {
		"tangram"
	}

	fn prefix(&self) -> &str {
		&self.prefix
	}

	fn resources(&self) -> ResourceList {
		let javascript = if self.debug {
			assets::DEBUG_JAVASCRIPT
		} else {
			assets::JAVASCRIPT
		};
		ResourceList::new(vec![javascript.to_owned()], Vec::new())
	}

	fn inject_at_eof(&self) -> bool {
		self.append_javascript_at_eof
	}

	fn data_attributes(&self) -> Vec<(String, String)> {
		vec![
			(String::from("nextzen-api-key"), self.nextzen.api_key.clone()),
			(String::from("nextzen-style-url"), self.style_url()),
			(String::from("nextzen-tile-url"), self.tile_url().to_owned()),
		]
	}

	fn assets(&self) -> AssetBundle {
		assets::bundle()
	}

	fn resource_dependencies(&self) -> Vec<&dyn Provider> {
		if self.include_leaflet_resources {
			vec![&self.leaflet]
		} else {
			Vec::new()
		}
	}

	fn asset_dependencies(&self) -> Vec<&dyn Provider> {
		if self.include_leaflet_assets {
			vec![&self.leaflet]
		} else {
			Vec::new()
		}
	}
}

/// Wraps `next` so that its HTML responses load Tangram, and Leaflet before it
/// unless `include_leaflet_resources` is off.
pub fn append_resources_handler(next: Router, options: &TangramOptions) -> Router {
	options.warn_on_defaults();
	provider::append_resources_handler(next, options)
}

/// Registers the Tangram assets, and the Leaflet assets unless
/// `include_leaflet_assets` is off.
pub fn append_asset_handlers(mux: &mut Mux, options: &TangramOptions) -> Result<()> {
	provider::append_asset_handlers(mux, options)
}
