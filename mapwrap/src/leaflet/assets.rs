use mapwrap_core::{Asset, AssetBundle};

macro_rules! asset {
	($path:literal) => {
		Asset {
			path: $path,
			content: include_bytes!(concat!("../../assets/leaflet/", $path)),
		}
	};
}

pub const JAVASCRIPT: &str = "javascript/leaflet.js";
pub const STYLESHEET: &str = "css/leaflet.css";
pub const ROLLUP_JAVASCRIPT: &str = "javascript/leaflet.rollup.js";
pub const ROLLUP_STYLESHEET: &str = "css/leaflet.rollup.css";
pub const HASH_JAVASCRIPT: &str = "javascript/leaflet-hash.js";
pub const FULLSCREEN_JAVASCRIPT: &str = "javascript/leaflet.fullscreen.min.js";
pub const FULLSCREEN_STYLESHEET: &str = "css/leaflet.fullscreen.css";

/// Leaflet 1.9.4 with the hash and fullscreen plugins.
static ASSETS: &[Asset] = &[
	asset!("javascript/leaflet.js"),
	asset!("css/leaflet.css"),
	asset!("javascript/leaflet.rollup.js"),
	asset!("css/leaflet.rollup.css"),
	asset!("javascript/leaflet-hash.js"),
	asset!("javascript/leaflet.fullscreen.min.js"),
	asset!("css/leaflet.fullscreen.css"),
	// referenced by leaflet.css
	asset!("css/images/marker-icon.png"),
	asset!("css/images/marker-shadow.png"),
];

pub fn bundle() -> AssetBundle {
	AssetBundle::new("leaflet", ASSETS)
}
