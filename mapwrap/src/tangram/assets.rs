use mapwrap_core::{Asset, AssetBundle};

macro_rules! asset {
	($path:literal) => {
		Asset {
			path: $path,
			content: include_bytes!(concat!("../../assets/tangram/", $path)),
		}
	};
}

pub const JAVASCRIPT: &str = "javascript/tangram.min.js";
pub const DEBUG_JAVASCRIPT: &str = "javascript/tangram.debug.js";
pub const REFILL_STYLE: &str = "tangram/refill-style.zip";

static ASSETS: &[Asset] = &[
	asset!("javascript/tangram.min.js"),
	asset!("javascript/tangram.debug.js"),
	asset!("tangram/refill-style.zip"),
	asset!("tangram/refill-style-themes-label.zip"),
	asset!("tangram/fonts/Montserrat-Regular.woff"),
];

pub fn bundle() -> AssetBundle {
	AssetBundle::new("tangram", ASSETS)
}
