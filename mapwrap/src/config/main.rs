use super::ServerConfig;
use crate::{LeafletOptions, TangramOptions};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// A Leaflet stack of its own, injected below Tangram.
	/// Turn off `tangram.include_leaflet_*` when using it, or the routes collide.
	#[serde(default)]
	pub leaflet: Option<LeafletOptions>,

	/// Tangram options, including the Leaflet it depends on
	#[serde(default)]
	pub tangram: TangramOptions,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let config = Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;
		config.validate()?;
		Ok(config)
	}

	/// Checks all mount prefixes.
	pub fn validate(&self) -> Result<()> {
		if let Some(leaflet) = &self.leaflet {
			leaflet.validate().context("checking section 'leaflet'")?;
		}
		self.tangram.validate().context("checking section 'tangram'")
	}
}
