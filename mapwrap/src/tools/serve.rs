use anyhow::Result;
use mapwrap::{Config, MapServer};
use std::path::PathBuf;
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Path to a configuration file (YAML format) with the sections server, leaflet and tangram.
	/// Command line arguments will override configuration file settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8080
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,

	/// Mount the map page and all assets below this prefix, e.g. "/maps/v1"
	#[arg(long, display_order = 1)]
	pub prefix: Option<String>,

	/// Nextzen API key
	#[arg(long, display_order = 2)]
	pub api_key: Option<String>,

	/// Tangram scene file. Relative URLs are served below the prefix.
	#[arg(long, display_order = 2)]
	pub style_url: Option<String>,

	/// Vector tile URL template
	#[arg(long, display_order = 2)]
	pub tile_url: Option<String>,

	/// Do not let Tangram include Leaflet, stack a separate Leaflet provider instead
	#[arg(long, display_order = 3)]
	pub no_leaflet: bool,

	/// Use the bundled Leaflet build with all plugins
	#[arg(long, display_order = 3)]
	pub rollup: bool,

	/// Inject scripts at the end of the body instead of the head
	#[arg(long, display_order = 3)]
	pub at_eof: bool,

	/// Load the unminified Tangram build
	#[arg(long, display_order = 3)]
	pub debug: bool,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = if let Some(config_path) = &arguments.config {
		Config::from_path(config_path)?
	} else {
		Config::default()
	};

	apply_arguments(&mut config, arguments);
	config.validate()?;

	let mut server = MapServer::from_config(config);

	server.routes()?.iter().for_each(|route| eprintln!("   {route}"));

	server.start().await?;

	if let Some(addr) = server.local_addr() {
		eprintln!("map page: http://{addr}{}", mapwrap_core::join(server.prefix(), "/"));
	}

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
		server.stop().await;
	} else {
		loop {
			sleep(Duration::from_secs(60)).await
		}
	}

	Ok(())
}

/// Command line arguments win over the configuration file.
fn apply_arguments(config: &mut Config, arguments: &Subcommand) {
	config.server.override_optional_ip(&arguments.ip);
	config.server.override_optional_port(&arguments.port);

	let tangram = &mut config.tangram;

	if let Some(prefix) = &arguments.prefix {
		tangram.set_prefix(prefix);
		if let Some(leaflet) = &mut config.leaflet {
			leaflet.set_prefix(prefix);
		}
	}
	if let Some(api_key) = &arguments.api_key {
		tangram.nextzen.api_key.clone_from(api_key);
	}
	if let Some(style_url) = &arguments.style_url {
		tangram.nextzen.style_url.clone_from(style_url);
	}
	if let Some(tile_url) = &arguments.tile_url {
		tangram.nextzen.tile_url.clone_from(tile_url);
	}
	if arguments.debug {
		tangram.debug = true;
	}

	for leaflet in config.leaflet.iter_mut().chain([&mut tangram.leaflet]) {
		if arguments.rollup {
			leaflet.rollup_assets = true;
		}
		if arguments.at_eof {
			leaflet.append_javascript_at_eof = true;
		}
	}
	if arguments.at_eof {
		tangram.append_javascript_at_eof = true;
	}

	if arguments.no_leaflet {
		tangram.include_leaflet_resources = false;
		tangram.include_leaflet_assets = false;
		if config.leaflet.is_none() {
			config.leaflet = Some(tangram.leaflet.clone());
		}
	}
}
