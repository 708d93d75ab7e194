use anyhow::Result;
use mapwrap::TangramOptions;
use mapwrap_core::{Provider, join};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {
	/// Mount prefix, e.g. "/maps/v1"
	#[arg(long, default_value = "/")]
	pub prefix: String,

	/// List Tangram's assets only
	#[arg(long)]
	pub no_leaflet: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let mut options = TangramOptions::default();
	options.set_prefix(&arguments.prefix);
	options.include_leaflet_assets = !arguments.no_leaflet;
	options.validate()?;

	for line in list(&options) {
		println!("{line}");
	}

	Ok(())
}

/// One line per asset: route, size and content type. Dependencies come first.
fn list(provider: &dyn Provider) -> Vec<String> {
	let mut lines: Vec<String> = provider.asset_dependencies().into_iter().flat_map(list).collect();

	let bundle = provider.assets();
	lines.extend(bundle.iter().map(|asset| {
		format!(
			"{:50} {:>8}  {}",
			join(provider.prefix(), asset.path),
			asset.content.len(),
			asset.mime()
		)
	}));

	lines
}
