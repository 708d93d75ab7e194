mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[clap(alias = "server")]
	/// Serve a demo map page with all assets via http
	Serve(tools::serve::Subcommand),

	/// List the embedded assets and their routes
	Assets(tools::assets::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Serve(arguments) => tools::serve::run(arguments),
		Commands::Assets(arguments) => tools::assets::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{:?}", cli);
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["mapwrap"]).unwrap_err().to_string();
		assert!(err.contains("Usage: mapwrap [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["mapwrap", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("mapwrap "));
	}

	#[test]
	fn serve_subcommand() {
		let err = run_command(vec!["mapwrap", "serve", "--port", "x"]).unwrap_err().to_string();
		assert!(err.contains("invalid value 'x'"));
	}

	#[test]
	fn assets_subcommand() {
		let msg = run_command(vec!["mapwrap", "assets", "--prefix", "/maps"]).unwrap();
		assert!(msg.contains("Assets"));
	}
}
