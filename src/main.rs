#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "rrscript", about = "Build, inspect, and run record-routing message streams")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Write a message stream from value specifications.
	Build(cmd::build::Args),
	/// Print the messages of a stream.
	Inspect(cmd::inspect::Args),
	/// Drive the forward script over a stream or as a source.
	Run(cmd::run::Args),
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rrscript=info")))
		.with_writer(std::io::stderr)
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> rrscript::record::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Build(args) => cmd::build::run(args),
		Commands::Inspect(args) => cmd::inspect::run(args),
		Commands::Run(args) => cmd::run::run(args),
	}
}
