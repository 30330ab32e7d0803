use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gt_core::GeotagConfig;

mod context;
mod domains;
mod logging;
mod runner;
mod ui;

use crate::{
	context::{Context, OutputFormat},
	domains::{
		camera::{self, CameraCmd},
		config, interactive, preview,
		process::{self, args::ProcessArgs},
		sample, tasks,
	},
};

const DEFAULT_CONFIG_FILE: &str = "geotag.json";

#[derive(Parser, Debug)]
#[command(
	name = "geotag",
	version,
	about = "Writes GPS and attitude metadata from a CSV into JPEG photos"
)]
struct Cli {
	/// Path to the JSON config file
	#[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
	config: PathBuf,

	/// Log at debug level, whatever the config says
	#[arg(short, long, global = true, default_value_t = false)]
	verbose: bool,

	/// Print results as JSON
	#[arg(long, global = true, default_value_t = false)]
	json: bool,

	#[command(subcommand)]
	command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Tag the photos listed in a CSV
	Process(ProcessArgs),
	/// Check how a CSV and a photo folder line up, without writing anything
	Preview {
		#[arg(long)]
		csv: PathBuf,
		#[arg(long)]
		images: PathBuf,
	},
	/// Write a sample CSV showing the supported layout
	Sample { path: PathBuf },
	/// Show what a camera profile (.opt) contains
	InspectOpt { file: PathBuf },
	/// List the camera profiles in a folder
	ListOpt { dir: Option<PathBuf> },
	/// Run the tasks listed in the config file
	RunTasks,
	/// Write a config file with the defaults
	InitConfig { path: PathBuf },
	/// Menu driven mode, the default
	Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	if let Some(Commands::InitConfig { path }) = &cli.command {
		let _log_guard = logging::init(&GeotagConfig::default(), cli.verbose)?;
		return config::init(path);
	}

	let config = GeotagConfig::load_or_default(&cli.config)?;
	let _log_guard = logging::init(&config, cli.verbose)?;

	let ctx = Context::new(
		config,
		cli.config,
		if cli.json {
			OutputFormat::Json
		} else {
			OutputFormat::Human
		},
	);

	match cli.command.unwrap_or(Commands::Interactive) {
		Commands::Process(args) => process::run(&ctx, args).await,
		Commands::Preview { csv, images } => preview::run(&ctx, &csv, &images),
		Commands::Sample { path } => sample::run(&path),
		Commands::InspectOpt { file } => camera::run(&ctx, CameraCmd::Inspect { file }),
		Commands::ListOpt { dir } => camera::run(&ctx, CameraCmd::List { dir }),
		Commands::RunTasks => tasks::run(&ctx).await,
		Commands::InitConfig { path } => config::init(&path),
		Commands::Interactive => interactive::run(&ctx).await,
	}
}
