use std::path::Path;

use anyhow::{Context as _, Result};
use gt_core::GeotagConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console logging, plus a plain text log file when the config names one.
///
/// The filter comes from `RUST_LOG` when set, then from the config's `log_level`; `verbose`
/// overrides both with `debug`. The returned guard flushes the file writer when dropped.
pub fn init(config: &GeotagConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
	let filter = || -> Result<EnvFilter> {
		if verbose {
			return Ok(EnvFilter::new("debug"));
		}

		match EnvFilter::try_from_default_env() {
			Ok(filter) => Ok(filter),
			Err(_) => EnvFilter::try_new(&config.log_level)
				.with_context(|| format!("invalid log_level '{}'", config.log_level)),
		}
	};

	let console = fmt::layer().with_writer(std::io::stderr).with_filter(filter()?);

	let (file, guard) = match &config.log_file {
		Some(path) => {
			let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
				path.parent().unwrap_or_else(|| Path::new(".")),
				path.file_name().context("log_file has no file name")?,
			));

			let layer = fmt::layer()
				.with_writer(writer)
				.with_ansi(false)
				.with_filter(filter()?);

			(Some(layer), Some(guard))
		}
		None => (None, None),
	};

	tracing_subscriber::registry()
		.with(console)
		.with(file)
		.try_init()
		.context("failed to install the tracing subscriber")?;

	Ok(guard)
}
