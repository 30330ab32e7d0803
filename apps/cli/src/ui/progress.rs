//! Progress bar fed by batch events

use gt_core::BatchEvent;
use indicatif::{ProgressBar, ProgressStyle};

use crate::context::OutputFormat;

const RUNNING_TEMPLATE: &str = "{spinner:.yellow} {msg} [{bar:40.blue/grey}] {pos}/{len}";

/// One bar per batch, hidden when printing JSON so stdout stays parseable.
pub struct BatchProgress {
	bar: ProgressBar,
}

impl BatchProgress {
	pub fn new(format: OutputFormat, name: impl Into<String>) -> Self {
		let bar = match format {
			OutputFormat::Human => ProgressBar::new(0),
			OutputFormat::Json => ProgressBar::hidden(),
		};

		bar.set_style(
			ProgressStyle::with_template(RUNNING_TEMPLATE)
				.unwrap_or_else(|_| ProgressStyle::default_bar())
				.progress_chars("█▉▊▋▌▍▎▏ ")
				.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
		);
		bar.set_message(name.into());

		Self { bar }
	}

	pub fn handle(&self, event: &BatchEvent) {
		match event {
			BatchEvent::Started { total } => {
				self.bar.set_length(u64::try_from(*total).unwrap_or(u64::MAX));
			}
			BatchEvent::Tagged { .. } => self.bar.inc(1),
			BatchEvent::Failed { reason, .. } => {
				self.bar.println(format!("✗ {reason}"));
				self.bar.inc(1);
			}
			BatchEvent::Skipped { line, reason } => {
				self.bar.println(format!("- line {line}: {reason}"));
				self.bar.inc(1);
			}
			BatchEvent::Warning { message } => self.bar.println(format!("! {message}")),
			BatchEvent::Stopped { remaining } => {
				self.bar
					.abandon_with_message(format!("stopped, {remaining} rows left"));
			}
		}
	}

	pub fn finish(&self) {
		if !self.bar.is_finished() {
			self.bar.finish_and_clear();
		}
	}
}
