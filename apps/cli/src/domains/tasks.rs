use anyhow::Result;
use gt_core::{run_tasks, BatchEvent, TaskOutcome};
use serde::Serialize;

use crate::{
	context::Context,
	runner,
	ui::{summary::print_result, BatchProgress},
};

#[derive(Debug, Serialize)]
struct TaskReport {
	input_dir: String,
	output_dir: String,
	#[serde(flatten)]
	outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outcome {
	Ran(TaskOutcome),
	Error { error: String },
}

pub async fn run(ctx: &Context) -> Result<()> {
	if ctx.config.tasks.is_empty() {
		println!("No tasks configured in {}", ctx.config_path.display());
		return Ok(());
	}

	let config = ctx.config.clone();
	let format = ctx.format;

	let reports = runner::with_ctrl_c(move |driver| {
		let mut progress: Option<BatchProgress> = None;

		let outcomes = run_tasks(
			&config.tasks,
			driver,
			config.opt_file.as_deref(),
			config.xmp,
			|task, event| {
				if matches!(event, BatchEvent::Started { .. }) {
					let bar = BatchProgress::new(format, task.input_dir.display().to_string());
					if let Some(previous) = progress.replace(bar) {
						previous.finish();
					}
				}
				if let Some(bar) = &progress {
					bar.handle(event);
				}
			},
		);

		if let Some(bar) = progress {
			bar.finish();
		}

		outcomes
			.into_iter()
			.map(|(task, outcome)| TaskReport {
				input_dir: task.input_dir.display().to_string(),
				output_dir: task.output_dir.display().to_string(),
				outcome: match outcome {
					Ok(outcome) => Outcome::Ran(outcome),
					Err(e) => Outcome::Error {
						error: e.to_string(),
					},
				},
			})
			.collect::<Vec<_>>()
	})
	.await?;

	ctx.print(&reports, |reports| {
		for report in reports {
			println!("{} -> {}", report.input_dir, report.output_dir);
			match &report.outcome {
				Outcome::Ran(TaskOutcome::Completed(result)) => print_result(result),
				Outcome::Ran(TaskOutcome::Skipped(reason)) => println!("skipped: {reason}"),
				Outcome::Error { error } => println!("failed: {error}"),
			}
			println!();
		}
	})
}
