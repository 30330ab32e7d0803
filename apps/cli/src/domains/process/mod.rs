pub mod args;

use anyhow::Result;
use gt_core::BatchJob;
use tracing::info;

use crate::{
	context::Context,
	runner,
	ui::{summary::print_result, BatchProgress},
};

use self::args::ProcessArgs;

pub async fn run(ctx: &Context, args: ProcessArgs) -> Result<()> {
	run_job(ctx, args.to_job(&ctx.config)).await
}

pub async fn run_job(ctx: &Context, job: BatchJob) -> Result<()> {
	info!(
		csv = %job.csv.display(),
		images = %job.images.display(),
		output = ?job.output,
		opt = ?job.opt_file,
		xmp = job.xmp,
		"Processing"
	);

	let format = ctx.format;
	let result = runner::with_ctrl_c(move |driver| {
		let progress = BatchProgress::new(format, "Tagging photos");
		let result = driver.run(&job, |event| progress.handle(event));
		progress.finish();
		result
	})
	.await??;

	ctx.print(&result, print_result)
}
