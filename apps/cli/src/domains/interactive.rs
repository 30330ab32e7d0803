use std::path::{Path, PathBuf};

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use gt_core::BatchJob;
use gt_media_metadata::camera::list_opt_files;
use gt_utils::error::report_error;

use crate::{
	context::Context,
	domains::{process, sample},
};

const MENU: [&str; 3] = ["Process photos", "Create a sample CSV", "Exit"];

pub async fn run(ctx: &Context) -> Result<()> {
	loop {
		let choice = Select::new()
			.with_prompt("What do you want to do?")
			.items(&MENU)
			.default(0)
			.interact()?;

		match choice {
			0 => {
				let job = prompt_job(ctx)?;
				report_error(&process::run_job(ctx, job).await);
			}
			1 => {
				let path = Input::<String>::new()
					.with_prompt("Where should the sample go?")
					.default("sample.csv".to_string())
					.interact_text()?;
				report_error(&sample::run(Path::new(&path)));
			}
			_ => return Ok(()),
		}

		println!();
	}
}

fn prompt_job(ctx: &Context) -> Result<BatchJob> {
	let csv = Input::<String>::new()
		.with_prompt("CSV file")
		.interact_text()?;

	let images = Input::<String>::new()
		.with_prompt("Photo folder")
		.interact_text()?;

	let output = Input::<String>::new()
		.with_prompt("Output folder (empty to tag in place)")
		.default(
			ctx.config
				.output_dir
				.as_ref()
				.map(|dir| dir.display().to_string())
				.unwrap_or_default(),
		)
		.allow_empty(true)
		.interact_text()?;

	let xmp = Confirm::new()
		.with_prompt("Embed DJI XMP metadata?")
		.default(ctx.config.xmp)
		.interact()?;

	Ok(BatchJob::new(csv.trim(), images.trim())
		.with_output_dir(non_empty(&output))
		.with_opt_file(prompt_opt(ctx, Path::new(images.trim()))?)
		.with_xmp(xmp))
}

/// Offers the profiles next to the photos and in the working directory.
fn prompt_opt(ctx: &Context, images: &Path) -> Result<Option<PathBuf>> {
	let mut candidates = list_opt_files(images)?;
	for opt in list_opt_files(".")? {
		if !candidates.contains(&opt) {
			candidates.push(opt);
		}
	}
	if let Some(opt) = &ctx.config.opt_file {
		if !candidates.contains(opt) {
			candidates.insert(0, opt.clone());
		}
	}

	if candidates.is_empty() {
		return Ok(None);
	}

	let items = candidates
		.iter()
		.map(|path| path.display().to_string())
		.chain(["No camera profile".to_string()])
		.collect::<Vec<_>>();

	let choice = Select::new()
		.with_prompt("Camera profile")
		.items(&items)
		.default(0)
		.interact()?;

	Ok(candidates.get(choice).cloned())
}

fn non_empty(value: &str) -> Option<PathBuf> {
	let value = value.trim();
	(!value.is_empty()).then(|| PathBuf::from(value))
}
